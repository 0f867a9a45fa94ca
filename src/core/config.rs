//! Server configuration locations.
//!
//! [`ServerConfig`] ties the platform defaults to the configuration and
//! library directories in effect, and knows where `ambari.properties` and
//! the files around it live.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::constants::{
    CONF_DIR_VAR, DEBUG_MODE_KEY, JDBC_DRIVER_PATH_PROPERTY, NR_USER_PROPERTY, PROPERTIES_FILE,
    RESOURCES_DIR_PROPERTY, SERVER_LIB_VAR, SERVER_VERSION_FILE_PATH, STACK_LOCATION_KEY,
    SUSPEND_START_MODE_KEY, VIEWS_DIR_PROPERTY,
};
use crate::core::credential::JavaCredentialProvider;
use crate::core::jdk::{self, Jdk};
use crate::core::platform::{PlatformInfo, ServerDefaults};
use crate::core::properties::Properties;
use crate::error::{ConfigError, Result};

/// Debug switches for the server JVM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMode {
    pub debug: bool,
    pub suspend_start: bool,
}

/// Resolved server configuration layout.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    platform: PlatformInfo,
    defaults: ServerDefaults,
    conf_dir: PathBuf,
    lib_dir: PathBuf,
    backup_dir: PathBuf,
}

impl ServerConfig {
    /// Build from explicit directories.
    pub fn new(platform: PlatformInfo, conf_dir: impl Into<PathBuf>, lib_dir: impl Into<PathBuf>) -> Self {
        let defaults = ServerDefaults::for_platform(&platform);
        Self {
            platform,
            defaults,
            conf_dir: conf_dir.into(),
            lib_dir: lib_dir.into(),
            backup_dir: std::env::temp_dir(),
        }
    }

    /// Build from overrides, falling back to `AMBARI_CONF_DIR`,
    /// `AMBARI_SERVER_LIB` and then the platform defaults.
    pub fn resolve(
        platform: PlatformInfo,
        conf_dir: Option<PathBuf>,
        lib_dir: Option<PathBuf>,
    ) -> Self {
        let defaults = ServerDefaults::for_platform(&platform);
        let conf_dir = conf_dir
            .or_else(|| std::env::var_os(CONF_DIR_VAR).map(PathBuf::from))
            .unwrap_or_else(|| {
                info!(default = %defaults.conf_dir.display(), "{} is not set, using default", CONF_DIR_VAR);
                defaults.conf_dir.clone()
            });
        let lib_dir = lib_dir
            .or_else(|| std::env::var_os(SERVER_LIB_VAR).map(PathBuf::from))
            .unwrap_or_else(|| {
                info!(default = %defaults.libs_dir.display(), "{} is not set, using default", SERVER_LIB_VAR);
                defaults.libs_dir.clone()
            });

        Self::new(platform, conf_dir, lib_dir)
    }

    /// Replace the platform defaults.
    pub fn with_defaults(mut self, defaults: ServerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Directory receiving properties backups before each write.
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    pub fn defaults(&self) -> &ServerDefaults {
        &self.defaults
    }

    pub fn conf_dir(&self) -> &Path {
        &self.conf_dir
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Path to `ambari.properties`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PropertiesNotFound` if the file is not in the
    /// configuration directory.
    pub fn properties_path(&self) -> Result<PathBuf> {
        let path = self.conf_dir.join(PROPERTIES_FILE);
        if !path.is_file() {
            return Err(ConfigError::PropertiesNotFound {
                file: PROPERTIES_FILE,
                var: CONF_DIR_VAR,
                dir: self.conf_dir.clone(),
            }
            .into());
        }
        debug!(path = %path.display(), "loading properties from");
        Ok(path)
    }

    /// Load `ambari.properties`.
    pub fn load_properties(&self) -> Result<Properties> {
        Properties::load(self.properties_path()?)
    }

    /// Write `properties` back to `ambari.properties`.
    pub fn store_properties(&self, properties: &Properties) -> Result<()> {
        properties.store_with_backup_dir(self.properties_path()?, &self.backup_dir)
    }

    /// Set a single property on disk.
    pub fn write_property(&self, key: &str, value: &str) -> Result<()> {
        let mut properties = self.load_properties()?;
        properties.set(key, value);
        self.store_properties(&properties)
    }

    /// Remove a single property on disk. Returns the previous value.
    pub fn remove_property(&self, key: &str) -> Result<Option<String>> {
        let mut properties = self.load_properties()?;
        let previous = properties.remove(key);
        if previous.is_some() {
            self.store_properties(&properties)?;
        }
        Ok(previous)
    }

    /// Make the file contain exactly the keys in `updates`.
    ///
    /// Keys already in the file keep their position.
    pub fn update_properties(&self, updates: &BTreeMap<String, String>) -> Result<()> {
        let mut properties = self.load_properties()?;
        for (key, value) in updates {
            properties.set(key.as_str(), value.as_str());
        }
        properties.retain_keys(updates);
        self.store_properties(&properties)
    }

    /// Apply `updates` on top of `properties` and store the result.
    pub fn merge_properties(
        &self,
        properties: &mut Properties,
        updates: &BTreeMap<String, String>,
    ) -> Result<()> {
        for (key, value) in updates {
            properties.set(key.as_str(), value.as_str());
        }
        self.store_properties(properties)
    }

    /// The configured non-root server user.
    pub fn read_ambari_user(&self) -> Option<String> {
        self.load_properties()
            .ok()?
            .get_non_empty(NR_USER_PROPERTY)
            .map(str::to_string)
    }

    fn views_dir(&self, properties: &Properties) -> PathBuf {
        properties
            .get_non_empty(VIEWS_DIR_PROPERTY)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.defaults.views_dir.clone())
    }

    /// The views work directory, if it exists.
    pub fn views_dirs(&self, properties: &Properties) -> Vec<PathBuf> {
        let work = self.views_dir(properties).join("work");
        if work.is_dir() {
            vec![work]
        } else {
            Vec::new()
        }
    }

    /// Extracted admin view directories under the views work directory.
    pub fn admin_views_dirs(&self, properties: &Properties) -> Vec<PathBuf> {
        let work = self.views_dir(properties).join("work");
        let mut dirs: Vec<PathBuf> = fs::read_dir(&work)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_name().to_string_lossy().starts_with("ADMIN_VIEW"))
                    .map(|e| e.path())
                    .collect()
            })
            .unwrap_or_default();
        dirs.sort();
        dirs
    }

    /// Server resources directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidResourcesDir` if the directory does not
    /// exist.
    pub fn resources_location(&self, properties: &Properties) -> Result<PathBuf> {
        let (dir, reason) = match properties.get_non_empty(RESOURCES_DIR_PROPERTY) {
            Some(dir) => (PathBuf::from(dir), "Invalid directory".to_string()),
            None => (
                self.defaults.resources_dir.clone(),
                format!("Property {} is not defined", RESOURCES_DIR_PROPERTY),
            ),
        };

        if !dir.exists() {
            return Err(ConfigError::InvalidResourcesDir { path: dir, reason }.into());
        }
        Ok(dir)
    }

    /// Stack definitions directory.
    pub fn stack_location(&self, properties: &Properties) -> PathBuf {
        properties
            .get(STACK_LOCATION_KEY)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.defaults.stack_location.clone())
    }

    /// Server version read from the file named by `server.version.file`.
    pub fn ambari_version(&self, properties: &Properties) -> Option<String> {
        let path = properties.get_non_empty(SERVER_VERSION_FILE_PATH)?;
        match fs::read_to_string(path) {
            Ok(version) => Some(version.trim().to_string()),
            Err(e) => {
                debug!(path, error = %e, "error getting ambari version");
                None
            }
        }
    }

    /// Server JVM classpath: conf dir, server jars, then the JDBC driver.
    pub fn classpath(&self, properties: &Properties) -> String {
        let separator = if self.platform.family.is_windows() { ";" } else { ":" };
        let lib_dir = if self.lib_dir.is_absolute() {
            self.lib_dir.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.lib_dir))
                .unwrap_or_else(|_| self.lib_dir.clone())
        };

        let mut classpath = format!(
            "{}{}{}",
            self.conf_dir.display(),
            separator,
            lib_dir.join("*").display()
        );
        if let Some(jdbc) = properties.get_non_empty(JDBC_DRIVER_PATH_PROPERTY) {
            classpath.push_str(separator);
            classpath.push_str(jdbc);
        }
        classpath
    }

    /// Locate a JDK.
    pub fn find_jdk(&self, properties: &Properties) -> Option<Jdk> {
        jdk::find_jdk(properties, &self.defaults)
    }

    /// Credential provider running on the located JDK.
    ///
    /// # Errors
    ///
    /// Returns `JdkError::NotFound` if no JDK is available.
    pub fn credential_provider(&self, properties: &Properties) -> Result<JavaCredentialProvider> {
        let jdk = jdk::require_jdk(properties, &self.defaults)?;
        Ok(JavaCredentialProvider::new(
            jdk.java,
            self.classpath(properties),
            self.defaults.server_out_file.clone(),
        ))
    }

    /// Path of a password file kept next to `ambari.properties`.
    pub fn password_file_path(&self, filename: &str) -> Result<PathBuf> {
        let properties_path = self.properties_path()?;
        let dir = properties_path.parent().unwrap_or(&self.conf_dir);
        Ok(dir.join(filename))
    }

    /// Write `password` to a file next to `ambari.properties`.
    ///
    /// Returns the path to record in the properties file.
    pub fn store_password_file(&self, password: &str, filename: &str) -> Result<String> {
        let path = self.password_file_path(filename)?;
        fs::write(&path, password)?;

        debug!(path = %path.display(), "adjusting filesystem permissions");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o660))?;
        }

        Ok(path.to_string_lossy().into_owned())
    }

    /// Delete a password file if present.
    pub fn remove_password_file(&self, filename: &str) -> Result<()> {
        let path = self.password_file_path(filename)?;
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "unable to remove password file");
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Server debug flags. `cli_debug` takes precedence over properties.
    pub fn debug_mode(&self, properties: &Properties, cli_debug: bool) -> DebugMode {
        if cli_debug {
            return DebugMode {
                debug: true,
                suspend_start: false,
            };
        }
        DebugMode {
            debug: properties.get_non_empty(DEBUG_MODE_KEY).is_some(),
            suspend_start: properties.get_non_empty(SUSPEND_START_MODE_KEY).is_some(),
        }
    }
}
