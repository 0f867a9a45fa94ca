//! JDK discovery and JDK release definitions.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::constants::{DEFAULT_JCPOL_URL, JAVA_HOME_PROPERTY, JDK_RELEASES};
use crate::core::platform::ServerDefaults;
use crate::core::properties::Properties;
use crate::error::{JdkError, Result};

/// A usable JDK installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Jdk {
    pub home: PathBuf,
    pub java: PathBuf,
}

/// Check that `home` contains a java executable.
pub fn validate_jdk(home: &Path, defaults: &ServerDefaults) -> Option<Jdk> {
    let java = home.join(&defaults.java_exe_subpath);
    if java.is_file() {
        Some(Jdk {
            home: home.to_path_buf(),
            java,
        })
    } else {
        None
    }
}

/// Find a JDK to run server tooling with.
///
/// Tries `java.home`, then the newest matching directory in the JDK install
/// dir, then `java` on `PATH`.
pub fn find_jdk(properties: &Properties, defaults: &ServerDefaults) -> Option<Jdk> {
    if let Some(home) = properties.get_non_empty(JAVA_HOME_PROPERTY) {
        if let Some(jdk) = validate_jdk(Path::new(home), defaults) {
            debug!(home, "using java.home");
            return Some(jdk);
        }
    }

    info!(dir = %defaults.jdk_install_dir.display(), "looking for available JDKs");
    let mut candidates: Vec<PathBuf> = fs::read_dir(&defaults.jdk_install_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| defaults.matches_jdk_dir(&e.file_name().to_string_lossy()))
                .map(|e| e.path())
                .collect()
        })
        .unwrap_or_default();
    // Newest first
    candidates.sort_by(|a, b| b.cmp(a));

    for candidate in &candidates {
        match validate_jdk(candidate, defaults) {
            Some(jdk) => {
                info!(jdk = %candidate.display(), "selected JDK");
                return Some(jdk);
            }
            None => debug!(jdk = %candidate.display(), "JDK is invalid"),
        }
    }

    let java = which::which("java").ok()?;
    let resolved = fs::canonicalize(&java).unwrap_or_else(|_| java.clone());
    let home = resolved
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    debug!(java = %java.display(), "using java from PATH");
    Some(Jdk { home, java })
}

/// Like [`find_jdk`] but fails when nothing is found.
pub fn require_jdk(properties: &Properties, defaults: &ServerDefaults) -> Result<Jdk> {
    find_jdk(properties, defaults).ok_or_else(|| {
        JdkError::NotFound {
            install_dir: defaults.jdk_install_dir.clone(),
        }
        .into()
    })
}

/// Download and install metadata for a JDK offered during setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JdkRelease {
    pub name: String,
    pub desc: String,
    pub url: String,
    pub dest_file: String,
    pub jcpol_url: String,
    pub dest_jcpol_file: String,
    pub inst_dir: String,
    pub reg_exp: String,
}

impl JdkRelease {
    /// Read the `<section>.*` keys describing a JDK release.
    ///
    /// `url` and `re` are required; everything else has a default.
    ///
    /// # Errors
    ///
    /// Returns `JdkError::InvalidRelease` if the section name or a required
    /// key is missing.
    pub fn from_properties(properties: &Properties, section: &str) -> Result<Self> {
        let invalid = |reason: &str| JdkError::InvalidRelease {
            name: section.to_string(),
            reason: reason.to_string(),
        };

        if section.is_empty() {
            return Err(invalid("empty properties section").into());
        }
        let key = |suffix: &str| format!("{}.{}", section, suffix);
        let optional = |suffix: &str| properties.get_non_empty(&key(suffix)).map(str::to_string);

        let url = optional("url").ok_or_else(|| invalid("missing JDK URL"))?;
        let reg_exp =
            optional("re").ok_or_else(|| invalid("missing output parsing regular expression"))?;
        let desc = optional("desc").unwrap_or_else(|| section.to_string());

        Ok(Self {
            name: section.to_string(),
            dest_file: optional("dest-file").unwrap_or_else(|| format!("{}.exe", section)),
            jcpol_url: optional("jcpol-url").unwrap_or_else(|| DEFAULT_JCPOL_URL.to_string()),
            dest_jcpol_file: optional("jcpol-file")
                .unwrap_or_else(|| format!("jcpol-{}.zip", section)),
            inst_dir: optional("home").unwrap_or_else(|| format!("C:\\{}", section)),
            desc,
            url,
            reg_exp,
        })
    }
}

/// All JDK releases listed in `java.releases`.
pub fn jdk_releases(properties: &Properties) -> Result<Vec<JdkRelease>> {
    properties
        .get_or(JDK_RELEASES, "")
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| JdkRelease::from_properties(properties, name))
        .collect()
}
