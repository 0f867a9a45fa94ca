//! Configuration migration during server upgrades.
//!
//! Package upgrades leave the previous configuration behind as `*.rpmsave`
//! files. The functions here fold those back into the new configuration and
//! repair properties renamed between releases.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::config::ServerConfig;
use crate::core::constants::{
    DEFAULT_DB_NAME, ENV_FILE, GET_FQDN_SERVICE_URL, JDBC_DATABASE_NAME_PROPERTY,
    JDBC_DATABASE_PROPERTY, JDBC_RCA_SCHEMA_PROPERTY, KRB_JAAS_LOGIN_FILE,
    LEGACY_FQDN_SERVICE_URL, NR_USER_PROPERTY, OS_FAMILY_PROPERTY, OS_TYPE_PROPERTY,
    PERSISTENCE_TYPE_PROPERTY,
};
use crate::core::database;
use crate::core::properties::Properties;
use crate::error::{ConfigError, Error, Result};

/// Suffix format appended to a merged properties backup.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Outcome of an upgrade step that may have nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Updated,
    Skipped,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated => f.write_str("updated"),
            Self::Skipped => f.write_str("skipped"),
        }
    }
}

/// Ensure `server.jdbc.database_name` is set.
///
/// With `upgrade`, properties written by releases before 1.7 are migrated
/// first: remote setups kept the database name in `server.jdbc.schema`, and
/// local setups kept it in `server.jdbc.database` with the type implied.
///
/// # Errors
///
/// Returns `ConfigError::DatabaseNameMissing` if no database name is set
/// afterwards.
pub fn check_database_name_property(config: &ServerConfig, upgrade: bool) -> Result<()> {
    let mut properties = config.load_properties()?;

    if upgrade && needs_db_name_migration(&properties) && migrate_db_name(&mut properties) {
        config.store_properties(&properties)?;
        properties = config.load_properties()?;
    }

    match properties.get_non_empty(JDBC_DATABASE_NAME_PROPERTY) {
        Some(name) => {
            debug!(name, "database name");
            Ok(())
        }
        None => Err(ConfigError::DatabaseNameMissing.into()),
    }
}

fn needs_db_name_migration(properties: &Properties) -> bool {
    let known = properties
        .get(JDBC_DATABASE_PROPERTY)
        .map_or(false, |db| database::database_names().contains(db));
    !known || properties.contains_key(JDBC_RCA_SCHEMA_PROPERTY)
}

/// Rewrite pre-1.7 database properties in place. Returns whether anything
/// changed.
fn migrate_db_name(properties: &mut Properties) -> bool {
    let mut changed = false;

    let persistence = properties.get(PERSISTENCE_TYPE_PROPERTY).map(str::to_string);
    match persistence.as_deref() {
        Some("remote") => {
            if let Some(name) = properties.get_non_empty(JDBC_RCA_SCHEMA_PROPERTY) {
                let name = name.to_string();
                changed |= properties.set(JDBC_DATABASE_NAME_PROPERTY, name);
            }

            let known = properties.get(JDBC_DATABASE_PROPERTY).map_or(false, |db| {
                database::database_names().contains(db.trim().to_lowercase().as_str())
            });
            if !known {
                // Reconstruct the type from the JDBC URL
                if let Some(db) = database::resolve(properties) {
                    info!(database = db.name, "restored database type");
                    changed |= properties.set(JDBC_DATABASE_PROPERTY, db.name);
                }
            }
        }
        Some("local") => {
            if let Some(name) = properties.get_non_empty(JDBC_DATABASE_PROPERTY) {
                let name = name.to_string();
                changed |= properties.set(JDBC_DATABASE_NAME_PROPERTY, name);
                changed |= properties.set(JDBC_DATABASE_PROPERTY, database::POSTGRES.name);
            }
        }
        _ => {}
    }

    changed
}

/// Like [`check_database_name_property`], but sets the default database
/// name instead of failing when none is configured.
pub fn update_database_name_property(config: &ServerConfig, upgrade: bool) -> Result<UpdateStatus> {
    match check_database_name_property(config, upgrade) {
        Ok(()) => Ok(UpdateStatus::Skipped),
        Err(Error::Config(ConfigError::DatabaseNameMissing)) => {
            warn!(
                "{} property isn't set, setting it to default value - {}",
                JDBC_DATABASE_NAME_PROPERTY, DEFAULT_DB_NAME
            );
            config.write_property(JDBC_DATABASE_NAME_PROPERTY, DEFAULT_DB_NAME)?;
            Ok(UpdateStatus::Updated)
        }
        Err(e) => Err(e),
    }
}

/// Merge the previous release's `ambari.properties` into the current one.
///
/// The backup is renamed with a timestamp suffix afterwards so the merge
/// only happens once.
pub fn update_ambari_properties(config: &ServerConfig) -> Result<UpdateStatus> {
    let previous_path = config.conf_dir().join(config.defaults().properties_backup_file);
    if !previous_path.is_file() {
        warn!(
            file = %previous_path.display(),
            "can not find file from previous version, skipping import of settings"
        );
        return Ok(UpdateStatus::Skipped);
    }

    let mut current = config.load_properties()?;
    let previous = Properties::load(&previous_path)?;
    let os_type = config.platform().os_type();

    for (key, value) in previous.entries() {
        match key.as_str() {
            LEGACY_FQDN_SERVICE_URL => current.set(GET_FQDN_SERVICE_URL, value.as_str()),
            OS_TYPE_PROPERTY => current.set(OS_TYPE_PROPERTY, os_type.as_str()),
            _ => current.set(key.as_str(), value.as_str()),
        };
    }

    // Releases without a configurable server user always ran as root
    if !current.contains_key(NR_USER_PROPERTY) {
        current.set(NR_USER_PROPERTY, "root");
    }
    if !current.contains_key(OS_FAMILY_PROPERTY) {
        current.set(OS_FAMILY_PROPERTY, os_type.as_str());
    }

    config.store_properties(&current)?;

    let timestamp = chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT);
    let renamed = PathBuf::from(format!("{}.{}", previous_path.display(), timestamp));
    rename(&previous_path, &renamed)?;
    info!(backup = %renamed.display(), "merged previous properties");

    Ok(UpdateStatus::Updated)
}

/// Put the previous release's `ambari-env.sh` back in place.
pub fn update_ambari_env(config: &ServerConfig) -> Result<UpdateStatus> {
    let dir = &config.defaults().vlibs_dir;
    let previous = dir.join(config.defaults().env_backup_file);
    let current = dir.join(ENV_FILE);

    if !previous.is_file() {
        warn!(
            file = %previous.display(),
            "can not find file from previous version, skipping restore of environment settings"
        );
        return Ok(UpdateStatus::Skipped);
    }
    if !current.is_file() {
        return Ok(UpdateStatus::Skipped);
    }

    restore(&previous, &current)?;
    info!("original file {} kept", ENV_FILE);
    Ok(UpdateStatus::Updated)
}

/// Put the previous release's Kerberos JAAS login config back in place.
///
/// Skipped unless both files exist and the keytab named by the old file
/// still exists.
pub fn update_krb_jaas_login_properties(config: &ServerConfig) -> Result<UpdateStatus> {
    let previous = config
        .conf_dir()
        .join(config.defaults().krb_jaas_login_backup_file);
    let current = config.conf_dir().join(KRB_JAAS_LOGIN_FILE);

    if !previous.is_file() || !current.is_file() {
        return Ok(UpdateStatus::Skipped);
    }
    if !jaas_keytab_exists(&previous)? {
        debug!(file = %previous.display(), "keytab is missing, not restoring");
        return Ok(UpdateStatus::Skipped);
    }

    restore(&previous, &current)?;
    info!("original file {} kept", KRB_JAAS_LOGIN_FILE);
    Ok(UpdateStatus::Updated)
}

/// Whether the `keyTab=` path in a JAAS config exists.
fn jaas_keytab_exists(path: &Path) -> Result<bool> {
    let contents = fs::read_to_string(path)?;
    let keytab = contents
        .lines()
        .find_map(|line| line.split_once("keyTab=").map(|(_, rest)| rest))
        .map(|value| value.trim_matches('"').trim());

    Ok(keytab.map_or(false, |p| Path::new(p).exists()))
}

fn restore(previous: &Path, current: &Path) -> Result<()> {
    fs::remove_file(current).map_err(|source| ConfigError::Restore {
        path: current.to_path_buf(),
        source,
    })?;
    rename(previous, current)
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|source| {
        ConfigError::Restore {
            path: from.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Run every upgrade step in order, returning each step's outcome.
pub fn upgrade_configuration(
    config: &ServerConfig,
    fix_db_name: bool,
) -> Result<BTreeMap<&'static str, UpdateStatus>> {
    let mut steps = BTreeMap::new();
    steps.insert("ambari.properties", update_ambari_properties(config)?);
    steps.insert(ENV_FILE, update_ambari_env(config)?);
    steps.insert(KRB_JAAS_LOGIN_FILE, update_krb_jaas_login_properties(config)?);
    if fix_db_name {
        steps.insert(JDBC_DATABASE_NAME_PROPERTY, update_database_name_property(config, true)?);
    }
    Ok(steps)
}
