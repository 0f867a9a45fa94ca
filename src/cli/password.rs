//! Password commands (encryption, encrypt-password, decrypt-password).

use std::fs;
use std::path::PathBuf;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::alias;
use crate::core::config::ServerConfig;
use crate::core::constants::{
    JDBC_PASSWORD_FILENAME, JDBC_PASSWORD_PROPERTY, LDAP_MGR_PASSWORD_FILENAME,
    LDAP_MGR_PASSWORD_PROPERTY, SSL_TRUSTSTORE_PASSWORD_PROPERTY,
};
use crate::core::master_key::{self, MasterKeyState, TerminalPrompt};
use crate::error::{ConfigError, CredentialError, PropertiesError, Result};

/// Properties whose plain value is a path to a password file.
fn password_file_for(property: &str) -> Option<&'static str> {
    match property {
        JDBC_PASSWORD_PROPERTY => Some(JDBC_PASSWORD_FILENAME),
        LDAP_MGR_PASSWORD_PROPERTY => Some(LDAP_MGR_PASSWORD_FILENAME),
        _ => None,
    }
}

/// Show encryption status.
pub fn status(config: &ServerConfig) -> Result<()> {
    let properties = config.load_properties()?;
    let state = MasterKeyState::probe(&properties);

    output::header("Password encryption");
    output::rule();
    output::kv("enabled", state.encryption_enabled);
    match &state.key_file {
        Some(path) => output::kv("master key", output::path(path.display())),
        None => output::kv("master key", "not persisted"),
    }
    output::kv(
        "credential store",
        output::path(master_key::credential_store_location(&properties).display()),
    );

    output::section("Secret properties");
    for property in [
        JDBC_PASSWORD_PROPERTY,
        LDAP_MGR_PASSWORD_PROPERTY,
        SSL_TRUSTSTORE_PASSWORD_PROPERTY,
    ] {
        let kind = match properties.get_non_empty(property) {
            Some(value) if alias::is_alias(value) => "alias",
            Some(_) => "plain",
            None => "unset",
        };
        output::kv(property, kind);
    }
    Ok(())
}

/// Store a password under `alias`, optionally recording it in `property`.
pub fn encrypt(config: &ServerConfig, alias: &str, property: Option<&str>) -> Result<()> {
    let properties = config.load_properties()?;
    let enabled = master_key::is_encryption_enabled(&properties);
    let provider = if enabled {
        Some(config.credential_provider(&properties)?)
    } else {
        None
    };

    let password = master_key::read_secret("Enter password")?;
    if alias.is_empty() || password.is_empty() {
        return Err(CredentialError::Usage.into());
    }

    let value = match &provider {
        Some(provider) => master_key::encrypt_password(
            &properties,
            alias,
            &password,
            provider,
            &mut TerminalPrompt,
        )?,
        None => {
            output::warn("password encryption is not enabled, keeping the password as-is");
            password.clone()
        }
    };

    let encrypted = alias::is_alias(&value);
    if encrypted {
        output::success(&format!("stored {}", output::key(alias)));
    }

    if let Some(property) = property {
        record(config, property, &value, encrypted)?;
    }
    Ok(())
}

/// Write the alias reference (or the password) into `property`.
///
/// File-backed properties get a password file instead of the literal.
fn record(config: &ServerConfig, property: &str, value: &str, encrypted: bool) -> Result<()> {
    let recorded = match password_file_for(property) {
        Some(filename) if !encrypted => config.store_password_file(value, filename)?,
        Some(filename) => {
            config.remove_password_file(filename)?;
            value.to_string()
        }
        None => value.to_string(),
    };

    config.write_property(property, &recorded)?;
    output::success(&format!("set {}", output::key(property)));
    Ok(())
}

/// Print the password stored for `property`.
pub fn decrypt(config: &ServerConfig, property: &str) -> Result<()> {
    let properties = config.load_properties()?;
    let value = properties
        .get_non_empty(property)
        .ok_or_else(|| ConfigError::MissingProperty(property.to_string()))?;

    let secret = match alias::decode(value) {
        Some(name) if master_key::is_encryption_enabled(&properties) => {
            let provider = config.credential_provider(&properties)?;
            let secret = master_key::decrypt_password_for_alias(
                &properties,
                name,
                &provider,
                &mut TerminalPrompt,
            )?;
            if secret.is_empty() {
                return Err(CredentialError::ReadFailed(name.to_string()).into());
            }
            secret
        }
        Some(_) => {
            output::warn("password encryption is not enabled");
            Zeroizing::new(value.to_string())
        }
        None if password_file_for(property).is_some() => {
            let path = PathBuf::from(value);
            let contents = fs::read_to_string(&path)
                .map_err(|source| PropertiesError::Read { path, source })?;
            Zeroizing::new(contents)
        }
        None => Zeroizing::new(value.to_string()),
    };

    println!("{}", secret.as_str());
    Ok(())
}
