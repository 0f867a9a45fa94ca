//! Master key handling and password encryption.
//!
//! When `security.passwords.encryption.enabled` is true, secret properties
//! hold aliases into the credential store. Unlocking the store needs the
//! master key, which is either persisted in a `master` file or typed in by
//! the user and checked against a known alias.
//!
//! Reading a secret via alias:
//!
//! ```text
//! encryption disabled        -> input returned as-is
//! enabled, key file present  -> provider GET in keyless mode
//! enabled, no key file       -> prompt + validate key, then provider GET
//! ```

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::alias;
use crate::core::constants::{
    CREDENTIAL_STORE_FILENAME, DEFAULT_CREDENTIAL_STORE, JDBC_PASSWORD_PROPERTY,
    JDBC_RCA_PASSWORD_ALIAS, LDAP_MGR_PASSWORD_ALIAS, LDAP_MGR_PASSWORD_PROPERTY,
    MASTER_KEY_FILENAME, SECURITY_IS_ENCRYPTION_ENABLED, SECURITY_KEYS_DIR,
    SECURITY_MASTER_KEY_LOCATION, SSL_TRUSTSTORE_PASSWORD_ALIAS,
    SSL_TRUSTSTORE_PASSWORD_PROPERTY,
};
use crate::core::credential::CredentialProvider;
use crate::core::properties::Properties;
use crate::error::{Error, Result};

/// Properties checked, in order, when validating a typed master key.
const VALIDATION_ALIASES: &[(&str, &str)] = &[
    (JDBC_PASSWORD_PROPERTY, JDBC_RCA_PASSWORD_ALIAS),
    (LDAP_MGR_PASSWORD_PROPERTY, LDAP_MGR_PASSWORD_ALIAS),
    (SSL_TRUSTSTORE_PASSWORD_PROPERTY, SSL_TRUSTSTORE_PASSWORD_ALIAS),
];

/// Encryption status derived from properties and the filesystem.
///
/// Computed on every call; properties may change between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterKeyState {
    pub encryption_enabled: bool,
    pub persisted: bool,
    pub key_file: Option<PathBuf>,
}

impl MasterKeyState {
    pub fn probe(properties: &Properties) -> Self {
        let (persisted, key_file) = locate_persisted_key(properties);
        Self {
            encryption_enabled: is_encryption_enabled(properties),
            persisted,
            key_file,
        }
    }
}

/// Where the master key comes from.
#[derive(Debug)]
pub enum MasterKey {
    /// The provider reads the key file itself.
    Persisted(PathBuf),
    /// Typed in by the user.
    Supplied(Zeroizing<String>),
}

impl MasterKey {
    /// Key argument for the credential provider.
    pub fn as_provider_arg(&self) -> Option<&str> {
        match self {
            Self::Persisted(_) => None,
            Self::Supplied(key) => Some(key.as_str()),
        }
    }
}

/// Source of interactively supplied master keys.
pub trait KeyPrompt {
    /// Ask for the current master key.
    ///
    /// # Errors
    ///
    /// Returns `Error::Interrupted` if the user cancels.
    fn master_key(&mut self) -> Result<Zeroizing<String>>;

    /// Tell the user the key was rejected.
    fn key_mismatch(&mut self) {}
}

/// Prompts on the terminal with hidden input.
///
/// When stdin is not a terminal a single line is read from it instead.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl KeyPrompt for TerminalPrompt {
    fn master_key(&mut self) -> Result<Zeroizing<String>> {
        if !io::stdin().is_terminal() {
            return read_line();
        }

        let key = dialoguer::Password::new()
            .with_prompt("Enter current Master Key")
            .allow_empty_password(true)
            .interact()?;
        Ok(Zeroizing::new(key))
    }

    fn key_mismatch(&mut self) {
        eprintln!("ERROR: Master key does not match.");
    }
}

/// One line of piped input. End of input counts as an interrupt.
fn read_line() -> Result<Zeroizing<String>> {
    let mut input = Zeroizing::new(String::new());
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(Error::Interrupted);
    }
    Ok(Zeroizing::new(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}

/// Read a password the same way [`TerminalPrompt`] reads a master key.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return read_line();
    }
    let secret = dialoguer::Password::new().with_prompt(prompt).interact()?;
    Ok(Zeroizing::new(secret))
}

/// Whether password encryption is turned on.
pub fn is_encryption_enabled(properties: &Properties) -> bool {
    properties
        .get(SECURITY_IS_ENCRYPTION_ENABLED)
        .map_or(false, |v| v.eq_ignore_ascii_case("true"))
}

/// Directory expected to hold the master key file.
pub fn master_key_location(properties: &Properties) -> Option<PathBuf> {
    properties
        .get_non_empty(SECURITY_MASTER_KEY_LOCATION)
        .or_else(|| properties.get_non_empty(SECURITY_KEYS_DIR))
        .map(PathBuf::from)
}

/// Look for a persisted master key file.
pub fn locate_persisted_key(properties: &Properties) -> (bool, Option<PathBuf>) {
    let key_file = master_key_location(properties)
        .map(|dir| dir.join(MASTER_KEY_FILENAME))
        .filter(|path| path.is_file());
    (key_file.is_some(), key_file)
}

/// Location of the credential store file.
pub fn credential_store_location(properties: &Properties) -> PathBuf {
    match properties.get_non_empty(SECURITY_KEYS_DIR) {
        Some(dir) => Path::new(dir).join(CREDENTIAL_STORE_FILENAME),
        None => PathBuf::from(DEFAULT_CREDENTIAL_STORE),
    }
}

/// First known alias that a stored property actually references.
fn validation_alias(properties: &Properties) -> Option<&'static str> {
    VALIDATION_ALIASES
        .iter()
        .find(|(property, _)| {
            properties
                .get_non_empty(property)
                .map_or(false, alias::is_alias)
        })
        .map(|(_, alias)| *alias)
}

/// Prompt until the user supplies a master key that unlocks a known alias.
///
/// If no validation alias is configured, or the key is empty, the first key
/// typed is accepted unchecked.
pub fn original_master_key(
    properties: &Properties,
    provider: &dyn CredentialProvider,
    prompt: &mut dyn KeyPrompt,
) -> Result<Zeroizing<String>> {
    loop {
        let key = prompt.master_key()?;

        if let Some(alias) = validation_alias(properties) {
            if !key.is_empty() {
                debug!(alias, "validating master key");
                let reply = provider.get(alias, Some(key.as_str()))?;
                if reply.is_empty() {
                    warn!(alias, "master key does not match");
                    prompt.key_mismatch();
                    continue;
                }
            }
        }

        return Ok(key);
    }
}

/// Obtain the master key for credential store access.
pub fn resolve_master_key(
    properties: &Properties,
    provider: &dyn CredentialProvider,
    prompt: &mut dyn KeyPrompt,
) -> Result<MasterKey> {
    match locate_persisted_key(properties) {
        (true, Some(path)) => {
            debug!(path = %path.display(), "using persisted master key");
            Ok(MasterKey::Persisted(path))
        }
        _ => original_master_key(properties, provider, prompt).map(MasterKey::Supplied),
    }
}

/// Decrypt the password stored under `alias`.
///
/// With encryption disabled `alias` is returned unchanged.
pub fn decrypt_password_for_alias(
    properties: &Properties,
    alias: &str,
    provider: &dyn CredentialProvider,
    prompt: &mut dyn KeyPrompt,
) -> Result<Zeroizing<String>> {
    if !is_encryption_enabled(properties) {
        return Ok(Zeroizing::new(alias.to_string()));
    }

    let key = resolve_master_key(properties, provider, prompt)?;
    let reply = provider.get(alias, key.as_provider_arg())?;
    Ok(reply.secret)
}

/// Store `password` under `alias` when encryption is enabled.
///
/// Returns the alias reference to write into the properties file, or the
/// password itself if encryption is disabled or the store rejected it.
pub fn encrypt_password(
    properties: &Properties,
    alias: &str,
    password: &str,
    provider: &dyn CredentialProvider,
    prompt: &mut dyn KeyPrompt,
) -> Result<Zeroizing<String>> {
    if !is_encryption_enabled(properties) {
        return Ok(Zeroizing::new(password.to_string()));
    }

    let key = resolve_master_key(properties, provider, prompt)?;
    let exit_code = provider.put(alias, password, key.as_provider_arg())?;
    if exit_code != 0 {
        warn!(alias, exit_code, "failed to save secure password");
        return Ok(Zeroizing::new(password.to_string()));
    }

    Ok(Zeroizing::new(alias::encode(alias)))
}
