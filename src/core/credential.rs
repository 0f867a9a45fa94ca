//! Credential provider bridge.
//!
//! Secrets behind an alias live in a Java keystore managed by the server's
//! `CredentialProvider` class. This module runs that class as a subprocess:
//!
//! ```text
//! <java> -cp <classpath> ...CredentialProvider GET <alias> <tempfile> <masterKey|None>
//! <java> -cp <classpath> ...CredentialProvider PUT <alias> <password> <masterKey|None>
//! ```
//!
//! GET results come back through a temporary file rather than stdout; both
//! stdout and stderr go to the server output log.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use crate::core::constants::{CREDENTIAL_PROVIDER_CLASS, NO_MASTER_KEY, PASSWORD_TEMP_PREFIX};
use crate::error::{CredentialError, Result};

/// Outcome of a credential store lookup.
#[derive(Debug)]
pub struct SecretReply {
    /// Contents of the hand-off file, possibly empty.
    pub secret: Zeroizing<String>,
    /// Exit code of the provider process.
    pub exit_code: i32,
}

impl SecretReply {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Whether the provider produced no secret.
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

/// Access to aliased secrets.
///
/// `master_key` of `None` (or empty) asks the provider to use its keyless
/// mode, which means reading a persisted master key file if one exists.
pub trait CredentialProvider {
    /// Read the secret stored under `alias`.
    ///
    /// A non-zero exit code is reported in the reply, not as an error;
    /// callers must check for an empty secret themselves.
    fn get(&self, alias: &str, master_key: Option<&str>) -> Result<SecretReply>;

    /// Store `secret` under `alias`, returning the provider's exit code.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Usage` if `alias` or `secret` is empty.
    fn put(&self, alias: &str, secret: &str, master_key: Option<&str>) -> Result<i32>;
}

/// Runs the server's Java `CredentialProvider`.
#[derive(Debug, Clone)]
pub struct JavaCredentialProvider {
    java: PathBuf,
    classpath: String,
    output_log: PathBuf,
    temp_dir: PathBuf,
}

impl JavaCredentialProvider {
    pub fn new(java: impl Into<PathBuf>, classpath: impl Into<String>, output_log: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            classpath: classpath.into(),
            output_log: output_log.into(),
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Use `dir` for the GET hand-off file instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn java(&self) -> &Path {
        &self.java
    }

    pub fn classpath(&self) -> &str {
        &self.classpath
    }

    fn command(&self, action: &str, alias: &str, payload: &str, master_key: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-cp")
            .arg(&self.classpath)
            .arg(CREDENTIAL_PROVIDER_CLASS)
            .args([action, alias, payload, master_key_arg(master_key)])
            .stdin(Stdio::null());

        match self.open_output_log() {
            Ok((out, err)) => {
                cmd.stdout(out).stderr(err);
            }
            Err(e) => {
                warn!(log = %self.output_log.display(), error = %e, "cannot open server output log");
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        cmd
    }

    fn open_output_log(&self) -> std::io::Result<(File, File)> {
        let out = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.output_log)?;
        let err = out.try_clone()?;
        Ok((out, err))
    }

    fn run(&self, mut cmd: Command) -> Result<i32> {
        let status = cmd.status().map_err(CredentialError::Spawn)?;
        // Killed by a signal
        Ok(status.code().unwrap_or(-1))
    }
}

impl CredentialProvider for JavaCredentialProvider {
    fn get(&self, alias: &str, master_key: Option<&str>) -> Result<SecretReply> {
        if alias.is_empty() {
            return Err(CredentialError::EmptyAlias.into());
        }
        trace!(alias, "reading password from credential store");

        // Created empty with owner-only permissions, removed on drop
        let handoff = tempfile::Builder::new()
            .prefix(PASSWORD_TEMP_PREFIX)
            .tempfile_in(&self.temp_dir)
            .map_err(CredentialError::TempFile)?;
        let handoff_path = handoff.path().to_string_lossy().into_owned();

        let exit_code = self.run(self.command("GET", alias, &handoff_path, master_key))?;
        debug!(alias, exit_code, "credential provider get passwd returned");
        if exit_code != 0 {
            warn!(alias, "unable to read password from store");
        }

        let bytes = fs::read(handoff.path()).map_err(|source| CredentialError::Handoff {
            path: handoff.path().to_path_buf(),
            source,
        })?;
        drop(handoff);

        let secret = match String::from_utf8(bytes) {
            Ok(secret) => Zeroizing::new(secret),
            Err(e) => {
                drop(Zeroizing::new(e.into_bytes()));
                return Err(CredentialError::InvalidSecret(alias.to_string()).into());
            }
        };

        Ok(SecretReply { secret, exit_code })
    }

    fn put(&self, alias: &str, secret: &str, master_key: Option<&str>) -> Result<i32> {
        if alias.is_empty() || secret.is_empty() {
            return Err(CredentialError::Usage.into());
        }
        trace!(alias, "saving password to credential store");

        let exit_code = self.run(self.command("PUT", alias, secret, master_key))?;
        debug!(alias, exit_code, "credential provider save passwd returned");
        Ok(exit_code)
    }
}

/// Master key as passed on the command line.
fn master_key_arg(master_key: Option<&str>) -> &str {
    match master_key {
        Some(key) if !key.is_empty() => key,
        _ => NO_MASTER_KEY,
    }
}
