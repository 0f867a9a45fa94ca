//! Error types.
//!
//! One enum per concern, wrapped by the top-level [`Error`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by library and CLI operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Properties(#[from] PropertiesError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Jdk(#[from] JdkError),

    /// The user cancelled an interactive prompt.
    #[error("interrupted")]
    Interrupted,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Properties file errors.
#[derive(Error, Debug)]
pub enum PropertiesError {
    #[error("properties file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Server configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("file {file} not found in search path ${var}: {}", dir.display())]
    PropertiesNotFound {
        file: &'static str,
        var: &'static str,
        dir: PathBuf,
    },

    #[error("DB Name property not set in config file")]
    DatabaseNameMissing,

    #[error("resources dir {} is incorrectly configured: {reason}", path.display())]
    InvalidResourcesDir { path: PathBuf, reason: String },

    #[error("property not set: {0}")]
    MissingProperty(String),

    #[error("could not move {}: {source}", path.display())]
    Restore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Credential provider errors.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("alias is unreadable")]
    EmptyAlias,

    #[error("alias or password is unreadable")]
    Usage,

    #[error("failed to prepare temporary password file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("failed to run credential provider: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("unable to read password from store, alias = {0}")]
    ReadFailed(String),

    #[error("failed to read temporary password file {}: {source}", path.display())]
    Handoff {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("password for alias {0} is not valid UTF-8")]
    InvalidSecret(String),
}

/// JDK discovery and release definition errors.
#[derive(Error, Debug)]
pub enum JdkError {
    #[error("no JDK found, install a JDK to {}", install_dir.display())]
    NotFound { install_dir: PathBuf },

    #[error("invalid JDK release '{name}': {reason}")]
    InvalidRelease { name: String, reason: String },
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        match e {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                Error::Interrupted
            }
            dialoguer::Error::IO(io) => Error::Io(io),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
