//! Database connection parameters.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::core::alias::{self, SecretValue};
use crate::core::constants::{
    JDBC_DATABASE_NAME_PROPERTY, JDBC_DATABASE_PROPERTY, JDBC_HOSTNAME_PROPERTY,
    JDBC_PASSWORD_PROPERTY, JDBC_PORT_PROPERTY, JDBC_POSTGRES_SCHEMA_PROPERTY, JDBC_URL_PROPERTY,
    JDBC_USER_NAME_PROPERTY, SERVER_VERSION_FILE_PATH,
};
use crate::core::database::PersistenceType;
use crate::core::properties::Properties;
use crate::error::{PropertiesError, Result};

/// Connection settings read from `ambari.properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbConnection {
    pub persistence_type: PersistenceType,
    pub server_version_file: Option<String>,
    pub jdbc_url: Option<String>,
    pub dbms: Option<String>,
    /// Only read for remote databases.
    pub host: Option<String>,
    /// Only read for remote databases.
    pub port: Option<String>,
    pub database_name: Option<String>,
    pub user_name: Option<String>,
    pub postgres_schema: Option<String>,
    /// Value of `server.jdbc.user.passwd`: a file path or an alias reference.
    pub password_file: Option<String>,
    /// File contents, or the alias to decrypt.
    #[serde(skip)]
    pub password: Option<SecretValue>,
}

impl DbConnection {
    /// Parse connection settings.
    ///
    /// A password property holding a plain path is read from that file; an
    /// alias reference is kept as-is for later decryption.
    ///
    /// # Errors
    ///
    /// Returns `PropertiesError::Read` if the password file cannot be read.
    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let owned = |key: &str| properties.get_non_empty(key).map(str::to_string);

        let persistence_type =
            PersistenceType::from_properties(properties).unwrap_or(PersistenceType::Local);
        let remote = persistence_type == PersistenceType::Remote;

        let password_file = owned(JDBC_PASSWORD_PROPERTY);
        let password = match password_file.as_deref() {
            Some(value) if alias::is_alias(value) => Some(SecretValue::parse(value)),
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| PropertiesError::Read {
                    path: PathBuf::from(path),
                    source,
                })?;
                Some(SecretValue::Literal(contents))
            }
            None => None,
        };

        Ok(Self {
            persistence_type,
            server_version_file: owned(SERVER_VERSION_FILE_PATH),
            jdbc_url: owned(JDBC_URL_PROPERTY),
            dbms: owned(JDBC_DATABASE_PROPERTY),
            host: if remote { owned(JDBC_HOSTNAME_PROPERTY) } else { None },
            port: if remote { owned(JDBC_PORT_PROPERTY) } else { None },
            database_name: owned(JDBC_DATABASE_NAME_PROPERTY),
            user_name: owned(JDBC_USER_NAME_PROPERTY),
            postgres_schema: properties
                .get(JDBC_POSTGRES_SCHEMA_PROPERTY)
                .map(str::to_string),
            password_file,
            password,
        })
    }

    pub fn is_local(&self) -> bool {
        self.persistence_type == PersistenceType::Local
    }
}
