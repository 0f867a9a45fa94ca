//! Database type resolution.
//!
//! Maps `server.jdbc.database`, `server.jdbc.url` and
//! `server.persistence.type` onto one of the known database descriptors.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::core::constants::{
    JDBC_DATABASE_PROPERTY, JDBC_URL_PROPERTY, PERSISTENCE_TYPE_PROPERTY,
};
use crate::core::properties::Properties;

/// Whether the database is managed by the server or external to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Internal,
    Remote,
}

/// Deployment mode of the server database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceType {
    Local,
    Remote,
}

impl PersistenceType {
    /// Parse the `server.persistence.type` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "local" => Some(Self::Local),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }

    /// Persistence type configured in `properties`, if any.
    pub fn from_properties(properties: &Properties) -> Option<Self> {
        properties
            .get(PERSISTENCE_TYPE_PROPERTY)
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for PersistenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported server database.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DatabaseDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub kind: DatabaseKind,
    pub aliases: &'static [&'static str],
}

impl DatabaseDescriptor {
    const fn remote(name: &'static str, title: &'static str) -> Self {
        Self {
            name,
            title,
            kind: DatabaseKind::Remote,
            aliases: &[],
        }
    }

    /// Whether `name` is this database's name or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    pub fn is_internal(&self) -> bool {
        self.kind == DatabaseKind::Internal
    }
}

impl PartialEq for DatabaseDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl Eq for DatabaseDescriptor {}

impl PartialEq<str> for DatabaseDescriptor {
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl PartialEq<&str> for DatabaseDescriptor {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for DatabaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub const POSTGRES: DatabaseDescriptor = DatabaseDescriptor::remote("postgres", "Postgres");
pub const ORACLE: DatabaseDescriptor = DatabaseDescriptor::remote("oracle", "Oracle");
pub const MYSQL: DatabaseDescriptor = DatabaseDescriptor::remote("mysql", "MySQL");
pub const MSSQL: DatabaseDescriptor = DatabaseDescriptor::remote("mssql", "MSSQL");
pub const DERBY: DatabaseDescriptor = DatabaseDescriptor::remote("derby", "Derby");
pub const SQLANYWHERE: DatabaseDescriptor =
    DatabaseDescriptor::remote("sqlanywhere", "SQL Anywhere");
pub const POSTGRES_INTERNAL: DatabaseDescriptor = DatabaseDescriptor {
    name: "postgres",
    title: "Embedded Postgres",
    kind: DatabaseKind::Internal,
    aliases: &["embedded"],
};

/// Every known database. Lookups walk this list in order.
pub static DATABASES: &[DatabaseDescriptor] = &[
    POSTGRES,
    ORACLE,
    MYSQL,
    MSSQL,
    DERBY,
    SQLANYWHERE,
    POSTGRES_INTERNAL,
];

/// Order in which JDBC URLs are probed.
static JDBC_URL_PRIORITY: &[DatabaseDescriptor] =
    &[POSTGRES, ORACLE, MYSQL, MSSQL, DERBY, SQLANYWHERE];

/// Canonical names of all known databases.
pub fn database_names() -> BTreeSet<&'static str> {
    DATABASES.iter().map(|db| db.name).collect()
}

/// Find the first database whose name or alias equals `name`.
pub fn match_name(name: &str) -> Option<&'static DatabaseDescriptor> {
    DATABASES.iter().find(|db| db.matches(name))
}

/// Determine the server database from properties.
///
/// An explicit `server.jdbc.database` wins, then a substring match on the
/// JDBC URL, then embedded Postgres for local persistence. Local
/// persistence always turns Postgres into the embedded variant.
pub fn resolve(properties: &Properties) -> Option<&'static DatabaseDescriptor> {
    let local = PersistenceType::from_properties(properties) == Some(PersistenceType::Local);
    let mut resolved = None;

    if let Some(name) = properties.get_non_empty(JDBC_DATABASE_PROPERTY) {
        resolved = match_name(name);
        if local && resolved == Some(&POSTGRES) {
            resolved = Some(&POSTGRES_INTERNAL);
        }
        debug!(name, resolved = ?resolved.map(|d| d.title), "matched explicit database type");
    }

    if resolved.is_none() {
        if let Some(url) = properties.get_non_empty(JDBC_URL_PROPERTY) {
            let url = url.to_lowercase();
            resolved = JDBC_URL_PRIORITY.iter().find(|db| url.contains(db.name));
            debug!(resolved = ?resolved.map(|d| d.title), "matched database from JDBC URL");
        }
    }

    if resolved.is_none() && local {
        resolved = Some(&POSTGRES_INTERNAL);
    }

    resolved
}
