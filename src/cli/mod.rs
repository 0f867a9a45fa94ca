//! Command-line interface.

pub mod completions;
pub mod database;
pub mod defaults;
pub mod jdk;
pub mod output;
pub mod password;
pub mod properties;
pub mod upgrade;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::ServerConfig;
use crate::core::platform::PlatformInfo;

/// Inspect and maintain Ambari server configuration.
#[derive(Parser)]
#[command(
    name = "ambari-config",
    about = "Inspect and maintain Ambari server configuration",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing ambari.properties
    #[arg(long, global = true, env = "AMBARI_CONF_DIR", value_name = "DIR")]
    pub conf_dir: Option<PathBuf>,

    /// Server library directory used for the Java classpath
    #[arg(long, global = true, env = "AMBARI_SERVER_LIB", value_name = "DIR")]
    pub lib_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print all properties
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a property value
    Get {
        /// Property key (e.g., server.jdbc.port)
        key: String,
    },

    /// Set a property value
    Set {
        /// Property key
        key: String,
        /// Property value
        value: String,
    },

    /// Remove a property
    Unset {
        /// Property key
        key: String,
    },

    /// Show the configured database type
    DbType {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show database connection settings
    Connection {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show password encryption and master key status
    Encryption,

    /// Store a password in the credential store under an alias
    ///
    /// The password is read from the terminal, or from stdin when piped.
    EncryptPassword {
        /// Credential store alias (e.g., ambari.db.password)
        alias: String,
        /// Property to record the alias (or password) in
        #[arg(long, value_name = "KEY")]
        property: Option<String>,
    },

    /// Print the password a property refers to
    DecryptPassword {
        /// Property holding the password or alias
        property: String,
    },

    /// Locate a JDK and list configured JDK releases
    Jdk {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show filesystem defaults for this platform
    Defaults {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge configuration left behind by a package upgrade
    Upgrade {
        /// Don't set a default database name when none is configured
        #[arg(long)]
        skip_db_name: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command against the configuration in `conf_dir`/`lib_dir`.
pub fn execute(
    command: Command,
    conf_dir: Option<PathBuf>,
    lib_dir: Option<PathBuf>,
) -> crate::error::Result<()> {
    use Command::*;

    if let Completions { shell } = command {
        return completions::execute(shell);
    }

    let config = ServerConfig::resolve(PlatformInfo::detect(), conf_dir, lib_dir);

    match command {
        Show { json } => properties::show(&config, json),
        Get { key } => properties::get(&config, &key),
        Set { key, value } => properties::set(&config, &key, &value),
        Unset { key } => properties::unset(&config, &key),
        DbType { json } => database::db_type(&config, json),
        Connection { json } => database::connection(&config, json),
        Encryption => password::status(&config),
        EncryptPassword { alias, property } => password::encrypt(&config, &alias, property.as_deref()),
        DecryptPassword { property } => password::decrypt(&config, &property),
        Jdk { json } => jdk::execute(&config, json),
        Defaults { json } => defaults::execute(&config, json),
        Upgrade { skip_db_name } => upgrade::execute(&config, !skip_db_name),
        Completions { .. } => Ok(()),
    }
}
