//! ambari-config - Configuration management for the Ambari server installer.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── properties    # show/get/set/unset
//! │   ├── database      # Database type and connection settings
//! │   ├── password      # Encryption status, encrypt/decrypt passwords
//! │   ├── jdk           # JDK discovery
//! │   ├── defaults      # Platform defaults
//! │   ├── upgrade       # Post-upgrade configuration merge
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── properties    # ambari.properties load/store
//!     ├── database      # Database registry and type resolution
//!     ├── alias         # ${alias=...} references
//!     ├── master_key    # Master key discovery and validation
//!     ├── credential    # Java CredentialProvider bridge
//!     ├── platform      # OS detection and per-OS defaults
//!     ├── config        # Configuration directory layout
//!     ├── connection    # Database connection settings
//!     ├── jdk           # JDK lookup and release definitions
//!     └── upgrade       # .rpmsave merge and property migration
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ambari_config::core::config::ServerConfig;
//! use ambari_config::core::database;
//! use ambari_config::core::platform::PlatformInfo;
//!
//! let config = ServerConfig::resolve(PlatformInfo::detect(), None, None);
//! let properties = config.load_properties()?;
//! if let Some(db) = database::resolve(&properties) {
//!     println!("{}", db.title);
//! }
//! # Ok::<(), ambari_config::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
