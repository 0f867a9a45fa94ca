//! Core library components.
//!
//! Properties file handling, database resolution, password aliases and the
//! credential store bridge, plus the platform layout they depend on.

pub mod alias;
pub mod config;
pub mod connection;
pub mod constants;
pub mod credential;
pub mod database;
pub mod jdk;
pub mod master_key;
pub mod platform;
pub mod properties;
pub mod upgrade;
