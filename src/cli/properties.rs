//! Property commands (show, get, set, unset).

use std::path::Path;

use crate::cli::output;
use crate::core::alias;
use crate::core::config::ServerConfig;
use crate::core::constants::BLIND_PASSWORD;
use crate::error::{ConfigError, Result};

/// Hide literal passwords. Alias references and password file paths are
/// shown as-is.
fn display_value<'a>(key: &str, value: &'a str) -> &'a str {
    let lower = key.to_ascii_lowercase();
    let secret = lower.contains("password") || lower.contains("passwd");
    if secret && !value.is_empty() && !alias::is_alias(value) && !Path::new(value).is_absolute() {
        BLIND_PASSWORD
    } else {
        value
    }
}

/// Print every property in file order.
pub fn show(config: &ServerConfig, json: bool) -> Result<()> {
    let properties = config.load_properties()?;

    if json {
        let map: serde_json::Map<String, serde_json::Value> = properties
            .entries()
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(display_value(k, v))))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    if properties.is_empty() {
        output::dimmed("no properties set");
        return Ok(());
    }

    for (key, value) in properties.entries() {
        println!("{}={}", output::key(key), display_value(key, value));
    }
    Ok(())
}

/// Print one property value, unmasked.
pub fn get(config: &ServerConfig, key: &str) -> Result<()> {
    let properties = config.load_properties()?;
    let value = properties
        .get(key)
        .ok_or_else(|| ConfigError::MissingProperty(key.to_string()))?;
    println!("{}", value);
    Ok(())
}

pub fn set(config: &ServerConfig, key: &str, value: &str) -> Result<()> {
    config.write_property(key, value)?;
    output::success(&format!("set {}", output::key(key)));
    Ok(())
}

pub fn unset(config: &ServerConfig, key: &str) -> Result<()> {
    match config.remove_property(key)? {
        Some(_) => {
            output::success(&format!("removed {}", output::key(key)));
            Ok(())
        }
        None => Err(ConfigError::MissingProperty(key.to_string()).into()),
    }
}
