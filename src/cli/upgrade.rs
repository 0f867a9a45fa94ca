//! Upgrade command.

use crate::cli::output;
use crate::core::config::ServerConfig;
use crate::core::upgrade::{self, UpdateStatus};
use crate::error::Result;

/// Merge configuration from the previous release.
pub fn execute(config: &ServerConfig, fix_db_name: bool) -> Result<()> {
    let steps = upgrade::upgrade_configuration(config, fix_db_name)?;

    for (name, status) in &steps {
        match status {
            UpdateStatus::Updated => output::success(&format!("{} updated", output::key(name))),
            UpdateStatus::Skipped => output::dimmed(&format!("{} unchanged", name)),
        }
    }

    if !fix_db_name {
        upgrade::check_database_name_property(config, true)?;
    }
    Ok(())
}
