//! Platform defaults command.

use crate::cli::output;
use crate::core::config::ServerConfig;
use crate::error::Result;

/// Show the detected platform and the paths derived from it.
///
/// Works without an `ambari.properties` file.
pub fn execute(config: &ServerConfig, json: bool) -> Result<()> {
    let defaults = config.defaults();
    let platform = config.platform();

    if json {
        let output = serde_json::json!({
            "platform": platform,
            "os_type": platform.os_type(),
            "conf_dir": config.conf_dir(),
            "lib_dir": config.lib_dir(),
            "defaults": defaults,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("Platform");
    output::rule();
    output::kv("family", platform.family);
    output::kv("os type", platform.os_type());
    output::kv("conf dir", output::path(config.conf_dir().display()));
    output::kv("lib dir", output::path(config.lib_dir().display()));

    output::section("Locations");
    output::kv("resources", output::path(defaults.resources_dir.display()));
    output::kv("stacks", output::path(defaults.stack_location.display()));
    output::kv("views", output::path(defaults.views_dir.display()));
    output::kv("jdk install", output::path(defaults.jdk_install_dir.display()));
    output::kv("server out", output::path(defaults.server_out_file.display()));
    output::kv("server log", output::path(defaults.server_log_file.display()));
    output::kv("pid dir", output::path(defaults.pid_dir.display()));

    output::section("Ownership");
    for rule in defaults.adjust_ownership {
        output::list_item(&format!(
            "{} {}{}",
            rule.mode,
            rule.path,
            if rule.recursive { " (recursive)" } else { "" }
        ));
    }
    Ok(())
}
