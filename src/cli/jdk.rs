//! JDK command.

use crate::cli::output;
use crate::core::config::ServerConfig;
use crate::core::jdk;
use crate::error::Result;

/// Show the JDK in use and the releases offered for download.
pub fn execute(config: &ServerConfig, json: bool) -> Result<()> {
    let properties = config.load_properties()?;
    let found = config.find_jdk(&properties);
    let releases = jdk::jdk_releases(&properties)?;

    if json {
        let output = serde_json::json!({
            "jdk": found,
            "releases": releases,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("JDK");
    output::rule();
    match &found {
        Some(jdk) => {
            output::kv("home", output::path(jdk.home.display()));
            output::kv("java", output::path(jdk.java.display()));
        }
        None => output::warn(&format!(
            "no JDK found in {}",
            config.defaults().jdk_install_dir.display()
        )),
    }

    if !releases.is_empty() {
        output::section("Releases");
        for release in &releases {
            output::list_item(&format!("{} ({})", release.name, release.desc));
        }
    }
    Ok(())
}
