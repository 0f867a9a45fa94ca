//! ambari-config - Configuration management for the Ambari server installer.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ambari_config::cli::output;
use ambari_config::cli::{execute, Cli};
use ambari_config::core::constants::LOG_VAR;
use ambari_config::error::{ConfigError, Error, JdkError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("ambari_config=debug")
        } else {
            EnvFilter::new("ambari_config=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.conf_dir, cli.lib_dir) {
        if let Error::Interrupted = e {
            output::error("Aborting ... Keyboard Interrupt.");
            std::process::exit(1);
        }

        let suggestion = match &e {
            Error::Config(ConfigError::PropertiesNotFound { .. }) => {
                Some("set AMBARI_CONF_DIR or pass --conf-dir")
            }
            Error::Config(ConfigError::DatabaseNameMissing) => Some("run: ambari-config upgrade"),
            Error::Jdk(JdkError::NotFound { .. }) => Some("set java.home in ambari.properties"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
