//! Logging setup
//!
//! Logging is off unless `REFRAIN_LOG` is set (to a level such as `debug`)
//! or `--verbose` is passed. Logs go to stderr, or to `config.log_file`
//! when one is configured, so they never mix with printed lines on stdout.

use std::fs::File;

use refrain_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
const LOG_ENV: &str = "REFRAIN_LOG";

/// Initialize tracing for this process
pub fn init(config: &Config, verbose: bool) {
    let Some(level) = log_level(std::env::var(LOG_ENV).ok(), verbose) else {
        return;
    };

    let env_filter = EnvFilter::new(format!("refrain_core={0},refrain_cli={0}", level));

    // Ignore errors from try_init: a subscriber may already be installed
    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();
            info!("Logging to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .without_time()
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

/// Level from the environment wins; `--verbose` alone means debug
fn log_level(env_level: Option<String>, verbose: bool) -> Option<String> {
    match env_level {
        Some(level) if !level.is_empty() => Some(level),
        _ if verbose => Some("debug".to_string()),
        _ => None,
    }
}
