//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use refrain_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "data_file": config.data_file,
                    "data_path": config.data_path(),
                    "history_count": config.history_count,
                    "seed": config.seed,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:      {}", config.data_dir.display());
            println!("  data_file:     {}", display_optional(&config.data_file));
            println!("  history_count: {}", config.history_count);
            println!("  seed:          {}", config.seed);
            println!("  log_file:      {}", display_optional(&config.log_file));
            println!();
            println!("Library file: {}", config.data_path().display());
            println!("Config file:  {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "data_file" => {
            config.data_file = optional_path(value);
        }
        "history_count" => {
            config.history_count = value
                .parse()
                .context("Invalid value for history_count. Use a whole number.")?;
        }
        "seed" => {
            config.seed = value
                .parse()
                .context("Invalid value for seed. Use 'true' or 'false'.")?;
        }
        "log_file" => {
            config.log_file = optional_path(value);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, data_file, history_count, seed, log_file",
                key
            );
        }
    }
    Ok(())
}

/// Empty or "none" clears an optional path
fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.into())
    }
}

fn display_optional(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}
