mod init;
mod schema;

pub use init::{run_init, starter_config, write_config};
pub use schema::{Config, TelemetryConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::schema::CanonicalField;
use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/ecoscore/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("ecoscore"))
}

/// Get the default config file path (~/.config/ecoscore/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/ecoscore/config.yaml), and a missing default file yields the
///   built-in defaults.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate the whole configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref scoring) = config.scoring {
        if let Err(scoring_errors) = validate_scoring(scoring) {
            errors.extend(scoring_errors);
        }
    }

    if let Some(ref dataset) = config.dataset {
        if dataset.trim().is_empty() {
            errors.push("dataset: must not be empty".to_string());
        }
    }

    if let Some(ref aliases) = config.aliases {
        for (field, list) in aliases {
            if CanonicalField::parse(field).is_none() {
                errors.push(format!("aliases.{}: unknown field", field));
            }
            if list.iter().all(|a| a.trim().is_empty()) {
                errors.push(format!("aliases.{}: needs at least one non-empty alias", field));
            }
        }
    }

    if let Some(ref table) = config.recyclability {
        for (packaging, value) in table {
            if !(0.0..=100.0).contains(value) {
                errors.push(format!("recyclability.{}: must be between 0 and 100", packaging));
            }
        }
    }

    if let Some(ref table) = config.emission_factors {
        for (country, value) in table {
            if !value.is_finite() || *value <= 0.0 {
                errors.push(format!("emission_factors.{}: must be positive", country));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
