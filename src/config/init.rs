use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::collections::BTreeMap;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use super::{get_config_path, Config, TelemetryConfig};
use crate::schema::CanonicalField;
use crate::scoring::lookup::{EMISSION_FACTOR_TABLE, RECYCLABILITY_TABLE};
use crate::scoring::ScoringConfig;

const DEFAULT_DATASET: &str = "ecoscore_data.csv";

const HEADER: &str = "# ecoscore configuration\n\
# Every key is optional. Remove a section to fall back to built-in defaults.\n\
# Composite weights must sum to 1.0. The composite is only used for rows\n\
# without an EcoScore and its normalizations are placeholders.\n\n";

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// A config with every section spelled out at its default value.
pub fn starter_config() -> Config {
    let aliases: BTreeMap<String, Vec<String>> = CanonicalField::ALL
        .iter()
        .map(|f| {
            (
                f.as_str().to_string(),
                f.default_aliases().iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect();

    Config {
        dataset: Some(DEFAULT_DATASET.to_string()),
        aliases: Some(aliases),
        scoring: Some(ScoringConfig::default()),
        recyclability: Some(
            RECYCLABILITY_TABLE
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        ),
        emission_factors: Some(
            EMISSION_FACTOR_TABLE
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        ),
        telemetry: Some(TelemetryConfig::default()),
    }
}

/// Serialize a config to YAML and write it atomically.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;
    Ok(())
}

/// Create a starter config file.
///
/// On a terminal the user is asked for the dataset path, whether to count
/// visits, and before overwriting an existing file (unless `force`).
/// Returns the written path, or None if the user declined to overwrite.
pub fn run_init(path: Option<PathBuf>, force: bool) -> Result<Option<PathBuf>> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };
    let interactive = std::io::stdin().is_terminal();

    if config_path.exists() && !force {
        if !interactive {
            anyhow::bail!(
                "Config already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            return Ok(None);
        }
    }

    let mut config = starter_config();
    if interactive {
        let dataset = prompt_with_default("Dataset CSV path", DEFAULT_DATASET)?;
        config.dataset = Some(dataset);
        let visit_counter = prompt_yes_no("Count runs in a local visit counter?", false)?;
        config.telemetry = Some(TelemetryConfig {
            visit_counter,
            path: None,
        });
    }

    write_config(&config_path, &config)?;
    Ok(Some(config_path))
}
