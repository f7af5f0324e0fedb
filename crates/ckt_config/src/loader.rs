//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::AnalysisConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "ckt.toml";

/// Loads and validates a `ckt.toml` configuration from a directory.
pub fn load_config(dir: &Path) -> Result<AnalysisConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let content =
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
    load_config_from_str(&content)
}

/// Parses and validates a `ckt.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<AnalysisConfig, ConfigError> {
    let config: AnalysisConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    if config.classify.size_buckets < 2 {
        return Err(ConfigError::Invalid {
            key: "classify.size_buckets",
            reason: format!("must be at least 2, got {}", config.classify.size_buckets),
        });
    }
    Ok(())
}
