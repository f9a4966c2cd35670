//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::HarnessConfig;
use std::path::Path;
use veritb_common::{BitWidth, Frequency};

/// The configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "veritb.toml";

/// Loads and validates a configuration file at an explicit path.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `<dir>/veritb.toml` if it exists, otherwise returns the defaults.
pub fn discover_config(dir: &Path) -> Result<HarnessConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        load_config(&config_path)
    } else {
        Ok(HarnessConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<HarnessConfig, ConfigError> {
    let config: HarnessConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are in range and consistent.
fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    if config.harness.name.is_empty() {
        return Err(ConfigError::MissingField("harness.name".to_string()));
    }
    validate_width(config.dut.width)?;
    validate_frequency(&config.clock.frequency)?;
    validate_count(config.stimulus.count)?;
    validate_watchdog(config.run.watchdog_cycles)?;
    Ok(())
}

pub(crate) fn validate_width(bits: u32) -> Result<BitWidth, ConfigError> {
    BitWidth::new(bits).map_err(|e| ConfigError::ValidationError(format!("dut.width: {e}")))
}

pub(crate) fn validate_frequency(text: &str) -> Result<(Frequency, u64), ConfigError> {
    let frequency: Frequency = text
        .parse()
        .map_err(|e| ConfigError::ValidationError(format!("clock.frequency: {e}")))?;
    let period = frequency.period_fs().ok_or_else(|| {
        ConfigError::ValidationError(format!(
            "clock.frequency: '{text}' does not give a usable clock period"
        ))
    })?;
    Ok((frequency, period))
}

pub(crate) fn validate_count(count: usize) -> Result<(), ConfigError> {
    if count == 0 {
        return Err(ConfigError::ValidationError(
            "stimulus.count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_watchdog(cycles: Option<u64>) -> Result<(), ConfigError> {
    if cycles == Some(0) {
        return Err(ConfigError::ValidationError(
            "run.watchdog_cycles must be at least 1".to_string(),
        ));
    }
    Ok(())
}
