//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::BenchConfig;
use litax_common::Frequency;
use litax_sim::Timescale;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "litax.toml";

/// Loads and validates `<project_dir>/litax.toml`.
pub fn load_config(project_dir: &Path) -> Result<BenchConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<BenchConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `litax.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<BenchConfig, ConfigError> {
    let config: BenchConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks required fields, ranges and the strings that are parsed later.
fn validate_config(config: &BenchConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.top.is_empty() {
        return Err(ConfigError::MissingField("project.top".to_string()));
    }

    let num_bits = config.adc.num_bits;
    if !(2..=32).contains(&num_bits) {
        return Err(invalid(format!(
            "adc.num_bits must be between 2 and 32, got {num_bits}"
        )));
    }
    if config.modem.bits == 0 {
        return Err(invalid("modem.bits must be at least 1"));
    }
    if config.modem.baud == 0 {
        return Err(invalid("modem.baud must be positive"));
    }
    if config.trace.levels == 0 {
        return Err(invalid("trace.levels must be at least 1"));
    }

    let clock = parse_frequency("clock.frequency", &config.clock.frequency)?;
    if clock.hz() <= 2.0 * f64::from(config.modem.baud) {
        return Err(invalid(format!(
            "clock.frequency {clock} is too slow for {} baud",
            config.modem.baud
        )));
    }
    parse_frequency("modem.mark", &config.modem.mark)?;
    parse_frequency("modem.space", &config.modem.space)?;
    parse_timescale(&config.trace.timescale)?;
    Ok(())
}

/// Parses a positive frequency, naming `field` in the error.
pub(crate) fn parse_frequency(field: &str, value: &str) -> Result<Frequency, ConfigError> {
    match value.parse::<Frequency>() {
        Ok(freq) if freq.hz() > 0.0 => Ok(freq),
        Ok(freq) => Err(invalid(format!("{field} must be positive, got {freq}"))),
        Err(e) => Err(invalid(format!("{field}: {e}"))),
    }
}

pub(crate) fn parse_timescale(value: &str) -> Result<Timescale, ConfigError> {
    value
        .parse::<Timescale>()
        .map_err(|e| invalid(format!("trace.timescale: {e}")))
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}
