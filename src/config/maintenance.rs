//! Maintenance job configuration loaded from config.toml
//!
//! The maintenance binary runs the default-kit reconciliation sweeps and the
//! legacy config migration. Which optional passes run is controlled here.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Maintenance pass settings
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

/// Settings for a single maintenance run
#[derive(Debug, Default, Deserialize, Clone)]
pub struct MaintenanceConfig {
    /// Also repair motorcycles with more than one default kit
    #[serde(default)]
    pub sweep_multiple_defaults: bool,
    /// Users whose kit-less configs should be migrated onto a kit
    #[serde(default)]
    pub migrate_user_ids: Vec<String>,
}

/// Loads maintenance configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from ./config.toml, falling back to defaults when the
/// file does not exist.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::info!("No config.toml found, using default maintenance settings");
        return Ok(Config::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_maintenance_config() {
        let toml_str = r#"
            [maintenance]
            sweep_multiple_defaults = true
            migrate_user_ids = ["rider-1", "rider-2"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.maintenance.sweep_multiple_defaults);
        assert_eq!(config.maintenance.migrate_user_ids, vec!["rider-1", "rider-2"]);
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.maintenance.sweep_multiple_defaults);
        assert!(config.maintenance.migrate_user_ids.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
