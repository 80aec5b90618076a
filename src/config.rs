//! Configuration management for Voltaic
//!
//! This module handles loading, validation, and management of the simulator
//! configuration from YAML files, falling back to built-in defaults that
//! match the reference demo vehicle.

use crate::error::{Result, VoltaicError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Initial vehicle telemetry and billing state
    pub vehicle: VehicleConfig,

    /// Charging session and decay timing
    pub charging: ChargingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Initial state of the simulated vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Odometer reading in kilometers
    pub odometer_km: u32,

    /// Drive mode label (free-form, e.g. "Eco", "Normal", "Sport")
    pub mode: String,

    /// Initial battery state of charge in percent
    pub battery_percent: u8,

    /// Range at 100% battery, used to derive remaining range
    pub rated_range_km: u32,

    /// Motor temperature label
    pub motor_temp: String,

    /// Inverter temperature label
    pub inverter_temp: String,

    /// Battery temperature label
    pub battery_temp: String,

    /// Outstanding billing amount at startup (display string)
    pub billing_amount_due: String,

    /// Billing due date at startup (display string)
    pub billing_due_date: String,
}

/// Timing parameters for the decay and charge tickers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargingConfig {
    /// Seconds between battery decay steps
    pub decay_interval_secs: u64,

    /// Milliseconds between charge progress steps
    pub tick_interval_ms: u64,

    /// Progress added per charge tick (fraction of a full charge)
    pub progress_step: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file or directory for rolling logs
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            odometer_km: 759,
            mode: "Sport".to_string(),
            battery_percent: 100,
            rated_range_km: 200,
            motor_temp: "NORMAL".to_string(),
            inverter_temp: "HIGH".to_string(),
            battery_temp: "OVER HEAT".to_string(),
            billing_amount_due: "Rp 200.000".to_string(),
            billing_due_date: "08/08/23".to_string(),
        }
    }
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            decay_interval_secs: 8,
            tick_interval_ms: 1000,
            progress_step: 0.01,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/voltaic.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with validation
    pub fn load() -> Result<Self> {
        // Try to load from default locations
        let default_paths = ["voltaic_config.yaml", "/etc/voltaic/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.vehicle.battery_percent > 100 {
            return Err(VoltaicError::validation(
                "vehicle.battery_percent",
                "Must be within 0..=100",
            ));
        }

        if self.vehicle.rated_range_km == 0 {
            return Err(VoltaicError::validation(
                "vehicle.rated_range_km",
                "Must be greater than 0",
            ));
        }

        if self.charging.decay_interval_secs == 0 {
            return Err(VoltaicError::validation(
                "charging.decay_interval_secs",
                "Must be greater than 0",
            ));
        }

        if self.charging.tick_interval_ms == 0 {
            return Err(VoltaicError::validation(
                "charging.tick_interval_ms",
                "Must be greater than 0",
            ));
        }

        if !(self.charging.progress_step > 0.0 && self.charging.progress_step <= 1.0) {
            return Err(VoltaicError::validation(
                "charging.progress_step",
                "Must be within (0, 1]",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.vehicle.odometer_km, 759);
        assert_eq!(config.vehicle.battery_percent, 100);
        assert_eq!(config.charging.decay_interval_secs, 8);
        assert_eq!(config.charging.tick_interval_ms, 1000);
        assert!((config.charging.progress_step - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        // Test invalid battery percent
        config.vehicle.battery_percent = 101;
        assert!(config.validate().is_err());

        // Reset and test invalid progress step
        config = Config::default();
        config.charging.progress_step = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.vehicle.mode, deserialized.vehicle.mode);
        assert_eq!(
            config.charging.decay_interval_secs,
            deserialized.charging.decay_interval_secs
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "vehicle:\n  odometer_km: 1200\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.vehicle.odometer_km, 1200);
        assert_eq!(config.vehicle.mode, "Sport");
        assert_eq!(config.charging.decay_interval_secs, 8);
    }
}
