//! Runtime configuration loaded from TOML

use crate::bootstrap::BootstrapScan;
use cadence_core::{CadenceError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest accepted fixed-update rate. Every frame runs up to
/// `max_frame_time * fixed_hz` fixed passes, so this caps that count.
pub const MAX_FIXED_HZ: f64 = 1000.0;

/// Settings for the host loop driving the update manager.
///
/// Read from the `[runtime]` table of a TOML file; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Fixed-update rate in Hz
    pub fixed_hz: f64,
    /// Longest frame delta in seconds before clamping
    pub max_frame_time: f64,
    /// Simulated frame delta for headless runs, in seconds
    pub frame_time: f64,
    /// Depth of the startup scan
    pub bootstrap_scan: BootstrapScan,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            max_frame_time: 0.25,
            frame_time: 1.0 / 60.0,
            bootstrap_scan: BootstrapScan::Roots,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    runtime: RuntimeConfig,
}

impl RuntimeConfig {
    /// Parse the `[runtime]` table from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.runtime.validate()?;
        Ok(file.runtime)
    }

    /// Load from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject settings the clock cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_hz > 0.0 && self.fixed_hz <= MAX_FIXED_HZ) {
            return Err(CadenceError::ConfigError(format!(
                "fixed_hz must be in (0, {}], got {}",
                MAX_FIXED_HZ, self.fixed_hz
            )));
        }
        if !(self.max_frame_time.is_finite() && self.max_frame_time > 0.0) {
            return Err(CadenceError::ConfigError(format!(
                "max_frame_time must be positive, got {}",
                self.max_frame_time
            )));
        }
        if !(self.frame_time.is_finite() && self.frame_time >= 0.0) {
            return Err(CadenceError::ConfigError(format!(
                "frame_time must not be negative, got {}",
                self.frame_time
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn partial_table_overrides_fields() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [runtime]
            fixed_hz = 30.0
            bootstrap_scan = "hierarchy"
            "#,
        )
        .unwrap();
        assert_eq!(config.fixed_hz, 30.0);
        assert_eq!(config.bootstrap_scan, BootstrapScan::Hierarchy);
        assert_eq!(config.max_frame_time, 0.25);
    }

    #[test]
    fn rejects_non_positive_rate() {
        let err = RuntimeConfig::from_toml_str("[runtime]\nfixed_hz = 0.0").unwrap_err();
        assert!(matches!(err, CadenceError::ConfigError(_)));
    }

    #[test]
    fn rejects_runaway_rate() {
        let err = RuntimeConfig::from_toml_str("[runtime]\nfixed_hz = 1e300").unwrap_err();
        assert!(matches!(err, CadenceError::ConfigError(_)));

        let at_cap = RuntimeConfig {
            fixed_hz: MAX_FIXED_HZ,
            ..RuntimeConfig::default()
        };
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = RuntimeConfig::from_toml_str("[runtime\n").unwrap_err();
        assert!(matches!(err, CadenceError::TomlParseError(_)));
    }
}
