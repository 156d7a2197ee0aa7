//! Solver configuration
//!
//! Tolerances used by the solver, loadable from a RON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Deserialization error: {0}")]
    Deserialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Numerical tolerances for the anchor solver
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Length of the cross product of two unit directions under which they
    /// are treated as parallel
    pub parallel_tolerance: f64,
    /// Allowed deviation from 1 of a normalized direction's norm
    pub unit_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            parallel_tolerance: 1e-12,
            unit_tolerance: 1e-6,
        }
    }
}

impl SolverConfig {
    /// Parse a configuration from RON text
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No solver config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_ron_str(&content)?;
        tracing::info!("Loaded solver config from {:?}", path);
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("parallel_tolerance", self.parallel_tolerance),
            ("unit_tolerance", self.unit_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
