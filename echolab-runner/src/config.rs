//! Simulation configuration.
//!
//! Everything that is policy rather than per-call input lives here: the
//! simulation horizon, the label horizon, the minimum analog count, the
//! band-multiplier ladder, and the danger threshold. The defaults are the
//! documented production values; a TOML file can override any subset.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration for one simulation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Forward periods summed per bootstrap trial.
    pub horizon: usize,
    /// Lookahead of the forward-return label, in periods.
    pub label_horizon: usize,
    /// Minimum analog count required at the base band.
    pub min_samples: usize,
    /// Band multipliers evaluated by the robustness sweep.
    pub band_multipliers: Vec<f64>,
    /// Best-p threshold below which a multi-band search is flagged.
    pub danger_threshold: f64,
    /// Master seed. `None` draws from OS entropy, so repeated calls differ;
    /// tests pin a value for exact reproducibility.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon: 100,
            label_horizon: 5,
            min_samples: 50,
            band_multipliers: vec![0.5, 1.0, 1.5, 2.0],
            danger_threshold: 0.05,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load from a TOML file; absent keys keep their defaults.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject degenerate values before they reach the pipeline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::Invalid("horizon must be >= 1".into()));
        }
        if self.label_horizon == 0 {
            return Err(ConfigError::Invalid("label_horizon must be >= 1".into()));
        }
        if self.min_samples == 0 {
            return Err(ConfigError::Invalid("min_samples must be >= 1".into()));
        }
        if self.band_multipliers.is_empty() {
            return Err(ConfigError::Invalid(
                "band_multipliers must not be empty".into(),
            ));
        }
        if self
            .band_multipliers
            .iter()
            .any(|m| !m.is_finite() || *m <= 0.0)
        {
            return Err(ConfigError::Invalid(
                "band multipliers must be finite and positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.danger_threshold) {
            return Err(ConfigError::Invalid(
                "danger_threshold must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(String),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
