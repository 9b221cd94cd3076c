//! Estimator configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `ARVAK_CHEM_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`EstimatorConfig::max_concurrent_terms`].
pub const ENV_MAX_CONCURRENT_TERMS: &str = "ARVAK_CHEM_MAX_CONCURRENT_TERMS";
/// Environment variable overriding [`EstimatorConfig::weight_threshold`].
pub const ENV_WEIGHT_THRESHOLD: &str = "ARVAK_CHEM_WEIGHT_THRESHOLD";
/// Environment variable overriding [`EstimatorConfig::samples`].
pub const ENV_SAMPLES: &str = "ARVAK_CHEM_SAMPLES";
/// Environment variable overriding [`EstimatorConfig::seed`].
pub const ENV_SEED: &str = "ARVAK_CHEM_SEED";

/// Tuning knobs for [`EnergyEstimator`](crate::energy::EnergyEstimator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Terms estimated concurrently. Further capped by the backend's slots.
    #[serde(default = "default_max_concurrent_terms")]
    pub max_concurrent_terms: usize,

    /// Instructions with `|weight|` below this are not sampled.
    #[serde(default = "default_weight_threshold")]
    pub weight_threshold: f64,

    /// Default trials per instruction when the caller gives none.
    #[serde(default = "default_samples")]
    pub samples: u32,

    /// Sampling seed for backends that support one.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_concurrent_terms() -> usize {
    4
}

fn default_weight_threshold() -> f64 {
    1e-10
}

fn default_samples() -> u32 {
    1000
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_terms: default_max_concurrent_terms(),
            weight_threshold: default_weight_threshold(),
            samples: default_samples(),
            seed: None,
        }
    }
}

impl EstimatorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `ARVAK_CHEM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `ARVAK_CHEM_*` environment variables on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Only keys the lookup returns override fields; absent keys leave the
    /// current values unchanged.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup(ENV_MAX_CONCURRENT_TERMS) {
            self.max_concurrent_terms = parse_var(ENV_MAX_CONCURRENT_TERMS, &v)?;
        }
        if let Some(v) = lookup(ENV_WEIGHT_THRESHOLD) {
            self.weight_threshold = parse_var(ENV_WEIGHT_THRESHOLD, &v)?;
        }
        if let Some(v) = lookup(ENV_SAMPLES) {
            self.samples = parse_var(ENV_SAMPLES, &v)?;
        }
        if let Some(v) = lookup(ENV_SEED) {
            self.seed = Some(parse_var(ENV_SEED, &v)?);
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_terms == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_terms must be greater than 0".to_string(),
            ));
        }
        if !self.weight_threshold.is_finite() || self.weight_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "weight_threshold must be a non-negative number, got {}",
                self.weight_threshold
            )));
        }
        if self.samples == 0 {
            return Err(ConfigError::Invalid(
                "samples must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::Parse(format!("{key}={value:?}: {e}")))
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// A value could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("Validation error: {0}")]
    Invalid(String),
}
