//! Engine configuration management
//!
//! Numerical budgets for the elliptical engine, loaded from defaults,
//! environment variables, TOML files, or any key/value lookup.
//!
//! ## Keys
//!
//! | Field | Environment variable | Default |
//! |-------|----------------------|---------|
//! | `quantile_epsilon` | `ELLIPTICAL_QUANTILE_EPSILON` | 1e-12 |
//! | `quantile_iterations` | `ELLIPTICAL_QUANTILE_ITERATIONS` | 200 |
//! | `max_bracket_expansions` | `ELLIPTICAL_MAX_BRACKET_EXPANSIONS` | 64 |
//! | `monotonicity_checks` | `ELLIPTICAL_MONOTONICITY_CHECKS` | 16 |
//! | `sampling_size` | `ELLIPTICAL_SAMPLING_SIZE` | 100000 |
//! | `sampling_seed` | `ELLIPTICAL_SAMPLING_SEED` | 42 |
//! | `pdf_gradient_epsilon` | `ELLIPTICAL_PDF_GRADIENT_EPSILON` | 1e-6 |

use crate::math::solvers::SolverConfig;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of every environment variable read by [`EngineConfig::from_env`].
pub const ENV_PREFIX: &str = "ELLIPTICAL_";

/// Configuration error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A value could not be parsed.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Key being read
        key: String,
        /// Raw value
        value: String,
    },

    /// A tolerance is zero, negative or non-finite.
    #[error("{key} must be positive and finite, got {value}")]
    NonPositive {
        /// Field name
        key: &'static str,
        /// Offending value
        value: f64,
    },

    /// A count is below its minimum.
    #[error("{key} must be at least {min}, got {value}")]
    TooSmall {
        /// Field name
        key: &'static str,
        /// Minimum accepted value
        min: usize,
        /// Offending value
        value: usize,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Numerical budgets consumed by the distribution engine.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Absolute tolerance of the radial quantile root finder
    pub quantile_epsilon: f64,
    /// Iteration budget of the radial quantile root finder
    pub quantile_iterations: usize,
    /// Number of radius doublings allowed while bracketing a quantile
    pub max_bracket_expansions: usize,
    /// Number of points at which the density generator is checked for monotonicity
    pub monotonicity_checks: usize,
    /// Sample size of Monte Carlo estimates (multivariate CDF)
    pub sampling_size: usize,
    /// Seed of the Monte Carlo generator
    pub sampling_seed: u64,
    /// Relative step of finite-difference parameter gradients
    pub pdf_gradient_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quantile_epsilon: 1e-12,
            quantile_iterations: 200,
            max_bracket_expansions: 64,
            monotonicity_checks: 16,
            sampling_size: 100_000,
            sampling_seed: 42,
            pdf_gradient_epsilon: 1e-6,
        }
    }
}

impl EngineConfig {
    /// Create a new EngineConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `ELLIPTICAL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Load configuration from an opaque key/value source.
    ///
    /// Keys are the upper-case field names without prefix, e.g.
    /// `QUANTILE_EPSILON`. Missing keys keep their default.
    ///
    /// # Example
    ///
    /// ```
    /// use elliptical_core::config::EngineConfig;
    ///
    /// let config = EngineConfig::from_lookup(|key| match key {
    ///     "SAMPLING_SIZE" => Some("5000".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.sampling_size, 5000);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("QUANTILE_EPSILON") {
            config.quantile_epsilon = parse_value("QUANTILE_EPSILON", &value)?;
        }
        if let Some(value) = lookup("QUANTILE_ITERATIONS") {
            config.quantile_iterations = parse_value("QUANTILE_ITERATIONS", &value)?;
        }
        if let Some(value) = lookup("MAX_BRACKET_EXPANSIONS") {
            config.max_bracket_expansions = parse_value("MAX_BRACKET_EXPANSIONS", &value)?;
        }
        if let Some(value) = lookup("MONOTONICITY_CHECKS") {
            config.monotonicity_checks = parse_value("MONOTONICITY_CHECKS", &value)?;
        }
        if let Some(value) = lookup("SAMPLING_SIZE") {
            config.sampling_size = parse_value("SAMPLING_SIZE", &value)?;
        }
        if let Some(value) = lookup("SAMPLING_SEED") {
            config.sampling_seed = parse_value("SAMPLING_SEED", &value)?;
        }
        if let Some(value) = lookup("PDF_GRADIENT_EPSILON") {
            config.pdf_gradient_epsilon = parse_value("PDF_GRADIENT_EPSILON", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("quantile_epsilon", self.quantile_epsilon)?;
        positive("pdf_gradient_epsilon", self.pdf_gradient_epsilon)?;
        at_least("quantile_iterations", 1, self.quantile_iterations)?;
        at_least("monotonicity_checks", 2, self.monotonicity_checks)?;
        at_least("sampling_size", 1, self.sampling_size)?;
        Ok(())
    }

    /// Root-finder settings derived from the quantile budget.
    pub fn solver_config(&self) -> SolverConfig<f64> {
        SolverConfig {
            tolerance: self.quantile_epsilon,
            max_iterations: self.quantile_iterations,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { key, value })
    }
}

fn at_least(key: &'static str, min: usize, value: usize) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall { key, min, value })
    }
}
