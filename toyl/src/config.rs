//! Evaluation configuration
//!
//! ```
//! use toyl::EvalConfig;
//!
//! let config = EvalConfig::from_toml_str("division_precision = 50").unwrap();
//! assert_eq!(config.division_precision.get(), 50);
//! assert_eq!(config.max_depth, EvalConfig::default().max_depth);
//! ```

use serde::Deserialize;
use std::num::NonZeroU64;
use thiserror::Error;

/// Significant digits kept by precise division (IEEE 754 decimal128).
///
/// Every quotient is rounded to this budget, including ones that terminate:
/// `12345678901234567890123456789012345678 / 2` has 37 significant digits
/// and comes out as `6172839450617283945061728394506173000`.
pub const DEFAULT_DIVISION_PRECISION: NonZeroU64 = match NonZeroU64::new(34) {
    Some(n) => n,
    None => unreachable!(),
};

/// Upper bound on `division_precision`
pub const MAX_DIVISION_PRECISION: u64 = 100;

pub const DEFAULT_MAX_DEPTH: usize = 100_000;

/// Options controlling one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Significant decimal digits of a precise quotient, rounded half-even.
    ///
    /// Default: 34
    pub division_precision: NonZeroU64,

    /// Maximum node nesting the evaluator descends into.
    ///
    /// Default: 100000
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            division_precision: DEFAULT_DIVISION_PRECISION,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("division_precision {0} exceeds the supported maximum of {MAX_DIVISION_PRECISION}")]
    PrecisionTooLarge(u64),
}

impl EvalConfig {
    /// Parse a TOML table; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EvalConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let precision = self.division_precision.get();
        if precision > MAX_DIVISION_PRECISION {
            return Err(ConfigError::PrecisionTooLarge(precision));
        }
        Ok(())
    }
}
