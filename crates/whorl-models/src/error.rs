//! Configuration errors for the reference models and modifiers.

use std::fmt;

/// Invalid model or modifier parameters, rejected at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A coefficient that must be positive was not.
    NonPositive {
        /// Name of the parameter.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// A parameter that must be finite was not.
    NonFinite {
        /// Name of the parameter.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { name, value } => {
                write!(f, "{name} must be positive, got {value}")
            }
            Self::NonFinite { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(value)
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(value)
}
