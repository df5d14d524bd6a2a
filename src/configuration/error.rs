//! Error types for scenario configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("spawn radius range is inverted: [{min}, {max}]")]
    InvertedRange { min: f64, max: f64 },

    #[error("{field} must have 2 components, got {len}")]
    Arity { field: String, len: usize },

    #[error("{field} has a non-finite component")]
    NonFinite { field: String },
}
