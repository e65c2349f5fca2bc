//! Error types for configuration loading and validation.
//!
//! The per-tick pipeline itself has no error path: missing host data skips the
//! tick and holds the previous output.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Config JSON could not be parsed.
    #[error("config json parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A numeric field is outside its accepted range.
    #[error("{field} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// A numeric field is NaN or infinite.
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

impl ConfigError {
    /// Name of the offending field, if the error refers to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::Parse(_) => None,
            ConfigError::OutOfRange { field, .. } | ConfigError::NotFinite { field } => Some(field),
        }
    }
}
