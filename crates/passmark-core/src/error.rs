//! Configuration error types.
//!
//! The scoring engines themselves never fail; these errors are raised only by
//! the construction-boundary guard in [`crate::config`].

use thiserror::Error;

/// A single problem found while validating a scoring or ranking configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The value must be zero or greater.
    #[error("{field}: must be non-negative, got {value}")]
    Negative { field: String, value: f64 },

    /// The value is NaN or infinite.
    #[error("{field}: must be a finite number, got {value}")]
    NotFinite { field: String, value: f64 },

    /// The value must be strictly greater than zero.
    #[error("{field}: must be greater than zero, got {value}")]
    NotPositive { field: String, value: f64 },

    /// Too many decimal places for a meaningful f64 rounding.
    #[error("{field}: at most {max} decimal places are supported, got {value}")]
    TooManyDecimalPlaces { field: String, value: u32, max: u32 },

    /// The lookback window must cover at least one year.
    #[error("{field}: must cover at least one year")]
    EmptyYearWindow { field: String },

    /// An environment override could not be parsed.
    #[error("environment variable {var}: invalid value '{value}'")]
    InvalidOverride { var: String, value: String },
}

impl ConfigError {
    /// The dotted path of the offending configuration key, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Negative { field, .. }
            | ConfigError::NotFinite { field, .. }
            | ConfigError::NotPositive { field, .. }
            | ConfigError::TooManyDecimalPlaces { field, .. }
            | ConfigError::EmptyYearWindow { field } => Some(field),
            ConfigError::InvalidOverride { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::Negative {
            field: "scoring.max_score".into(),
            value: -1.0,
        };
        assert_eq!(err.to_string(), "scoring.max_score: must be non-negative, got -1");
        assert_eq!(err.field(), Some("scoring.max_score"));
    }

    #[test]
    fn override_errors_have_no_field() {
        let err = ConfigError::InvalidOverride {
            var: "PASSMARK_DECIMAL_PLACES".into(),
            value: "two".into(),
        };
        assert!(err.field().is_none());
        assert!(err.to_string().contains("PASSMARK_DECIMAL_PLACES"));
    }
}
