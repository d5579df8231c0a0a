//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration field: {key}")]
    MissingField { key: &'static str },

    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidField {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to read environment file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

impl ConfigError {
    /// Name of the environment variable at fault, if the error concerns one
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingField { key } | ConfigError::InvalidField { key, .. } => Some(key),
            ConfigError::EnvFile { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_key() {
        let err = ConfigError::MissingField {
            key: "STRIPE_SECRET_KEY",
        };
        assert_eq!(
            err.to_string(),
            "missing required configuration field: STRIPE_SECRET_KEY"
        );
        assert_eq!(err.key(), Some("STRIPE_SECRET_KEY"));
    }

    #[test]
    fn test_invalid_field_message() {
        let err = ConfigError::InvalidField {
            key: "PAYPAL_MODE",
            value: "prod".to_string(),
            expected: "sandbox or live",
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"prod\" for PAYPAL_MODE: expected sandbox or live"
        );
    }
}
