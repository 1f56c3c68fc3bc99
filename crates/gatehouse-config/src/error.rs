//! Error types for configuration operations.

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field that failed validation, in host (camelCase) spelling.
        field: String,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A required field was absent.
    #[error("missing configuration field")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// Options document could not be parsed.
    #[error("invalid options document")]
    Parse {
        /// Source serde error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Machine-readable code used in fault events.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } => "invalid_option",
            Self::MissingField { .. } => "missing_option",
            Self::Parse { .. } => "invalid_options_document",
        }
    }

    /// One-line detail naming the field and reason.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidField { field, reason, .. } => format!("{field}: {reason}"),
            Self::MissingField { field } => format!("{field}: required"),
            Self::Parse { source } => source.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, value: Option<&str>, reason: &'static str) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            value: value.map(str::to_string),
            reason,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
