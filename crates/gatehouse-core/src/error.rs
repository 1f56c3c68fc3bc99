//! Fault types raised by the decision engine and its collaborators.

use std::error::Error as StdError;

use thiserror::Error;

/// User-input problem; reported inline and never fatal to the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationFault {
    /// Email field left empty.
    #[error("email is required")]
    MissingEmail,
    /// Email field is not a well-formed address.
    #[error("email is invalid")]
    InvalidEmail {
        /// Submitted value.
        email: String,
    },
    /// Password field left empty.
    #[error("password is required")]
    MissingPassword,
    /// Password confirmation does not match.
    #[error("passwords do not match")]
    PasswordMismatch,
    /// Selected connection or strategy is not in the catalog.
    #[error("unknown connection")]
    UnknownConnection {
        /// Requested identifier.
        name: String,
    },
    /// No connection serves the email's domain and no default exists.
    #[error("no connection for email domain")]
    UnmatchedDomain {
        /// Domain extracted from the email.
        domain: String,
    },
    /// The catalog has no credential connection to submit to.
    #[error("no credential connection available")]
    NoCredentialConnection,
    /// The catalog has no database connection for signup or reset.
    #[error("no database connection available")]
    NoDatabaseConnection,
}

impl ValidationFault {
    /// Machine-readable code used in fault events.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingEmail => "missing_email",
            Self::InvalidEmail { .. } => "invalid_email",
            Self::MissingPassword => "missing_password",
            Self::PasswordMismatch => "password_mismatch",
            Self::UnknownConnection { .. } => "unknown_connection",
            Self::UnmatchedDomain { .. } => "unmatched_domain",
            Self::NoCredentialConnection => "no_credential_connection",
            Self::NoDatabaseConnection => "no_database_connection",
        }
    }

    /// Form field the renderer should flag, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingEmail | Self::InvalidEmail { .. } | Self::UnmatchedDomain { .. } => {
                Some("email")
            }
            Self::MissingPassword => Some("password"),
            Self::PasswordMismatch => Some("repeat_password"),
            Self::UnknownConnection { .. }
            | Self::NoCredentialConnection
            | Self::NoDatabaseConnection => None,
        }
    }
}

/// Catalog or options problem that prevents a usable widget.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationFault {
    /// The client has no connections at all.
    #[error("client has no connections")]
    NoConnections,
    /// None of the requested connections exist for the client.
    #[error("no requested connection is available")]
    NoRequestedConnections {
        /// Names the host asked for.
        requested: Vec<String>,
    },
}

impl ConfigurationFault {
    /// Machine-readable code used in fault events.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoConnections => "no_connections",
            Self::NoRequestedConnections { .. } => "no_requested_connections",
        }
    }

    /// One-line detail for fault events.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::NoConnections => self.to_string(),
            Self::NoRequestedConnections { requested } => {
                format!("{self}: {}", requested.join(", "))
            }
        }
    }
}

/// Failure reported by an [`IdentityClient`](crate::client::IdentityClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("identity request failed")]
    Request {
        /// Operation that failed.
        operation: &'static str,
        /// Underlying transport error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// The backend answered with an error payload.
    #[error("identity request rejected")]
    Rejected {
        /// Operation that failed.
        operation: &'static str,
        /// Backend error code.
        code: String,
        /// Backend error description.
        description: String,
    },
    /// The backend could not be reached.
    #[error("identity service unavailable")]
    Unavailable {
        /// Operation that failed.
        operation: &'static str,
    },
    /// The client does not implement the operation.
    #[error("operation not supported by identity client")]
    Unsupported {
        /// Operation that was requested.
        operation: &'static str,
    },
}

impl ClientError {
    /// Wrap a transport error.
    #[must_use]
    pub fn request(
        operation: &'static str,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Request {
            operation,
            source: source.into(),
        }
    }

    /// Machine-readable code used in fault events.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Request { .. } => "request_failed",
            Self::Rejected { code, .. } => code,
            Self::Unavailable { .. } => "unavailable",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    /// Operation the error belongs to.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Request { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::Unavailable { operation }
            | Self::Unsupported { operation } => operation,
        }
    }

    /// One-line detail for fault events and failed submissions.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Request { operation, source } => format!("{operation}: {source}"),
            Self::Rejected {
                operation,
                description,
                ..
            } => format!("{operation}: {description}"),
            Self::Unavailable { operation } | Self::Unsupported { operation } => {
                format!("{operation}: {self}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn validation_codes_and_fields() {
        let fault = ValidationFault::InvalidEmail {
            email: "john".into(),
        };
        assert_eq!(fault.code(), "invalid_email");
        assert_eq!(fault.field(), Some("email"));
        assert_eq!(ValidationFault::PasswordMismatch.field(), Some("repeat_password"));
        assert_eq!(ValidationFault::NoDatabaseConnection.field(), None);
    }

    #[test]
    fn configuration_detail_lists_requested_names() {
        let fault = ConfigurationFault::NoRequestedConnections {
            requested: vec!["a".into(), "b".into()],
        };
        assert_eq!(fault.code(), "no_requested_connections");
        assert_eq!(fault.detail(), "no requested connection is available: a, b");
    }

    #[test]
    fn client_error_details() {
        let err = ClientError::request(
            "login",
            io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        );
        assert_eq!(err.code(), "request_failed");
        assert_eq!(err.operation(), "login");
        assert_eq!(err.detail(), "login: timed out");
        assert!(err.source().is_some());

        let rejected = ClientError::Rejected {
            operation: "signup",
            code: "user_exists".into(),
            description: "The user already exists.".into(),
        };
        assert_eq!(rejected.code(), "user_exists");
        assert_eq!(rejected.detail(), "signup: The user already exists.");
    }
}
