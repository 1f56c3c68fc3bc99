//! Form validation collaborator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationFault;

static EMAIL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Checks the fields the widget forms submit.
pub trait FormValidator: Send + Sync {
    /// Validate an email address, returning it trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFault::MissingEmail`] or [`ValidationFault::InvalidEmail`].
    fn validate_email(&self, email: &str) -> Result<String, ValidationFault>;

    /// Validate a password.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFault::MissingPassword`] for an empty password.
    fn validate_password(&self, password: &str) -> Result<(), ValidationFault> {
        if password.is_empty() {
            Err(ValidationFault::MissingPassword)
        } else {
            Ok(())
        }
    }

    /// Validate a password confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFault::PasswordMismatch`] when the values differ.
    fn validate_password_confirmation(
        &self,
        password: &str,
        repeat: &str,
    ) -> Result<(), ValidationFault> {
        if password == repeat {
            Ok(())
        } else {
            Err(ValidationFault::PasswordMismatch)
        }
    }
}

/// Validator used when the host does not provide one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl FormValidator for DefaultValidator {
    fn validate_email(&self, email: &str) -> Result<String, ValidationFault> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationFault::MissingEmail);
        }
        let well_formed = EMAIL
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(email));
        if well_formed {
            Ok(email.to_string())
        } else {
            Err(ValidationFault::InvalidEmail {
                email: email.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        let validator = DefaultValidator;
        assert_eq!(
            validator.validate_email(" john@fabrikam.com ").as_deref(),
            Ok("john@fabrikam.com")
        );
        assert_eq!(validator.validate_email(""), Err(ValidationFault::MissingEmail));
        assert!(matches!(
            validator.validate_email("john@fabrikam"),
            Err(ValidationFault::InvalidEmail { .. })
        ));
        assert!(validator.validate_email("jo hn@fabrikam.com").is_err());
    }

    #[test]
    fn password_rules() {
        let validator = DefaultValidator;
        assert_eq!(validator.validate_password(""), Err(ValidationFault::MissingPassword));
        assert!(validator.validate_password("xyz").is_ok());
        assert!(validator.validate_password_confirmation("xyz", "xyz").is_ok());
        assert_eq!(
            validator.validate_password_confirmation("xyz", "xy"),
            Err(ValidationFault::PasswordMismatch)
        );
    }
}
