//! Collaborator trait for the identity backend.

use async_trait::async_trait;
use gatehouse_config::TransportSettings;

use crate::catalog::ClientConfiguration;
use crate::error::ClientError;
use crate::request::{ChangePasswordRequest, LoginRequest, SignupRequest};
use crate::sso::SsoState;

/// Network access to the identity backend.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Receive transport settings before any fetch of a `show()`.
    fn configure(&self, _settings: &TransportSettings) {}

    /// Fetch the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the backend cannot be reached or rejects
    /// the request.
    async fn fetch_client_configuration(&self) -> Result<ClientConfiguration, ClientError>;

    /// Fetch the SSO state, optionally probing directory (Windows) SSO.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the lookup fails; callers treat that as
    /// "no SSO".
    async fn fetch_sso_state(&self, use_directory_sso: bool) -> Result<SsoState, ClientError>;

    /// Submit a login.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the login is not accepted.
    async fn login(&self, request: LoginRequest) -> Result<(), ClientError>;

    /// Submit a signup.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the signup is not accepted.
    async fn signup(&self, _request: SignupRequest) -> Result<(), ClientError> {
        Err(ClientError::Unsupported {
            operation: "signup",
        })
    }

    /// Submit a password change.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the change is not accepted.
    async fn change_password(&self, _request: ChangePasswordRequest) -> Result<(), ClientError> {
        Err(ClientError::Unsupported {
            operation: "change_password",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct StubClient;

    #[async_trait]
    impl IdentityClient for StubClient {
        async fn fetch_client_configuration(&self) -> Result<ClientConfiguration, ClientError> {
            Ok(ClientConfiguration {
                id: "123456789".into(),
                strategies: Vec::new(),
            })
        }

        async fn fetch_sso_state(&self, _use_directory_sso: bool) -> Result<SsoState, ClientError> {
            Ok(SsoState::unavailable())
        }

        async fn login(&self, _request: LoginRequest) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn default_methods_report_unsupported() -> anyhow::Result<()> {
        let client: Arc<dyn IdentityClient> = Arc::new(StubClient);
        let config = client.fetch_client_configuration().await?;
        assert_eq!(config.id, "123456789");
        assert!(!client.fetch_sso_state(false).await?.available);

        let err = client
            .signup(SignupRequest {
                connection: "dbTest".into(),
                username: "john@fabrikam.com".into(),
                password: "xyz".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unsupported");
        assert_eq!(err.operation(), "signup");

        let err = client
            .change_password(ChangePasswordRequest {
                connection: "dbTest".into(),
                username: "john@fabrikam.com".into(),
                password: "xyz".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.detail(), "change_password: operation not supported by identity client");
        Ok(())
    }
}
