use std::sync::Arc;

use async_trait::async_trait;
use interface::Identity;
use tracing::error;

use super::error_kind::{AuthErrorKind, GOOGLE_SIGN_IN_MESSAGE};
use super::SessionIdentity;

/// Error as reported by the sign-in provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Sign-in provider (email/password and Google OAuth).
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    async fn sign_in_with_google(&self) -> Result<Identity, ProviderError>;
}

/// A failed sign-in, already translated for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoginFailure {
    pub kind: AuthErrorKind,
    pub message: &'static str,
}

/// Runs sign-in against a gateway and binds the result into a session.
pub struct LoginFlow {
    gateway: Arc<dyn AuthGateway>,
    session: Arc<SessionIdentity>,
}

impl LoginFlow {
    pub fn new(gateway: Arc<dyn AuthGateway>, session: Arc<SessionIdentity>) -> Self {
        Self { gateway, session }
    }

    pub fn session(&self) -> Arc<SessionIdentity> {
        self.session.clone()
    }

    pub async fn log_in(&self, email: &str, password: &str) -> Result<Identity, LoginFailure> {
        match self.gateway.login(email, password).await {
            Ok(identity) => {
                self.session.bind(identity.clone());
                Ok(identity)
            }
            Err(e) => {
                error!("Login failed: {}", e);
                let kind = AuthErrorKind::from_code(&e.code);
                Err(LoginFailure {
                    kind,
                    message: kind.login_message(),
                })
            }
        }
    }

    pub async fn sign_in_with_google(&self) -> Result<Identity, LoginFailure> {
        match self.gateway.sign_in_with_google().await {
            Ok(identity) => {
                self.session.bind(identity.clone());
                Ok(identity)
            }
            Err(e) => {
                error!("Google sign-in failed: {}", e);
                Err(LoginFailure {
                    kind: AuthErrorKind::from_code(&e.code),
                    message: GOOGLE_SIGN_IN_MESSAGE,
                })
            }
        }
    }

    pub fn sign_out(&self) {
        self.session.sign_out();
    }
}
