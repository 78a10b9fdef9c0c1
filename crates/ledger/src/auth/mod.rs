pub mod error_kind;
pub mod gateway;
pub mod token;

use std::sync::{PoisonError, RwLock};

use interface::Identity;

pub use error_kind::AuthErrorKind;
pub use gateway::{AuthGateway, LoginFailure, LoginFlow, ProviderError};
pub use token::{issue_token, ttl_from_hours, verify_token, TokenError};

/// Source of "who is calling". Owner-scoped ledger operations read the uid from here.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<Identity>;
}

/// No one is signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<Identity> {
        None
    }
}

/// A fixed identity, e.g. from a verified bearer token or the CLI `--user` flag.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Identity);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<Identity> {
        Some(self.0.clone())
    }
}

/// Signed-in user for an interactive session. Bound by [`LoginFlow`].
#[derive(Debug, Default)]
pub struct SessionIdentity {
    current: RwLock<Option<Identity>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, identity: Identity) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);
    }

    pub fn sign_out(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Either a fixed identity or nobody.
pub fn identity_provider(identity: Option<Identity>) -> std::sync::Arc<dyn IdentityProvider> {
    match identity {
        Some(identity) => std::sync::Arc::new(StaticIdentity(identity)),
        None => std::sync::Arc::new(Anonymous),
    }
}
