//! Identity boundary.
//!
//! Authentication itself belongs to an external provider; core only reads
//! its authenticated/unauthenticated signal and gates front-end calls on it.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

/// Source of the external authenticated signal.
pub trait IdentityProvider {
    fn is_authenticated(&self) -> bool;
}

/// Host-controlled session flag, flipped after provider login/logout.
#[derive(Debug, Default)]
pub struct SessionFlag {
    authenticated: AtomicBool,
}

impl SessionFlag {
    pub const fn new(authenticated: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
        }
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }
}

impl IdentityProvider for SessionFlag {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

/// Fixed signal, e.g. a local single-user terminal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticIdentity(pub bool);

impl IdentityProvider for StaticIdentity {
    fn is_authenticated(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    NotAuthenticated,
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
        }
    }
}

impl Error for AccessError {}

/// Rejects the call unless `provider` reports an authenticated session.
pub fn require_authenticated(provider: &(impl IdentityProvider + ?Sized)) -> Result<(), AccessError> {
    if provider.is_authenticated() {
        Ok(())
    } else {
        Err(AccessError::NotAuthenticated)
    }
}
