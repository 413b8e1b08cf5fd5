//! Errors surfaced by session operations (`login`, `register`, `logout`).

use thiserror::Error;

use jobhub_core::ValidationError;

/// Identity and profile failures, reported to the caller for inline display.
///
/// Authorization redirects are not errors and never appear here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    EmailAlreadyInUse,

    #[error("password is too weak")]
    WeakSecret,

    #[error(transparent)]
    InvalidEmail(#[from] ValidationError),

    /// Network or identity-service failure.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The identity was created but its profile document could not be written.
    /// The session stays authenticated without a profile.
    #[error("profile could not be saved: {0}")]
    ProfileWriteFailed(String),

    /// Gating treats this like a missing profile; it only surfaces from
    /// explicit profile reads.
    #[error("profile could not be loaded: {0}")]
    ProfileReadFailed(String),
}

impl AuthError {
    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }
}
