//! Identity provider boundary.
//!
//! The provider owns the "currently signed-in principal". Consumers observe it
//! through a `PrincipalSubscription`, which yields the current principal once
//! the provider has restored any persisted sign-in, then one value per change.

pub mod in_memory;

use async_trait::async_trait;
use tokio::sync::watch;

use jobhub_auth::{AuthError, Principal};
use jobhub_core::Email;

pub use in_memory::InMemoryIdentityProvider;

/// External identity service (hosted auth, OAuth broker, test double).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &Email, secret: &str) -> Result<Principal, AuthError>;

    /// Creates the identity and signs it in.
    async fn sign_up(&self, email: &Email, secret: &str) -> Result<Principal, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn principal_changes(&self) -> PrincipalSubscription;
}

#[derive(Debug, Clone, PartialEq)]
struct IdentitySnapshot {
    /// False until the provider knows whether someone is signed in.
    restored: bool,
    principal: Option<Principal>,
}

/// Sending side of the principal stream, owned by a provider implementation.
#[derive(Debug)]
pub struct PrincipalFeed {
    tx: watch::Sender<IdentitySnapshot>,
}

impl PrincipalFeed {
    /// Feed whose current principal is known right away.
    pub fn restored(principal: Option<Principal>) -> Self {
        let (tx, _) = watch::channel(IdentitySnapshot {
            restored: true,
            principal,
        });
        Self { tx }
    }

    /// Feed that has not yet determined the current principal. Subscribers
    /// receive nothing until the first `publish`.
    pub fn pending() -> Self {
        let (tx, _) = watch::channel(IdentitySnapshot {
            restored: false,
            principal: None,
        });
        Self { tx }
    }

    /// Record the current principal. Re-publishing an unchanged principal on
    /// a restored feed does not wake subscribers.
    pub fn publish(&self, principal: Option<Principal>) {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.restored && snapshot.principal == principal {
                return false;
            }
            snapshot.restored = true;
            snapshot.principal = principal;
            true
        });
    }

    pub fn current(&self) -> Option<Principal> {
        self.tx.borrow().principal.clone()
    }

    pub fn subscribe(&self) -> PrincipalSubscription {
        PrincipalSubscription {
            receiver: self.tx.subscribe(),
            started: false,
        }
    }
}

/// Receiving side of the principal stream.
///
/// Intermediate values may be coalesced when several changes happen before
/// the consumer polls again; the latest principal is never skipped.
#[derive(Debug)]
pub struct PrincipalSubscription {
    receiver: watch::Receiver<IdentitySnapshot>,
    started: bool,
}

impl PrincipalSubscription {
    /// Wait for the next principal value.
    ///
    /// Returns `None` once the provider has been dropped. Cancel safe.
    pub async fn next(&mut self) -> Option<Option<Principal>> {
        if !self.started {
            let principal = self
                .receiver
                .wait_for(|snapshot| snapshot.restored)
                .await
                .ok()?
                .principal
                .clone();
            self.started = true;
            return Some(principal);
        }

        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().principal.clone())
    }
}
