//! Session manager: reconciles the identity stream with profile lookups and
//! owns every identity mutation.
//!
//! ## Reconciliation
//!
//! Each identity event bumps the store's generation. A signed-out event is
//! published right away; a signed-in event publishes a loading state and
//! spawns a profile lookup tagged with that generation. Lookups may overlap:
//! when one completes, its result is published only if no newer principal
//! change happened in the meantime. No timeout is applied: a lookup that
//! never completes keeps the session loading.

use std::sync::Arc;

use jobhub_auth::{AuthError, Principal, ProfileFields, SessionState};
use jobhub_core::Email;
use jobhub_infra::{IdentityProvider, PrincipalSubscription, ProfileResolver};

use crate::cancel::CancelToken;
use crate::store::{Generation, SessionStore, Transition};
use crate::subscription::{spawn_callback, SessionStream, SessionSubscriptionHandle};

#[derive(Clone)]
struct Reconciler {
    store: Arc<SessionStore>,
    resolver: ProfileResolver,
    shutdown: CancelToken,
}

impl Reconciler {
    async fn run(self, mut changes: PrincipalSubscription) {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                next = changes.next() => next,
            };

            match next {
                Some(principal) => self.on_principal(principal),
                None => {
                    tracing::warn!("identity subscription closed; session state frozen");
                    break;
                }
            }
        }
        tracing::debug!("session reconciliation stopped");
    }

    fn on_principal(&self, principal: Option<Principal>) {
        match self.store.begin(principal) {
            Transition::SignedOut => tracing::debug!("no principal; session signed out"),
            Transition::Lookup {
                generation,
                principal,
            } => self.spawn_lookup(generation, principal),
        }
    }

    fn spawn_lookup(&self, generation: Generation, principal: Principal) {
        tracing::debug!(principal_id = %principal.id, %generation, "resolving profile");

        let this = self.clone();
        tokio::spawn(async move {
            let profile = tokio::select! {
                biased;
                _ = this.shutdown.cancelled() => return,
                profile = this.resolver.resolve(principal.id) => profile,
            };

            let found = profile.is_some();
            if this.store.complete(generation, profile) {
                tracing::debug!(principal_id = %principal.id, %generation, found, "profile resolved");
            } else {
                tracing::debug!(principal_id = %principal.id, %generation, "discarding stale profile lookup");
            }
        });
    }

    fn refresh(&self) -> bool {
        match self.store.begin_refresh() {
            Some((generation, principal)) => {
                self.spawn_lookup(generation, principal);
                true
            }
            None => false,
        }
    }
}

struct Shared {
    identity: Arc<dyn IdentityProvider>,
    reconciler: Reconciler,
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.reconciler.shutdown.cancel();
        self.reconciler.store.close();
    }
}

/// Process-wide owner of the session state.
///
/// Cheap to clone; all clones share one state. Must be started inside a
/// tokio runtime. Shut down explicitly with `shutdown`, or implicitly when the
/// last clone is dropped.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
}

impl SessionManager {
    /// Subscribe to the identity provider and start reconciling.
    pub fn start(identity: Arc<dyn IdentityProvider>, resolver: ProfileResolver) -> Self {
        let reconciler = Reconciler {
            store: Arc::new(SessionStore::new()),
            resolver,
            shutdown: CancelToken::new(),
        };

        let changes = identity.principal_changes();
        tokio::spawn(reconciler.clone().run(changes));

        Self {
            shared: Arc::new(Shared {
                identity,
                reconciler,
            }),
        }
    }

    fn store(&self) -> &Arc<SessionStore> {
        &self.shared.reconciler.store
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.store().snapshot()
    }

    /// Invoke `callback` with the current state now and with every later
    /// state, in publication order and without duplicates.
    pub fn subscribe<F>(&self, callback: F) -> SessionSubscriptionHandle
    where
        F: FnMut(&SessionState) + Send + 'static,
    {
        spawn_callback(self.store().clone(), callback)
    }

    /// Stream form of `subscribe`.
    pub fn watch(&self) -> SessionStream {
        SessionStream::new(self.store().clone())
    }

    /// Wait for the first state that is not loading.
    pub async fn settled(&self) -> SessionState {
        let mut stream = self.watch();
        while let Some(state) = stream.recv().await {
            if state.is_settled() {
                return state;
            }
        }
        self.state()
    }

    /// Sign in with the identity provider.
    ///
    /// The session state follows through the identity subscription; the
    /// returned principal only signals that the provider accepted the
    /// credentials.
    pub async fn login(&self, email: &str, secret: &str) -> Result<Principal, AuthError> {
        let email = Email::parse(email)?;

        match self.shared.identity.sign_in(&email, secret).await {
            Ok(principal) => {
                tracing::info!(principal_id = %principal.id, "signed in");
                Ok(principal)
            }
            Err(e) => {
                tracing::info!(error = %e, "sign-in rejected");
                Err(e)
            }
        }
    }

    /// Create an identity, then its profile document.
    ///
    /// The role comes from `fields.role`. If the profile write fails the
    /// identity is kept: the session ends up authenticated without a profile
    /// and `ProfileWriteFailed` is returned.
    pub async fn register(
        &self,
        email: &str,
        secret: &str,
        fields: ProfileFields,
    ) -> Result<Principal, AuthError> {
        let email = Email::parse(email)?;
        let role = fields.role;

        let principal = self.shared.identity.sign_up(&email, secret).await.map_err(|e| {
            tracing::info!(error = %e, "sign-up rejected");
            e
        })?;
        tracing::info!(principal_id = %principal.id, %role, "identity created");

        if let Err(e) = self.shared.reconciler.resolver.write(principal.id, fields).await {
            tracing::warn!(principal_id = %principal.id, error = %e, "profile write failed after sign-up");
            return Err(e);
        }

        // A lookup issued before the write may already have seen "not found".
        if self.state().principal().map(|p| p.id) == Some(principal.id) {
            self.shared.reconciler.refresh();
        }

        Ok(principal)
    }

    /// Sign out. The state is signed out by the time this returns `Ok`.
    ///
    /// On provider failure the error is returned and the state is untouched,
    /// since the provider still holds the sign-in.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.shared.identity.sign_out().await.map_err(|e| {
            tracing::warn!(error = %e, "sign-out failed");
            e
        })?;

        self.shared.reconciler.on_principal(None);
        tracing::info!("signed out");
        Ok(())
    }

    /// Re-fetch the current principal's profile (e.g. after it was edited).
    ///
    /// Returns `false` when nobody is signed in.
    pub fn refresh_profile(&self) -> bool {
        self.shared.reconciler.refresh()
    }

    /// Stop reconciling and release the identity subscription. Open streams
    /// end; callbacks stop being invoked.
    pub fn shutdown(&self) {
        self.shared.reconciler.shutdown.cancel();
        self.store().close();
    }
}

impl core::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
