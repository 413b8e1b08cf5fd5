use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use jobhub_auth::{AuthError, Principal};
use jobhub_core::{Email, PrincipalId};

use super::{IdentityProvider, PrincipalFeed, PrincipalSubscription};

/// Shortest secret accepted by `sign_up`.
pub const MIN_SECRET_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    id: PrincipalId,
    secret: String,
    email_verified: bool,
}

/// In-memory identity provider.
///
/// Intended for tests/dev. Secrets are kept in memory as given.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<Email, Account>>,
    feed: PrincipalFeed,
    unavailable: AtomicBool,
}

impl InMemoryIdentityProvider {
    /// Provider with nobody signed in.
    pub fn new() -> Self {
        Self::with_feed(PrincipalFeed::restored(None))
    }

    /// Provider that has not yet restored a persisted sign-in; call
    /// `restore` to deliver the first principal value.
    pub fn pending() -> Self {
        Self::with_feed(PrincipalFeed::pending())
    }

    fn with_feed(feed: PrincipalFeed) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            feed,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Complete the initial handshake of a `pending` provider.
    pub fn restore(&self, principal: Option<Principal>) {
        self.feed.publish(principal);
    }

    /// Make every subsequent call fail with `ProviderUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Register an account without signing it in.
    pub fn add_account(&self, email: &Email, secret: &str) -> Result<Principal, AuthError> {
        let account = self.create_account(email, secret)?;
        Ok(Principal::new(account.id, email.clone(), account.email_verified))
    }

    pub fn current(&self) -> Option<Principal> {
        self.feed.current()
    }

    fn ensure_available(&self) -> Result<(), AuthError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::provider_unavailable("identity service unreachable"));
        }
        Ok(())
    }

    fn create_account(&self, email: &Email, secret: &str) -> Result<Account, AuthError> {
        if secret.chars().count() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret);
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| AuthError::provider_unavailable("account registry poisoned"))?;
        if accounts.contains_key(email) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let account = Account {
            id: PrincipalId::new(),
            secret: secret.to_string(),
            email_verified: false,
        };
        accounts.insert(email.clone(), account.clone());
        Ok(account)
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &Email, secret: &str) -> Result<Principal, AuthError> {
        self.ensure_available()?;

        let account = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| AuthError::provider_unavailable("account registry poisoned"))?;
            accounts.get(email).cloned()
        };

        // Unknown email and wrong secret are indistinguishable to the caller.
        let account = match account {
            Some(account) if account.secret == secret => account,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let principal = Principal::new(account.id, email.clone(), account.email_verified);
        self.feed.publish(Some(principal.clone()));
        Ok(principal)
    }

    async fn sign_up(&self, email: &Email, secret: &str) -> Result<Principal, AuthError> {
        self.ensure_available()?;

        let account = self.create_account(email, secret)?;
        let principal = Principal::new(account.id, email.clone(), account.email_verified);
        self.feed.publish(Some(principal.clone()));
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.ensure_available()?;
        self.feed.publish(None);
        Ok(())
    }

    fn principal_changes(&self) -> PrincipalSubscription {
        self.feed.subscribe()
    }
}
