//! Profile resolver: principal id → profile document, for gating purposes.

use std::sync::Arc;

use jobhub_auth::{AuthError, Profile, ProfileFields};
use jobhub_core::PrincipalId;

use crate::profile_store::ProfileStore;

/// Thin adapter over a `ProfileStore` that speaks the session layer's
/// language: lookups never fail (a read failure is logged and treated as
/// "no profile"), explicit reads and writes report `AuthError`s.
#[derive(Clone)]
pub struct ProfileResolver {
    store: Arc<dyn ProfileStore>,
}

impl ProfileResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Lookup used by session reconciliation.
    pub async fn resolve(&self, owner_id: PrincipalId) -> Option<Profile> {
        match self.fetch(owner_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(%owner_id, error = %e, "profile lookup failed; treating as not found");
                None
            }
        }
    }

    pub async fn fetch(&self, owner_id: PrincipalId) -> Result<Option<Profile>, AuthError> {
        self.store
            .get_profile(owner_id)
            .await
            .map_err(|e| AuthError::ProfileReadFailed(e.to_string()))
    }

    pub async fn write(
        &self,
        owner_id: PrincipalId,
        fields: ProfileFields,
    ) -> Result<Profile, AuthError> {
        self.store
            .set_profile(owner_id, fields)
            .await
            .map_err(|e| AuthError::ProfileWriteFailed(e.to_string()))
    }
}

impl core::fmt::Debug for ProfileResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProfileResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile_store::InMemoryProfileStore;
    use jobhub_auth::Role;

    #[tokio::test]
    async fn read_failure_resolves_to_none_but_fetch_reports_it() {
        let store = Arc::new(InMemoryProfileStore::new());
        let resolver = ProfileResolver::new(store.clone());
        let owner = PrincipalId::new();
        resolver
            .write(owner, ProfileFields::new(Role::Employer, "Acme"))
            .await
            .unwrap();

        store.set_fail_reads(true);
        assert_eq!(resolver.resolve(owner).await, None);
        assert!(matches!(
            resolver.fetch(owner).await,
            Err(AuthError::ProfileReadFailed(_))
        ));

        store.set_fail_reads(false);
        assert_eq!(resolver.resolve(owner).await.map(|p| p.role), Some(Role::Employer));
    }

    #[tokio::test]
    async fn write_failure_maps_to_profile_write_failed() {
        let store = Arc::new(InMemoryProfileStore::new());
        store.set_fail_writes(true);
        let resolver = ProfileResolver::new(store);

        let result = resolver
            .write(PrincipalId::new(), ProfileFields::new(Role::Worker, "Ann"))
            .await;
        assert!(matches!(result, Err(AuthError::ProfileWriteFailed(_))));
    }
}
