use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use tokio::sync::watch;

use jobhub_auth::{Profile, ProfileFields};
use jobhub_core::PrincipalId;

use super::{ProfileStore, StoreError};

/// In-memory profile collection.
///
/// Intended for tests/dev. Documents are stored as JSON values so malformed
/// documents can be injected, and failures/latency can be simulated:
/// - `set_fail_reads` / `set_fail_writes` make calls fail with `Unavailable`;
/// - `hold_lookups` parks every `get_profile` until `release_lookups`;
/// - `hold_writes` parks every `set_profile` until `release_writes`.
#[derive(Debug)]
pub struct InMemoryProfileStore {
    documents: RwLock<HashMap<PrincipalId, JsonValue>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    lookups_open: watch::Sender<bool>,
    writes_open: watch::Sender<bool>,
    lookups: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        let (lookups_open, _) = watch::channel(true);
        let (writes_open, _) = watch::channel(true);
        Self {
            documents: RwLock::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            lookups_open,
            writes_open,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn hold_lookups(&self) {
        self.lookups_open.send_replace(false);
    }

    pub fn release_lookups(&self) {
        self.lookups_open.send_replace(true);
    }

    pub fn hold_writes(&self) {
        self.writes_open.send_replace(false);
    }

    pub fn release_writes(&self) {
        self.writes_open.send_replace(true);
    }

    /// Number of `get_profile` calls started so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Store a raw document, bypassing validation.
    pub fn insert_raw(&self, owner_id: PrincipalId, document: JsonValue) -> Result<(), StoreError> {
        let mut docs = self.documents.write().map_err(|_| StoreError::Poisoned)?;
        docs.insert(owner_id, document);
        Ok(())
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, owner_id: PrincipalId) -> Result<Option<Profile>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let mut open = self.lookups_open.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = open.wait_for(|open| *open).await;

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read rejected".to_string()));
        }

        let document = {
            let docs = self.documents.read().map_err(|_| StoreError::Poisoned)?;
            docs.get(&owner_id).cloned()
        };

        let Some(doc) = document else {
            return Ok(None);
        };
        let profile: Profile =
            serde_json::from_value(doc).map_err(|e| StoreError::Malformed(e.to_string()))?;
        if profile.owner_id != owner_id {
            return Err(StoreError::Malformed(format!(
                "document under {owner_id} belongs to {}",
                profile.owner_id
            )));
        }
        Ok(Some(profile))
    }

    async fn set_profile(
        &self,
        owner_id: PrincipalId,
        fields: ProfileFields,
    ) -> Result<Profile, StoreError> {
        let mut open = self.writes_open.subscribe();
        let _ = open.wait_for(|open| *open).await;

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write rejected".to_string()));
        }

        let mut docs = self.documents.write().map_err(|_| StoreError::Poisoned)?;

        let created_at = docs
            .get(&owner_id)
            .and_then(|doc| serde_json::from_value::<Profile>(doc.clone()).ok())
            .map(|existing| existing.created_at)
            .unwrap_or_else(Utc::now);

        let profile = Profile::from_fields(owner_id, fields, created_at);
        let document =
            serde_json::to_value(&profile).map_err(|e| StoreError::Malformed(e.to_string()))?;
        docs.insert(owner_id, document);

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobhub_auth::Role;
    use serde_json::json;

    #[tokio::test]
    async fn missing_document_is_not_an_error() {
        let store = InMemoryProfileStore::new();
        assert_eq!(store.get_profile(PrincipalId::new()).await, Ok(None));
    }

    #[tokio::test]
    async fn overwrite_keeps_created_at() {
        let store = InMemoryProfileStore::new();
        let owner = PrincipalId::new();

        let first = store
            .set_profile(owner, ProfileFields::new(Role::Worker, "Ann"))
            .await
            .unwrap();
        let second = store
            .set_profile(owner, ProfileFields::new(Role::Worker, "Ann B.").with_field("city", "Oslo").unwrap())
            .await
            .unwrap();

        assert_eq!(second.created_at, first.created_at);
        let loaded = store.get_profile(owner).await.unwrap().unwrap();
        assert_eq!(loaded.display_name, "Ann B.");
        assert_eq!(loaded.field("city"), Some(&json!("Oslo")));
    }

    #[tokio::test]
    async fn domain_fields_cannot_overwrite_role_or_owner() {
        let store = InMemoryProfileStore::new();
        let owner = PrincipalId::new();

        for reserved in ["role", "ownerId"] {
            assert!(ProfileFields::new(Role::Worker, "Wade").with_field(reserved, "admin").is_err());
        }

        let fields = ProfileFields::new(Role::Worker, "Wade")
            .with_field("skills", json!(["welding"]))
            .unwrap();
        store.set_profile(owner, fields).await.unwrap();

        let stored = store.documents.read().unwrap().get(&owner).cloned().unwrap();
        assert_eq!(stored["role"], json!("worker"));
        assert_eq!(stored["ownerId"], json!(owner.to_string()));

        let loaded = store.get_profile(owner).await.unwrap().unwrap();
        assert_eq!(loaded.role, Role::Worker);
        assert_eq!(loaded.owner_id, owner);
    }

    #[tokio::test]
    async fn document_for_another_owner_is_malformed() {
        let store = InMemoryProfileStore::new();
        let owner = PrincipalId::new();
        let other = PrincipalId::new();
        let doc = serde_json::to_value(Profile::from_fields(
            other,
            ProfileFields::new(Role::Admin, "Root"),
            Utc::now(),
        ))
        .unwrap();
        store.insert_raw(owner, doc).unwrap();

        assert!(matches!(store.get_profile(owner).await, Err(StoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn malformed_document_is_reported() {
        let store = InMemoryProfileStore::new();
        let owner = PrincipalId::new();
        store.insert_raw(owner, json!({ "role": "captain" })).unwrap();

        assert!(matches!(store.get_profile(owner).await, Err(StoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = InMemoryProfileStore::new();
        store.set_fail_writes(true);
        assert!(store
            .set_profile(PrincipalId::new(), ProfileFields::new(Role::Admin, "Root"))
            .await
            .is_err());

        store.set_fail_reads(true);
        assert!(matches!(
            store.get_profile(PrincipalId::new()).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn held_lookups_wait_for_release() {
        let store = std::sync::Arc::new(InMemoryProfileStore::new());
        store.hold_lookups();

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.get_profile(PrincipalId::new()).await }
        });
        tokio::task::yield_now().await;
        assert_eq!(store.lookups(), 1);
        assert!(!pending.is_finished());

        store.release_lookups();
        assert_eq!(pending.await.unwrap(), Ok(None));
    }

    #[tokio::test]
    async fn held_writes_land_on_release() {
        let store = std::sync::Arc::new(InMemoryProfileStore::new());
        let owner = PrincipalId::new();
        store.hold_writes();

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.set_profile(owner, ProfileFields::new(Role::Worker, "Wade")).await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert_eq!(store.get_profile(owner).await, Ok(None));

        store.release_writes();
        pending.await.unwrap().unwrap();
        assert_eq!(store.get_profile(owner).await.unwrap().map(|p| p.role), Some(Role::Worker));
    }
}
