//! Profile document store boundary.
//!
//! Profiles live in a keyed collection of JSON documents (one per principal).
//! The trait is the only surface the session layer sees; which database backs
//! it is an infrastructure decision.

pub mod in_memory;

use async_trait::async_trait;
use thiserror::Error;

use jobhub_auth::{Profile, ProfileFields};
use jobhub_core::PrincipalId;

pub use in_memory::InMemoryProfileStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed profile document: {0}")]
    Malformed(String),

    #[error("document store lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when no document exists for `owner_id`.
    async fn get_profile(&self, owner_id: PrincipalId) -> Result<Option<Profile>, StoreError>;

    /// Create or overwrite the document for `owner_id`.
    ///
    /// Overwrites keep the original `created_at`.
    async fn set_profile(
        &self,
        owner_id: PrincipalId,
        fields: ProfileFields,
    ) -> Result<Profile, StoreError>;
}
