//! Infrastructure layer: identity provider and profile document store adapters.
//!
//! The session layer only sees the traits defined here. The in-memory
//! implementations back tests and the demo binary.

pub mod identity;
pub mod profile_store;
pub mod resolver;

pub use identity::{IdentityProvider, InMemoryIdentityProvider, PrincipalFeed, PrincipalSubscription};
pub use profile_store::{InMemoryProfileStore, ProfileStore, StoreError};
pub use resolver::ProfileResolver;
