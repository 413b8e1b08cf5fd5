//! `jobhub-auth`: pure session model and route authorization gate.
//!
//! This crate has no dependency on the identity provider, the
//! document store or any rendering layer.

pub mod error;
pub mod gate;
pub mod principal;
pub mod profile;
pub mod requirement;
pub mod roles;
pub mod session;

pub use error::AuthError;
pub use gate::{decide, explain, GateDecision, GateExplanation, GateReason, RedirectTarget};
pub use principal::Principal;
pub use profile::{Profile, ProfileFields, RESERVED_FIELDS};
pub use requirement::{Access, RouteRequirement};
pub use roles::Role;
pub use session::SessionState;
