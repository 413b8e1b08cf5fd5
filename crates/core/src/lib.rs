//! `jobhub-core`: shared building blocks (no infrastructure concerns).
//!
//! Identifiers, validated values and the validation error model used by every
//! other crate in the workspace.

pub mod email;
pub mod error;
pub mod id;

pub use email::Email;
pub use error::{ValidationError, ValidationResult};
pub use id::PrincipalId;
