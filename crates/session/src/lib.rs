//! `jobhub-session`: the single owner of the "current viewer" state.
//!
//! `SessionManager` composes the identity subscription and the profile
//! resolver into one observable `SessionState` and mediates login,
//! registration and logout.

mod cancel;
pub mod manager;
mod store;
pub mod subscription;

pub use cancel::CancelToken;
pub use manager::SessionManager;
pub use store::Generation;
pub use subscription::{SessionStream, SessionSubscriptionHandle};
