//! The reconciled "current viewer" state.

use serde::Serialize;

use crate::{Principal, Profile, Role};

/// Single source of truth for who is viewing the application.
///
/// Invariants (upheld by the constructors, the only way to build one):
/// - `profile` is only ever present alongside a `principal`;
/// - `loading` stays `true` until the first identity event arrived and, when a
///   principal exists, its profile lookup finished (found, not-found or error).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    principal: Option<Principal>,
    profile: Option<Profile>,
    loading: bool,
}

impl SessionState {
    /// Before the identity subscription delivered anything.
    pub fn initial() -> Self {
        Self {
            principal: None,
            profile: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            principal: None,
            profile: None,
            loading: false,
        }
    }

    /// A principal is known; its profile lookup is in flight.
    pub fn resolving(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            profile: None,
            loading: true,
        }
    }

    /// A principal and the outcome of its profile lookup.
    pub fn resolved(principal: Principal, profile: Option<Profile>) -> Self {
        Self {
            principal: Some(principal),
            profile,
            loading: false,
        }
    }

    /// Same viewer, profile being re-fetched. The previous profile is kept
    /// for display but the gate treats the state as loading.
    pub fn refreshing(&self) -> Self {
        Self {
            principal: self.principal.clone(),
            profile: self.profile.clone(),
            loading: self.principal.is_some() || self.loading,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn is_settled(&self) -> bool {
        !self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileFields;
    use chrono::Utc;
    use jobhub_core::{Email, PrincipalId};

    fn principal() -> Principal {
        Principal::new(PrincipalId::new(), Email::parse("ann@example.com").unwrap(), true)
    }

    #[test]
    fn signed_out_is_settled_and_empty() {
        let state = SessionState::signed_out();
        assert!(state.is_settled());
        assert!(!state.is_authenticated());
        assert!(state.profile().is_none());
        assert_eq!(state.role(), None);
    }

    #[test]
    fn refreshing_keeps_viewer_and_reenters_loading() {
        let p = principal();
        let profile = Profile::from_fields(p.id, ProfileFields::new(Role::Worker, "Ann"), Utc::now());
        let state = SessionState::resolved(p.clone(), Some(profile));

        let refreshing = state.refreshing();
        assert!(refreshing.loading());
        assert_eq!(refreshing.principal(), Some(&p));
        assert_eq!(refreshing.role(), Some(Role::Worker));
    }

    #[test]
    fn refreshing_a_signed_out_state_is_a_no_op() {
        assert_eq!(SessionState::signed_out().refreshing(), SessionState::signed_out());
    }
}
