//! Route authorization gate.
//!
//! - No IO
//! - No internal state
//! - One decision table, evaluated in order; first match wins
//!
//! The same gate serves every protected route: callers pass the current
//! `SessionState` and the route's `RouteRequirement` on each render.

use serde::Serialize;

use crate::{Role, RouteRequirement, SessionState};

/// Where a denied viewer is sent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// Nobody is signed in.
    Login,
    /// Signed in, but not authorized for this route.
    Fallback,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum GateDecision {
    /// Session still loading: show the neutral waiting indicator.
    Wait,
    Redirect(RedirectTarget),
    Render,
}

impl GateDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GateDecision::Render)
    }

    pub fn redirect_target(&self) -> Option<RedirectTarget> {
        match self {
            GateDecision::Redirect(target) => Some(*target),
            _ => None,
        }
    }
}

/// Decide whether protected content may be rendered.
pub fn decide(state: &SessionState, requirement: &RouteRequirement) -> GateDecision {
    explain(state, requirement).decision
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision Explanation (diagnostics)
// ─────────────────────────────────────────────────────────────────────────────

/// Which row of the decision table matched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    SessionLoading,
    NoPrincipal,
    MissingProfile,
    RoleMismatch,
    Authorized,
}

/// A gate decision together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateExplanation {
    pub decision: GateDecision,
    pub reason: GateReason,
    pub required_role: Option<Role>,
    /// Role of the viewer's profile, when one is loaded.
    pub viewer_role: Option<Role>,
}

impl GateExplanation {
    pub fn message(&self) -> String {
        match self.reason {
            GateReason::SessionLoading => "session is still loading".to_string(),
            GateReason::NoPrincipal => "no principal is signed in".to_string(),
            GateReason::MissingProfile => match self.required_role {
                Some(role) => format!("route requires role '{role}' but the viewer has no profile"),
                None => "viewer has no profile".to_string(),
            },
            GateReason::RoleMismatch => format!(
                "route requires role '{}' but the viewer is '{}'",
                self.required_role.map(|r| r.as_str()).unwrap_or("-"),
                self.viewer_role.map(|r| r.as_str()).unwrap_or("-"),
            ),
            GateReason::Authorized => "authorized".to_string(),
        }
    }
}

/// Evaluate the decision table and report which row matched.
pub fn explain(state: &SessionState, requirement: &RouteRequirement) -> GateExplanation {
    let viewer_role = state.role();
    let required_role = requirement.required_role;

    let (decision, reason) = if state.loading() {
        (GateDecision::Wait, GateReason::SessionLoading)
    } else if state.principal().is_none() {
        (GateDecision::Redirect(RedirectTarget::Login), GateReason::NoPrincipal)
    } else {
        match (required_role, viewer_role) {
            (Some(_), None) => (
                GateDecision::Redirect(RedirectTarget::Fallback),
                GateReason::MissingProfile,
            ),
            (Some(required), Some(actual)) if required != actual => (
                GateDecision::Redirect(RedirectTarget::Fallback),
                GateReason::RoleMismatch,
            ),
            _ => (GateDecision::Render, GateReason::Authorized),
        }
    };

    GateExplanation {
        decision,
        reason,
        required_role,
        viewer_role,
    }
}
