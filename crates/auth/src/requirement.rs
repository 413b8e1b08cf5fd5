use serde::{Deserialize, Serialize};

use crate::Role;

/// Authorization requirement attached to a protected route.
///
/// `required_role: None` admits any authenticated principal.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteRequirement {
    pub required_role: Option<Role>,
}

impl RouteRequirement {
    pub fn authenticated() -> Self {
        Self { required_role: None }
    }

    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }
}

/// How a route is reachable: public, or behind the gate with a requirement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

impl Access {
    /// `None` for public routes: the gate is not involved at all.
    pub fn requirement(&self) -> Option<RouteRequirement> {
        match self {
            Access::Public => None,
            Access::Authenticated => Some(RouteRequirement::authenticated()),
            Access::Role(role) => Some(RouteRequirement::role(*role)),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Access::Public)
    }
}
