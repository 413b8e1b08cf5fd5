use serde::{Deserialize, Serialize};

use jobhub_core::{Email, PrincipalId};

/// The identity provider's record of a signed-in actor.
///
/// Issued once per sign-in and never mutated; a new sign-in replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: Email,
    pub email_verified: bool,
}

impl Principal {
    pub fn new(id: PrincipalId, email: Email, email_verified: bool) -> Self {
        Self {
            id,
            email,
            email_verified,
        }
    }
}
