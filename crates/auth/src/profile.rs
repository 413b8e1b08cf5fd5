//! Application-level profile documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use jobhub_core::{PrincipalId, ValidationError, ValidationResult};

use crate::Role;

/// Wire names of the fields a profile document owns. Domain fields may not
/// reuse them: flattened keys would overwrite the real values on write.
pub const RESERVED_FIELDS: [&str; 4] = ["ownerId", "role", "displayName", "createdAt"];

fn check_field_name(name: &str) -> ValidationResult<()> {
    if RESERVED_FIELDS.contains(&name) {
        return Err(ValidationError::reserved_field(name));
    }
    Ok(())
}

/// The application's own record for a principal (role + domain data).
///
/// Keyed by `owner_id`, which equals the owning `Principal::id`. Domain
/// fields (skills, company name, location, ...) are kept as an open JSON object
/// and flattened into the document on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub owner_id: PrincipalId,
    pub role: Role,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    // Only unclaimed keys land here on read; writes go through `ProfileFields`.
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Profile {
    pub fn from_fields(owner_id: PrincipalId, fields: ProfileFields, created_at: DateTime<Utc>) -> Self {
        Self {
            owner_id,
            role: fields.role,
            display_name: fields.display_name,
            created_at,
            fields: fields.fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Writable part of a profile, as submitted during registration.
///
/// Domain fields never use a reserved name (`RESERVED_FIELDS`); both
/// `with_field` and deserialization reject them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SubmittedFields")]
pub struct ProfileFields {
    pub role: Role,
    pub display_name: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ProfileFields {
    pub fn new(role: Role, display_name: impl Into<String>) -> Self {
        Self {
            role,
            display_name: display_name.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> ValidationResult<Self> {
        let name = name.into();
        check_field_name(&name)?;
        self.fields.insert(name, value.into());
        Ok(self)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Unchecked wire shape of `ProfileFields`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmittedFields {
    role: Role,
    display_name: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<SubmittedFields> for ProfileFields {
    type Error = ValidationError;

    fn try_from(raw: SubmittedFields) -> Result<Self, Self::Error> {
        raw.fields
            .into_iter()
            .try_fold(ProfileFields::new(raw.role, raw.display_name), |acc, (name, value)| {
                acc.with_field(name, value)
            })
    }
}
