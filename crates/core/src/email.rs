//! Normalized email address.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// An email address, trimmed and lowercased.
///
/// Only a basic shape check is performed (`local@domain`, no whitespace); the
/// identity provider stays the authority on whether an address is usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::invalid_email("empty"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_email("contains whitespace"));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(ValidationError::invalid_email("missing '@'"));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ValidationError::invalid_email(format!(
                "malformed address '{normalized}'"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = Email::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(email, Email::parse("alice@example.com").unwrap());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "   ", "alice", "@example.com", "alice@", "a@b@c", "al ice@example.com"] {
            assert!(Email::parse(raw).is_err(), "expected '{raw}' to be rejected");
        }
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: Email = serde_json::from_str("\"Bob@Example.com\"").unwrap();
        assert_eq!(ok.as_str(), "bob@example.com");

        let bad = serde_json::from_str::<Email>("\"nobody\"");
        assert!(bad.is_err());
    }
}
