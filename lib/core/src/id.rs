//! Strongly-typed ID types for domain entities.
//!
//! User identifiers are issued by whichever credential verifier
//! authenticated the principal, so they are opaque strings rather than
//! generated values. They must be non-empty and free of surrounding
//! whitespace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Unique identifier for a user, as issued by the credential verifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID, validating that it is non-empty and trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or has surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ParseIdError {
                id_type: "UserId",
                reason: "value is empty".to_string(),
            });
        }
        if id.trim() != id {
            return Err(ParseIdError {
                id_type: "UserId",
                reason: format!("value '{id}' has surrounding whitespace"),
            });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display_is_raw_value() {
        let id = UserId::new("42").expect("valid id");
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn parse_valid_id() {
        let id: UserId = "usr-7".parse().expect("should parse");
        assert_eq!(id.as_str(), "usr-7");
    }

    #[test]
    fn parse_empty_id_fails() {
        let err = "".parse::<UserId>().unwrap_err();
        assert_eq!(err.id_type, "UserId");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn parse_padded_id_fails() {
        let err = " 1 ".parse::<UserId>().unwrap_err();
        assert!(err.reason.contains("whitespace"));
    }

    #[test]
    fn id_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(UserId::new("1").expect("valid"));
        set.insert(UserId::new("2").expect("valid"));
        set.insert(UserId::new("1").expect("valid")); // duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = UserId::new("3").expect("valid");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"3\"");
        let parsed: UserId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, parsed);
    }

    #[test]
    fn empty_id_is_rejected_on_deserialize() {
        let result: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
