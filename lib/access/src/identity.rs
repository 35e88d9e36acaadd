//! Identity of an authenticated principal.
//!
//! An identity carries only the public attributes of a principal. It is
//! immutable once issued and never contains the credential secret.

use scorecard_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The non-secret attributes of an authenticated principal.
///
/// Serialized as `{id, username, email, role}`, which is also the layout of
/// the persisted identity record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Identifier issued by the credential verifier.
    id: UserId,
    /// Login name.
    username: String,
    /// Contact address.
    email: String,
    /// Access role.
    role: Role,
}

impl Identity {
    /// Creates an identity from its public attributes.
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            role,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the access role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns true if this identity's role satisfies `required`.
    #[must_use]
    pub fn satisfies(&self, required: Role) -> bool {
        self.role.satisfies(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::new(
            UserId::new("7").expect("valid id"),
            "alice",
            "alice@scorecard.com",
            Role::User,
        )
    }

    #[test]
    fn accessors_return_fields() {
        let identity = alice();
        assert_eq!(identity.id().as_str(), "7");
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.email(), "alice@scorecard.com");
        assert_eq!(identity.role(), Role::User);
    }

    #[test]
    fn satisfies_delegates_to_role() {
        let identity = alice();
        assert!(identity.satisfies(Role::Viewer));
        assert!(identity.satisfies(Role::User));
        assert!(!identity.satisfies(Role::Admin));
    }

    #[test]
    fn serialized_layout_has_exactly_public_fields() {
        let value = serde_json::to_value(alice()).expect("serialize");
        let object = value.as_object().expect("object");
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["email", "id", "role", "username"]);
        assert_eq!(object["role"], "user");
        assert_eq!(object["id"], "7");
    }

    #[test]
    fn deserializes_from_stored_layout() {
        let json = r#"{"id":"3","username":"viewer","email":"viewer@scorecard.com","role":"viewer"}"#;
        let identity: Identity = serde_json::from_str(json).expect("deserialize");
        assert_eq!(identity.username(), "viewer");
        assert_eq!(identity.role(), Role::Viewer);
    }
}
