//! Credential verification.
//!
//! [`CredentialVerifier`] is the seam between the authorization core and
//! whatever actually checks a username/secret pair. The bundled
//! [`CredentialDirectory`] is a fixed, read-only table of demo accounts
//! compared in plain text; a hashed store or an external identity provider
//! can be substituted without touching the gate or the interceptor.

use scorecard_core::UserId;
use std::fmt;

use crate::identity::Identity;
use crate::role::Role;

/// Verifies a username/secret pair and issues an identity on success.
pub trait CredentialVerifier {
    /// Returns the identity for a matching pair, or `None`.
    ///
    /// Failure is a normal outcome, not an error.
    fn verify(&self, username: &str, secret: &str) -> Option<Identity>;
}

/// One entry of the credential directory.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    username: String,
    secret: String,
    id: UserId,
    email: String,
    role: Role,
}

impl CredentialRecord {
    /// Creates a credential record.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        secret: impl Into<String>,
        id: UserId,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
            id,
            email: email.into(),
            role,
        }
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the recorded role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns true if `secret` matches exactly.
    #[must_use]
    pub fn secret_matches(&self, secret: &str) -> bool {
        self.secret == secret
    }

    /// Builds the public identity for this record, dropping the secret.
    #[must_use]
    pub fn to_identity(&self) -> Identity {
        Identity::new(
            self.id.clone(),
            self.username.clone(),
            self.email.clone(),
            self.role,
        )
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}

/// Fixed, read-only mapping from username to credential record.
///
/// Lookups are exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct CredentialDirectory {
    records: Vec<CredentialRecord>,
}

impl CredentialDirectory {
    /// Creates a directory from the given records.
    ///
    /// If a username appears more than once the first record wins.
    #[must_use]
    pub fn new(records: Vec<CredentialRecord>) -> Self {
        Self { records }
    }

    /// The demo accounts shipped with the scorecard client.
    #[must_use]
    pub fn demo() -> Self {
        let entries = [
            ("admin", "admin123", "1", Role::Admin),
            ("user", "user123", "2", Role::User),
            ("viewer", "viewer123", "3", Role::Viewer),
            ("demo", "demo", "4", Role::User),
        ];

        let records = entries
            .into_iter()
            .filter_map(|(username, secret, id, role)| {
                let id = UserId::new(id).ok()?;
                Some(CredentialRecord::new(
                    username,
                    secret,
                    id,
                    format!("{username}@scorecard.com"),
                    role,
                ))
            })
            .collect();

        Self::new(records)
    }

    /// Looks up the record for `username`.
    #[must_use]
    pub fn lookup(&self, username: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    /// Returns all records.
    #[must_use]
    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CredentialVerifier for CredentialDirectory {
    fn verify(&self, username: &str, secret: &str) -> Option<Identity> {
        self.lookup(username)
            .filter(|record| record.secret_matches(secret))
            .map(CredentialRecord::to_identity)
    }
}

impl<V: CredentialVerifier + ?Sized> CredentialVerifier for Box<V> {
    fn verify(&self, username: &str, secret: &str) -> Option<Identity> {
        (**self).verify(username, secret)
    }
}
