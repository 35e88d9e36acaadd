//! Signed-in user badge.

use crate::auth::{Authenticator, IdentitySource};
use crate::role::{Role, RoleBadge};

/// What the profile badge shows for the current identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileView {
    /// Nobody is signed in.
    SignedOut,
    /// An identity is signed in.
    SignedIn {
        /// Uppercased first character of the username, for the avatar.
        initial: char,
        username: String,
        email: String,
        role: Role,
    },
}

impl ProfileView {
    /// Builds the view for `source`'s current identity.
    #[must_use]
    pub fn from_source<S: IdentitySource + ?Sized>(source: &S) -> Self {
        let Some(identity) = source.current_identity() else {
            return Self::SignedOut;
        };
        let initial = identity
            .username()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?');
        Self::SignedIn {
            initial,
            username: identity.username().to_string(),
            email: identity.email().to_string(),
            role: identity.role(),
        }
    }

    /// Returns the role label, e.g. "Admin".
    #[must_use]
    pub fn role_label(&self) -> Option<&'static str> {
        match self {
            Self::SignedIn { role, .. } => Some(role.display_name()),
            Self::SignedOut => None,
        }
    }

    /// Returns the badge tone for the role.
    #[must_use]
    pub fn badge(&self) -> Option<RoleBadge> {
        match self {
            Self::SignedIn { role, .. } => Some(role.badge()),
            Self::SignedOut => None,
        }
    }

    /// The badge's logout control. Returns the view after signing out.
    pub fn sign_out<A: Authenticator + ?Sized>(auth: &mut A) -> Self {
        auth.logout();
        Self::from_source(&*auth)
    }
}
