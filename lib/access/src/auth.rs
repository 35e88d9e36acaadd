//! Authentication service.
//!
//! [`AuthService`] is the explicitly constructed authorization context: it
//! owns the credential verifier, the session store and the in-memory copy of
//! the current session. Front ends hold one per client and pass it to the
//! gate and interceptor; nothing here is global, so independent services
//! (one per test, say) never interfere.
//!
//! The read side and the write side are split into [`IdentitySource`] and
//! [`Authenticator`] so the gate and interceptor can run against any
//! implementation.

use scorecard_core::{Clock, SystemClock};
use tracing::{debug, info, instrument, warn};

use crate::credential::CredentialVerifier;
use crate::identity::Identity;
use crate::session::{Session, SessionStore, session_ttl};
use crate::storage::StorageBackend;

/// Read access to the current identity.
pub trait IdentitySource {
    /// Returns the signed-in identity, or `None` when signed out or expired.
    fn current_identity(&self) -> Option<&Identity>;

    /// Returns true if an identity is currently signed in.
    fn is_authenticated(&self) -> bool {
        self.current_identity().is_some()
    }
}

/// Sign-in and sign-out on top of [`IdentitySource`].
pub trait Authenticator: IdentitySource {
    /// Attempts to sign in. Returns false, leaving state unchanged, when the
    /// credentials do not match.
    fn login(&mut self, username: &str, secret: &str) -> bool;

    /// Signs out. Safe to call when already signed out.
    fn logout(&mut self);

    /// Destroys the current session if it has expired, including its
    /// persisted record. Returns true if a session was dropped. Front ends
    /// call this before each read that gates an action.
    fn refresh(&mut self) -> bool;
}

/// Authentication service backed by a credential verifier and session store.
pub struct AuthService<V, B, C = SystemClock> {
    verifier: V,
    store: SessionStore<B, C>,
    session: Option<Session>,
}

impl<V, B, C> AuthService<V, B, C>
where
    V: CredentialVerifier,
    B: StorageBackend,
    C: Clock,
{
    /// Creates the service and restores any persisted, unexpired session.
    pub fn restore(verifier: V, mut store: SessionStore<B, C>) -> Self {
        let session = store.load();
        match &session {
            Some(session) => info!(
                username = session.identity().username(),
                role = %session.identity().role(),
                "restored session"
            ),
            None => debug!("no session to restore"),
        }
        Self {
            verifier,
            store,
            session,
        }
    }

    /// Returns the current session if it has not expired.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        let now = self.store.clock().now();
        self.session.as_ref().filter(|s| !s.is_expired_at(now))
    }

    /// Returns the session store.
    #[must_use]
    pub fn store(&self) -> &SessionStore<B, C> {
        &self.store
    }
}

impl<V, B, C> IdentitySource for AuthService<V, B, C>
where
    V: CredentialVerifier,
    B: StorageBackend,
    C: Clock,
{
    fn current_identity(&self) -> Option<&Identity> {
        self.session().map(Session::identity)
    }
}

impl<V, B, C> Authenticator for AuthService<V, B, C>
where
    V: CredentialVerifier,
    B: StorageBackend,
    C: Clock,
{
    #[instrument(skip(self, secret))]
    fn login(&mut self, username: &str, secret: &str) -> bool {
        let Some(identity) = self.verifier.verify(username, secret) else {
            warn!("credentials rejected");
            return false;
        };

        let role = identity.role();
        let session = match self.store.save(identity.clone(), session_ttl()) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "session not persisted; keeping it for this process only");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "failed to clear previous persisted session");
                }
                Session::new(identity, self.store.clock().now() + session_ttl())
            }
        };

        self.session = Some(session);
        info!(%role, "signed in");
        true
    }

    #[instrument(skip(self))]
    fn logout(&mut self) {
        let previous = self.session.take();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear persisted session");
        }
        match previous {
            Some(session) => info!(username = session.identity().username(), "signed out"),
            None => debug!("logout while signed out"),
        }
    }

    fn refresh(&mut self) -> bool {
        let now = self.store.clock().now();
        let expired = self
            .session
            .as_ref()
            .is_some_and(|s| s.is_expired_at(now));
        if !expired {
            return false;
        }

        self.session = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear expired session");
        }
        debug!("expired session dropped");
        true
    }
}

impl<A: IdentitySource + ?Sized> IdentitySource for &A {
    fn current_identity(&self) -> Option<&Identity> {
        (**self).current_identity()
    }
}

impl<A: IdentitySource + ?Sized> IdentitySource for &mut A {
    fn current_identity(&self) -> Option<&Identity> {
        (**self).current_identity()
    }
}

impl<A: Authenticator + ?Sized> Authenticator for &mut A {
    fn login(&mut self, username: &str, secret: &str) -> bool {
        (**self).login(username, secret)
    }

    fn logout(&mut self) {
        (**self).logout();
    }

    fn refresh(&mut self) -> bool {
        (**self).refresh()
    }
}
