//! Session persistence and expiry.
//!
//! A [`Session`] binds one [`Identity`] to one expiry instant. The
//! [`SessionStore`] owns the persisted copy: two entries written as a single
//! logical unit, the identity record and the session metadata. A record that
//! is missing either half, fails to decode, or has reached its expiry reads
//! as "no session" and is removed from storage on that read.

use chrono::{DateTime, Duration, Utc};
use rootcause::prelude::{Report, ResultExt};
use scorecard_core::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::identity::Identity;
use crate::storage::StorageBackend;

/// Storage key of the identity record.
pub const USER_KEY: &str = "scorecard_user";

/// Storage key of the session metadata record.
pub const SESSION_KEY: &str = "scorecard_session";

/// Lifetime of a session, in hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Returns the fixed session lifetime.
#[must_use]
pub fn session_ttl() -> Duration {
    Duration::hours(SESSION_TTL_HOURS)
}

/// Persisted session metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct SessionMeta {
    /// Expiry instant as epoch milliseconds.
    #[serde(rename = "expiresAt")]
    expires_at: i64,
}

/// A time-bounded association between an identity and an expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session expiring at the given instant.
    #[must_use]
    pub fn new(identity: Identity, expires_at: DateTime<Utc>) -> Self {
        Self {
            identity,
            expires_at,
        }
    }

    /// Returns the session's identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired at `now`.
    ///
    /// The expiry instant itself counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns the time left at `now`, zero once expired.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// Durable store for the single current session.
#[derive(Debug)]
pub struct SessionStore<B, C = SystemClock> {
    backend: B,
    clock: C,
}

impl<B: StorageBackend> SessionStore<B> {
    /// Creates a store on `backend` using the system clock.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: StorageBackend, C: Clock> SessionStore<B, C> {
    /// Creates a store on `backend` reading time from `clock`.
    #[must_use]
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self { backend, clock }
    }

    /// Returns the store's clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the storage backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the persisted session.
    ///
    /// Returns `None` when no record exists, when the record is partial or
    /// malformed, or when it has expired. In the last two cases the record
    /// is cleared as a side effect.
    pub fn load(&mut self) -> Option<Session> {
        let user = self.backend.get(USER_KEY);
        let meta = self.backend.get(SESSION_KEY);

        let (user, meta) = match (user, meta) {
            (Ok(None), Ok(None)) => return None,
            (Ok(Some(user)), Ok(Some(meta))) => (user, meta),
            (Ok(_), Ok(_)) => {
                warn!("persisted session is incomplete; discarding");
                self.discard();
                return None;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "persisted session is unreadable; discarding");
                self.discard();
                return None;
            }
        };

        let session = match decode(&user, &meta) {
            Ok(session) => session,
            Err(reason) => {
                warn!(%reason, "persisted session is malformed; discarding");
                self.discard();
                return None;
            }
        };

        if session.is_expired_at(self.clock.now()) {
            debug!(
                username = session.identity().username(),
                expires_at = %session.expires_at(),
                "persisted session has expired; discarding"
            );
            self.discard();
            return None;
        }

        Some(session)
    }

    /// Creates a session expiring `ttl` from now and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn save(
        &mut self,
        identity: Identity,
        ttl: Duration,
    ) -> Result<Session, Report<SessionError>> {
        let session = Session::new(identity, self.clock.now() + ttl);

        let user = serde_json::to_string(session.identity()).map_err(|e| {
            SessionError::EncodeFailed {
                reason: e.to_string(),
            }
        })?;
        let meta = serde_json::to_string(&SessionMeta {
            expires_at: session.expires_at().timestamp_millis(),
        })
        .map_err(|e| SessionError::EncodeFailed {
            reason: e.to_string(),
        })?;

        self.backend
            .set_entries(&[(USER_KEY, user), (SESSION_KEY, meta)])
            .context(SessionError::PersistFailed)?;

        debug!(
            username = session.identity().username(),
            expires_at = %session.expires_at(),
            "persisted session"
        );
        Ok(session)
    }

    /// Removes the persisted session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot remove the record.
    pub fn clear(&mut self) -> Result<(), Report<SessionError>> {
        self.backend
            .remove_entries(&[USER_KEY, SESSION_KEY])
            .context(SessionError::ClearFailed)?;
        Ok(())
    }

    fn discard(&mut self) {
        if let Err(e) = self.clear() {
            warn!(error = %e, "failed to discard persisted session");
        }
    }
}

fn decode(user: &str, meta: &str) -> Result<Session, String> {
    let identity: Identity =
        serde_json::from_str(user).map_err(|e| format!("identity record: {e}"))?;
    let meta: SessionMeta =
        serde_json::from_str(meta).map_err(|e| format!("session record: {e}"))?;
    let expires_at = DateTime::from_timestamp_millis(meta.expires_at)
        .ok_or_else(|| format!("expiry {} is out of range", meta.expires_at))?;
    Ok(Session::new(identity, expires_at))
}
