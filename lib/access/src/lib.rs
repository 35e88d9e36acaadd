//! Session handling and role-based authorization for the scorecard client.
//!
//! This crate provides:
//! - Roles and the fixed role hierarchy (`Role`)
//! - Credential verification (`CredentialVerifier`, `CredentialDirectory`)
//! - Durable, expiring sessions (`SessionStore`, `StorageBackend`)
//! - The authentication service (`AuthService`)
//! - Permission checks and gated actions (`RoleGate`, `ProtectedAction`)
//! - The login-prompt state machine (`ActionInterceptor`)
//!
//! # Access Control Model
//!
//! Roles are totally ordered, `admin > user > viewer`. An action that
//! requires a role is permitted when the signed-in identity's role ranks at
//! least as high. Nobody is permitted anything while signed out.
//!
//! # Example
//!
//! ```
//! use scorecard_access::{
//!     ActionInterceptor, AuthService, Authenticator, CredentialDirectory, IdentitySource,
//!     LoginAttempt, MemoryStorage, Role, RoleGate, SessionStore,
//! };
//!
//! let store = SessionStore::new(MemoryStorage::new());
//! let mut auth = AuthService::restore(CredentialDirectory::demo(), store);
//! let mut interceptor = ActionInterceptor::new();
//!
//! // Signed out: the action is suppressed and the login prompt opens.
//! let saved = interceptor.invoke(&auth, Role::User, "Save scorecard", || "saved");
//! assert_eq!(saved, None);
//! assert!(interceptor.state().is_prompting());
//!
//! // Logging in from the prompt closes it; the action is not replayed.
//! let attempt = interceptor.submit_login(&mut auth, "user", "user123");
//! assert_eq!(attempt, LoginAttempt::Accepted);
//! assert!(auth.is_authenticated());
//! assert!(RoleGate::new(&auth).permits(Role::User));
//! assert!(!RoleGate::new(&auth).permits(Role::Admin));
//!
//! let saved = interceptor.invoke(&auth, Role::User, "Save scorecard", || "saved");
//! assert_eq!(saved, Some("saved"));
//!
//! auth.logout();
//! assert!(!auth.is_authenticated());
//! ```

pub mod auth;
pub mod credential;
pub mod error;
pub mod gate;
pub mod identity;
pub mod interceptor;
pub mod profile;
pub mod role;
pub mod session;
pub mod storage;

// Re-export main types at crate root
pub use auth::{AuthService, Authenticator, IdentitySource};
pub use credential::{CredentialDirectory, CredentialRecord, CredentialVerifier};
pub use error::{SessionError, StorageError};
pub use gate::{GateView, ProtectedAction, RoleGate};
pub use identity::Identity;
pub use interceptor::{
    ActionInterceptor, InterceptorEvent, InterceptorObserver, InterceptorState, LoginAttempt,
    PromptClosed,
};
pub use profile::ProfileView;
pub use role::{Role, RoleBadge, UnknownRole};
pub use session::{SESSION_TTL_HOURS, Session, SessionStore, session_ttl};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
