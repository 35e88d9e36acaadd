//! Gated-action interception.
//!
//! The interceptor is a two-state machine, [`InterceptorState::Idle`] and
//! [`InterceptorState::PromptingLogin`], driven by explicit events. The pure
//! transition function lives on [`InterceptorState::next`];
//! [`ActionInterceptor`] feeds it from the gate and the authenticator and
//! notifies subscribed [`InterceptorObserver`]s, which is where rendering
//! hooks in.
//!
//! A refused action is dropped, not queued. After a successful login from
//! the prompt the user has to trigger the action again.

use std::fmt;
use tracing::debug;

use crate::auth::{Authenticator, IdentitySource};
use crate::gate::RoleGate;
use crate::role::Role;

/// State of the login prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InterceptorState {
    /// No prompt is open.
    #[default]
    Idle,
    /// The login prompt is open. `action` is the label of the refused
    /// action, kept for display only.
    PromptingLogin { action: String },
}

/// Input to the interceptor state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptorEvent {
    /// An action was triggered; `permitted` is the gate's verdict.
    Invoked { action: String, permitted: bool },
    /// A login submitted from the prompt succeeded.
    LoginSucceeded,
    /// A login submitted from the prompt failed.
    LoginFailed,
    /// The user dismissed the prompt.
    Cancelled,
}

impl InterceptorState {
    /// Computes the state after `event`.
    ///
    /// Events that have no meaning in the current state leave it unchanged.
    /// While the prompt is open it is modal, so further invocations are
    /// ignored.
    #[must_use]
    pub fn next(self, event: InterceptorEvent) -> Self {
        match (self, event) {
            (Self::Idle, InterceptorEvent::Invoked { permitted: true, .. }) => Self::Idle,
            (
                Self::Idle,
                InterceptorEvent::Invoked {
                    action,
                    permitted: false,
                },
            ) => Self::PromptingLogin { action },
            (Self::PromptingLogin { .. }, InterceptorEvent::LoginSucceeded) => Self::Idle,
            (Self::PromptingLogin { .. }, InterceptorEvent::Cancelled) => Self::Idle,
            (state, _) => state,
        }
    }

    /// Returns true if the login prompt is open.
    #[must_use]
    pub fn is_prompting(&self) -> bool {
        matches!(self, Self::PromptingLogin { .. })
    }

    /// Returns the label of the action that opened the prompt.
    #[must_use]
    pub fn prompt_action(&self) -> Option<&str> {
        match self {
            Self::PromptingLogin { action } => Some(action),
            Self::Idle => None,
        }
    }
}

/// Why the login prompt closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptClosed {
    LoggedIn,
    Cancelled,
}

/// Rendering hooks for prompt transitions. All methods default to no-ops.
pub trait InterceptorObserver {
    /// The prompt opened because `action` was refused.
    fn prompt_opened(&mut self, _action: &str) {}

    /// A login attempt from the prompt was rejected; the prompt stays open.
    fn login_failed(&mut self, _action: &str) {}

    /// The prompt closed.
    fn prompt_closed(&mut self, _action: &str, _reason: PromptClosed) {}
}

/// Result of submitting credentials to the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAttempt {
    /// Credentials accepted; the prompt closed.
    Accepted,
    /// Credentials rejected; the prompt is still open.
    Rejected,
    /// No prompt was open, so nothing was submitted.
    NotPrompting,
}

/// Intercepts gated actions and drives the login prompt.
#[derive(Default)]
pub struct ActionInterceptor {
    state: InterceptorState,
    observers: Vec<Box<dyn InterceptorObserver>>,
}

impl ActionInterceptor {
    /// Creates an idle interceptor with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer.
    pub fn subscribe(&mut self, observer: Box<dyn InterceptorObserver>) {
        self.observers.push(observer);
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &InterceptorState {
        &self.state
    }

    /// Runs `action` if `source`'s identity satisfies `required`.
    ///
    /// Otherwise the action is suppressed, the login prompt opens and `None`
    /// is returned. Invocations while the prompt is open are suppressed
    /// without changing state.
    pub fn invoke<S, T, F>(
        &mut self,
        source: &S,
        required: Role,
        action: &str,
        run: F,
    ) -> Option<T>
    where
        S: IdentitySource + ?Sized,
        F: FnOnce() -> T,
    {
        if self.state.is_prompting() {
            debug!(action, "prompt open; ignoring invocation");
            return None;
        }

        let permitted = RoleGate::new(source).permits(required);
        self.apply(InterceptorEvent::Invoked {
            action: action.to_string(),
            permitted,
        });

        if permitted {
            Some(run())
        } else {
            debug!(action, %required, "action refused; prompting for login");
            None
        }
    }

    /// Submits credentials from the open prompt.
    pub fn submit_login<A>(&mut self, auth: &mut A, username: &str, secret: &str) -> LoginAttempt
    where
        A: Authenticator + ?Sized,
    {
        if !self.state.is_prompting() {
            return LoginAttempt::NotPrompting;
        }

        if auth.login(username, secret) {
            self.apply(InterceptorEvent::LoginSucceeded);
            LoginAttempt::Accepted
        } else {
            self.apply(InterceptorEvent::LoginFailed);
            LoginAttempt::Rejected
        }
    }

    /// Dismisses the open prompt. Returns false if none was open.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_prompting() {
            return false;
        }
        self.apply(InterceptorEvent::Cancelled);
        true
    }

    fn apply(&mut self, event: InterceptorEvent) {
        let previous = std::mem::take(&mut self.state);
        let label = previous
            .prompt_action()
            .or(match &event {
                InterceptorEvent::Invoked { action, .. } => Some(action.as_str()),
                _ => None,
            })
            .unwrap_or_default()
            .to_string();
        let closed = match &event {
            InterceptorEvent::LoginSucceeded => Some(PromptClosed::LoggedIn),
            InterceptorEvent::Cancelled => Some(PromptClosed::Cancelled),
            _ => None,
        };
        let failed = event == InterceptorEvent::LoginFailed;

        let was_prompting = previous.is_prompting();
        self.state = previous.next(event);

        for observer in &mut self.observers {
            match (was_prompting, self.state.is_prompting()) {
                (false, true) => observer.prompt_opened(&label),
                (true, false) => {
                    if let Some(reason) = closed {
                        observer.prompt_closed(&label, reason);
                    }
                }
                (true, true) if failed => observer.login_failed(&label),
                _ => {}
            }
        }
    }
}

impl fmt::Debug for ActionInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInterceptor")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}
