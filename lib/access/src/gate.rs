//! Role gate and protected actions.
//!
//! [`RoleGate`] answers "does the current identity satisfy this role?"
//! against whatever [`IdentitySource`] it is given. It holds no state of its
//! own, so it always sees the identity as of the call.
//!
//! [`ProtectedAction`] is the wrapper front ends put around a gated control.
//! When the gate refuses, a supplied fallback replaces the control;
//! without one, the control is still shown but interaction is routed
//! through the [`ActionInterceptor`].

use crate::auth::IdentitySource;
use crate::interceptor::ActionInterceptor;
use crate::role::Role;

/// Permission check against the current identity.
#[derive(Debug)]
pub struct RoleGate<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: IdentitySource + ?Sized> RoleGate<'a, S> {
    /// Creates a gate reading identities from `source`.
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Returns true if the current identity's role satisfies `required`.
    ///
    /// Always false when nobody is signed in.
    #[must_use]
    pub fn permits(&self, required: Role) -> bool {
        self.source
            .current_identity()
            .is_some_and(|identity| identity.satisfies(required))
    }
}

/// What a front end should render for a protected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView<'a, V> {
    /// Permitted: render the content normally.
    Content(&'a V),
    /// Refused with a fallback: render the fallback instead.
    Fallback(&'a V),
    /// Refused without a fallback: render the content, but send interaction
    /// through the interceptor.
    Guarded(&'a V),
}

impl<'a, V> GateView<'a, V> {
    /// Returns the view to render.
    #[must_use]
    pub fn view(&self) -> &'a V {
        match *self {
            Self::Content(v) | Self::Fallback(v) | Self::Guarded(v) => v,
        }
    }

    /// Returns true if the gate permitted the action.
    #[must_use]
    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Content(_))
    }
}

/// A UI action that must not run unless the gate permits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedAction<V> {
    label: String,
    required: Role,
    content: V,
    fallback: Option<V>,
}

impl<V> ProtectedAction<V> {
    /// Creates a protected action requiring [`Role::User`].
    #[must_use]
    pub fn new(label: impl Into<String>, content: V) -> Self {
        Self {
            label: label.into(),
            required: Role::User,
            content,
            fallback: None,
        }
    }

    /// Sets the required role.
    #[must_use]
    pub fn requires(mut self, role: Role) -> Self {
        self.required = role;
        self
    }

    /// Sets the view shown in place of the content when refused.
    #[must_use]
    pub fn with_fallback(mut self, fallback: V) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Returns the action label shown in the login prompt.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the required role.
    #[must_use]
    pub fn required_role(&self) -> Role {
        self.required
    }

    /// Decides what to render for the current identity.
    #[must_use]
    pub fn view<S: IdentitySource + ?Sized>(&self, source: &S) -> GateView<'_, V> {
        if RoleGate::new(source).permits(self.required) {
            return GateView::Content(&self.content);
        }
        match &self.fallback {
            Some(fallback) => GateView::Fallback(fallback),
            None => GateView::Guarded(&self.content),
        }
    }

    /// Handles an interaction with the rendered control.
    ///
    /// Runs `action` and returns its result when permitted; otherwise the
    /// interceptor opens the login prompt and `None` is returned.
    pub fn activate<S, T, F>(
        &self,
        interceptor: &mut ActionInterceptor,
        source: &S,
        action: F,
    ) -> Option<T>
    where
        S: IdentitySource + ?Sized,
        F: FnOnce() -> T,
    {
        interceptor.invoke(source, self.required, &self.label, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use scorecard_core::UserId;

    struct Fixed(Option<Identity>);

    impl IdentitySource for Fixed {
        fn current_identity(&self) -> Option<&Identity> {
            self.0.as_ref()
        }
    }

    fn signed_in(role: Role) -> Fixed {
        Fixed(Some(Identity::new(
            UserId::new("9").expect("valid id"),
            "someone",
            "someone@scorecard.com",
            role,
        )))
    }

    #[test]
    fn signed_out_is_never_permitted() {
        let source = Fixed(None);
        let gate = RoleGate::new(&source);
        for role in Role::ALL {
            assert!(!gate.permits(role));
        }
    }

    #[test]
    fn permits_is_monotonic() {
        for held in Role::ALL {
            let source = signed_in(held);
            let gate = RoleGate::new(&source);
            if !gate.permits(Role::Viewer) {
                assert!(!gate.permits(Role::User));
                assert!(!gate.permits(Role::Admin));
            }
            if gate.permits(Role::Admin) {
                assert!(gate.permits(Role::User));
                assert!(gate.permits(Role::Viewer));
            }
        }
    }

    #[test]
    fn viewer_is_refused_user_action() {
        let source = signed_in(Role::Viewer);
        let gate = RoleGate::new(&source);
        assert!(gate.permits(Role::Viewer));
        assert!(!gate.permits(Role::User));
    }

    #[test]
    fn protected_action_defaults_to_user_role() {
        let action = ProtectedAction::new("Create borrower", "button");
        assert_eq!(action.required_role(), Role::User);
        assert_eq!(action.label(), "Create borrower");
    }

    #[test]
    fn view_selects_content_fallback_or_guarded() {
        let guarded = ProtectedAction::new("Delete", "delete").requires(Role::Admin);
        let with_fallback = guarded.clone().with_fallback("read-only");

        let admin = signed_in(Role::Admin);
        assert_eq!(guarded.view(&admin), GateView::Content(&"delete"));
        assert!(guarded.view(&admin).is_permitted());

        let user = signed_in(Role::User);
        assert_eq!(guarded.view(&user), GateView::Guarded(&"delete"));
        assert_eq!(with_fallback.view(&user), GateView::Fallback(&"read-only"));
        assert_eq!(*with_fallback.view(&user).view(), "read-only");

        let nobody = Fixed(None);
        assert!(!guarded.view(&nobody).is_permitted());
    }
}
