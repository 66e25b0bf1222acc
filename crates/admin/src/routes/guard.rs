//! Per-navigation authorization decision.

use super::AppRoute;
use crate::session::Session;

/// Outcome of evaluating a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restore has not finished; show a neutral waiting state.
    Wait,
    /// Nobody is logged in; go to the login page, replacing the attempt.
    RedirectToLogin,
    /// Logged in but not allowed here; go to the landing page silently.
    RedirectToLanding,
    /// Render the requested destination.
    Allow,
}

impl GuardDecision {
    /// The route actually shown for a request to `requested`.
    ///
    /// `None` while waiting.
    #[must_use]
    pub const fn target(self, requested: AppRoute) -> Option<AppRoute> {
        match self {
            Self::Wait => None,
            Self::RedirectToLogin => Some(AppRoute::login()),
            Self::RedirectToLanding => Some(AppRoute::landing()),
            Self::Allow => Some(requested),
        }
    }
}

/// Decide whether `session` may view `route`.
///
/// For protected routes the checks run in a fixed order: loading first,
/// then identity, then role. Checking identity before loading would send
/// returning users to the login page while their session is still being
/// restored.
#[must_use]
pub fn evaluate(route: AppRoute, session: &Session) -> GuardDecision {
    if !route.requires_auth() {
        if route.redirect_when_authenticated() && session.is_authenticated() {
            return GuardDecision::RedirectToLanding;
        }
        return GuardDecision::Allow;
    }

    if session.is_loading() {
        return GuardDecision::Wait;
    }

    let Some(identity) = session.identity() else {
        return GuardDecision::RedirectToLogin;
    };

    if let Some(required) = route.required_role()
        && !identity.satisfies(required)
    {
        return GuardDecision::RedirectToLanding;
    }

    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use ruta_segura_core::Role;

    use super::super::tests::session_as;
    use super::*;

    const PROTECTED: [AppRoute; 7] = [
        AppRoute::Index,
        AppRoute::Dashboard,
        AppRoute::Siniestros,
        AppRoute::Reportes,
        AppRoute::ZonasPeligrosas,
        AppRoute::AnalisisRutaSegura,
        AppRoute::Usuarios,
    ];

    #[test]
    fn test_loading_always_waits() {
        for session in [Session::Uninitialized, Session::Loading] {
            for route in PROTECTED {
                assert_eq!(evaluate(route, &session), GuardDecision::Wait, "{route}");
            }
        }
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        for route in PROTECTED {
            assert_eq!(evaluate(route, &Session::Anonymous), GuardDecision::RedirectToLogin);
        }
        assert_eq!(evaluate(AppRoute::Login, &Session::Anonymous), GuardDecision::Allow);
        assert_eq!(evaluate(AppRoute::NotFound, &Session::Anonymous), GuardDecision::Allow);
    }

    #[test]
    fn test_role_gate_matches_satisfies() {
        for held in Role::ALL {
            let session = session_as(held);
            for route in PROTECTED {
                let allowed = route.required_role().is_none_or(|r| held.satisfies(r));
                let expected = if allowed {
                    GuardDecision::Allow
                } else {
                    GuardDecision::RedirectToLanding
                };
                assert_eq!(evaluate(route, &session), expected, "{held} -> {route}");
            }
        }
    }

    #[test]
    fn test_authenticated_user_leaves_login() {
        let decision = evaluate(AppRoute::Login, &session_as(Role::Consultor));
        assert_eq!(decision, GuardDecision::RedirectToLanding);
        assert_eq!(decision.target(AppRoute::Login), Some(AppRoute::Dashboard));
    }

    #[test]
    fn test_targets() {
        assert_eq!(GuardDecision::Wait.target(AppRoute::Reportes), None);
        assert_eq!(
            GuardDecision::RedirectToLogin.target(AppRoute::Reportes),
            Some(AppRoute::Login)
        );
        assert_eq!(GuardDecision::Allow.target(AppRoute::Reportes), Some(AppRoute::Reportes));
    }
}
