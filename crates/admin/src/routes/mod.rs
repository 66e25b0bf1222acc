//! Dashboard routes and the navigation guard.
//!
//! [`AppRoute`] is the pure route table: paths, titles and what each
//! destination requires. [`guard::evaluate`] turns a route plus the current
//! session into a decision, and [`Navigator`] applies those decisions to a
//! history stack.

mod guard;
mod navigator;

pub use guard::{GuardDecision, evaluate};
pub use navigator::{Navigator, View};

use std::fmt;

use ruta_segura_core::Role;

use crate::session::Session;

/// Every destination of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// Login form, public.
    #[default]
    Login,
    /// `/`, forwards to the dashboard.
    Index,
    Dashboard,
    Siniestros,
    Reportes,
    ZonasPeligrosas,
    AnalisisRutaSegura,
    /// User management, admin only.
    Usuarios,
    /// Unknown path, public.
    NotFound,
}

impl AppRoute {
    /// Routes shown in the sidebar, in display order.
    pub const NAVIGATION: [Self; 6] = [
        Self::Dashboard,
        Self::Siniestros,
        Self::Reportes,
        Self::ZonasPeligrosas,
        Self::AnalisisRutaSegura,
        Self::Usuarios,
    ];

    /// Parse a path. Query strings, fragments and trailing slashes are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        match path {
            "" => Self::Index,
            "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/siniestros" => Self::Siniestros,
            "/reportes" => Self::Reportes,
            "/zonas-peligrosas" => Self::ZonasPeligrosas,
            "/analisis-ruta-segura" => Self::AnalisisRutaSegura,
            "/usuarios" => Self::Usuarios,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub const fn to_path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Index => "/",
            Self::Dashboard => "/dashboard",
            Self::Siniestros => "/siniestros",
            Self::Reportes => "/reportes",
            Self::ZonasPeligrosas => "/zonas-peligrosas",
            Self::AnalisisRutaSegura => "/analisis-ruta-segura",
            Self::Usuarios => "/usuarios",
            Self::NotFound => "/404",
        }
    }

    /// Page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Iniciar sesión",
            Self::Index | Self::Dashboard => "Dashboard",
            Self::Siniestros => "Siniestros",
            Self::Reportes => "Reportes",
            Self::ZonasPeligrosas => "Zonas Peligrosas",
            Self::AnalisisRutaSegura => "Análisis Ruta Segura",
            Self::Usuarios => "Usuarios",
            Self::NotFound => "Página no encontrada",
        }
    }

    /// Whether a session is needed to view this route.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// Minimum role beyond being logged in, if any.
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Usuarios => Some(Role::Admin),
            _ => None,
        }
    }

    /// Authenticated users are sent away from this route.
    #[must_use]
    pub const fn redirect_when_authenticated(self) -> bool {
        matches!(self, Self::Login)
    }

    /// Where unauthenticated users are sent.
    #[must_use]
    pub const fn login() -> Self {
        Self::Login
    }

    /// Default page for authenticated users.
    #[must_use]
    pub const fn landing() -> Self {
        Self::Dashboard
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_path())
    }
}

/// Sidebar entries visible to the current session.
///
/// Empty when nobody is logged in; role-gated entries only appear for
/// identities that satisfy the role.
#[must_use]
pub fn nav_items(session: &Session) -> Vec<AppRoute> {
    let Some(identity) = session.identity() else {
        return Vec::new();
    };
    AppRoute::NAVIGATION
        .into_iter()
        .filter(|route| route.required_role().is_none_or(|role| identity.satisfies(role)))
        .collect()
}
