//! Navigation history driven by guard decisions.

use tokio::sync::watch;

use super::{AppRoute, GuardDecision, evaluate};
use crate::session::Session;

/// What the shell should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Neutral waiting state while the session is restored; holds the
    /// route that will be re-evaluated once it resolves.
    Waiting(AppRoute),
    /// A rendered page.
    Page(AppRoute),
}

impl View {
    /// The route shown or pending.
    #[must_use]
    pub const fn route(self) -> AppRoute {
        match self {
            Self::Waiting(route) | Self::Page(route) => route,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
}

/// Current route plus history, re-checked on every navigation and on
/// every session change.
#[derive(Debug)]
pub struct Navigator {
    session: watch::Receiver<Session>,
    history: Vec<AppRoute>,
    view: View,
}

impl Navigator {
    /// Start at `initial_path`, following `session`.
    #[must_use]
    pub fn new(session: watch::Receiver<Session>, initial_path: &str) -> Self {
        let mut navigator = Self {
            session,
            history: Vec::new(),
            view: View::Waiting(AppRoute::from_path(initial_path)),
        };
        navigator.resolve(AppRoute::from_path(initial_path), HistoryMode::Replace);
        navigator
    }

    /// What is rendered right now.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// Visited routes, oldest first.
    #[must_use]
    pub fn history(&self) -> &[AppRoute] {
        &self.history
    }

    /// Navigate to `path`, pushing a history entry.
    pub fn navigate(&mut self, path: &str) -> View {
        self.resolve(AppRoute::from_path(path), HistoryMode::Push)
    }

    /// Go back one entry. The previous route is checked again.
    pub fn back(&mut self) -> View {
        if self.history.len() > 1 {
            self.history.pop();
        }
        let previous = self.history.last().copied().unwrap_or_default();
        self.resolve(previous, HistoryMode::Replace)
    }

    /// Re-evaluate the current route against the latest session.
    pub fn refresh(&mut self) -> View {
        self.resolve(self.view.route(), HistoryMode::Replace)
    }

    /// Wait for the next session transition, then refresh.
    ///
    /// Returns `None` once the session store has been dropped.
    pub async fn session_changed(&mut self) -> Option<View> {
        self.session.changed().await.ok()?;
        Some(self.refresh())
    }

    fn resolve(&mut self, requested: AppRoute, mode: HistoryMode) -> View {
        let decision = evaluate(requested, &self.session.borrow_and_update());

        let Some(target) = decision.target(requested) else {
            self.view = View::Waiting(requested);
            return self.view;
        };

        if decision != GuardDecision::Allow {
            tracing::debug!(from = %requested, to = %target, ?decision, "Navigation redirected");
        }

        // Index only forwards to the landing page
        let target = if target == AppRoute::Index {
            AppRoute::landing()
        } else {
            target
        };

        self.commit(target, mode);
        self.view
    }

    fn commit(&mut self, route: AppRoute, mode: HistoryMode) {
        match (mode, self.history.last_mut()) {
            (HistoryMode::Replace, Some(top)) => *top = route,
            (HistoryMode::Push, Some(top)) if *top == route => {}
            _ => self.history.push(route),
        }
        self.view = View::Page(route);
    }
}
