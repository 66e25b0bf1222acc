//! Page view-models.
//!
//! Each page owns the services it reads from and a [`LoadState`] per
//! dataset. Loading issues every independent request at once and applies
//! the combined result only while the page is still mounted.

mod analisis;
mod dashboard;
mod reportes;
mod siniestros;
mod usuarios;

pub use analisis::{AnalisisPage, ZonasPeligrosasPage};
pub use dashboard::{DashboardData, DashboardPage};
pub use reportes::{ReportesData, ReportesPage};
pub use siniestros::{SiniestrosData, SiniestrosPage};
pub use usuarios::UsuariosPage;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::http::ApiError;

/// Lifecycle of a dataset shown on a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Loaded(T),
    /// The fetch failed; `retryable` says whether to offer "try again" and
    /// `no_response` whether the backend was unreachable at all.
    Failed {
        message: String,
        retryable: bool,
        no_response: bool,
    },
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(error) => Self::Failed {
                message: error.message(),
                retryable: error.is_retryable(),
                no_response: error.is_no_response(),
            },
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Error message, if the fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { retryable: true, .. })
    }

    /// Whether the fetch failed without any response from the backend.
    #[must_use]
    pub const fn is_no_response(&self) -> bool {
        matches!(self, Self::Failed { no_response: true, .. })
    }
}

/// Tracks whether a page is still on screen.
///
/// Clones share the flag, so whoever tears the page down can hold one
/// while the page itself is busy loading.
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl MountGuard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Run `fetch` and store its outcome in `state`, unless the page was
    /// unmounted while it was in flight.
    ///
    /// Returns whether the result was applied.
    pub async fn load<T, F>(&self, state: &mut LoadState<T>, fetch: F) -> bool
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if !self.is_mounted() {
            return false;
        }
        *state = LoadState::Loading;
        let result = fetch.await;

        if !self.is_mounted() {
            tracing::debug!("View unmounted before its data arrived, discarding");
            return false;
        }
        if let Err(error) = &result {
            tracing::debug!(error = %error, retryable = error.is_retryable(), "Page data failed to load");
        }
        *state = LoadState::from_result(result);
        true
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}
