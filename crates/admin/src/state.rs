//! Application state: the one place the session, the API client and the
//! services are wired together.

use std::sync::Arc;

use secrecy::SecretString;

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::http::ApiClient;
use crate::routes::Navigator;
use crate::services::Services;
use crate::session::{FileStorage, LoginOutcome, SessionStorage, SessionStore};
use crate::views::{
    AnalisisPage, DashboardPage, ReportesPage, SiniestrosPage, UsuariosPage, ZonasPeligrosasPage,
};

/// Shared application state.
///
/// The API client reads its credential from the session store and calls
/// [`SessionStore::expire`] when the backend rejects it. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    session: SessionStore,
    api: ApiClient,
    services: Services,
}

impl AppState {
    /// State persisting the session to `config.session_file`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, AppError> {
        let storage = Arc::new(FileStorage::new(&config.session_file));
        Self::with_storage(config, storage)
    }

    /// State over an explicit storage backend.
    ///
    /// The session starts uninitialized; call [`SessionStore::restore`]
    /// (or [`AppState::restore`]) before routing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the HTTP client cannot be built.
    pub fn with_storage(
        config: AdminConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, AppError> {
        let session = SessionStore::new(storage);

        let expiring = session.clone();
        let api = ApiClient::builder(&config)
            .credentials(Arc::new(session.clone()))
            .on_unauthorized(move |rejected| {
                expiring.expire(rejected);
            })
            .build()?;
        let services = Services::new(&api);

        tracing::debug!(api = %config.api_base_url, "Application state ready");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                api,
                services,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn services(&self) -> &Services {
        &self.inner.services
    }

    /// Rebuild the session from storage.
    pub fn restore(&self) {
        self.inner.session.restore();
    }

    /// Log in through the auth service and publish the new session.
    pub async fn login(&self, username: &str, password: &SecretString) -> LoginOutcome {
        self.inner
            .session
            .login(&self.inner.services.auth, username, password)
            .await
    }

    pub fn logout(&self) {
        self.inner.session.logout();
    }

    /// A navigator starting at `path`, following this session.
    #[must_use]
    pub fn navigator(&self, path: &str) -> Navigator {
        Navigator::new(self.inner.session.subscribe(), path)
    }

    #[must_use]
    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.inner.services.reportes.clone())
    }

    #[must_use]
    pub fn siniestros_page(&self) -> SiniestrosPage {
        SiniestrosPage::new(self.inner.services.siniestros.clone())
    }

    #[must_use]
    pub fn reportes_page(&self) -> ReportesPage {
        ReportesPage::new(self.inner.services.reportes_delito.clone())
    }

    #[must_use]
    pub fn zonas_peligrosas_page(&self) -> ZonasPeligrosasPage {
        ZonasPeligrosasPage::new(self.inner.services.reportes.clone())
    }

    #[must_use]
    pub fn analisis_page(&self) -> AnalisisPage {
        AnalisisPage::new(self.inner.services.reportes.clone())
    }

    #[must_use]
    pub fn usuarios_page(&self) -> UsuariosPage {
        UsuariosPage::new(self.inner.services.usuarios.clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::models::keys;
    use crate::routes::{AppRoute, View};
    use crate::session::{MemoryStorage, Session};

    use super::*;

    fn state() -> (AppState, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let config = AdminConfig::new("http://127.0.0.1:9").unwrap();
        (AppState::with_storage(config, storage.clone()).unwrap(), storage)
    }

    #[test]
    fn test_navigator_follows_restore() {
        let (state, _) = state();
        let mut nav = state.navigator("/reportes");
        assert_eq!(nav.view(), View::Waiting(AppRoute::Reportes));

        state.restore();
        assert!(matches!(state.session().current(), Session::Anonymous));
        assert_eq!(nav.refresh(), View::Page(AppRoute::Login));
    }

    #[test]
    fn test_restore_reads_storage() {
        let (state, storage) = state();
        storage.set(keys::TOKEN, "tok").unwrap();
        storage
            .set(
                keys::USER,
                r#"{"id":2,"nombre":"Editora","email":"editor@rutasegura.com","rol":"editor"}"#,
            )
            .unwrap();
        state.restore();
        assert!(state.session().is_at_least_editor());
        assert!(!state.session().is_admin());

        state.logout();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }
}
