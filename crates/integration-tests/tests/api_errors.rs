//! Error normalization in the HTTP adapter, seen through the services.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use ruta_segura_admin::models::keys;
use ruta_segura_admin::services::Pagination;
use ruta_segura_admin::session::{MemoryStorage, SessionStorage};
use ruta_segura_admin::{AdminConfig, ApiError, AppRoute, AppState, Session, View};
use ruta_segura_core::SiniestroId;
use ruta_segura_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MockBackend, siniestro, unreachable_url,
};

async fn logged_in(backend: &MockBackend) -> (AppState, Arc<MemoryStorage>) {
    let (state, storage) = backend.app();
    state.restore();
    let outcome = state
        .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD.to_string()))
        .await;
    assert!(outcome.is_success());
    (state, storage)
}

#[tokio::test]
async fn test_network_failure_differs_from_server_error() {
    let config = AdminConfig::new(&unreachable_url()).unwrap();
    let offline = AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();
    let err = offline.services().reportes.resumen_general().await.unwrap_err();
    assert!(err.is_no_response());
    assert_eq!(err.status(), None);
    assert!(err.is_retryable());

    let backend = MockBackend::start().await;
    let (state, _) = logged_in(&backend).await;
    backend.fail("/reportes/resumen-general");
    let err = state.services().reportes.resumen_general().await.unwrap_err();
    assert!(!err.is_no_response());
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.message(), "Internal server error");
}

#[tokio::test]
async fn test_revoked_token_ends_session() {
    let backend = MockBackend::start().await;
    let (state, storage) = logged_in(&backend).await;
    let mut nav = state.navigator("/siniestros");

    backend.revoke_tokens();
    let err = state
        .services()
        .siniestros
        .list(Pagination::default(), Default::default())
        .await
        .unwrap_err();

    assert!(err.is_unauthenticated());
    assert!(matches!(state.session().current(), Session::Anonymous));
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    assert_eq!(nav.refresh(), View::Page(AppRoute::Login));
}

#[tokio::test]
async fn test_late_rejection_of_old_token_keeps_new_session() {
    let backend = MockBackend::start().await;
    let (state, storage) = logged_in(&backend).await;
    let old_token = storage.get(keys::TOKEN).unwrap();
    backend.delay("/siniestros", Duration::from_millis(500));

    let in_flight = state
        .services()
        .siniestros
        .list(Pagination::default(), Default::default());
    let relogin = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        state.logout();
        backend.revoke_tokens();
        state
            .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD.to_string()))
            .await
    };
    let (result, outcome) = tokio::join!(in_flight, relogin);

    assert!(outcome.is_success());
    assert!(result.unwrap_err().is_unauthenticated());

    // The rejection was for the old token; the new session survives it
    let new_token = storage.get(keys::TOKEN).unwrap();
    assert_ne!(new_token, old_token);
    assert!(new_token.is_some());
    assert!(state.session().current().is_authenticated());
    assert!(state.services().auth.current().await.is_ok());
}

#[tokio::test]
async fn test_invalid_parameters_never_reach_backend() {
    let backend = MockBackend::start().await;
    let (state, _) = logged_in(&backend).await;
    let before = backend.requests().len();

    let err = state.services().siniestros.get(SiniestroId::new(0)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));

    let err = state
        .services()
        .siniestros
        .list(Pagination::new(0, 5000), Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));

    assert_eq!(backend.requests().len(), before);
    assert!(state.session().current().is_authenticated());
}

#[tokio::test]
async fn test_backend_not_found_propagates() {
    let backend = MockBackend::start().await;
    backend.set_siniestros(vec![siniestro(1, "alta")]);
    let (state, _) = logged_in(&backend).await;

    let vehiculos = &state.services().vehiculos;
    assert!(vehiculos.list_by_siniestro(SiniestroId::new(1)).await.unwrap().is_empty());

    let err = vehiculos.list_by_siniestro(SiniestroId::new(9)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "Siniestro no encontrado");
    assert!(state.session().current().is_authenticated());
}
