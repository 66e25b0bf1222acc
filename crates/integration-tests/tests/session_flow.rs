//! Login, persistence and route guarding against the mock backend.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use ruta_segura_admin::models::keys;
use ruta_segura_admin::routes::{AppRoute, View};
use ruta_segura_admin::session::SessionStorage;
use ruta_segura_admin::{LoginOutcome, Session};
use ruta_segura_core::Role;
use ruta_segura_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CONSULTOR_EMAIL, CONSULTOR_PASSWORD, EDITOR_EMAIL,
    EDITOR_PASSWORD, MockBackend,
};

fn secret(password: &str) -> SecretString {
    SecretString::from(password.to_string())
}

#[tokio::test]
async fn test_admin_login_reaches_usuarios() {
    let backend = MockBackend::start().await;
    let (state, _) = backend.app();
    state.restore();

    let mut nav = state.navigator("/usuarios");
    assert_eq!(nav.view(), View::Page(AppRoute::Login));

    let outcome = state.login(ADMIN_EMAIL, &secret(ADMIN_PASSWORD)).await;
    let LoginOutcome::Success(identity) = outcome else {
        panic!("admin login failed");
    };
    assert_eq!(identity.rol, Role::Admin);
    assert!(state.session().is_admin());

    // The login page forwards once the session is authenticated
    assert_eq!(nav.session_changed().await, Some(View::Page(AppRoute::Dashboard)));
    assert_eq!(nav.navigate("/usuarios"), View::Page(AppRoute::Usuarios));

    let mut page = state.usuarios_page();
    page.load().await;
    let usuarios = page.state().loaded().unwrap();
    assert_eq!(usuarios.len(), 3);
    assert_eq!(page.table().rows[0][2], ADMIN_EMAIL);
}

#[tokio::test]
async fn test_non_admin_is_sent_to_landing() {
    let backend = MockBackend::start().await;
    let (state, _) = backend.app();
    state.restore();

    let outcome = state.login(CONSULTOR_EMAIL, &secret(CONSULTOR_PASSWORD)).await;
    assert!(outcome.is_success());
    assert!(!state.session().is_at_least_editor());

    let mut nav = state.navigator("/usuarios");
    assert_eq!(nav.view(), View::Page(AppRoute::Dashboard));
    assert_eq!(nav.navigate("/siniestros"), View::Page(AppRoute::Siniestros));
    assert_eq!(nav.navigate("/usuarios"), View::Page(AppRoute::Dashboard));
}

#[tokio::test]
async fn test_editor_sees_every_page_but_usuarios() {
    let backend = MockBackend::start().await;
    let (state, _) = backend.app();
    state.restore();
    assert!(state.login(EDITOR_EMAIL, &secret(EDITOR_PASSWORD)).await.is_success());

    let session = state.session().current();
    let items = ruta_segura_admin::routes::nav_items(&session);
    assert_eq!(items.len(), AppRoute::NAVIGATION.len() - 1);
    assert!(!items.contains(&AppRoute::Usuarios));
}

#[tokio::test]
async fn test_wrong_password_shows_backend_message() {
    let backend = MockBackend::start().await;
    let (state, storage) = backend.app();
    state.restore();

    let outcome = state.login(ADMIN_EMAIL, &secret("incorrecta")).await;
    assert_eq!(
        outcome,
        LoginOutcome::Failure {
            message: "Incorrect email or password".to_string()
        }
    );
    assert!(matches!(state.session().current(), Session::Anonymous));
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
}

#[tokio::test]
async fn test_login_survives_restart() {
    let backend = MockBackend::start().await;
    let (first, storage) = backend.app();
    first.restore();
    let LoginOutcome::Success(identity) = first.login(ADMIN_EMAIL, &secret(ADMIN_PASSWORD)).await
    else {
        panic!("login failed");
    };

    let second = backend.app_with(storage);
    let restored = second.session().restore();
    assert_eq!(restored.identity(), Some(&identity));

    // The restored credential is accepted by the backend
    let usuario = second.services().auth.current().await.unwrap();
    assert_eq!(usuario.email.as_str(), ADMIN_EMAIL);
}

#[tokio::test]
async fn test_logout_then_restore_is_anonymous() {
    let backend = MockBackend::start().await;
    let (state, storage) = backend.app();
    state.restore();
    assert!(state.login(ADMIN_EMAIL, &secret(ADMIN_PASSWORD)).await.is_success());

    state.logout();
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::USER).unwrap(), None);

    let restarted = backend.app_with(storage);
    assert!(matches!(restarted.session().restore(), Session::Anonymous));
    assert_eq!(restarted.navigator("/dashboard").view(), View::Page(AppRoute::Login));
}

#[tokio::test]
async fn test_rejected_login_keeps_existing_session() {
    let backend = MockBackend::start().await;
    let (state, storage) = backend.app();
    state.restore();
    assert!(state.login(EDITOR_EMAIL, &secret(EDITOR_PASSWORD)).await.is_success());
    let token = storage.get(keys::TOKEN).unwrap();

    backend.fail("/auth/login");
    let outcome = state.login(ADMIN_EMAIL, &secret(ADMIN_PASSWORD)).await;
    assert!(!outcome.is_success());

    let identity = state.session().identity().unwrap();
    assert_eq!(identity.email.as_str(), EDITOR_EMAIL);
    assert_eq!(storage.get(keys::TOKEN).unwrap(), token);

    // The surviving credential still works
    assert!(state.services().auth.current().await.is_ok());
}
