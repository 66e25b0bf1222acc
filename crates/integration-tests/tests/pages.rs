//! Page view-models loading real responses from the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use secrecy::SecretString;
use serde_json::json;

use ruta_segura_admin::components::EMPTY_MESSAGE;
use ruta_segura_admin::models::NuevoUsuario;
use ruta_segura_admin::{AppState, Pagination};
use ruta_segura_core::{Email, Role};
use ruta_segura_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CONSULTOR_EMAIL, MockBackend, indice, siniestro,
};

async fn logged_in(backend: &MockBackend) -> AppState {
    let (state, _) = backend.app();
    state.restore();
    let outcome = state
        .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD.to_string()))
        .await;
    assert!(outcome.is_success());
    state
}

#[tokio::test]
async fn test_empty_siniestros_render_empty_state() {
    let backend = MockBackend::start().await;
    let state = logged_in(&backend).await;

    let mut page = state.siniestros_page();
    assert!(page.load().await);

    let data = page.state().loaded().unwrap();
    assert!(data.rows.is_empty());
    assert_eq!(data.total, 0);
    assert!(page.state().error().is_none());

    let table = page.table();
    assert!(table.is_empty());
    assert_eq!(table.display_rows(), vec![vec![
        EMPTY_MESSAGE.to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
    ]]);
}

#[tokio::test]
async fn test_siniestros_page_and_count_load_together() {
    let backend = MockBackend::start().await;
    backend.set_siniestros((1..=7).map(|id| siniestro(id, "media")).collect());
    let state = logged_in(&backend).await;

    let mut page = state.siniestros_page();
    page.set_pagination(Pagination::new(0, 5));
    page.load().await;
    assert_eq!(page.state().loaded().unwrap().rows.len(), 5);
    assert_eq!(page.state().loaded().unwrap().total, 7);

    assert!(page.next_page());
    page.load().await;
    assert_eq!(page.state().loaded().unwrap().rows.len(), 2);
    assert!(!page.next_page());

    let requests = backend.requests();
    assert!(requests.contains(&"/siniestros".to_string()));
    assert!(requests.contains(&"/siniestros/count".to_string()));
}

#[tokio::test]
async fn test_reportes_filtered_by_tipo() {
    let backend = MockBackend::start().await;
    let reporte = |id: i64, tipo: &str| {
        json!({
            "id": id,
            "usuario_id": 1,
            "latitud": "-34.6037",
            "longitud": "-58.3816",
            "direccion_aproximada": "Av. Corrientes 1200",
            "tipo_delito": tipo,
            "fecha_reporte": "2024-05-02",
            "nivel_peligrosidad": "media",
        })
    };
    backend.set_reportes_delito(vec![reporte(1, "Robo"), reporte(2, "Hurto"), reporte(3, "Robo")]);
    let state = logged_in(&backend).await;

    let mut page = state.reportes_page();
    page.set_tipo_delito(Some("Robo".to_string()));
    page.load().await;
    assert_eq!(page.caption().as_deref(), Some("2 de 2 reportes"));
    assert_eq!(page.table().rows[0][5], "-34.6037, -58.3816");

    let total = state.services().reportes_delito.total(None).await.unwrap();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_dashboard_loads_all_sections() {
    let backend = MockBackend::start().await;
    backend.set_siniestros(vec![siniestro(1, "alta"), siniestro(2, "baja")]);
    let state = logged_in(&backend).await;

    let mut page = state.dashboard_page();
    page.load().await;
    assert_eq!(page.headline()[0], ("Total siniestros", 2));
    assert_eq!(page.headline()[2], ("Heridos", 4));
    assert!(page.zona_table().is_empty());
}

#[tokio::test]
async fn test_analysis_ranks_and_labels() {
    let backend = MockBackend::start().await;
    backend.set_indice(vec![
        indice(1, "Av. Rivadavia", 72.0),
        indice(2, "Av. Roca", 0.0),
        indice(3, "Calle Florida", 8.5),
    ]);
    let state = logged_in(&backend).await;

    let mut page = state.analisis_page();
    page.load().await;

    let rutas = page.rutas_table();
    assert_eq!(rutas.rows.len(), 2);
    assert_eq!(rutas.rows[0][6], "Muy Segura");
    assert_eq!(rutas.rows[1][6], "Segura");

    let zonas = page.zonas_table();
    assert_eq!(zonas.rows.len(), 1);
    assert_eq!(zonas.rows[0][0], "Av. Rivadavia");
    assert_eq!(zonas.rows[0][6], "Muy Peligrosa");

    assert_eq!(page.indice_table().rows.len(), 3);
}

#[tokio::test]
async fn test_failed_analysis_is_retryable_as_a_whole() {
    let backend = MockBackend::start().await;
    backend.set_indice(vec![indice(1, "Av. Roca", 0.0)]);
    let state = logged_in(&backend).await;
    backend.fail("/reportes/analisis/zonas-peligrosas");

    let mut page = state.analisis_page();
    page.load().await;
    assert!(page.state().is_retryable());
    assert_eq!(page.state().error(), Some("Internal server error"));
    // No partial data from the requests that succeeded
    assert!(page.rutas_table().is_empty());
    assert!(state.session().current().is_authenticated());
}

#[tokio::test]
async fn test_unmounted_page_discards_result() {
    let backend = MockBackend::start().await;
    backend.set_siniestros(vec![siniestro(1, "alta")]);
    let state = logged_in(&backend).await;

    let mut page = state.siniestros_page();
    page.mount_guard().unmount();
    assert!(!page.load().await);
    assert!(page.state().is_loading());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let backend = MockBackend::start().await;
    let (state, _) = backend.app();
    state.restore();

    let nuevo = |email: &str| NuevoUsuario {
        email: Email::parse(email).unwrap(),
        nombre: "Nueva Consultora".to_string(),
        rol: Role::Consultor,
        password: SecretString::from("clave-segura".to_string()),
    };

    let creado = state
        .services()
        .auth
        .register(&nuevo("nueva@rutasegura.com"))
        .await
        .unwrap();
    assert_eq!(creado.rol, Role::Consultor);

    let err = state
        .services()
        .auth
        .register(&nuevo(CONSULTOR_EMAIL))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.message(), "Email already registered");
}
