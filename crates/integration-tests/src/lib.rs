//! Integration tests for the Ruta Segura dashboard client.
//!
//! [`MockBackend`] serves the subset of the backend API the client uses
//! from an in-process axum server on an ephemeral port. Tests build an
//! [`AppState`] against it and drive the client over real HTTP.
//!
//! Seeded accounts:
//!
//! | email                       | password      | rol        |
//! |-----------------------------|---------------|------------|
//! | `admin@rutasegura.com`      | `admin123`    | admin      |
//! | `editor@rutasegura.com`     | `editor123`   | editor     |
//! | `consultor@rutasegura.com`  | `consultor123`| consultor  |

#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use ruta_segura_admin::session::{MemoryStorage, SessionStorage};
use ruta_segura_admin::{AdminConfig, AppState};

pub const ADMIN_EMAIL: &str = "admin@rutasegura.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const EDITOR_EMAIL: &str = "editor@rutasegura.com";
pub const EDITOR_PASSWORD: &str = "editor123";
pub const CONSULTOR_EMAIL: &str = "consultor@rutasegura.com";
pub const CONSULTOR_PASSWORD: &str = "consultor123";

struct Account {
    password: String,
    usuario: Value,
}

#[derive(Default)]
struct Backend {
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    next_token: u64,
    siniestros: Vec<Value>,
    reportes_delito: Vec<Value>,
    indice: Vec<Value>,
    failing: HashSet<String>,
    latency: HashMap<String, Duration>,
    requests: Vec<String>,
}

impl Backend {
    fn seeded() -> Self {
        let mut backend = Self::default();
        for (id, email, password, nombre, rol) in [
            (1, ADMIN_EMAIL, ADMIN_PASSWORD, "Administrador", "admin"),
            (2, EDITOR_EMAIL, EDITOR_PASSWORD, "Editora", "editor"),
            (3, CONSULTOR_EMAIL, CONSULTOR_PASSWORD, "Consultor", "consultor"),
        ] {
            backend.accounts.push(Account {
                password: password.to_string(),
                usuario: json!({
                    "id": id,
                    "email": email,
                    "nombre": nombre,
                    "rol": rol,
                    "fecha_registro": "2024-01-15",
                    "activo": true,
                }),
            });
        }
        backend
    }

    fn usuario(&self, id: i64) -> Option<&Value> {
        self.accounts
            .iter()
            .map(|a| &a.usuario)
            .find(|u| u["id"].as_i64() == Some(id))
    }
}

type Shared = Arc<Mutex<Backend>>;

fn lock(shared: &Shared) -> MutexGuard<'_, Backend> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Resolve the bearer token to a user, recording the request on the way.
///
/// Routes with configured latency are held before the token is checked.
async fn authorize(shared: &Shared, headers: &HeaderMap, route: &str) -> Result<Value, Response> {
    let latency = lock(shared).latency.get(route).copied();
    if let Some(latency) = latency {
        tokio::time::sleep(latency).await;
    }

    let mut backend = lock(shared);
    backend.requests.push(route.to_string());

    if backend.failing.contains(route) {
        return Err(detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"));
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let usuario = token
        .and_then(|t| backend.tokens.get(t).copied())
        .and_then(|id| backend.usuario(id).cloned());

    usuario.ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(shared): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    let mut backend = lock(&shared);
    backend.requests.push("/auth/login".to_string());
    if backend.failing.contains("/auth/login") {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }

    let id = backend
        .accounts
        .iter()
        .find(|a| a.usuario["email"] == form.username.as_str() && a.password == form.password)
        .and_then(|a| a.usuario["id"].as_i64());
    let Some(id) = id else {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    };

    backend.next_token += 1;
    let token = format!("token-{}-{}", id, backend.next_token);
    backend.tokens.insert(token.clone(), id);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn me(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    match authorize(&shared, &headers, "/auth/me").await {
        Ok(usuario) => Json(usuario).into_response(),
        Err(response) => response,
    }
}

async fn register(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = lock(&shared);
    backend.requests.push("/auth/register".to_string());

    let email = body["email"].as_str().unwrap_or_default().to_string();
    if backend.accounts.iter().any(|a| a.usuario["email"] == email.as_str()) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let id = i64::try_from(backend.accounts.len()).unwrap_or(i64::MAX) + 1;
    let usuario = json!({
        "id": id,
        "email": email,
        "nombre": body["nombre"],
        "rol": body["rol"],
        "activo": true,
    });
    backend.accounts.push(Account {
        password: body["password"].as_str().unwrap_or_default().to_string(),
        usuario: usuario.clone(),
    });
    Json(usuario).into_response()
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    tipo_delito: Option<String>,
}

const fn default_limit() -> usize {
    100
}

fn window(rows: &[Value], page: &Page) -> Vec<Value> {
    rows.iter().skip(page.skip).take(page.limit).cloned().collect()
}

async fn usuarios(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let usuario = match authorize(&shared, &headers, "/usuarios").await {
        Ok(usuario) => usuario,
        Err(response) => return response,
    };
    if usuario["rol"] != "admin" {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    let backend = lock(&shared);
    let all: Vec<Value> = backend.accounts.iter().map(|a| a.usuario.clone()).collect();
    Json(all).into_response()
}

async fn siniestros(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(page): Query<Page>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers, "/siniestros").await {
        return response;
    }
    Json(window(&lock(&shared).siniestros, &page)).into_response()
}

async fn siniestros_count(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&shared, &headers, "/siniestros/count").await {
        return response;
    }
    Json(json!({ "total": lock(&shared).siniestros.len() })).into_response()
}

async fn vehiculos_por_siniestro(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers, "/vehiculos/siniestro").await {
        return response;
    }
    if !lock(&shared).siniestros.iter().any(|s| s["id"].as_i64() == Some(id)) {
        return detail(StatusCode::NOT_FOUND, "Siniestro no encontrado");
    }
    Json(json!([])).into_response()
}

fn matching_reportes(backend: &Backend, tipo: Option<&str>) -> Vec<Value> {
    backend
        .reportes_delito
        .iter()
        .filter(|r| tipo.is_none_or(|t| r["tipo_delito"] == t))
        .cloned()
        .collect()
}

async fn reportes_delito(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(page): Query<Page>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers, "/reportes-delito").await {
        return response;
    }
    let rows = matching_reportes(&lock(&shared), page.tipo_delito.as_deref());
    Json(window(&rows, &page)).into_response()
}

async fn reportes_delito_total(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(page): Query<Page>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers, "/reportes-delito/estadisticas/total").await {
        return response;
    }
    let total = matching_reportes(&lock(&shared), page.tipo_delito.as_deref()).len();
    Json(json!({ "total": total })).into_response()
}

/// Analytics endpoint returning `body` unless the route is set to fail.
fn analytics(route: &'static str, body: fn(&Backend) -> Value) -> axum::routing::MethodRouter<Shared> {
    get(move |State(shared): State<Shared>, headers: HeaderMap| async move {
        match authorize(&shared, &headers, route).await {
            Ok(_) => Json(body(&lock(&shared))).into_response(),
            Err(response) => response,
        }
    })
}

fn resumen(backend: &Backend) -> Value {
    let sum = |field: &str| -> u64 {
        backend.siniestros.iter().filter_map(|s| s[field].as_u64()).sum()
    };
    json!({
        "total_siniestros": backend.siniestros.len(),
        "total_fallecidos": sum("victimas_fatales"),
        "total_heridos": sum("heridos"),
        "siniestros_graves": 0,
        "siniestros_fin_semana": 0,
    })
}

fn ranked(backend: &Backend, keep: fn(f64) -> bool) -> Value {
    let rows: Vec<Value> = backend
        .indice
        .iter()
        .filter(|r| r["indice_peligrosidad"].as_f64().is_some_and(keep))
        .cloned()
        .collect();
    Value::Array(rows)
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/register", post(register))
        .route("/usuarios", get(usuarios))
        .route("/siniestros", get(siniestros))
        .route("/siniestros/count", get(siniestros_count))
        .route("/vehiculos/siniestro/{id}", get(vehiculos_por_siniestro))
        .route("/reportes-delito", get(reportes_delito))
        .route("/reportes-delito/estadisticas/total", get(reportes_delito_total))
        .route("/reportes/resumen-general", analytics("/reportes/resumen-general", resumen))
        .route(
            "/reportes/siniestros-por-zona",
            analytics("/reportes/siniestros-por-zona", |_| json!([])),
        )
        .route(
            "/reportes/estadisticas-por-tipo",
            analytics("/reportes/estadisticas-por-tipo", |_| json!([])),
        )
        .route(
            "/reportes/siniestros-por-dia-semana",
            analytics("/reportes/siniestros-por-dia-semana", |_| json!([])),
        )
        .route(
            "/reportes/analisis/indice-seguridad",
            analytics("/reportes/analisis/indice-seguridad", |b| Value::Array(b.indice.clone())),
        )
        .route(
            "/reportes/analisis/rutas-seguras",
            analytics("/reportes/analisis/rutas-seguras", |b| ranked(b, |i| i <= 10.0)),
        )
        .route(
            "/reportes/analisis/zonas-peligrosas",
            analytics("/reportes/analisis/zonas-peligrosas", |b| ranked(b, |i| i > 25.0)),
        )
        .with_state(shared)
}

/// In-process stand-in for the backend API.
#[derive(Clone)]
pub struct MockBackend {
    addr: SocketAddr,
    shared: Shared,
}

impl MockBackend {
    /// Start a backend with the seeded accounts and no records.
    pub async fn start() -> Self {
        let shared: Shared = Arc::new(Mutex::new(Backend::seeded()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let app = router(Arc::clone(&shared));
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve mock backend") });
        Self { addr, shared }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[must_use]
    pub fn config(&self) -> AdminConfig {
        AdminConfig::new(&self.base_url()).expect("mock backend URL")
    }

    /// A fresh application over in-memory session storage.
    #[must_use]
    pub fn app(&self) -> (AppState, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (self.app_with(storage.clone()), storage)
    }

    /// An application sharing `storage`, as a second process would.
    #[must_use]
    pub fn app_with(&self, storage: Arc<dyn SessionStorage>) -> AppState {
        AppState::with_storage(self.config(), storage).expect("app state")
    }

    pub fn set_siniestros(&self, rows: Vec<Value>) {
        lock(&self.shared).siniestros = rows;
    }

    pub fn set_reportes_delito(&self, rows: Vec<Value>) {
        lock(&self.shared).reportes_delito = rows;
    }

    pub fn set_indice(&self, rows: Vec<Value>) {
        lock(&self.shared).indice = rows;
    }

    /// Make `route` answer 500 (401 for `/auth/login`).
    pub fn fail(&self, route: &str) {
        lock(&self.shared).failing.insert(route.to_string());
    }

    /// Hold requests to `route` for `latency` before answering.
    pub fn delay(&self, route: &str, latency: Duration) {
        lock(&self.shared).latency.insert(route.to_string(), latency);
    }

    /// Invalidate every issued token, as a backend restart with a new key would.
    pub fn revoke_tokens(&self) {
        lock(&self.shared).tokens.clear();
    }

    /// Routes hit so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.shared).requests.clone()
    }
}

/// A base URL nothing is listening on.
#[must_use]
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// One accident row as the backend lists it.
#[must_use]
pub fn siniestro(id: i64, nivel_gravedad: &str) -> Value {
    json!({
        "id": id,
        "fecha": "2024-03-09",
        "hora": "18:30:00",
        "avenida_id": 1,
        "tipo_id": 2,
        "nivel_gravedad": nivel_gravedad,
        "victimas_fatales": 0,
        "heridos": 2,
        "num_vehiculos": 2,
        "dia_semana": "Sábado",
        "es_fin_de_semana": true,
    })
}

/// One safety-index row.
#[must_use]
pub fn indice(avenida_id: i64, nombre: &str, indice_peligrosidad: f64) -> Value {
    json!({
        "avenida_id": avenida_id,
        "avenida_nombre": nombre,
        "zona": "Centro",
        "tipo_via": "avenida",
        "total_siniestros": 3,
        "total_delitos": 1,
        "total_fallecidos": 0,
        "indice_peligrosidad": indice_peligrosidad,
    })
}
