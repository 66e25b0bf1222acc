//! Single chokepoint for requests to the Ruta Segura backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::ApiError;
use crate::config::AdminConfig;

/// Source of the bearer credential attached to outgoing requests.
///
/// The session store implements this; the client only reads through it.
pub trait CredentialProvider: Send + Sync {
    /// Current credential, if a session is active.
    fn credential(&self) -> Option<SecretString>;
}

/// Callback fired when the backend rejects the session credential.
///
/// Receives the token the rejected request carried, which may no longer be
/// the session's current one.
pub type UnauthorizedHook = Arc<dyn Fn(&SecretString) + Send + Sync>;

/// Which credential a request carries.
#[derive(Clone, Default)]
enum RequestAuth {
    /// Whatever the session currently holds.
    #[default]
    Session,
    /// A specific token, independent of the session.
    Bearer(SecretString),
    /// No Authorization header.
    Anonymous,
}

#[derive(Clone, Default)]
enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A request to the backend, built up before being handed to [`ApiClient::send`].
#[derive(Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    auth: RequestAuth,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            auth: RequestAuth::Session,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is present.
    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("could not encode body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attach a form-encoded body.
    #[must_use]
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.body = RequestBody::Form(
            fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        );
        self
    }

    /// Send with this token instead of the session's.
    ///
    /// A 401 on such a request never clears the session.
    #[must_use]
    pub fn bearer(mut self, token: SecretString) -> Self {
        self.auth = RequestAuth::Bearer(token);
        self
    }

    /// Send without any Authorization header.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.auth = RequestAuth::Anonymous;
        self
    }

    /// Request path, relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auth = match self.auth {
            RequestAuth::Session => "session",
            RequestAuth::Bearer(_) => "bearer",
            RequestAuth::Anonymous => "anonymous",
        };
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("auth", &auth)
            .finish_non_exhaustive()
    }
}

/// HTTP client for the backend API.
///
/// Cheap to clone; all clones share the connection pool, the credential
/// source and the unauthorized hook.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Arc<dyn CredentialProvider>>,
    on_unauthorized: Option<UnauthorizedHook>,
}

/// Builder wiring the credential source and unauthorized hook into an [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: Url,
    timeout: std::time::Duration,
    credentials: Option<Arc<dyn CredentialProvider>>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClientBuilder {
    /// Read the bearer credential from `provider` on every session request.
    #[must_use]
    pub fn credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Register the callback fired when the session credential is rejected.
    #[must_use]
    pub fn on_unauthorized<F>(mut self, hook: F) -> Self
    where
        F: Fn(&SecretString) + Send + Sync + 'static,
    {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the HTTP client fails to build.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("ruta-segura-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: self.base_url,
                credentials: self.credentials,
                on_unauthorized: self.on_unauthorized,
            }),
        })
    }
}

impl ApiClient {
    /// Start building a client for the configured backend.
    #[must_use]
    pub fn builder(config: &AdminConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: config.api_base_url.clone(),
            timeout: config.http_timeout,
            credentials: None,
            on_unauthorized: None,
        }
    }

    /// Send a request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` on 401 (after firing the
    /// unauthorized hook if the session credential was used),
    /// `ApiError::NoResponse` when nothing came back, `ApiError::Status`
    /// for other error statuses and `ApiError::Decode` for bodies of the
    /// wrong shape.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(error = %e, "Failed to decode API response");
            ApiError::Decode(e.to_string())
        })
    }

    /// Send a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`], minus `Decode`.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(drop)
    }

    /// GET `path` and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path)).await
    }

    /// POST `body` as JSON to `path` and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    /// PUT `body` as JSON to `path` and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    /// DELETE `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_empty`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::delete(path)).await
    }

    /// Resolve a request path and query against the base URL.
    fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidRequest(format!("invalid path {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let url = self.url(&request.path, &request.query)?;

        let (token, from_session) = match request.auth {
            RequestAuth::Session => (
                self.inner
                    .credentials
                    .as_ref()
                    .and_then(|provider| provider.credential()),
                true,
            ),
            RequestAuth::Bearer(token) => (Some(token), false),
            RequestAuth::Anonymous => (None, false),
        };

        let mut builder = self.inner.client.request(request.method, url);
        if let Some(token) = &token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed without a response");
            ApiError::from_transport(&e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "API request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, &body);

        match (&token, &self.inner.on_unauthorized) {
            (Some(token), Some(hook)) if status == StatusCode::UNAUTHORIZED && from_session => {
                tracing::warn!("Session credential rejected");
                hook(token);
            }
            _ => {
                tracing::debug!(status = status.as_u16(), error = %error, "API request failed");
            }
        }

        Err(error)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("has_credentials", &self.inner.credentials.is_some())
            .field("has_unauthorized_hook", &self.inner.on_unauthorized.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::builder(&AdminConfig::new(base).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_url_joins_path_and_query() {
        let api = client("http://localhost:8000/api");
        let url = api
            .url(
                "/siniestros",
                &[
                    ("skip".to_string(), "0".to_string()),
                    ("nivel_gravedad".to_string(), "alta".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/siniestros?skip=0&nivel_gravedad=alta"
        );
    }

    #[test]
    fn test_query_opt_skips_none() {
        let request = ApiRequest::get("/reportes-delito")
            .query("limit", 100)
            .query_opt("tipo_delito", None::<&str>)
            .query_opt("skip", Some(20));
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "100".to_string()),
                ("skip".to_string(), "20".to_string())
            ]
        );
    }

    #[test]
    fn test_debug_hides_bearer_token() {
        let request = ApiRequest::get("/auth/me").bearer(SecretString::from("s3cr3t-token".to_string()));
        let debug = format!("{request:?}");
        assert!(debug.contains("bearer"));
        assert!(!debug.contains("s3cr3t-token"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_no_response() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let api = ApiClient::builder(&AdminConfig::new(&format!("http://127.0.0.1:{port}")).unwrap())
            .on_unauthorized(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        let err = api.get::<serde_json::Value>("/siniestros").await.unwrap_err();
        assert!(err.is_no_response(), "unexpected error: {err:?}");
        assert!(err.is_retryable());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
