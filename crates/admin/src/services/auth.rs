//! Authentication endpoints (`/auth`).
//!
//! Login is a form-encoded password grant returning a bearer token; the
//! identity behind the token comes from `/auth/me`. Nothing here touches
//! the session itself: [`SessionStore::login`](crate::session::SessionStore::login)
//! drives these calls and owns the resulting state.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::invalid;
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::models::{Credential, Identity, NuevoUsuario, TokenResponse, Usuario};

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange email and password for a bearer credential.
    ///
    /// Sent without any Authorization header, so a rejected login never
    /// affects an existing session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if either field is blank,
    /// `ApiError::Unauthenticated` carrying the backend's message on bad
    /// credentials, and `ApiError::Decode` if the token is missing.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential, ApiError> {
        let username = username.trim();
        if username.is_empty() || password.expose_secret().is_empty() {
            return Err(invalid("Email and password are required".to_string()));
        }

        let request = ApiRequest::post("/auth/login")
            .anonymous()
            .form(&[("username", username), ("password", password.expose_secret())]);
        let token: TokenResponse = self.api.send(request).await?;

        let credential = Credential::new(token.access_token);
        if credential.is_blank() {
            return Err(ApiError::Decode("login response had an empty access_token".to_string()));
        }
        Ok(credential)
    }

    /// Identity behind `credential`, independent of the current session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` if the credential is rejected;
    /// the session is left alone either way.
    #[instrument(skip_all)]
    pub async fn me(&self, credential: &Credential) -> Result<Identity, ApiError> {
        self.api
            .send(ApiRequest::get("/auth/me").bearer(credential.secret()))
            .await
    }

    /// Full profile of the session user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` (and expires the session) if the
    /// session credential is no longer accepted.
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<Usuario, ApiError> {
        self.api.get("/auth/me").await
    }

    /// Self-registration. Does not log the new account in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a blank name or password, and
    /// `ApiError::Status` (400) if the email is already registered.
    #[instrument(skip(self, nuevo), fields(email = %nuevo.email.masked(), rol = %nuevo.rol))]
    pub async fn register(&self, nuevo: &NuevoUsuario) -> Result<Usuario, ApiError> {
        nuevo.validate().map_err(invalid)?;
        self.api
            .send(ApiRequest::post("/auth/register").anonymous().json(nuevo)?)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ruta_segura_core::{Email, Role};

    use super::super::tests::{assert_invalid, offline_client};
    use super::*;

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let auth = AuthService::new(offline_client());
        let password = SecretString::from("admin123".to_string());
        let empty = SecretString::from(String::new());

        assert_invalid(auth.login("   ", &password).await);
        assert_invalid(auth.login("admin@rutasegura.com", &empty).await);
    }

    #[tokio::test]
    async fn test_register_validates_before_sending() {
        let auth = AuthService::new(offline_client());
        let nuevo = NuevoUsuario {
            email: Email::parse("nuevo@rutasegura.com").unwrap(),
            nombre: " ".to_string(),
            rol: Role::Consultor,
            password: SecretString::from("secreto".to_string()),
        };
        assert_invalid(auth.register(&nuevo).await);
    }

    #[tokio::test]
    async fn test_login_offline_is_no_response() {
        let auth = AuthService::new(offline_client());
        let password = SecretString::from("admin123".to_string());
        let err = auth.login("admin@rutasegura.com", &password).await.unwrap_err();
        assert!(err.is_no_response());
    }
}
