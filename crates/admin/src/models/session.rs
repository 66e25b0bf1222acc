//! Session-related types for dashboard authentication.
//!
//! Types persisted in session storage for authentication state.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use ruta_segura_core::{Email, Role, UsuarioId};

/// The logged-in user, as returned by `GET /auth/me`.
///
/// Extra fields the backend sends (`fecha_registro`, `activo`, ...) are
/// ignored; only what authorization and display need is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User's backend ID.
    pub id: UsuarioId,
    /// Display name.
    pub nombre: String,
    /// Login email.
    pub email: Email,
    /// Permission level.
    pub rol: Role,
}

impl Identity {
    /// Whether this user's role grants at least `required`.
    #[must_use]
    pub fn satisfies(&self, required: Role) -> bool {
        self.rol.satisfies(required)
    }
}

/// Opaque bearer token issued by `POST /auth/login`.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The token as a secret, for attaching to requests.
    #[must_use]
    pub fn secret(&self) -> SecretString {
        self.0.clone()
    }

    /// Raw token, for persistence only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Blank tokens are treated as absent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Body of a successful `POST /auth/login`.
#[derive(Deserialize)]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Always `bearer`.
    #[serde(default)]
    pub token_type: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Storage keys for persisted session data.
pub mod keys {
    /// Key for the bearer credential.
    pub const TOKEN: &str = "token";

    /// Key for the serialized [`Identity`](super::Identity).
    pub const USER: &str = "user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_auth_me_ignores_extra_fields() {
        let identity: Identity = serde_json::from_str(
            r#"{"id":1,"email":"admin@rutasegura.com","nombre":"Administrador",
                "rol":"admin","fecha_registro":"2024-01-10","activo":true,"ultimo_acceso":null}"#,
        )
        .unwrap();
        assert_eq!(identity.id, UsuarioId::new(1));
        assert_eq!(identity.rol, Role::Admin);
        assert!(identity.satisfies(Role::Editor));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("eyJhbGciOiJIUzI1NiJ9.payload.sig");
        assert_eq!(format!("{credential:?}"), "Credential([REDACTED])");
        assert!(!credential.is_blank());
        assert!(Credential::new("   ").is_blank());
    }

    #[test]
    fn test_token_response_debug_is_redacted() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc.def.ghi","token_type":"bearer"}"#).unwrap();
        assert!(!format!("{token:?}").contains("abc.def.ghi"));
    }
}
