//! Dashboard user accounts (`/usuarios`).

use chrono::{NaiveDate, NaiveDateTime};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use ruta_segura_core::{Email, Role, UsuarioId};

use super::lenient;

/// A user account as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: UsuarioId,
    pub email: Email,
    pub nombre: String,
    pub rol: Role,
    #[serde(default, deserialize_with = "lenient::date")]
    pub fecha_registro: Option<NaiveDate>,
    #[serde(default)]
    pub activo: bool,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub ultimo_acceso: Option<NaiveDateTime>,
}

/// Body for creating a user, also used by `POST /auth/register`.
#[derive(Clone, Serialize)]
pub struct NuevoUsuario {
    pub email: Email,
    pub nombre: String,
    pub rol: Role,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
}

fn expose_password<S: Serializer>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(password.expose_secret())
}

impl NuevoUsuario {
    /// Check the fields the backend would reject.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.nombre.trim().is_empty() {
            return Err("nombre cannot be empty".to_string());
        }
        if self.password.expose_secret().is_empty() {
            return Err("password cannot be empty".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Debug for NuevoUsuario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NuevoUsuario")
            .field("email", &self.email)
            .field("nombre", &self.nombre)
            .field("rol", &self.rol)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Partial update; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActualizarUsuario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

impl ActualizarUsuario {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.nombre.is_none() && self.rol.is_none() && self.activo.is_none()
    }
}
