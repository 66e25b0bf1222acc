//! Dashboard accounts (`/usuarios`). Writes are admin-only on the backend.

use tracing::instrument;

use ruta_segura_core::UsuarioId;

use super::{Pagination, ensure_id, invalid};
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::models::{ActualizarUsuario, NuevoUsuario, Usuario};

#[derive(Debug, Clone)]
pub struct UsuariosService {
    api: ApiClient,
}

impl UsuariosService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a limit outside 1..=1000.
    #[instrument(skip(self))]
    pub async fn list(&self, page: Pagination) -> Result<Vec<Usuario>, ApiError> {
        self.api.send(page.apply(ApiRequest::get("/usuarios"))?).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id and
    /// `ApiError::Status` (404) if the user does not exist.
    #[instrument(skip(self))]
    pub async fn get(&self, id: UsuarioId) -> Result<Usuario, ApiError> {
        ensure_id("usuario_id", id.as_i64())?;
        self.api.get(&format!("/usuarios/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a blank name or password.
    #[instrument(skip(self, nuevo), fields(email = %nuevo.email.masked(), rol = %nuevo.rol))]
    pub async fn create(&self, nuevo: &NuevoUsuario) -> Result<Usuario, ApiError> {
        nuevo.validate().map_err(invalid)?;
        self.api.post("/usuarios", nuevo).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id or an
    /// update with no fields set.
    #[instrument(skip(self, cambios))]
    pub async fn update(
        &self,
        id: UsuarioId,
        cambios: &ActualizarUsuario,
    ) -> Result<Usuario, ApiError> {
        ensure_id("usuario_id", id.as_i64())?;
        if cambios.is_empty() {
            return Err(invalid("update has no fields set".to_string()));
        }
        if cambios.nombre.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(invalid("nombre cannot be empty".to_string()));
        }
        self.api.put(&format!("/usuarios/{id}"), cambios).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UsuarioId) -> Result<(), ApiError> {
        ensure_id("usuario_id", id.as_i64())?;
        self.api.delete(&format!("/usuarios/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{assert_invalid, offline_client};
    use super::*;

    #[tokio::test]
    async fn test_rejects_before_sending() {
        let usuarios = UsuariosService::new(offline_client());
        assert_invalid(usuarios.get(UsuarioId::new(0)).await);
        assert_invalid(usuarios.delete(UsuarioId::new(-1)).await);
        assert_invalid(usuarios.list(Pagination::new(0, 5000)).await);
        assert_invalid(
            usuarios
                .update(UsuarioId::new(2), &ActualizarUsuario::default())
                .await,
        );
    }
}
