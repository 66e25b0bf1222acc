//! Accident-type taxonomy (`/tipos-siniestro`).

use tracing::instrument;

use ruta_segura_core::TipoSiniestroId;

use super::{Pagination, ensure_id, invalid};
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::models::{ActualizarTipoSiniestro, NuevoTipoSiniestro, TipoSiniestro};

#[derive(Debug, Clone)]
pub struct TiposSiniestroService {
    api: ApiClient,
}

impl TiposSiniestroService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a limit outside 1..=1000.
    #[instrument(skip(self))]
    pub async fn list(&self, page: Pagination) -> Result<Vec<TipoSiniestro>, ApiError> {
        self.api
            .send(page.apply(ApiRequest::get("/tipos-siniestro"))?)
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: TipoSiniestroId) -> Result<TipoSiniestro, ApiError> {
        ensure_id("tipo_id", id.as_i64())?;
        self.api.get(&format!("/tipos-siniestro/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a blank or overlong name.
    #[instrument(skip(self, nuevo), fields(nombre = %nuevo.nombre))]
    pub async fn create(&self, nuevo: &NuevoTipoSiniestro) -> Result<TipoSiniestro, ApiError> {
        nuevo.validate().map_err(invalid)?;
        self.api.post("/tipos-siniestro", nuevo).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id or a blank name.
    #[instrument(skip(self, cambios))]
    pub async fn update(
        &self,
        id: TipoSiniestroId,
        cambios: &ActualizarTipoSiniestro,
    ) -> Result<TipoSiniestro, ApiError> {
        ensure_id("tipo_id", id.as_i64())?;
        if cambios.nombre.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(invalid("nombre cannot be empty".to_string()));
        }
        self.api.put(&format!("/tipos-siniestro/{id}"), cambios).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: TipoSiniestroId) -> Result<(), ApiError> {
        ensure_id("tipo_id", id.as_i64())?;
        self.api.delete(&format!("/tipos-siniestro/{id}")).await
    }
}
