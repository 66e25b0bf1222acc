//! Accident records (`/siniestros`).

use tracing::instrument;

use ruta_segura_core::SiniestroId;

use super::{Pagination, ensure_id, invalid};
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::models::{ActualizarSiniestro, NuevoSiniestro, Siniestro, SiniestroFiltro, Total};

#[derive(Debug, Clone)]
pub struct SiniestrosService {
    api: ApiClient,
}

impl SiniestroFiltro {
    fn validate(self) -> Result<(), ApiError> {
        if let Some(avenida) = self.avenida_id {
            ensure_id("avenida_id", avenida.as_i64())?;
        }
        if let Some(tipo) = self.tipo_id {
            ensure_id("tipo_id", tipo.as_i64())?;
        }
        Ok(())
    }

    fn apply(self, request: ApiRequest) -> Result<ApiRequest, ApiError> {
        self.validate()?;
        Ok(request
            .query_opt("avenida_id", self.avenida_id)
            .query_opt("tipo_id", self.tipo_id)
            .query_opt("nivel_gravedad", self.nivel_gravedad))
    }
}

impl SiniestrosService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Page of accidents matching `filtro`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a limit outside 1..=1000 or
    /// a non-positive filter id.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: Pagination,
        filtro: SiniestroFiltro,
    ) -> Result<Vec<Siniestro>, ApiError> {
        let request = filtro.apply(page.apply(ApiRequest::get("/siniestros"))?)?;
        self.api.send(request).await
    }

    /// Number of accidents matching `filtro`, for paging.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive filter id.
    #[instrument(skip(self))]
    pub async fn count(&self, filtro: SiniestroFiltro) -> Result<u64, ApiError> {
        let request = filtro.apply(ApiRequest::get("/siniestros/count"))?;
        let total: Total = self.api.send(request).await?;
        Ok(total.total)
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: SiniestroId) -> Result<Siniestro, ApiError> {
        ensure_id("siniestro_id", id.as_i64())?;
        self.api.get(&format!("/siniestros/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if any referenced id is not positive.
    #[instrument(skip(self, nuevo), fields(avenida_id = %nuevo.avenida_id, tipo_id = %nuevo.tipo_id))]
    pub async fn create(&self, nuevo: &NuevoSiniestro) -> Result<Siniestro, ApiError> {
        nuevo.validate().map_err(invalid)?;
        self.api.post("/siniestros", nuevo).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id, including
    /// the avenue and type references carried by `cambios`.
    #[instrument(skip(self, cambios))]
    pub async fn update(
        &self,
        id: SiniestroId,
        cambios: &ActualizarSiniestro,
    ) -> Result<Siniestro, ApiError> {
        ensure_id("siniestro_id", id.as_i64())?;
        if let Some(avenida) = cambios.avenida_id {
            ensure_id("avenida_id", avenida.as_i64())?;
        }
        if let Some(tipo) = cambios.tipo_id {
            ensure_id("tipo_id", tipo.as_i64())?;
        }
        self.api.put(&format!("/siniestros/{id}"), cambios).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SiniestroId) -> Result<(), ApiError> {
        ensure_id("siniestro_id", id.as_i64())?;
        self.api.delete(&format!("/siniestros/{id}")).await
    }
}
