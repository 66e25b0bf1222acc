//! Streets and avenues (`/avenidas`).

use tracing::instrument;

use ruta_segura_core::AvenidaId;

use super::{Pagination, ensure_id, invalid};
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::models::{ActualizarAvenida, Avenida, NuevaAvenida};

#[derive(Debug, Clone)]
pub struct AvenidasService {
    api: ApiClient,
}

impl AvenidasService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a limit outside 1..=1000.
    #[instrument(skip(self))]
    pub async fn list(&self, page: Pagination) -> Result<Vec<Avenida>, ApiError> {
        self.api.send(page.apply(ApiRequest::get("/avenidas"))?).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: AvenidaId) -> Result<Avenida, ApiError> {
        ensure_id("avenida_id", id.as_i64())?;
        self.api.get(&format!("/avenidas/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the name, zone or length is
    /// out of range.
    #[instrument(skip(self, nueva), fields(nombre = %nueva.nombre))]
    pub async fn create(&self, nueva: &NuevaAvenida) -> Result<Avenida, ApiError> {
        nueva.validate().map_err(invalid)?;
        self.api.post("/avenidas", nueva).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id or an
    /// out-of-range field.
    #[instrument(skip(self, cambios))]
    pub async fn update(
        &self,
        id: AvenidaId,
        cambios: &ActualizarAvenida,
    ) -> Result<Avenida, ApiError> {
        ensure_id("avenida_id", id.as_i64())?;
        cambios.validate().map_err(invalid)?;
        self.api.put(&format!("/avenidas/{id}"), cambios).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: AvenidaId) -> Result<(), ApiError> {
        ensure_id("avenida_id", id.as_i64())?;
        self.api.delete(&format!("/avenidas/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use ruta_segura_core::TipoVia;

    use super::super::tests::{assert_invalid, offline_client};
    use super::*;

    #[tokio::test]
    async fn test_invalid_avenida_never_sent() {
        let avenidas = AvenidasService::new(offline_client());
        let nueva = NuevaAvenida {
            nombre: "Ruta 9".to_string(),
            tipo: TipoVia::Ruta,
            zona: "Norte".to_string(),
            longitud_km: -2.0,
        };
        assert_invalid(avenidas.create(&nueva).await);
        assert_invalid(avenidas.get(AvenidaId::new(0)).await);
    }
}
