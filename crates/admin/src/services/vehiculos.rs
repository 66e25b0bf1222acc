//! Vehicles involved in an accident (`/vehiculos`).

use tracing::instrument;

use ruta_segura_core::{SiniestroId, VehiculoId};

use super::ensure_id;
use crate::http::{ApiClient, ApiError};
use crate::models::{ActualizarVehiculo, NuevoVehiculo, Vehiculo};

#[derive(Debug, Clone)]
pub struct VehiculosService {
    api: ApiClient,
}

impl VehiculosService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Vehicles recorded for one accident.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn list_by_siniestro(&self, siniestro: SiniestroId) -> Result<Vec<Vehiculo>, ApiError> {
        ensure_id("siniestro_id", siniestro.as_i64())?;
        self.api.get(&format!("/vehiculos/siniestro/{siniestro}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: VehiculoId) -> Result<Vehiculo, ApiError> {
        ensure_id("vehiculo_id", id.as_i64())?;
        self.api.get(&format!("/vehiculos/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the accident id is not positive.
    #[instrument(skip(self, nuevo), fields(siniestro_id = %nuevo.siniestro_id, tipo = %nuevo.tipo_vehiculo))]
    pub async fn create(&self, nuevo: &NuevoVehiculo) -> Result<Vehiculo, ApiError> {
        ensure_id("siniestro_id", nuevo.siniestro_id.as_i64())?;
        self.api.post("/vehiculos", nuevo).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self, cambios))]
    pub async fn update(
        &self,
        id: VehiculoId,
        cambios: &ActualizarVehiculo,
    ) -> Result<Vehiculo, ApiError> {
        ensure_id("vehiculo_id", id.as_i64())?;
        self.api.put(&format!("/vehiculos/{id}"), cambios).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: VehiculoId) -> Result<(), ApiError> {
        ensure_id("vehiculo_id", id.as_i64())?;
        self.api.delete(&format!("/vehiculos/{id}")).await
    }
}
