//! Geolocated crime reports (`/reportes-delito`).

use tracing::instrument;

use ruta_segura_core::ReporteDelitoId;

use super::{Pagination, ensure_id, invalid};
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::models::{ActualizarReporteDelito, NuevoReporteDelito, ReporteDelito, Total};

#[derive(Debug, Clone)]
pub struct ReportesDelitoService {
    api: ApiClient,
}

/// Blank filters mean "no filter".
fn tipo_filter(tipo_delito: Option<&str>) -> Option<&str> {
    tipo_delito.map(str::trim).filter(|t| !t.is_empty())
}

impl ReportesDelitoService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Page of reports, optionally restricted to one crime type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a limit outside 1..=1000.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: Pagination,
        tipo_delito: Option<&str>,
    ) -> Result<Vec<ReporteDelito>, ApiError> {
        let request = page
            .apply(ApiRequest::get("/reportes-delito"))?
            .query_opt("tipo_delito", tipo_filter(tipo_delito));
        self.api.send(request).await
    }

    /// Number of reports, optionally restricted to one crime type.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    #[instrument(skip(self))]
    pub async fn total(&self, tipo_delito: Option<&str>) -> Result<u64, ApiError> {
        let request = ApiRequest::get("/reportes-delito/estadisticas/total")
            .query_opt("tipo_delito", tipo_filter(tipo_delito));
        let total: Total = self.api.send(request).await?;
        Ok(total.total)
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ReporteDelitoId) -> Result<ReporteDelito, ApiError> {
        ensure_id("reporte_id", id.as_i64())?;
        self.api.get(&format!("/reportes-delito/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for coordinates out of range or
    /// text fields outside their length bounds.
    #[instrument(skip(self, nuevo), fields(tipo_delito = %nuevo.tipo_delito))]
    pub async fn create(&self, nuevo: &NuevoReporteDelito) -> Result<ReporteDelito, ApiError> {
        nuevo.validate().map_err(invalid)?;
        self.api.post("/reportes-delito", nuevo).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id or an
    /// out-of-range field.
    #[instrument(skip(self, cambios))]
    pub async fn update(
        &self,
        id: ReporteDelitoId,
        cambios: &ActualizarReporteDelito,
    ) -> Result<ReporteDelito, ApiError> {
        ensure_id("reporte_id", id.as_i64())?;
        cambios.validate().map_err(invalid)?;
        self.api.put(&format!("/reportes-delito/{id}"), cambios).await
    }

    /// Delete a report. The backend's confirmation message is discarded.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a non-positive id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ReporteDelitoId) -> Result<(), ApiError> {
        ensure_id("reporte_id", id.as_i64())?;
        self.api.delete(&format!("/reportes-delito/{id}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use ruta_segura_core::{Gravedad, UsuarioId};

    use super::super::tests::{assert_invalid, offline_client};
    use super::*;

    #[test]
    fn test_blank_tipo_is_no_filter() {
        assert_eq!(tipo_filter(Some("  Robo ")), Some("Robo"));
        assert_eq!(tipo_filter(Some("   ")), None);
        assert_eq!(tipo_filter(None), None);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_never_sent() {
        let reportes = ReportesDelitoService::new(offline_client());
        let nuevo = NuevoReporteDelito {
            usuario_id: UsuarioId::new(1),
            latitud: Some(Decimal::from(91)),
            longitud: Some(Decimal::from(-58)),
            direccion_aproximada: "Av. Corrientes 1200".to_string(),
            tipo_delito: "Robo".to_string(),
            descripcion_breve: None,
            fecha_reporte: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            hora_aproximada: None,
            nivel_peligrosidad: Gravedad::Media,
        };
        assert_invalid(reportes.create(&nuevo).await);
        assert_invalid(reportes.delete(ReporteDelitoId::new(0)).await);
    }
}
