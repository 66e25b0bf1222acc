//! Read-only analytics (`/reportes`).

use tracing::instrument;

use super::Pagination;
use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    AnalisisRutaSegura, Estadisticas, EstadisticasPorTipo, IndiceSeguridad, ResumenGeneral,
    SiniestrosPorDia, SiniestrosPorZona,
};

/// Rows the backend returns for the ranked analyses when no limit is given.
pub const DEFAULT_RANKING_LIMIT: u32 = 5;

#[derive(Debug, Clone)]
pub struct ReportesService {
    api: ApiClient,
}

fn ranking_request(path: &str, limit: u32) -> Result<ApiRequest, ApiError> {
    if limit == 0 || limit > Pagination::MAX_LIMIT {
        return Err(ApiError::InvalidRequest(format!(
            "limit must be between 1 and {}, got {limit}",
            Pagination::MAX_LIMIT
        )));
    }
    Ok(ApiRequest::get(path).query("limit", limit))
}

impl ReportesService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Overall accident, death and injury totals.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    #[instrument(skip(self))]
    pub async fn estadisticas(&self) -> Result<Estadisticas, ApiError> {
        self.api.get("/reportes/estadisticas").await
    }

    /// Dashboard headline numbers.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    #[instrument(skip(self))]
    pub async fn resumen_general(&self) -> Result<ResumenGeneral, ApiError> {
        self.api.get("/reportes/resumen-general").await
    }

    /// # Errors
    ///
    /// Propagates backend errors.
    #[instrument(skip(self))]
    pub async fn siniestros_por_zona(&self) -> Result<Vec<SiniestrosPorZona>, ApiError> {
        self.api.get("/reportes/siniestros-por-zona").await
    }

    /// # Errors
    ///
    /// Propagates backend errors.
    #[instrument(skip(self))]
    pub async fn estadisticas_por_tipo(&self) -> Result<Vec<EstadisticasPorTipo>, ApiError> {
        self.api.get("/reportes/estadisticas-por-tipo").await
    }

    /// # Errors
    ///
    /// Propagates backend errors.
    #[instrument(skip(self))]
    pub async fn siniestros_por_dia_semana(&self) -> Result<Vec<SiniestrosPorDia>, ApiError> {
        self.api.get("/reportes/siniestros-por-dia-semana").await
    }

    /// Danger index for every avenue.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    #[instrument(skip(self))]
    pub async fn indice_seguridad(&self) -> Result<Vec<IndiceSeguridad>, ApiError> {
        self.api.get("/reportes/analisis/indice-seguridad").await
    }

    /// Safest avenues, lowest index first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a limit outside 1..=1000.
    #[instrument(skip(self))]
    pub async fn rutas_seguras(&self, limit: u32) -> Result<Vec<IndiceSeguridad>, ApiError> {
        self.api
            .send(ranking_request("/reportes/analisis/rutas-seguras", limit)?)
            .await
    }

    /// Most dangerous avenues, highest index first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for a limit outside 1..=1000.
    #[instrument(skip(self))]
    pub async fn zonas_peligrosas(&self, limit: u32) -> Result<Vec<IndiceSeguridad>, ApiError> {
        self.api
            .send(ranking_request("/reportes/analisis/zonas-peligrosas", limit)?)
            .await
    }

    /// Index, safe routes and dangerous zones fetched concurrently.
    ///
    /// Fails as a whole: if any of the three requests fails, that error is
    /// returned and the others are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first error among the three requests.
    #[instrument(skip(self))]
    pub async fn analisis_ruta_segura(&self, limit: u32) -> Result<AnalisisRutaSegura, ApiError> {
        let (indice, rutas_seguras, zonas_peligrosas) = tokio::try_join!(
            self.indice_seguridad(),
            self.rutas_seguras(limit),
            self.zonas_peligrosas(limit),
        )?;
        tracing::debug!(
            avenidas = indice.len(),
            rutas = rutas_seguras.len(),
            zonas = zonas_peligrosas.len(),
            "Safe-route analysis loaded"
        );
        Ok(AnalisisRutaSegura {
            indice,
            rutas_seguras,
            zonas_peligrosas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{assert_invalid, offline_client};
    use super::*;

    #[tokio::test]
    async fn test_ranking_limit_checked_first() {
        let reportes = ReportesService::new(offline_client());
        assert_invalid(reportes.rutas_seguras(0).await);
        assert_invalid(reportes.zonas_peligrosas(1001).await);
    }

    #[tokio::test]
    async fn test_analysis_offline_is_retryable() {
        let reportes = ReportesService::new(offline_client());
        let err = reportes
            .analisis_ruta_segura(DEFAULT_RANKING_LIMIT)
            .await
            .err();
        assert!(err.is_some_and(|e| e.is_retryable()));
    }
}
