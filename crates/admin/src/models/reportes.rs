//! Read-only analytics rows (`/reportes/...`).
//!
//! Every numeric field goes through [`lenient`](super::lenient): these
//! endpoints are raw SQL aggregates and their column names and types vary
//! with the backend's fallback queries.

use serde::{Deserialize, Serialize};

use ruta_segura_core::{AvenidaId, NivelSeguridad};

use super::lenient;

/// Totals for the whole dataset (`/reportes/resumen-general`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumenGeneral {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_siniestros: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_fallecidos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_heridos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub siniestros_graves: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub siniestros_fin_semana: u64,
}

/// Headline counters (`/reportes/estadisticas`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estadisticas {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_siniestros: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_fallecidos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_heridos: u64,
}

/// One row of `/reportes/siniestros-por-zona`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiniestrosPorZona {
    #[serde(default, deserialize_with = "lenient::label")]
    pub zona: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub tipo_via: String,
    #[serde(default, alias = "total", deserialize_with = "lenient::count")]
    pub total_siniestros: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_fallecidos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_heridos: u64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub promedio_victimas: f64,
}

/// One row of `/reportes/estadisticas-por-tipo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstadisticasPorTipo {
    #[serde(default, alias = "tipo", deserialize_with = "lenient::label")]
    pub tipo_siniestro: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub gravedad: String,
    #[serde(default, alias = "total", deserialize_with = "lenient::count")]
    pub cantidad: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub fallecidos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub heridos: u64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub promedio_vehiculos: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub siniestros_fin_semana: u64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub porcentaje_fin_semana: f64,
}

/// One row of `/reportes/siniestros-por-dia-semana`.
///
/// `dia_semana` is a weekday name or an ISO number (1 = Monday) depending
/// on the backend query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiniestrosPorDia {
    #[serde(default, deserialize_with = "lenient::label")]
    pub dia_semana: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub cantidad: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub fallecidos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub heridos: u64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub promedio_victimas: f64,
}

impl SiniestrosPorDia {
    /// Weekday name, translating ISO numbers.
    #[must_use]
    pub fn dia_nombre(&self) -> &str {
        match self.dia_semana.trim() {
            "1" => "Lunes",
            "2" => "Martes",
            "3" => "Miércoles",
            "4" => "Jueves",
            "5" => "Viernes",
            "6" => "Sábado",
            "7" => "Domingo",
            other => other,
        }
    }
}

/// Safety index of one avenue (`/reportes/analisis/...`).
///
/// `indice_peligrosidad = (3 × siniestros + 2 × delitos) × 1.5` when there
/// were fatalities; computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndiceSeguridad {
    pub avenida_id: AvenidaId,
    #[serde(default, deserialize_with = "lenient::label")]
    pub avenida_nombre: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub zona: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub tipo_via: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_siniestros: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_delitos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_fallecidos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_heridos: u64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub indice_peligrosidad: f64,
    #[serde(default)]
    pub nivel_seguridad: Option<NivelSeguridad>,
}

impl IndiceSeguridad {
    /// Backend label, or one derived from the index when absent.
    #[must_use]
    pub fn nivel(&self) -> NivelSeguridad {
        self.nivel_seguridad
            .unwrap_or_else(|| NivelSeguridad::from_indice(self.indice_peligrosidad))
    }
}

/// The three datasets of the safe-route analysis page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalisisRutaSegura {
    /// Every avenue, most dangerous first.
    pub indice: Vec<IndiceSeguridad>,
    /// Avenues with index ≤ 10, safest first.
    pub rutas_seguras: Vec<IndiceSeguridad>,
    /// Avenues with index > 25.
    pub zonas_peligrosas: Vec<IndiceSeguridad>,
}
