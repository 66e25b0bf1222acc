//! Geolocated crime reports (`/reportes-delito`).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ruta_segura_core::{Gravedad, ReporteDelitoId, UsuarioId};

use super::lenient;

/// A crime report as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporteDelito {
    pub id: ReporteDelitoId,
    pub usuario_id: UsuarioId,
    #[serde(default)]
    pub latitud: Option<Decimal>,
    #[serde(default)]
    pub longitud: Option<Decimal>,
    pub direccion_aproximada: String,
    pub tipo_delito: String,
    #[serde(default)]
    pub descripcion_breve: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub fecha_reporte: Option<NaiveDate>,
    #[serde(default)]
    pub hora_aproximada: Option<NaiveTime>,
    pub nivel_peligrosidad: Gravedad,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub fecha_registro: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub ultima_modificacion: Option<NaiveDateTime>,
    #[serde(default)]
    pub usuario_nombre: Option<String>,
}

/// Body for `POST /reportes-delito`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NuevoReporteDelito {
    pub usuario_id: UsuarioId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitud: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitud: Option<Decimal>,
    pub direccion_aproximada: String,
    pub tipo_delito: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion_breve: Option<String>,
    pub fecha_reporte: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora_aproximada: Option<NaiveTime>,
    pub nivel_peligrosidad: Gravedad,
}

/// Body for `PUT /reportes-delito/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActualizarReporteDelito {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitud: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitud: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion_aproximada: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_delito: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion_breve: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_reporte: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora_aproximada: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nivel_peligrosidad: Option<Gravedad>,
}

/// Reject coordinates outside ±90 / ±180.
fn check_coordinates(latitud: Option<Decimal>, longitud: Option<Decimal>) -> Result<(), String> {
    if let Some(lat) = latitud
        && lat.abs() > Decimal::from(90)
    {
        return Err(format!("latitud {lat} is outside -90..=90"));
    }
    if let Some(lon) = longitud
        && lon.abs() > Decimal::from(180)
    {
        return Err(format!("longitud {lon} is outside -180..=180"));
    }
    Ok(())
}

fn check_direccion(direccion: &str) -> Result<(), String> {
    let len = direccion.trim().chars().count();
    if !(5..=255).contains(&len) {
        return Err("direccion_aproximada must be 5 to 255 characters".to_string());
    }
    Ok(())
}

fn check_tipo_delito(tipo: &str) -> Result<(), String> {
    let len = tipo.trim().chars().count();
    if !(3..=50).contains(&len) {
        return Err("tipo_delito must be 3 to 50 characters".to_string());
    }
    Ok(())
}

fn check_descripcion(descripcion: Option<&str>) -> Result<(), String> {
    if descripcion.is_some_and(|d| d.chars().count() > 500) {
        return Err("descripcion_breve must be at most 500 characters".to_string());
    }
    Ok(())
}

impl NuevoReporteDelito {
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !self.usuario_id.is_valid() {
            return Err("usuario_id must be greater than 0".to_string());
        }
        check_coordinates(self.latitud, self.longitud)?;
        check_direccion(&self.direccion_aproximada)?;
        check_tipo_delito(&self.tipo_delito)?;
        check_descripcion(self.descripcion_breve.as_deref())
    }
}

impl ActualizarReporteDelito {
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        check_coordinates(self.latitud, self.longitud)?;
        if let Some(direccion) = &self.direccion_aproximada {
            check_direccion(direccion)?;
        }
        if let Some(tipo) = &self.tipo_delito {
            check_tipo_delito(tipo)?;
        }
        check_descripcion(self.descripcion_breve.as_deref())
    }
}
