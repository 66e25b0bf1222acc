//! Traffic accident records (`/siniestros`).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use ruta_segura_core::{AvenidaId, Gravedad, SiniestroId, TipoSiniestroId, UsuarioId};

use super::lenient;

/// An accident as returned by the backend.
///
/// `nivel_gravedad` stays a free string here: older rows hold values
/// outside the closed vocabulary and must still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Siniestro {
    pub id: SiniestroId,
    #[serde(default, deserialize_with = "lenient::date")]
    pub fecha: Option<NaiveDate>,
    #[serde(default)]
    pub hora: Option<NaiveTime>,
    pub avenida_id: AvenidaId,
    pub tipo_id: TipoSiniestroId,
    #[serde(default)]
    pub nivel_gravedad: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub victimas_fatales: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub heridos: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_vehiculos: u64,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub dia_semana: Option<String>,
    #[serde(default)]
    pub es_fin_de_semana: Option<bool>,
}

impl Siniestro {
    /// Severity, when it is one of the known levels.
    #[must_use]
    pub fn gravedad(&self) -> Option<Gravedad> {
        self.nivel_gravedad.as_deref().and_then(|g| g.parse().ok())
    }

    /// Fatalities plus injured.
    #[must_use]
    pub const fn total_victimas(&self) -> u64 {
        self.victimas_fatales + self.heridos
    }
}

/// Body for `POST /siniestros`.
///
/// `dia_semana` and `es_fin_de_semana` are derived by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NuevoSiniestro {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora: Option<NaiveTime>,
    pub avenida_id: AvenidaId,
    pub tipo_id: TipoSiniestroId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nivel_gravedad: Option<Gravedad>,
    pub victimas_fatales: u32,
    pub heridos: u32,
    pub num_vehiculos: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    pub usuario_id: UsuarioId,
}

impl NuevoSiniestro {
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !self.avenida_id.is_valid() {
            return Err("avenida_id must be greater than 0".to_string());
        }
        if !self.tipo_id.is_valid() {
            return Err("tipo_id must be greater than 0".to_string());
        }
        if !self.usuario_id.is_valid() {
            return Err("usuario_id must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Body for `PUT /siniestros/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActualizarSiniestro {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avenida_id: Option<AvenidaId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_id: Option<TipoSiniestroId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nivel_gravedad: Option<Gravedad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub victimas_fatales: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heridos: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_vehiculos: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
}

/// Foreign-key filters shared by list and count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiniestroFiltro {
    pub avenida_id: Option<AvenidaId>,
    pub tipo_id: Option<TipoSiniestroId>,
    pub nivel_gravedad: Option<Gravedad>,
}

/// `{"total": n}` as returned by the count endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Total {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_row_with_nulls() {
        let siniestro: Siniestro = serde_json::from_str(
            r#"{"id":10,"fecha":"2024-05-04","hora":"22:15:00","avenida_id":2,"tipo_id":1,
                "nivel_gravedad":"ALTA","victimas_fatales":null,"heridos":3,"num_vehiculos":2,
                "observaciones":null,"dia_semana":"Sábado","es_fin_de_semana":true}"#,
        )
        .unwrap();
        assert_eq!(siniestro.victimas_fatales, 0);
        assert_eq!(siniestro.total_victimas(), 3);
        assert_eq!(siniestro.gravedad(), Some(Gravedad::Alta));
        assert_eq!(siniestro.fecha.unwrap().to_string(), "2024-05-04");
    }

    #[test]
    fn test_unknown_severity_still_decodes() {
        let siniestro: Siniestro =
            serde_json::from_str(r#"{"id":1,"avenida_id":1,"tipo_id":1,"nivel_gravedad":"3"}"#)
                .unwrap();
        assert_eq!(siniestro.gravedad(), None);
        assert_eq!(siniestro.nivel_gravedad.as_deref(), Some("3"));
    }

    #[test]
    fn test_nuevo_requires_positive_ids() {
        let mut nuevo = NuevoSiniestro {
            fecha: None,
            hora: None,
            avenida_id: AvenidaId::new(1),
            tipo_id: TipoSiniestroId::new(2),
            nivel_gravedad: Some(Gravedad::Media),
            victimas_fatales: 0,
            heridos: 1,
            num_vehiculos: 2,
            observaciones: None,
            usuario_id: UsuarioId::new(1),
        };
        assert!(nuevo.validate().is_ok());
        let json = serde_json::to_value(&nuevo).unwrap();
        assert!(json.get("fecha").is_none());
        assert_eq!(json["nivel_gravedad"], "media");

        nuevo.usuario_id = UsuarioId::new(0);
        assert_eq!(nuevo.validate().unwrap_err(), "usuario_id must be greater than 0");
    }
}
