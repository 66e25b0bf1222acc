//! Accident-type taxonomy (`/tipos-siniestro`).

use serde::{Deserialize, Serialize};

use ruta_segura_core::{Gravedad, TipoSiniestroId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipoSiniestro {
    pub id: TipoSiniestroId,
    pub nombre: String,
    pub gravedad: Gravedad,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NuevoTipoSiniestro {
    pub nombre: String,
    pub gravedad: Gravedad,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

impl NuevoTipoSiniestro {
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.nombre.trim().chars().count();
        if len == 0 || len > 100 {
            return Err("nombre must be 1 to 100 characters".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActualizarTipoSiniestro {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravedad: Option<Gravedad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}
