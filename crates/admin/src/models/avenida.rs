//! Streets and avenues (`/avenidas`).

use serde::{Deserialize, Serialize};

use ruta_segura_core::{AvenidaId, TipoVia};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avenida {
    pub id: AvenidaId,
    pub nombre: String,
    pub tipo: TipoVia,
    pub zona: String,
    #[serde(default)]
    pub longitud_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NuevaAvenida {
    pub nombre: String,
    pub tipo: TipoVia,
    pub zona: String,
    pub longitud_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActualizarAvenida {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoVia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zona: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitud_km: Option<f64>,
}

fn check_nombre(nombre: &str) -> Result<(), String> {
    let len = nombre.trim().chars().count();
    if len == 0 || len > 100 {
        return Err("nombre must be 1 to 100 characters".to_string());
    }
    Ok(())
}

fn check_zona(zona: &str) -> Result<(), String> {
    let len = zona.trim().chars().count();
    if len == 0 || len > 50 {
        return Err("zona must be 1 to 50 characters".to_string());
    }
    Ok(())
}

fn check_longitud(km: f64) -> Result<(), String> {
    if !km.is_finite() || km <= 0.0 {
        return Err("longitud_km must be greater than 0".to_string());
    }
    Ok(())
}

impl NuevaAvenida {
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        check_nombre(&self.nombre)?;
        check_zona(&self.zona)?;
        check_longitud(self.longitud_km)
    }
}

impl ActualizarAvenida {
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(nombre) = &self.nombre {
            check_nombre(nombre)?;
        }
        if let Some(zona) = &self.zona {
            check_zona(zona)?;
        }
        if let Some(km) = self.longitud_km {
            check_longitud(km)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bounds() {
        let mut avenida = NuevaAvenida {
            nombre: "Av. San Martín".to_string(),
            tipo: TipoVia::Avenida,
            zona: "Centro".to_string(),
            longitud_km: 4.2,
        };
        assert!(avenida.validate().is_ok());

        avenida.longitud_km = 0.0;
        assert!(avenida.validate().is_err());

        avenida.longitud_km = 1.0;
        avenida.zona = "x".repeat(51);
        assert!(avenida.validate().is_err());
    }

    #[test]
    fn test_update_only_checks_present_fields() {
        assert!(ActualizarAvenida::default().validate().is_ok());
        let update = ActualizarAvenida {
            nombre: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
