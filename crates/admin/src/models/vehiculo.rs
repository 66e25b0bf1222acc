//! Vehicles involved in an accident (`/vehiculos`).

use serde::{Deserialize, Serialize};

use ruta_segura_core::{RolVehiculo, SiniestroId, TipoVehiculo, VehiculoId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehiculo {
    pub vehiculo_id: VehiculoId,
    pub siniestro_id: SiniestroId,
    pub tipo_vehiculo: TipoVehiculo,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub modelo: Option<String>,
    pub rol: RolVehiculo,
    #[serde(default)]
    pub es_fallecido: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NuevoVehiculo {
    pub siniestro_id: SiniestroId,
    pub tipo_vehiculo: TipoVehiculo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,
    pub rol: RolVehiculo,
    pub es_fallecido: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActualizarVehiculo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_vehiculo: Option<TipoVehiculo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<RolVehiculo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_fallecido: Option<bool>,
}
