//! Domain models for the dashboard.
//!
//! Wire types for every backend resource, plus the session identity.

mod lenient;

pub mod avenida;
pub mod reporte_delito;
pub mod reportes;
pub mod session;
pub mod siniestro;
pub mod tipo_siniestro;
pub mod usuario;
pub mod vehiculo;

pub use avenida::{ActualizarAvenida, Avenida, NuevaAvenida};
pub use reporte_delito::{ActualizarReporteDelito, NuevoReporteDelito, ReporteDelito};
pub use reportes::{
    AnalisisRutaSegura, Estadisticas, EstadisticasPorTipo, IndiceSeguridad, ResumenGeneral,
    SiniestrosPorDia, SiniestrosPorZona,
};
pub use session::{Credential, Identity, TokenResponse, keys};
pub use siniestro::{ActualizarSiniestro, NuevoSiniestro, Siniestro, SiniestroFiltro, Total};
pub use tipo_siniestro::{ActualizarTipoSiniestro, NuevoTipoSiniestro, TipoSiniestro};
pub use usuario::{ActualizarUsuario, NuevoUsuario, Usuario};
pub use vehiculo::{ActualizarVehiculo, NuevoVehiculo, Vehiculo};
