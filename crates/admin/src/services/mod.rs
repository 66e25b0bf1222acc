//! Typed facade over the backend resources.
//!
//! One service per resource. Each is a cheap `Clone` around the shared
//! [`ApiClient`], validates its parameters before touching the network
//! and passes backend errors through unchanged.
//!
//! # Services
//!
//! - `auth` - Login, current identity and self-registration
//! - `usuarios` - Dashboard accounts
//! - `avenidas` - Streets and avenues
//! - `tipos_siniestro` - Accident-type taxonomy
//! - `siniestros` - Accident records, filtered listing and counts
//! - `vehiculos` - Vehicles involved in an accident
//! - `reportes_delito` - Geolocated crime reports
//! - `reportes` - Read-only analytics and the safe-route analysis

pub mod auth;
pub mod avenidas;
pub mod reportes;
pub mod reportes_delito;
pub mod siniestros;
pub mod tipos_siniestro;
pub mod usuarios;
pub mod vehiculos;

pub use auth::AuthService;
pub use avenidas::AvenidasService;
pub use reportes::ReportesService;
pub use reportes_delito::ReportesDelitoService;
pub use siniestros::SiniestrosService;
pub use tipos_siniestro::TiposSiniestroService;
pub use usuarios::UsuariosService;
pub use vehiculos::VehiculosService;

use crate::http::{ApiClient, ApiError, ApiRequest};

/// `skip`/`limit` window for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Pagination {
    /// Largest page the backend accepts.
    pub const MAX_LIMIT: u32 = 1000;

    /// Page size the backend uses when none is given.
    pub const DEFAULT_LIMIT: u32 = 100;

    #[must_use]
    pub const fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// Everything the backend will return in one request.
    #[must_use]
    pub const fn all() -> Self {
        Self::new(0, Self::MAX_LIMIT)
    }

    fn validate(self) -> Result<(), ApiError> {
        if self.limit == 0 || self.limit > Self::MAX_LIMIT {
            return Err(ApiError::InvalidRequest(format!(
                "limit must be between 1 and {}, got {}",
                Self::MAX_LIMIT,
                self.limit
            )));
        }
        Ok(())
    }

    fn apply(self, request: ApiRequest) -> Result<ApiRequest, ApiError> {
        self.validate()?;
        Ok(request.query("skip", self.skip).query("limit", self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

/// Reject non-positive identifiers before building a path from them.
fn ensure_id(kind: &str, id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::InvalidRequest(format!(
            "{kind} must be greater than 0, got {id}"
        )));
    }
    Ok(())
}

/// Lift a model-level validation failure into the adapter's error type.
fn invalid(reason: String) -> ApiError {
    ApiError::InvalidRequest(reason)
}

/// All services, built over one client.
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthService,
    pub usuarios: UsuariosService,
    pub avenidas: AvenidasService,
    pub tipos_siniestro: TiposSiniestroService,
    pub siniestros: SiniestrosService,
    pub vehiculos: VehiculosService,
    pub reportes_delito: ReportesDelitoService,
    pub reportes: ReportesService,
}

impl Services {
    #[must_use]
    pub fn new(api: &ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            usuarios: UsuariosService::new(api.clone()),
            avenidas: AvenidasService::new(api.clone()),
            tipos_siniestro: TiposSiniestroService::new(api.clone()),
            siniestros: SiniestrosService::new(api.clone()),
            vehiculos: VehiculosService::new(api.clone()),
            reportes_delito: ReportesDelitoService::new(api.clone()),
            reportes: ReportesService::new(api.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::net::TcpListener;

    use super::*;
    use crate::config::AdminConfig;

    /// Client pointed at a port nothing listens on.
    ///
    /// Validation must fail before any request, so a `NoResponse` from
    /// this client means a request was sent when it should not have been.
    pub(crate) fn offline_client() -> ApiClient {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        ApiClient::builder(&AdminConfig::new(&format!("http://127.0.0.1:{port}")).unwrap())
            .build()
            .unwrap()
    }

    pub(crate) fn assert_invalid<T: std::fmt::Debug>(result: Result<T, ApiError>) {
        match result {
            Err(ApiError::InvalidRequest(_)) => {}
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(Pagination::new(0, 1).validate().is_ok());
        assert!(Pagination::all().validate().is_ok());
        assert!(Pagination::new(0, 0).validate().is_err());
        assert!(Pagination::new(5, 1001).validate().is_err());
        assert_eq!(Pagination::default().limit, 100);
    }

    #[test]
    fn test_ensure_id() {
        assert!(ensure_id("siniestro_id", 1).is_ok());
        assert_invalid(ensure_id("siniestro_id", 0));
        assert_invalid(ensure_id("siniestro_id", -4));
    }
}
