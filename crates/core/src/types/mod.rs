//! Core types for Ruta Segura.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleParseError};
pub use status::{Gravedad, NivelSeguridad, RolVehiculo, TipoVehiculo, TipoVia, VocabularyError};
