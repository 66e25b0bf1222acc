//! Ruta Segura Core - Shared domain types.
//!
//! This crate provides the types used across the Ruta Segura components:
//! - `admin` - Session, route guard, HTTP adapter and resource services
//! - `cli` - Terminal front end for the dashboard
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, the ordered [`Role`] and the closed
//!   vocabularies (severity, road type, vehicle type) the backend accepts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
