//! Ruta Segura dashboard client.
//!
//! Everything the dashboard needs between the user and the backend API:
//!
//! - [`session`]: who is logged in, persisted across restarts
//! - [`routes`]: the route table and the navigation guard
//! - [`http`]: the single HTTP adapter every request goes through
//! - [`services`]: one facade per backend resource
//! - [`views`]: page view-models with load, empty and error states
//!
//! [`state::AppState`] wires them together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod views;

pub use config::AdminConfig;
pub use error::AppError;
pub use http::{ApiClient, ApiError};
pub use routes::{AppRoute, Navigator, View};
pub use services::{Pagination, Services};
pub use session::{LoginOutcome, Session, SessionStore};
pub use state::AppState;
