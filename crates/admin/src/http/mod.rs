//! HTTP adapter for the backend API.
//!
//! Every outbound request goes through [`ApiClient`]. It attaches the
//! session's bearer credential, maps failures onto [`ApiError`], and fires
//! the registered unauthorized hook when the backend rejects that credential.

mod client;
mod error;

pub use client::{ApiClient, ApiClientBuilder, ApiRequest, CredentialProvider, UnauthorizedHook};
pub use error::{ApiError, SESSION_EXPIRED_MESSAGE};
