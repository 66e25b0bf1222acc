//! Normalized errors surfaced by the API adapter.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Message used when a 401 arrives without a usable `detail`.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// Errors returned by [`ApiClient`](super::ApiClient) and every service built on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The backend rejected the credential (HTTP 401).
    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    /// The request never produced a response (connect, timeout, transport).
    #[error("No response from server: {0}")]
    NoResponse(String),

    /// The backend answered with an error status.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Parameters failed validation before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Human-readable message suitable for an inline error state.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unauthenticated { message } | Self::Status { message, .. } => message.clone(),
            Self::NoResponse(_) => {
                "Could not reach the server. Check your connection and try again".to_string()
            }
            Self::Decode(_) => "The server sent a response that could not be read".to_string(),
            Self::InvalidRequest(reason) => reason.clone(),
        }
    }

    /// True when no response was received at all.
    #[must_use]
    pub const fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse(_))
    }

    /// True for the error raised on HTTP 401.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthenticated { .. } => Some(401),
            _ => None,
        }
    }

    /// Whether a manual "try again" could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::NoResponse(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    /// Map a transport-level reqwest failure.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::NoResponse(err.to_string())
        }
    }

    /// Build the error for a non-success response from its status and body.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = detail_message(body);

        if status == StatusCode::UNAUTHORIZED {
            return Self::Unauthenticated {
                message: detail.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            };
        }

        let message = detail.unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
        });
        Self::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// FastAPI error body: `{"detail": "..."}` or `{"detail": [{"msg": "..."}]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl ValidationIssue {
    fn describe(&self) -> String {
        // loc is ["body", "field"]; only the field name is useful to a person
        match self.loc.last().and_then(serde_json::Value::as_str) {
            Some(field) if field != "body" && field != "query" => format!("{field}: {}", self.msg),
            _ => self.msg.clone(),
        }
    }
}

/// Extract the human-readable `detail` from an error body, if any.
fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.detail? {
        Detail::Message(message) => message,
        Detail::Validation(issues) => issues
            .iter()
            .map(ValidationIssue::describe)
            .collect::<Vec<_>>()
            .join("; "),
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}
