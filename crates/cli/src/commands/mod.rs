//! Subcommand implementations.

pub mod open;
pub mod resources;
pub mod session;

use std::io::BufRead;

use secrecy::SecretString;
use thiserror::Error;

use ruta_segura_admin::config::ConfigError;
use ruta_segura_admin::views::LoadState;
use ruta_segura_admin::{ApiError, AppError};
use ruta_segura_core::{EmailError, RoleParseError, VocabularyError};

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Login rejected; the message is the one the login form would show.
    #[error("{0}")]
    Login(String),

    /// A page could not be loaded. `retryable` failures are worth rerunning;
    /// `no_response` ones never reached the backend.
    #[error("{message}")]
    Page {
        message: String,
        retryable: bool,
        no_response: bool,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not read password: {0}")]
    Password(#[from] std::io::Error),
}

impl From<EmailError> for CliError {
    fn from(err: EmailError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<RoleParseError> for CliError {
    fn from(err: RoleParseError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<VocabularyError> for CliError {
    fn from(err: VocabularyError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl CliError {
    /// Follow-up line printed under the error, if rerunning may help.
    ///
    /// An unreachable backend and one that answered with an error are
    /// reported differently.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        let (retryable, no_response) = match self {
            Self::Page {
                retryable,
                no_response,
                ..
            } => (*retryable, *no_response),
            Self::Api(error) => (error.is_retryable(), error.is_no_response()),
            _ => return None,
        };
        if no_response {
            Some("the backend could not be reached, try again")
        } else if retryable {
            Some("the backend failed to answer, try again later")
        } else {
            None
        }
    }
}

/// Turn a failed page load into an error; loaded pages pass through.
fn ensure_loaded<T>(state: &LoadState<T>) -> Result<(), CliError> {
    match state {
        LoadState::Failed {
            message,
            retryable,
            no_response,
        } => Err(CliError::Page {
            message: message.clone(),
            retryable: *retryable,
            no_response: *no_response,
        }),
        _ => Ok(()),
    }
}

/// The password from the flag/environment, or the first line of stdin.
fn read_password(given: Option<String>) -> Result<SecretString, CliError> {
    if let Some(password) = given {
        return Ok(SecretString::from(password));
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}
