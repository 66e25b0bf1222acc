//! Session commands: login, logout, whoami and account registration.

use secrecy::SecretString;

use ruta_segura_admin::models::NuevoUsuario;
use ruta_segura_admin::routes::nav_items;
use ruta_segura_admin::{AppState, LoginOutcome};
use ruta_segura_core::{Email, Role};

use super::{CliError, read_password};
use crate::output;

pub async fn login(state: &AppState, email: &str, password: Option<String>) -> Result<(), CliError> {
    let password: SecretString = read_password(password)?;

    match state.login(email, &password).await {
        LoginOutcome::Success(identity) => {
            output::line(&format!(
                "Logged in as {} <{}> ({})",
                identity.nombre, identity.email, identity.rol
            ));
            Ok(())
        }
        LoginOutcome::Failure { message } => Err(CliError::Login(message)),
    }
}

pub fn logout(state: &AppState) {
    state.logout();
    output::line("Logged out");
}

/// Print the persisted identity, then confirm it with the backend.
pub async fn whoami(state: &AppState) -> Result<(), CliError> {
    let session = state.session().current();
    let Some(identity) = session.identity() else {
        output::line("Not logged in");
        return Ok(());
    };

    output::line(&format!(
        "{} <{}> ({})",
        identity.nombre,
        identity.email.masked(),
        identity.rol
    ));
    let pages: Vec<&str> = nav_items(&session).into_iter().map(|r| r.to_path()).collect();
    output::line(&format!("Pages: {}", pages.join(" ")));

    // A rejected token ends the session through the unauthorized hook
    let usuario = state.services().auth.current().await?;
    if let Some(ultimo) = usuario.ultimo_acceso {
        output::line(&format!("Last access: {ultimo}"));
    }
    Ok(())
}

pub async fn register(
    state: &AppState,
    email: &str,
    nombre: &str,
    rol: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let nuevo = NuevoUsuario {
        email: Email::parse(email)?,
        nombre: nombre.to_string(),
        rol: rol.parse::<Role>()?,
        password: read_password(password)?,
    };

    let usuario = state.services().auth.register(&nuevo).await?;
    output::line(&format!(
        "Registered {} <{}> with ID {}",
        usuario.nombre, usuario.email, usuario.id
    ));
    Ok(())
}
