//! Ruta Segura CLI - the dashboard from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password from RUTA_SEGURA_PASSWORD or stdin)
//! ruta-segura login -e admin@rutasegura.com
//!
//! # Render a dashboard page through the route guard
//! ruta-segura open /dashboard
//! ruta-segura open /usuarios
//!
//! # Resources
//! ruta-segura siniestros list --gravedad alta --limit 20
//! ruta-segura reportes list --tipo Robo
//! ruta-segura analisis --limit 10
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session management
//! - `register` - Create an account (no session needed)
//! - `open` - Navigate to a dashboard path and render the page
//! - `siniestros`, `vehiculos`, `reportes`, `usuarios` - Resource access
//! - `analisis` - Safe-route analysis

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use ruta_segura_admin::config::LogFormat;
use ruta_segura_admin::{AdminConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::CliError;

#[derive(Parser)]
#[command(name = "ruta-segura")]
#[command(author, version, about = "Ruta Segura dashboard CLI")]
struct Cli {
    /// Backend API base URL (overrides `RUTA_SEGURA_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when absent
        #[arg(long, env = "RUTA_SEGURA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Clear the persisted session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        nombre: String,

        /// Role (`consultor`, `editor`, `admin`)
        #[arg(short, long, default_value = "consultor")]
        rol: String,

        #[arg(long, env = "RUTA_SEGURA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Navigate to a dashboard path and render the page
    Open {
        /// Path such as `/dashboard` or `/usuarios`
        #[arg(default_value = "/")]
        path: String,
    },
    /// Accident records
    Siniestros {
        #[command(subcommand)]
        action: commands::resources::SiniestrosAction,
    },
    /// Vehicles involved in an accident
    Vehiculos {
        /// Accident ID
        siniestro: i64,
    },
    /// Crime reports
    Reportes {
        #[command(subcommand)]
        action: commands::resources::ReportesAction,
    },
    /// User management (admin only)
    Usuarios {
        #[command(subcommand)]
        action: commands::resources::UsuariosAction,
    },
    /// Safety index, safest routes and most dangerous zones
    Analisis {
        /// Rows per ranking
        #[arg(short, long, default_value_t = 5)]
        limit: u32,
    },
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ruta_segura_admin=info,ruta_segura=info".into());

    let json_layer = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::error(&e);
            std::process::exit(2);
        }
    };
    init_tracing(config.log_format);

    if let Err(e) = run(cli.command, config).await {
        tracing::debug!(error = %e, "Command failed");
        output::error(&e);
        if let Some(hint) = e.hint() {
            output::error(&hint);
        }
        std::process::exit(1);
    }
}

fn load_config(api_url: Option<&str>) -> Result<AdminConfig, CliError> {
    let config = AdminConfig::from_env()?;
    Ok(match api_url {
        Some(url) => AdminConfig {
            api_base_url: AdminConfig::new(url)?.api_base_url,
            ..config
        },
        None => config,
    })
}

async fn run(command: Commands, config: AdminConfig) -> Result<(), CliError> {
    let state = AppState::new(config)?;
    state.restore();

    match command {
        Commands::Login { email, password } => {
            commands::session::login(&state, &email, password).await?;
        }
        Commands::Logout => commands::session::logout(&state),
        Commands::Whoami => commands::session::whoami(&state).await?,
        Commands::Register {
            email,
            nombre,
            rol,
            password,
        } => commands::session::register(&state, &email, &nombre, &rol, password).await?,
        Commands::Open { path } => commands::open::open(&state, &path).await?,
        Commands::Siniestros { action } => commands::resources::siniestros(&state, action).await?,
        Commands::Vehiculos { siniestro } => {
            commands::resources::vehiculos(&state, siniestro).await?;
        }
        Commands::Reportes { action } => commands::resources::reportes(&state, action).await?,
        Commands::Usuarios { action } => commands::resources::usuarios(&state, action).await?,
        Commands::Analisis { limit } => commands::open::analisis(&state, limit).await?,
    }
    Ok(())
}
