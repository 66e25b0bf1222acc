//! Resource subcommands built on the service facade and page view-models.

use clap::Subcommand;

use ruta_segura_admin::components::{DataTable, TableColumn, or_dash};
use ruta_segura_admin::models::{ActualizarUsuario, NuevoUsuario, SiniestroFiltro};
use ruta_segura_admin::routes::{AppRoute, GuardDecision, evaluate};
use ruta_segura_admin::{AppState, Pagination};
use ruta_segura_core::{
    AvenidaId, Email, Gravedad, ReporteDelitoId, Role, SiniestroId, TipoSiniestroId, UsuarioId,
};

use super::{CliError, ensure_loaded, read_password};
use crate::output;

#[derive(Subcommand)]
pub enum SiniestrosAction {
    /// List accidents, newest first
    List {
        #[arg(long)]
        avenida: Option<i64>,

        #[arg(long)]
        tipo: Option<i64>,

        /// `baja`, `media` or `alta`
        #[arg(long)]
        gravedad: Option<String>,

        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = Pagination::DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Show one accident with its vehicles
    Show { id: i64 },
    /// Delete an accident
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ReportesAction {
    /// List crime reports
    List {
        /// Crime type, e.g. `Robo`
        #[arg(long)]
        tipo: Option<String>,

        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = Pagination::DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Show one crime report
    Show { id: i64 },
    /// Delete a crime report
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum UsuariosAction {
    /// List all accounts
    List,
    /// Create an account
    Create {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        nombre: String,

        #[arg(short, long, default_value = "consultor")]
        rol: String,

        #[arg(long, env = "RUTA_SEGURA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Change an account's role
    SetRole { id: i64, rol: String },
    /// Deactivate an account
    Deactivate { id: i64 },
    /// Delete an account
    Delete { id: i64 },
}

pub async fn siniestros(state: &AppState, action: SiniestrosAction) -> Result<(), CliError> {
    match action {
        SiniestrosAction::List {
            avenida,
            tipo,
            gravedad,
            skip,
            limit,
        } => {
            let filtro = SiniestroFiltro {
                avenida_id: avenida.map(AvenidaId::new),
                tipo_id: tipo.map(TipoSiniestroId::new),
                nivel_gravedad: gravedad.as_deref().map(str::parse::<Gravedad>).transpose()?,
            };
            let mut page = state.siniestros_page();
            page.set_filtro(filtro);
            page.set_pagination(Pagination::new(skip, limit));
            page.load().await;
            ensure_loaded(page.state())?;

            output::table(&page.table());
            if let Some(data) = page.state().loaded() {
                output::line(&format!("{} de {} siniestros", data.rows.len(), data.total));
            }
        }
        SiniestrosAction::Show { id } => {
            let id = SiniestroId::new(id);
            let siniestros = &state.services().siniestros;
            let vehiculos = &state.services().vehiculos;
            let (siniestro, lista) =
                tokio::try_join!(siniestros.get(id), vehiculos.list_by_siniestro(id))?;

            output::heading(&format!("Siniestro {}", siniestro.id));
            output::line(&format!("Fecha:        {}", or_dash(siniestro.fecha)));
            output::line(&format!("Hora:         {}", or_dash(siniestro.hora)));
            output::line(&format!("Avenida:      {}", siniestro.avenida_id));
            output::line(&format!("Tipo:         {}", siniestro.tipo_id));
            output::line(&format!(
                "Gravedad:     {}",
                or_dash(siniestro.nivel_gravedad.as_deref())
            ));
            output::line(&format!(
                "Víctimas:     {} fallecidos, {} heridos",
                siniestro.victimas_fatales, siniestro.heridos
            ));
            output::line(&format!(
                "Observación:  {}",
                or_dash(siniestro.observaciones.as_deref())
            ));
            output::table(&vehiculos_table(&lista));
        }
        SiniestrosAction::Delete { id } => {
            state.services().siniestros.delete(SiniestroId::new(id)).await?;
            output::line(&format!("Deleted siniestro {id}"));
        }
    }
    Ok(())
}

pub async fn vehiculos(state: &AppState, siniestro: i64) -> Result<(), CliError> {
    let lista = state
        .services()
        .vehiculos
        .list_by_siniestro(SiniestroId::new(siniestro))
        .await?;
    output::table(&vehiculos_table(&lista));
    Ok(())
}

fn vehiculos_table(lista: &[ruta_segura_admin::models::Vehiculo]) -> DataTable {
    let mut table = DataTable::new("Vehículos")
        .column(TableColumn::numeric("vehiculo_id", "ID"))
        .column(TableColumn::new("tipo_vehiculo", "Tipo"))
        .column(TableColumn::new("marca", "Marca"))
        .column(TableColumn::new("modelo", "Modelo"))
        .column(TableColumn::new("rol", "Rol"))
        .column(TableColumn::new("es_fallecido", "Fallecido"));
    for v in lista {
        table = table.row([
            v.vehiculo_id.to_string(),
            v.tipo_vehiculo.to_string(),
            or_dash(v.marca.as_deref()),
            or_dash(v.modelo.as_deref()),
            v.rol.to_string(),
            if v.es_fallecido { "sí" } else { "no" }.to_string(),
        ]);
    }
    table
}

pub async fn reportes(state: &AppState, action: ReportesAction) -> Result<(), CliError> {
    match action {
        ReportesAction::List { tipo, skip, limit } => {
            let mut page = state.reportes_page();
            page.set_tipo_delito(tipo);
            page.set_pagination(Pagination::new(skip, limit));
            page.load().await;
            ensure_loaded(page.state())?;

            output::table(&page.table());
            if let Some(caption) = page.caption() {
                output::line(&caption);
            }
        }
        ReportesAction::Show { id } => {
            let r = state
                .services()
                .reportes_delito
                .get(ReporteDelitoId::new(id))
                .await?;
            output::heading(&format!("Reporte {}", r.id));
            output::line(&format!("Tipo:         {}", r.tipo_delito));
            output::line(&format!("Dirección:    {}", r.direccion_aproximada));
            output::line(&format!("Fecha:        {}", or_dash(r.fecha_reporte)));
            output::line(&format!("Hora:         {}", or_dash(r.hora_aproximada)));
            output::line(&format!("Peligrosidad: {}", r.nivel_peligrosidad));
            output::line(&format!(
                "Descripción:  {}",
                or_dash(r.descripcion_breve.as_deref())
            ));
        }
        ReportesAction::Delete { id } => {
            state
                .services()
                .reportes_delito
                .delete(ReporteDelitoId::new(id))
                .await?;
            output::line(&format!("Deleted reporte {id}"));
        }
    }
    Ok(())
}

pub async fn usuarios(state: &AppState, action: UsuariosAction) -> Result<(), CliError> {
    // Same rule as the /usuarios page
    if evaluate(AppRoute::Usuarios, &state.session().current()) != GuardDecision::Allow {
        return Err(CliError::InvalidArgument(
            "user management requires an admin session".to_string(),
        ));
    }

    let mut page = state.usuarios_page();
    match action {
        UsuariosAction::List => {
            page.load().await;
        }
        UsuariosAction::Create {
            email,
            nombre,
            rol,
            password,
        } => {
            let nuevo = NuevoUsuario {
                email: Email::parse(&email)?,
                nombre,
                rol: rol.parse::<Role>()?,
                password: read_password(password)?,
            };
            let usuario = page.create(&nuevo).await?;
            output::line(&format!("Created {} with ID {}", usuario.email, usuario.id));
        }
        UsuariosAction::SetRole { id, rol } => {
            let cambios = ActualizarUsuario {
                rol: Some(rol.parse::<Role>()?),
                ..ActualizarUsuario::default()
            };
            page.update(UsuarioId::new(id), &cambios).await?;
        }
        UsuariosAction::Deactivate { id } => {
            let cambios = ActualizarUsuario {
                activo: Some(false),
                ..ActualizarUsuario::default()
            };
            page.update(UsuarioId::new(id), &cambios).await?;
        }
        UsuariosAction::Delete { id } => {
            page.delete(UsuarioId::new(id)).await?;
            output::line(&format!("Deleted usuario {id}"));
        }
    }

    ensure_loaded(page.state())?;
    output::table(&page.table());
    Ok(())
}
