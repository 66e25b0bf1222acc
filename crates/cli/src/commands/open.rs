//! `open <path>`: route a path through the guard and render the page it
//! lands on.

use ruta_segura_admin::routes::{AppRoute, View};
use ruta_segura_admin::{AppState, Navigator};

use super::{CliError, ensure_loaded};
use crate::output;

pub async fn open(state: &AppState, path: &str) -> Result<(), CliError> {
    let requested = AppRoute::from_path(path);
    let mut navigator: Navigator = state.navigator(path);

    // restore() already ran, so this only waits if storage is still loading
    while let View::Waiting(_) = navigator.view() {
        if navigator.session_changed().await.is_none() {
            break;
        }
    }

    let route = match navigator.view() {
        View::Page(route) => route,
        View::Waiting(_) => return Ok(()),
    };
    if route != requested && requested != AppRoute::Index {
        output::line(&format!("{requested} is not available, showing {route}"));
    }

    render(state, route).await
}

async fn render(state: &AppState, route: AppRoute) -> Result<(), CliError> {
    output::heading(route.title());
    match route {
        AppRoute::Login => {
            output::line("Not logged in. Run `ruta-segura login -e <email>`.");
        }
        AppRoute::NotFound => output::line("Page not found"),
        AppRoute::Index | AppRoute::Dashboard => {
            let mut page = state.dashboard_page();
            page.load().await;
            ensure_loaded(page.state())?;
            for (label, value) in page.headline() {
                output::line(&format!("{label:<20} {value}"));
            }
            output::table(&page.zona_table());
            output::table(&page.tipo_table());
            output::table(&page.dia_table());
        }
        AppRoute::Siniestros => {
            let mut page = state.siniestros_page();
            page.load().await;
            ensure_loaded(page.state())?;
            output::table(&page.table());
        }
        AppRoute::Reportes => {
            let mut page = state.reportes_page();
            page.load().await;
            ensure_loaded(page.state())?;
            output::table(&page.table());
            if let Some(caption) = page.caption() {
                output::line(&caption);
            }
        }
        AppRoute::ZonasPeligrosas => {
            let mut page = state.zonas_peligrosas_page();
            page.load().await;
            ensure_loaded(page.state())?;
            output::table(&page.table());
        }
        AppRoute::AnalisisRutaSegura => {
            return analisis(state, ruta_segura_admin::services::reportes::DEFAULT_RANKING_LIMIT)
                .await;
        }
        AppRoute::Usuarios => {
            let mut page = state.usuarios_page();
            page.load().await;
            ensure_loaded(page.state())?;
            output::table(&page.table());
        }
    }
    Ok(())
}

/// Render the safe-route analysis with `limit` rows per ranking.
pub async fn analisis(state: &AppState, limit: u32) -> Result<(), CliError> {
    let mut page = state.analisis_page().with_limit(limit);
    page.load().await;
    ensure_loaded(page.state())?;
    output::table(&page.rutas_table());
    output::table(&page.zonas_table());
    output::table(&page.indice_table());
    Ok(())
}
