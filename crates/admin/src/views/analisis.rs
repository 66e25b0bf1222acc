//! Safe-route analysis and the dangerous-zone ranking.

use crate::components::{DataTable, TableColumn};
use crate::models::{AnalisisRutaSegura, IndiceSeguridad};
use crate::services::ReportesService;
use crate::services::reportes::DEFAULT_RANKING_LIMIT;

use super::{LoadState, MountGuard};

fn ranking_table(title: &str, rows: &[IndiceSeguridad]) -> DataTable {
    let mut table = DataTable::new(title)
        .column(TableColumn::new("avenida_nombre", "Avenida"))
        .column(TableColumn::new("zona", "Zona"))
        .column(TableColumn::numeric("total_siniestros", "Siniestros"))
        .column(TableColumn::numeric("total_delitos", "Delitos"))
        .column(TableColumn::numeric("total_fallecidos", "Fallecidos"))
        .column(TableColumn::numeric("indice_peligrosidad", "Índice"))
        .column(TableColumn::new("nivel_seguridad", "Nivel"));
    for row in rows {
        table = table.row([
            row.avenida_nombre.clone(),
            row.zona.clone(),
            row.total_siniestros.to_string(),
            row.total_delitos.to_string(),
            row.total_fallecidos.to_string(),
            format!("{:.2}", row.indice_peligrosidad),
            row.nivel().to_string(),
        ]);
    }
    table
}

/// Index, safest routes and most dangerous zones, loaded together.
#[derive(Debug)]
pub struct AnalisisPage {
    reportes: ReportesService,
    limit: u32,
    state: LoadState<AnalisisRutaSegura>,
    mount: MountGuard,
}

impl AnalisisPage {
    #[must_use]
    pub fn new(reportes: ReportesService) -> Self {
        Self {
            reportes,
            limit: DEFAULT_RANKING_LIMIT,
            state: LoadState::Loading,
            mount: MountGuard::new(),
        }
    }

    /// Rows per ranking.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<AnalisisRutaSegura> {
        &self.state
    }

    pub async fn load(&mut self) -> bool {
        self.mount
            .load(&mut self.state, self.reportes.analisis_ruta_segura(self.limit))
            .await
    }

    fn analisis(&self) -> Option<&AnalisisRutaSegura> {
        self.state.loaded()
    }

    #[must_use]
    pub fn rutas_table(&self) -> DataTable {
        ranking_table(
            "Rutas más seguras",
            self.analisis().map(|a| a.rutas_seguras.as_slice()).unwrap_or_default(),
        )
        .empty_state("No hay rutas seguras registradas")
    }

    #[must_use]
    pub fn zonas_table(&self) -> DataTable {
        ranking_table(
            "Zonas más peligrosas",
            self.analisis().map(|a| a.zonas_peligrosas.as_slice()).unwrap_or_default(),
        )
        .empty_state("No hay zonas peligrosas registradas")
    }

    #[must_use]
    pub fn indice_table(&self) -> DataTable {
        ranking_table(
            "Índice de seguridad por avenida",
            self.analisis().map(|a| a.indice.as_slice()).unwrap_or_default(),
        )
    }
}

/// Dangerous-zone ranking on its own.
#[derive(Debug)]
pub struct ZonasPeligrosasPage {
    reportes: ReportesService,
    limit: u32,
    state: LoadState<Vec<IndiceSeguridad>>,
    mount: MountGuard,
}

impl ZonasPeligrosasPage {
    #[must_use]
    pub fn new(reportes: ReportesService) -> Self {
        Self {
            reportes,
            limit: DEFAULT_RANKING_LIMIT,
            state: LoadState::Loading,
            mount: MountGuard::new(),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<Vec<IndiceSeguridad>> {
        &self.state
    }

    pub async fn load(&mut self) -> bool {
        self.mount
            .load(&mut self.state, self.reportes.zonas_peligrosas(self.limit))
            .await
    }

    #[must_use]
    pub fn table(&self) -> DataTable {
        ranking_table(
            "Zonas peligrosas",
            self.state.loaded().map(Vec::as_slice).unwrap_or_default(),
        )
        .empty_state("No hay zonas peligrosas registradas")
    }
}
