//! Landing page: headline numbers and the three breakdowns.

use crate::components::{DataTable, TableColumn};
use crate::http::ApiError;
use crate::models::{EstadisticasPorTipo, ResumenGeneral, SiniestrosPorDia, SiniestrosPorZona};
use crate::services::ReportesService;

use super::{LoadState, MountGuard};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub resumen: ResumenGeneral,
    pub por_zona: Vec<SiniestrosPorZona>,
    pub por_tipo: Vec<EstadisticasPorTipo>,
    pub por_dia: Vec<SiniestrosPorDia>,
}

#[derive(Debug)]
pub struct DashboardPage {
    reportes: ReportesService,
    state: LoadState<DashboardData>,
    mount: MountGuard,
}

impl DashboardPage {
    #[must_use]
    pub fn new(reportes: ReportesService) -> Self {
        Self {
            reportes,
            state: LoadState::Loading,
            mount: MountGuard::new(),
        }
    }

    #[must_use]
    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<DashboardData> {
        &self.state
    }

    /// Fetch all four datasets at once; any failure fails the page.
    pub async fn load(&mut self) -> bool {
        let reportes = &self.reportes;
        self.mount
            .load(&mut self.state, async {
                let (resumen, por_zona, por_tipo, por_dia) = tokio::try_join!(
                    reportes.resumen_general(),
                    reportes.siniestros_por_zona(),
                    reportes.estadisticas_por_tipo(),
                    reportes.siniestros_por_dia_semana(),
                )?;
                Ok::<_, ApiError>(DashboardData {
                    resumen,
                    por_zona,
                    por_tipo,
                    por_dia,
                })
            })
            .await
    }

    /// Headline figures as label/value pairs.
    #[must_use]
    pub fn headline(&self) -> Vec<(&'static str, u64)> {
        let r = self.state.loaded().map(|d| d.resumen).unwrap_or_default();
        vec![
            ("Total siniestros", r.total_siniestros),
            ("Fallecidos", r.total_fallecidos),
            ("Heridos", r.total_heridos),
            ("Siniestros graves", r.siniestros_graves),
            ("En fin de semana", r.siniestros_fin_semana),
        ]
    }

    #[must_use]
    pub fn zona_table(&self) -> DataTable {
        let mut table = DataTable::new("Siniestros por zona")
            .column(TableColumn::new("zona", "Zona"))
            .column(TableColumn::new("tipo_via", "Vía"))
            .column(TableColumn::numeric("total_siniestros", "Siniestros"))
            .column(TableColumn::numeric("total_fallecidos", "Fallecidos"))
            .column(TableColumn::numeric("total_heridos", "Heridos"))
            .column(TableColumn::numeric("promedio_victimas", "Prom. víctimas"));
        for z in self.state.loaded().map(|d| d.por_zona.as_slice()).unwrap_or_default() {
            table = table.row([
                z.zona.clone(),
                z.tipo_via.clone(),
                z.total_siniestros.to_string(),
                z.total_fallecidos.to_string(),
                z.total_heridos.to_string(),
                format!("{:.2}", z.promedio_victimas),
            ]);
        }
        table
    }

    #[must_use]
    pub fn tipo_table(&self) -> DataTable {
        let mut table = DataTable::new("Siniestros por tipo")
            .column(TableColumn::new("tipo_siniestro", "Tipo"))
            .column(TableColumn::new("gravedad", "Gravedad"))
            .column(TableColumn::numeric("cantidad", "Cantidad"))
            .column(TableColumn::numeric("fallecidos", "Fallecidos"))
            .column(TableColumn::numeric("heridos", "Heridos"))
            .column(TableColumn::numeric("porcentaje_fin_semana", "% fin de semana"));
        for t in self.state.loaded().map(|d| d.por_tipo.as_slice()).unwrap_or_default() {
            table = table.row([
                t.tipo_siniestro.clone(),
                t.gravedad.clone(),
                t.cantidad.to_string(),
                t.fallecidos.to_string(),
                t.heridos.to_string(),
                format!("{:.1}", t.porcentaje_fin_semana),
            ]);
        }
        table
    }

    #[must_use]
    pub fn dia_table(&self) -> DataTable {
        let mut table = DataTable::new("Siniestros por día de la semana")
            .column(TableColumn::new("dia_semana", "Día"))
            .column(TableColumn::numeric("cantidad", "Cantidad"))
            .column(TableColumn::numeric("fallecidos", "Fallecidos"))
            .column(TableColumn::numeric("heridos", "Heridos"));
        for d in self.state.loaded().map(|d| d.por_dia.as_slice()).unwrap_or_default() {
            table = table.row([
                d.dia_nombre().to_string(),
                d.cantidad.to_string(),
                d.fallecidos.to_string(),
                d.heridos.to_string(),
            ]);
        }
        table
    }
}
