//! Crime reports with their total.

use crate::components::{DataTable, TableColumn, or_dash};
use crate::http::ApiError;
use crate::models::ReporteDelito;
use crate::services::{Pagination, ReportesDelitoService};

use super::{LoadState, MountGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportesData {
    pub rows: Vec<ReporteDelito>,
    pub total: u64,
}

#[derive(Debug)]
pub struct ReportesPage {
    service: ReportesDelitoService,
    page: Pagination,
    tipo_delito: Option<String>,
    state: LoadState<ReportesData>,
    mount: MountGuard,
}

impl ReportesPage {
    #[must_use]
    pub fn new(service: ReportesDelitoService) -> Self {
        Self {
            service,
            page: Pagination::default(),
            tipo_delito: None,
            state: LoadState::Loading,
            mount: MountGuard::new(),
        }
    }

    #[must_use]
    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<ReportesData> {
        &self.state
    }

    /// Restrict to one crime type and go back to the first page.
    pub fn set_tipo_delito(&mut self, tipo_delito: Option<String>) {
        self.tipo_delito = tipo_delito;
        self.page.skip = 0;
    }

    pub const fn set_pagination(&mut self, page: Pagination) {
        self.page = page;
    }

    /// Fetch the page of reports and the matching total together.
    pub async fn load(&mut self) -> bool {
        let service = &self.service;
        let page = self.page;
        let tipo = self.tipo_delito.as_deref();
        self.mount
            .load(&mut self.state, async {
                let (rows, total) =
                    tokio::try_join!(service.list(page, tipo), service.total(tipo))?;
                Ok::<_, ApiError>(ReportesData { rows, total })
            })
            .await
    }

    #[must_use]
    pub fn table(&self) -> DataTable {
        let mut table = DataTable::new("Reportes de delito")
            .column(TableColumn::numeric("id", "ID"))
            .column(TableColumn::new("fecha_reporte", "Fecha"))
            .column(TableColumn::new("tipo_delito", "Tipo"))
            .column(TableColumn::new("direccion_aproximada", "Dirección"))
            .column(TableColumn::new("nivel_peligrosidad", "Peligrosidad"))
            .column(TableColumn::new("coordenadas", "Coordenadas"))
            .column(TableColumn::new("usuario_nombre", "Reportado por"));

        for r in self.state.loaded().map(|d| d.rows.as_slice()).unwrap_or_default() {
            let coordenadas = match (r.latitud, r.longitud) {
                (Some(lat), Some(lon)) => format!("{lat}, {lon}"),
                _ => "-".to_string(),
            };
            table = table.row([
                r.id.to_string(),
                or_dash(r.fecha_reporte),
                r.tipo_delito.clone(),
                r.direccion_aproximada.clone(),
                r.nivel_peligrosidad.to_string(),
                coordenadas,
                or_dash(r.usuario_nombre.as_deref()),
            ]);
        }
        table
    }

    /// "N of M" caption for the loaded page.
    #[must_use]
    pub fn caption(&self) -> Option<String> {
        self.state
            .loaded()
            .map(|d| format!("{} de {} reportes", d.rows.len(), d.total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::services::tests::offline_client;

    use super::*;

    #[test]
    fn test_table_formats_coordinates() {
        let mut page = ReportesPage::new(ReportesDelitoService::new(offline_client()));
        let reporte: ReporteDelito = serde_json::from_str(
            r#"{"id":4,"usuario_id":1,"latitud":"-34.6037","longitud":"-58.3816",
                "direccion_aproximada":"Av. 9 de Julio 1000","tipo_delito":"Robo",
                "fecha_reporte":"2024-05-02","nivel_peligrosidad":"alta"}"#,
        )
        .unwrap();
        page.state = LoadState::Loaded(ReportesData {
            rows: vec![reporte],
            total: 31,
        });

        let table = page.table();
        let row = &table.rows[0];
        assert_eq!(row[5], "-34.6037, -58.3816");
        assert_eq!(row[6], "-");
        assert_eq!(page.caption().as_deref(), Some("1 de 31 reportes"));
    }

    #[test]
    fn test_tipo_change_resets_page() {
        let mut page = ReportesPage::new(ReportesDelitoService::new(offline_client()));
        page.set_pagination(Pagination::new(100, 50));
        page.set_tipo_delito(Some("Hurto".to_string()));
        assert_eq!(page.page.skip, 0);
        assert!(page.caption().is_none());
    }
}
