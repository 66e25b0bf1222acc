//! Accident list with filters and paging.

use crate::components::{DataTable, TableColumn, or_dash};
use crate::http::ApiError;
use crate::models::{Siniestro, SiniestroFiltro};
use crate::services::{Pagination, SiniestrosService};

use super::{LoadState, MountGuard};

/// One page of accidents plus the filtered total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiniestrosData {
    pub rows: Vec<Siniestro>,
    pub total: u64,
}

#[derive(Debug)]
pub struct SiniestrosPage {
    service: SiniestrosService,
    page: Pagination,
    filtro: SiniestroFiltro,
    state: LoadState<SiniestrosData>,
    mount: MountGuard,
}

impl SiniestrosPage {
    #[must_use]
    pub fn new(service: SiniestrosService) -> Self {
        Self {
            service,
            page: Pagination::default(),
            filtro: SiniestroFiltro::default(),
            state: LoadState::Loading,
            mount: MountGuard::new(),
        }
    }

    /// Handle for tearing the page down from elsewhere.
    #[must_use]
    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<SiniestrosData> {
        &self.state
    }

    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.page
    }

    /// Replace the filters and go back to the first page.
    pub const fn set_filtro(&mut self, filtro: SiniestroFiltro) {
        self.filtro = filtro;
        self.page.skip = 0;
    }

    pub const fn set_pagination(&mut self, page: Pagination) {
        self.page = page;
    }

    /// Fetch the current page and the filtered count together.
    pub async fn load(&mut self) -> bool {
        let service = &self.service;
        let (page, filtro) = (self.page, self.filtro);
        self.mount
            .load(&mut self.state, async {
                let (rows, total) =
                    tokio::try_join!(service.list(page, filtro), service.count(filtro))?;
                Ok::<_, ApiError>(SiniestrosData { rows, total })
            })
            .await
    }

    /// Advance one page if there is one. Returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        let Some(data) = self.state.loaded() else {
            return false;
        };
        let next = u64::from(self.page.skip) + u64::from(self.page.limit);
        if next >= data.total {
            return false;
        }
        self.page.skip = u32::try_from(next).unwrap_or(u32::MAX);
        true
    }

    /// Go back one page. Returns whether it moved.
    pub const fn previous_page(&mut self) -> bool {
        if self.page.skip == 0 {
            return false;
        }
        self.page.skip = self.page.skip.saturating_sub(self.page.limit);
        true
    }

    #[must_use]
    pub fn table(&self) -> DataTable {
        let mut table = DataTable::new("Siniestros")
            .column(TableColumn::numeric("id", "ID"))
            .column(TableColumn::new("fecha", "Fecha"))
            .column(TableColumn::new("hora", "Hora"))
            .column(TableColumn::numeric("avenida_id", "Avenida"))
            .column(TableColumn::numeric("tipo_id", "Tipo"))
            .column(TableColumn::new("nivel_gravedad", "Gravedad"))
            .column(TableColumn::numeric("victimas_fatales", "Fallecidos"))
            .column(TableColumn::numeric("heridos", "Heridos"))
            .column(TableColumn::numeric("num_vehiculos", "Vehículos"));

        for s in self.state.loaded().map(|d| d.rows.as_slice()).unwrap_or_default() {
            table = table.row([
                s.id.to_string(),
                or_dash(s.fecha),
                or_dash(s.hora.map(|h| h.format("%H:%M"))),
                s.avenida_id.to_string(),
                s.tipo_id.to_string(),
                or_dash(s.nivel_gravedad.as_deref()),
                s.victimas_fatales.to_string(),
                s.heridos.to_string(),
                s.num_vehiculos.to_string(),
            ]);
        }
        table
    }
}
