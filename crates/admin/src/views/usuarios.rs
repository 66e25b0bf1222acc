//! Account management, reachable by admins only.

use ruta_segura_core::UsuarioId;

use crate::components::{DataTable, TableColumn, or_dash};
use crate::http::ApiError;
use crate::models::{ActualizarUsuario, NuevoUsuario, Usuario};
use crate::services::{Pagination, UsuariosService};

use super::{LoadState, MountGuard};

#[derive(Debug)]
pub struct UsuariosPage {
    service: UsuariosService,
    state: LoadState<Vec<Usuario>>,
    mount: MountGuard,
}

impl UsuariosPage {
    #[must_use]
    pub fn new(service: UsuariosService) -> Self {
        Self {
            service,
            state: LoadState::Loading,
            mount: MountGuard::new(),
        }
    }

    #[must_use]
    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<Vec<Usuario>> {
        &self.state
    }

    pub async fn load(&mut self) -> bool {
        self.mount
            .load(&mut self.state, self.service.list(Pagination::all()))
            .await
    }

    /// Create an account, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns the service error; the list is left as it was.
    pub async fn create(&mut self, nuevo: &NuevoUsuario) -> Result<Usuario, ApiError> {
        let usuario = self.service.create(nuevo).await?;
        self.load().await;
        Ok(usuario)
    }

    /// Apply `cambios` to one account, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns the service error; the list is left as it was.
    pub async fn update(
        &mut self,
        id: UsuarioId,
        cambios: &ActualizarUsuario,
    ) -> Result<Usuario, ApiError> {
        let usuario = self.service.update(id, cambios).await?;
        self.load().await;
        Ok(usuario)
    }

    /// Delete one account, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns the service error; the list is left as it was.
    pub async fn delete(&mut self, id: UsuarioId) -> Result<(), ApiError> {
        self.service.delete(id).await?;
        self.load().await;
        Ok(())
    }

    #[must_use]
    pub fn table(&self) -> DataTable {
        let mut table = DataTable::new("Usuarios")
            .column(TableColumn::numeric("id", "ID"))
            .column(TableColumn::new("nombre", "Nombre"))
            .column(TableColumn::new("email", "Email"))
            .column(TableColumn::new("rol", "Rol"))
            .column(TableColumn::new("activo", "Activo"))
            .column(TableColumn::new("ultimo_acceso", "Último acceso"));

        for u in self.state.loaded().map(Vec::as_slice).unwrap_or_default() {
            table = table.row([
                u.id.to_string(),
                u.nombre.clone(),
                u.email.to_string(),
                u.rol.to_string(),
                if u.activo { "sí" } else { "no" }.to_string(),
                or_dash(u.ultimo_acceso.map(|t| t.format("%Y-%m-%d %H:%M"))),
            ]);
        }
        table
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ruta_segura_core::{Email, Role};

    use crate::services::tests::offline_client;

    use super::*;

    #[test]
    fn test_table_lists_accounts() {
        let mut page = UsuariosPage::new(UsuariosService::new(offline_client()));
        page.state = LoadState::Loaded(vec![Usuario {
            id: UsuarioId::new(1),
            email: Email::parse("admin@rutasegura.com").unwrap(),
            nombre: "Administrador".to_string(),
            rol: Role::Admin,
            fecha_registro: None,
            activo: true,
            ultimo_acceso: None,
        }]);
        let table = page.table();
        assert_eq!(
            table.rows[0],
            vec!["1", "Administrador", "admin@rutasegura.com", "admin", "sí", "-"]
        );
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_list() {
        let mut page = UsuariosPage::new(UsuariosService::new(offline_client()));
        page.state = LoadState::Loaded(Vec::new());
        let err = page.delete(UsuarioId::new(0)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(page.state(), &LoadState::Loaded(Vec::new()));
    }
}
