//! The session store: sole owner of "who is logged in".

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::instrument;

use ruta_segura_core::Role;

use super::storage::{SessionStorage, StorageError};
use crate::http::{ApiError, CredentialProvider};
use crate::models::{Credential, Identity, keys};
use crate::services::AuthService;

/// Message shown when a login fails without a server-provided reason.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Session lifecycle.
///
/// `Uninitialized → Loading → Anonymous | Authenticated`. Authorization
/// decisions made while [`Session::is_loading`] is true are not final.
#[derive(Debug, Clone, Default)]
pub enum Session {
    /// Nothing has been restored yet.
    #[default]
    Uninitialized,
    /// Restore from storage is in progress.
    Loading,
    /// No user is logged in.
    Anonymous,
    /// A user is logged in.
    Authenticated {
        identity: Identity,
        credential: Credential,
    },
}

impl Session {
    /// True until the first restore has resolved.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Uninitialized | Self::Loading)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The logged-in identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    /// Whether the identity's role grants at least `required`.
    #[must_use]
    pub fn satisfies(&self, required: Role) -> bool {
        self.identity().is_some_and(|identity| identity.satisfies(required))
    }
}

/// Result of [`SessionStore::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Logged in; the session now holds this identity.
    Success(Identity),
    /// Nothing changed; `message` is fit for the login form.
    Failure { message: String },
}

impl LoginOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Handle to the process-wide session.
///
/// Clones share the same state. Mutation happens only through
/// [`restore`](Self::restore), [`login`](Self::login),
/// [`logout`](Self::logout) and [`expire`](Self::expire), each a single
/// state replacement, so readers never see a half-updated session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// An uninitialized store persisting through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(Session::Uninitialized);
        Self {
            inner: Arc::new(SessionStoreInner { storage, state }),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every session transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    /// The logged-in identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    /// Whether the current user's role satisfies `role`. False when anonymous.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.inner.state.borrow().satisfies(role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    #[must_use]
    pub fn is_at_least_editor(&self) -> bool {
        self.has_role(Role::Editor)
    }

    /// Rebuild the session from storage.
    ///
    /// Missing, half-written or unreadable data resolves to anonymous and
    /// both keys are cleared. Never fails.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Session {
        self.inner.state.send_replace(Session::Loading);

        let session = match self.read_persisted() {
            Ok(Some((identity, credential))) => {
                tracing::info!(user_id = %identity.id, rol = %identity.rol, "Session restored");
                Session::Authenticated {
                    identity,
                    credential,
                }
            }
            Ok(None) => {
                tracing::debug!("No persisted session");
                Session::Anonymous
            }
            Err(reason) => {
                tracing::warn!(%reason, "Discarding persisted session");
                self.clear_persisted();
                Session::Anonymous
            }
        };

        self.inner.state.send_replace(session.clone());
        session
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the existing session, persisted or in memory, is left
    /// exactly as it was.
    #[instrument(skip(self, auth, password), fields(username = %username))]
    pub async fn login(
        &self,
        auth: &AuthService,
        username: &str,
        password: &SecretString,
    ) -> LoginOutcome {
        let fetched = async {
            let credential = auth.login(username, password).await?;
            let identity = auth.me(&credential).await?;
            Ok::<_, ApiError>((identity, credential))
        }
        .await;

        let (identity, credential) = match fetched {
            Ok(pair) => pair,
            Err(error) => {
                tracing::info!(error = %error, "Login rejected");
                return LoginOutcome::Failure {
                    message: login_failure_message(&error),
                };
            }
        };

        if let Err(error) = self.persist(&identity, &credential) {
            tracing::error!(error = %error, "Could not persist session");
            return LoginOutcome::Failure {
                message: format!("{LOGIN_FAILED_MESSAGE}: could not save the session"),
            };
        }

        tracing::info!(user_id = %identity.id, rol = %identity.rol, "Logged in");
        self.inner.state.send_replace(Session::Authenticated {
            identity: identity.clone(),
            credential,
        });
        LoginOutcome::Success(identity)
    }

    /// Clear the session. Idempotent.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.clear_persisted();
        let previous = self.inner.state.send_replace(Session::Anonymous);
        if let Some(identity) = previous.identity() {
            tracing::info!(user_id = %identity.id, "Logged out");
        }
    }

    /// Clear the session after the backend rejected `rejected`.
    ///
    /// A no-op unless `rejected` is still the current credential: a late 401
    /// for a token from before a logout and re-login leaves the newer
    /// session alone. Returns whether the session was cleared.
    pub fn expire(&self, rejected: &SecretString) -> bool {
        let current = matches!(
            &*self.inner.state.borrow(),
            Session::Authenticated { credential, .. }
                if credential.expose() == rejected.expose_secret()
        );
        if !current {
            tracing::debug!("Ignoring rejection of a credential the session no longer holds");
            return false;
        }
        tracing::warn!("Session credential expired or revoked");
        self.logout();
        true
    }

    fn read_persisted(&self) -> Result<Option<(Identity, Credential)>, String> {
        let storage = &self.inner.storage;
        let token = storage.get(keys::TOKEN).map_err(|e| e.to_string())?;
        let user = storage.get(keys::USER).map_err(|e| e.to_string())?;

        match (token, user) {
            (None, None) => Ok(None),
            (Some(_), None) => Err("credential stored without identity".to_string()),
            (None, Some(_)) => Err("identity stored without credential".to_string()),
            (Some(token), Some(user)) => {
                let credential = Credential::new(token);
                if credential.is_blank() {
                    return Err("stored credential is blank".to_string());
                }
                let identity: Identity = serde_json::from_str(&user)
                    .map_err(|e| format!("stored identity is unreadable: {e}"))?;
                Ok(Some((identity, credential)))
            }
        }
    }

    fn persist(&self, identity: &Identity, credential: &Credential) -> Result<(), StorageError> {
        let storage = &self.inner.storage;
        let user = serde_json::to_string(identity).map_err(|source| StorageError::Corrupt {
            path: keys::USER.into(),
            source,
        })?;

        storage.set(keys::TOKEN, credential.expose())?;
        if let Err(error) = storage.set(keys::USER, &user) {
            // Never leave a credential without its identity
            let _ = storage.remove(keys::TOKEN);
            return Err(error);
        }
        Ok(())
    }

    fn clear_persisted(&self) {
        for key in [keys::TOKEN, keys::USER] {
            if let Err(error) = self.inner.storage.remove(key) {
                tracing::warn!(key, error = %error, "Failed to clear persisted session key");
            }
        }
    }
}

impl CredentialProvider for SessionStore {
    fn credential(&self) -> Option<SecretString> {
        match &*self.inner.state.borrow() {
            Session::Authenticated { credential, .. } => Some(credential.secret()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Server-provided reason when there is one, else the generic message.
fn login_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthenticated { message } if message != crate::http::SESSION_EXPIRED_MESSAGE => {
            message.clone()
        }
        ApiError::Status { message, .. } | ApiError::InvalidRequest(message) => message.clone(),
        _ => LOGIN_FAILED_MESSAGE.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    const ADMIN_JSON: &str =
        r#"{"id":1,"nombre":"Administrador","email":"admin@rutasegura.com","rol":"admin"}"#;
    const EDITOR_JSON: &str =
        r#"{"id":2,"nombre":"Editora","email":"editor@rutasegura.com","rol":"editor"}"#;

    fn store_with(pairs: &[(&str, &str)]) -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        for (k, v) in pairs {
            storage.set(k, v).unwrap();
        }
        (SessionStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_starts_loading() {
        let (store, _) = store_with(&[]);
        assert!(store.is_loading());
        assert!(!store.has_role(Role::Consultor));
        assert!(store.credential().is_none());
    }

    #[test]
    fn test_restore_empty_is_anonymous() {
        let (store, _) = store_with(&[]);
        let session = store.restore();
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_restore_full_pair() {
        let (store, _) = store_with(&[(keys::TOKEN, "jwt"), (keys::USER, ADMIN_JSON)]);
        let session = store.restore();
        assert!(session.is_authenticated());
        assert!(store.is_admin());
        assert!(store.is_at_least_editor());
        assert_eq!(store.identity().unwrap().nombre, "Administrador");
    }

    #[test]
    fn test_restore_half_pair_clears_both() {
        let (store, storage) = store_with(&[(keys::TOKEN, "jwt")]);
        assert!(!store.restore().is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);

        let (store, storage) = store_with(&[(keys::USER, ADMIN_JSON)]);
        assert!(!store.restore().is_authenticated());
        assert_eq!(storage.get(keys::USER).unwrap(), None);
    }

    #[test]
    fn test_restore_malformed_identity_clears_both() {
        let (store, storage) = store_with(&[(keys::TOKEN, "jwt"), (keys::USER, "{not json")]);
        assert!(!store.restore().is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
        assert_eq!(storage.get(keys::USER).unwrap(), None);

        let (store, _) = store_with(&[
            (keys::TOKEN, "jwt"),
            (keys::USER, r#"{"id":1,"nombre":"X","email":"x@rutasegura.com","rol":"root"}"#),
        ]);
        assert!(!store.restore().is_authenticated());
    }

    #[test]
    fn test_editor_predicates() {
        let (store, _) = store_with(&[(keys::TOKEN, "jwt"), (keys::USER, EDITOR_JSON)]);
        store.restore();
        assert!(!store.is_admin());
        assert!(store.is_at_least_editor());
        assert!(store.has_role(Role::Consultor));
    }

    #[test]
    fn test_logout_then_restore_is_anonymous() {
        let (store, storage) = store_with(&[(keys::TOKEN, "jwt"), (keys::USER, ADMIN_JSON)]);
        store.restore();
        store.logout();
        store.logout();
        assert!(!store.current().is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
        assert!(!store.restore().is_authenticated());
    }

    #[test]
    fn test_credential_provider_reads_live_session() {
        let (store, _) = store_with(&[(keys::TOKEN, "jwt"), (keys::USER, ADMIN_JSON)]);
        let provider: Arc<dyn CredentialProvider> = Arc::new(store.clone());
        assert!(provider.credential().is_none());
        store.restore();
        let rejected = provider.credential().unwrap();
        assert!(store.expire(&rejected));
        assert!(provider.credential().is_none());
    }

    #[test]
    fn test_expire_ignores_superseded_credential() {
        let (store, storage) = store_with(&[(keys::TOKEN, "t1"), (keys::USER, ADMIN_JSON)]);
        store.restore();
        let stale = store.credential().unwrap();

        // Logout and a fresh login leave a different token behind
        store.logout();
        storage.set(keys::TOKEN, "t2").unwrap();
        storage.set(keys::USER, ADMIN_JSON).unwrap();
        store.restore();

        assert!(!store.expire(&stale));
        assert!(store.current().is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("t2"));

        let fresh = store.credential().unwrap();
        assert!(store.expire(&fresh));
        assert!(!store.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let (store, _) = store_with(&[(keys::TOKEN, "jwt"), (keys::USER, ADMIN_JSON)]);
        let mut rx = store.subscribe();

        store.restore();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        store.logout();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_authenticated());
    }

    #[test]
    fn test_login_failure_message() {
        let detail = ApiError::Unauthenticated {
            message: "Email o contraseña incorrectos".to_string(),
        };
        assert_eq!(login_failure_message(&detail), "Email o contraseña incorrectos");

        let bare = ApiError::Unauthenticated {
            message: crate::http::SESSION_EXPIRED_MESSAGE.to_string(),
        };
        assert_eq!(login_failure_message(&bare), LOGIN_FAILED_MESSAGE);

        let offline = ApiError::NoResponse("connection refused".to_string());
        assert_eq!(login_failure_message(&offline), LOGIN_FAILED_MESSAGE);
    }
}
