use crate::api::ScoringService;
use crate::error::{Result, SpinboardError};
use crate::storage::{SessionRecordStore, Storage};
use crate::types::Session;
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the session credential for one scope and its persisted copy.
///
/// The in-memory session is published on a watch channel so long-running
/// consumers such as the realtime channel follow logins and logouts.
pub struct SessionStore {
    storage: Arc<Storage>,
    scope: String,
    service: Arc<dyn ScoringService>,
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<Storage>,
        scope: impl Into<String>,
        service: Arc<dyn ScoringService>,
    ) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            storage,
            scope: scope.into(),
            service,
            current,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn username(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.username.clone())
    }

    /// Receiver that observes every login, restore and forget.
    pub fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    /// Session for operations that need a credential.
    pub fn require(&self) -> Result<Session> {
        self.current()
            .ok_or_else(|| SpinboardError::auth("Not logged in"))
    }

    /// Loads the persisted session for this scope, if one was saved.
    pub async fn restore(&self) -> Result<Option<Session>> {
        let record = SessionRecordStore::new(&self.storage)
            .load(&self.scope)
            .await?;

        let session = record.map(|record| record.into_session());
        if let Some(session) = &session {
            tracing::info!(
                "Restored session for '{}' in scope '{}'",
                session.username,
                self.scope
            );
            self.current.send_replace(Some(session.clone()));
        }

        Ok(session)
    }

    /// Authenticates against the scoring service and persists the result.
    ///
    /// Every service-side failure is reported as `Auth`; the previous
    /// session, if any, stays in place.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let grant = self
            .service
            .login(username, password)
            .await
            .map_err(|e| {
                tracing::error!("Login failed for '{}': {}", username, e);
                match e {
                    SpinboardError::Auth(msg) => SpinboardError::Auth(msg),
                    other => SpinboardError::auth(format!("Login failed: {}", other)),
                }
            })?;

        let session = Session::new(grant.credential, grant.username);
        SessionRecordStore::new(&self.storage)
            .save(&self.scope, &session)
            .await?;

        self.current.send_replace(Some(session.clone()));
        tracing::info!("Logged in as '{}' in scope '{}'", session.username, self.scope);
        Ok(session)
    }

    /// Drops the session locally. The credential is not revoked server-side.
    pub async fn forget(&self) -> Result<bool> {
        let removed = SessionRecordStore::new(&self.storage)
            .delete(&self.scope)
            .await?;
        self.current.send_replace(None);
        if removed {
            tracing::info!("Forgot session in scope '{}'", self.scope);
        }
        Ok(removed)
    }
}
