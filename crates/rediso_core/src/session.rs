//! Opening a session on a backing store.

use crate::config::ConnectionConfig;
use crate::error::{ConnectionStage, CoreError, CoreResult};
use rediso_storage::{HashStore, StorageError};

/// A store handle that has passed authentication, database selection and a
/// ping.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    config: ConnectionConfig,
}

impl<S: HashStore> Session<S> {
    /// Prepares `store` for use.
    ///
    /// Steps, in order: `AUTH` (skipped for an empty password), `SELECT`,
    /// `PING`.
    ///
    /// # Errors
    ///
    /// `Connection` naming the step that failed.
    pub fn open(mut store: S, config: &ConnectionConfig) -> CoreResult<Self> {
        if !config.password.is_empty() {
            store
                .auth(&config.password)
                .map_err(stage_error(ConnectionStage::Auth))?;
        }
        store
            .select(config.database)
            .map_err(stage_error(ConnectionStage::Select))?;
        store.ping().map_err(stage_error(ConnectionStage::Ping))?;

        tracing::info!(
            address = %config.address(),
            database = config.database,
            "session opened"
        );
        Ok(Self {
            store,
            config: config.clone(),
        })
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the store mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Returns the settings the session was opened with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Gives the store back.
    pub fn into_inner(self) -> S {
        self.store
    }
}

fn stage_error(stage: ConnectionStage) -> impl FnOnce(StorageError) -> CoreError {
    move |source| {
        tracing::warn!(%stage, error = %source, "session setup failed");
        CoreError::Connection { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rediso_storage::InMemoryStore;

    #[test]
    fn open_without_password() {
        let session = Session::open(InMemoryStore::new(), &ConnectionConfig::default()).unwrap();
        assert_eq!(session.store().selected_database(), 0);
        assert_eq!(session.config().port, 6379);
    }

    #[test]
    fn open_authenticates_and_selects() {
        let config = ConnectionConfig::new()
            .with_password("MySuperPassw0rD")
            .with_database(2);
        let session = Session::open(InMemoryStore::with_password("MySuperPassw0rD"), &config).unwrap();
        assert_eq!(session.into_inner().selected_database(), 2);
    }

    #[test]
    fn failures_name_the_stage() {
        let err = Session::open(
            InMemoryStore::with_password("secret"),
            &ConnectionConfig::new().with_password("wrong"),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Connection { stage: ConnectionStage::Auth, .. }));

        // protected store, no password configured: the first command is refused
        let err = Session::open(InMemoryStore::with_password("secret"), &ConnectionConfig::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::Connection { stage: ConnectionStage::Select, .. }));

        let err = Session::open(
            InMemoryStore::new(),
            &ConnectionConfig::new().with_database(99),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Connection { stage: ConnectionStage::Select, .. }));

        let closed = InMemoryStore::new();
        closed.close();
        // select on a closed store fails before ping is reached
        let err = Session::open(closed, &ConnectionConfig::new()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Connection);
    }
}
