pub mod config;
pub mod error;
pub mod mapper;
pub mod migrations;
pub mod normalize;
pub mod query;
pub mod queries;

pub use config::StoreConfig;
pub use error::{ConfigurationError, Error, Result, StoreError, ValidationError};
pub use normalize::normalize;
pub use query::{MAX_SINCE_DAYS, SinceDays};

use rusqlite::Connection;
use tracing::{error, info};

/// Message store backed by SQLite.
///
/// Holds only its configuration. Each operation opens its own connection,
/// runs one statement and closes the connection before returning, so a
/// single `Database` can be shared across threads freely.
pub struct Database {
    config: StoreConfig,
}

impl Database {
    /// Build a store without touching the database. Use [`Database::open`]
    /// to also bootstrap the schema.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn open(config: StoreConfig) -> Result<Self> {
        let db = Self::new(config);
        let conn = db.connect()?;

        // WAL mode lets readers proceed while a writer holds the lock
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", db.config.path.display());
        Ok(db)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let connection_error = |source| StoreError::Connection {
            path: self.config.path.clone(),
            source,
        };

        let conn = Connection::open(&self.config.path).map_err(connection_error)?;
        conn.busy_timeout(self.config.busy_timeout)
            .map_err(connection_error)?;
        Ok(conn)
    }

    /// Run `f` on a connection scoped to this call. Failures are logged with
    /// the operation name and returned as-is.
    pub(crate) fn with_conn<F, T>(&self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let result = self.connect().map_err(Error::from).and_then(|conn| f(&conn));

        if let Err(e) = &result {
            error!(operation, error = %e, "Store operation failed");
        }
        result
    }
}
