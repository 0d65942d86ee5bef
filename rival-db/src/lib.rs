//! rival-db: one database handle for the whole process.
//!
//! With `DATABASE_URL` set, [`Database`] talks to a real SQL database through a sqlx pool.
//! Without it, the same builders run against an in-memory store of sample rows so the rest of
//! the application keeps working offline.

extern crate self as rival_db;

/// This module contains the macros used in the crate.
#[macro_use]
mod macros;

pub mod config;

/// This module contains the database-related functionality.
pub mod db;

pub mod error;

/// This module contains the prelude for the crate.
pub mod prelude;

/// This module contains the custom types used in the crate.
pub mod types;

pub mod utils;

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

pub use chrono;
pub use config::DatabaseConfig;
pub use db::backend::{Backend, BackendKind, RawOutcome};
pub use db::memory::{MemoryEngine, MemoryStore};
pub use db::sql::SqlBackend;
pub use error::Error;

use db::query::statement::{Delete, Insert, Select, Update};
use db::{Projection, Table};

pub type Connection = sqlx::Pool<sqlx::Any>;

/// Handle exposing `select`, `insert`, `update` and `delete` over whichever backend was
/// selected. Cloning is cheap and shares the backend.
#[derive(Clone)]
pub struct Database {
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.backend.kind())
            .finish()
    }
}

impl Database {
    /// Picks the backend: a connection string yields the SQL backend, no connection string
    /// yields the in-memory fallback.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        match config.database_url() {
            Some(url) => {
                let backend = SqlBackend::connect(url, config.max_connections).await?;
                info!(
                    max_connections = config.max_connections,
                    "connected to database"
                );
                Ok(Self::with_backend(backend))
            }
            None => {
                info!("DATABASE_URL not found - using in-memory fallback database");
                Ok(Self::in_memory())
            }
        }
    }

    pub async fn from_env() -> Result<Self, Error> {
        Self::connect(&DatabaseConfig::from_env()).await
    }

    /// Fallback handle over the seeded sample store.
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::seeded())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self::with_backend(MemoryEngine::new(store))
    }

    pub fn with_backend(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// The sqlx pool behind the real backend; `None` for the fallback.
    pub fn pool(&self) -> Option<&Connection> {
        self.backend.pool()
    }

    pub fn is_fallback(&self) -> bool {
        self.kind() == BackendKind::Memory
    }

    pub fn select(&self) -> Select<'_> {
        Select::new(self, Projection::All)
    }

    pub fn select_with(&self, projection: Projection) -> Select<'_> {
        Select::new(self, projection)
    }

    pub fn insert(&self, table: Table) -> Insert<'_> {
        Insert::new(self, table)
    }

    pub fn update(&self, table: Table) -> Update<'_> {
        Update::new(self, table)
    }

    pub fn delete(&self, table: Table) -> Delete<'_> {
        Delete::new(self, table)
    }

    /// Sends a statement straight to the pool. The fallback answers with no rows.
    pub async fn raw(&self, sql: &str) -> Result<RawOutcome, Error> {
        self.backend.raw(sql).await
    }

    /// Creates missing tables. A no-op for the fallback.
    pub async fn migrate(&self) -> Result<(), Error> {
        self.backend.migrate().await
    }

    pub async fn close(&self) {
        self.backend.close().await
    }
}

static DATABASE: OnceCell<Database> = OnceCell::const_new();

/// The process-wide handle, selected from the environment on first use.
pub async fn database() -> Result<&'static Database, Error> {
    DATABASE.get_or_try_init(Database::from_env).await
}
