use async_trait::async_trait;

use super::query::{DeletePlan, InsertPlan, SelectPlan, UpdatePlan};
use super::{Record, Table};
use crate::{Connection, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sql,
    Memory,
}

/// Outcome of a raw statement sent straight to the pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutcome {
    pub rows: Vec<Record>,
    pub row_count: u64,
}

/// Executes the plans accumulated by the query builders.
#[async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Rows captured when a select is bound to a table, for backends that serve snapshots.
    fn snapshot(&self, _table: Table) -> Option<Vec<Record>> {
        None
    }

    fn pool(&self) -> Option<&Connection> {
        None
    }

    async fn select(&self, plan: SelectPlan) -> Result<Vec<Record>, Error>;
    async fn insert(&self, plan: InsertPlan) -> Result<Vec<Record>, Error>;
    async fn update(&self, plan: UpdatePlan) -> Result<Vec<Record>, Error>;
    async fn delete(&self, plan: DeletePlan) -> Result<Vec<Record>, Error>;

    async fn raw(&self, sql: &str) -> Result<RawOutcome, Error>;
    async fn migrate(&self) -> Result<(), Error>;
    async fn close(&self);
}
