pub mod builder;
pub mod condition;
pub mod statement;

use serde_json::Value;

use super::{Projection, Record, Table};
use condition::{Join, Kwargs, Order};

/// Rendered SQL plus the values bound to its placeholders, in order.
#[derive(Debug, Default, PartialEq)]
pub struct Query {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Everything a select chain accumulated before `execute`.
#[derive(Debug, Clone)]
pub struct SelectPlan {
    pub table: Table,
    pub projection: Projection,
    pub joins: Vec<Join>,
    pub conditions: Vec<Kwargs>,
    pub order: Vec<Order>,
    pub limit: Option<u64>,
    pub group_by: Vec<String>,
    /// Rows captured by `from` when the backend serves snapshots.
    pub snapshot: Option<Vec<Record>>,
}

impl SelectPlan {
    pub fn new(table: Table, projection: Projection) -> Self {
        Self {
            table,
            projection,
            joins: Vec::new(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            group_by: Vec::new(),
            snapshot: None,
        }
    }

    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct InsertPlan {
    pub table: Table,
    pub rows: Vec<Record>,
    pub returning: bool,
}

#[derive(Debug, Clone)]
pub struct UpdatePlan {
    pub table: Table,
    pub patch: Record,
    pub conditions: Vec<Kwargs>,
    pub returning: bool,
}

#[derive(Debug, Clone)]
pub struct DeletePlan {
    pub table: Table,
    pub conditions: Vec<Kwargs>,
}
