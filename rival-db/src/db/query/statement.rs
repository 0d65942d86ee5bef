//! Chainable builders handed out by [`Database`].
//!
//! Each chain only accumulates a plan; nothing runs until the terminal `execute`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::condition::{And, Join, JoinType, Kwargs, Order};
use super::{DeletePlan, InsertPlan, SelectPlan, UpdatePlan};
use crate::db::{Projection, Record, Table};
use crate::{utils, Database, Error};

fn append_conditions(conditions: Vec<Kwargs>, kw: Vec<Kwargs>) -> Vec<Kwargs> {
    if conditions.is_empty() {
        kw
    } else if kw.is_empty() {
        conditions
    } else {
        conditions.and(kw)
    }
}

/// Returned by `select`; bound to a table with [`Select::from`].
pub struct Select<'db> {
    db: &'db Database,
    projection: Projection,
}

impl<'db> Select<'db> {
    pub(crate) fn new(db: &'db Database, projection: Projection) -> Self {
        Self { db, projection }
    }

    pub fn from(self, table: Table) -> SelectQuery<'db> {
        let mut plan = SelectPlan::new(table, self.projection);
        plan.snapshot = self.db.backend().snapshot(table);
        SelectQuery { db: self.db, plan }
    }
}

pub struct SelectQuery<'db> {
    db: &'db Database,
    plan: SelectPlan,
}

impl<'db> SelectQuery<'db> {
    fn join(mut self, join_type: JoinType, table: Table, on: Vec<Kwargs>) -> Self {
        self.plan.joins.push(Join {
            join_type,
            table,
            on,
        });
        self
    }

    /// An empty `on` joins along the foreign key between the two tables.
    pub fn left_join(self, table: Table, on: Vec<Kwargs>) -> Self {
        self.join(JoinType::Left, table, on)
    }

    pub fn inner_join(self, table: Table, on: Vec<Kwargs>) -> Self {
        self.join(JoinType::Inner, table, on)
    }

    pub fn right_join(self, table: Table, on: Vec<Kwargs>) -> Self {
        self.join(JoinType::Right, table, on)
    }

    /// Repeated calls are combined with `and`.
    pub fn r#where(mut self, kw: Vec<Kwargs>) -> Self {
        self.plan.conditions = append_conditions(std::mem::take(&mut self.plan.conditions), kw);
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.plan.order.push(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.plan.limit = Some(limit);
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.plan.group_by.push(column.into());
        self
    }

    pub fn plan(&self) -> &SelectPlan {
        &self.plan
    }

    pub async fn execute(self) -> Result<Vec<Record>, Error> {
        self.db.backend().select(self.plan).await
    }

    /// Executes and deserializes every row into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(self) -> Result<Vec<T>, Error> {
        self.execute()
            .await?
            .into_iter()
            .map(|record| Ok(serde_json::from_value(record.into())?))
            .collect()
    }
}

pub struct Insert<'db> {
    db: &'db Database,
    table: Table,
}

impl<'db> Insert<'db> {
    pub(crate) fn new(db: &'db Database, table: Table) -> Self {
        Self { db, table }
    }

    /// Accepts one record or a list of records, as anything serializable to JSON objects.
    pub fn values<V: Serialize + ?Sized>(self, values: &V) -> InsertQuery<'db> {
        InsertQuery {
            db: self.db,
            table: self.table,
            rows: utils::to_records(values),
            returning: false,
        }
    }
}

pub struct InsertQuery<'db> {
    db: &'db Database,
    table: Table,
    rows: Result<Vec<Record>, Error>,
    returning: bool,
}

impl InsertQuery<'_> {
    pub fn returning(mut self) -> Self {
        self.returning = true;
        self
    }

    pub async fn execute(self) -> Result<Vec<Record>, Error> {
        let plan = InsertPlan {
            table: self.table,
            rows: self.rows?,
            returning: self.returning,
        };
        self.db.backend().insert(plan).await
    }
}

pub struct Update<'db> {
    db: &'db Database,
    table: Table,
}

impl<'db> Update<'db> {
    pub(crate) fn new(db: &'db Database, table: Table) -> Self {
        Self { db, table }
    }

    pub fn set<V: Serialize + ?Sized>(self, patch: &V) -> UpdateQuery<'db> {
        UpdateQuery {
            db: self.db,
            table: self.table,
            patch: utils::to_patch(patch),
            conditions: Vec::new(),
            returning: false,
        }
    }
}

pub struct UpdateQuery<'db> {
    db: &'db Database,
    table: Table,
    patch: Result<Record, Error>,
    conditions: Vec<Kwargs>,
    returning: bool,
}

impl UpdateQuery<'_> {
    pub fn r#where(mut self, kw: Vec<Kwargs>) -> Self {
        self.conditions = append_conditions(std::mem::take(&mut self.conditions), kw);
        self
    }

    pub fn returning(mut self) -> Self {
        self.returning = true;
        self
    }

    pub async fn execute(self) -> Result<Vec<Record>, Error> {
        let plan = UpdatePlan {
            table: self.table,
            patch: self.patch?,
            conditions: self.conditions,
            returning: self.returning,
        };
        self.db.backend().update(plan).await
    }
}

pub struct Delete<'db> {
    db: &'db Database,
    plan: DeletePlan,
}

impl<'db> Delete<'db> {
    pub(crate) fn new(db: &'db Database, table: Table) -> Self {
        Self {
            db,
            plan: DeletePlan {
                table,
                conditions: Vec::new(),
            },
        }
    }

    pub fn r#where(mut self, kw: Vec<Kwargs>) -> Self {
        self.plan.conditions = append_conditions(std::mem::take(&mut self.plan.conditions), kw);
        self
    }

    pub async fn execute(self) -> Result<Vec<Record>, Error> {
        self.db.backend().delete(self.plan).await
    }
}
