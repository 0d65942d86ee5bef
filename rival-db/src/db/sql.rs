//! The real backend: a pooled sqlx connection plus the schema-aware query layer.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{Column as _, Row};
use tracing::{debug, info};

use super::backend::{Backend, BackendKind, RawOutcome};
use super::model::create_table_sql;
use super::query::builder::{self, column_alias};
use super::query::{DeletePlan, InsertPlan, Query, SelectPlan, UpdatePlan};
use super::{ColumnKind, Projection, Record, Table};
use crate::utils::count_record;
use crate::{Connection, Error};

#[derive(Debug, Clone)]
pub struct SqlBackend {
    conn: Connection,
}

impl SqlBackend {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        sqlx::any::install_default_drivers();
        let conn = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { conn })
    }

    pub fn from_pool(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    async fn fetch(&self, query: Query) -> Result<Vec<AnyRow>, Error> {
        log_sql(&query.sql);
        let mut stream = sqlx::query(&query.sql);
        binds!(query.args, stream);
        Ok(stream.fetch_all(&self.conn).await?)
    }

    async fn execute(&self, query: Query) -> Result<u64, Error> {
        log_sql(&query.sql);
        let mut stream = sqlx::query(&query.sql);
        binds!(query.args, stream);
        Ok(stream.execute(&self.conn).await?.rows_affected())
    }
}

fn log_sql(sql: &str) {
    #[cfg(debug_assertions)]
    {
        let formatted_sql = sqlformat::format(
            sql,
            &sqlformat::QueryParams::None,
            &sqlformat::FormatOptions::default(),
        );
        debug!("\n{formatted_sql}");
    }

    #[cfg(not(debug_assertions))]
    debug!(sql);
}

/// Decodes one aliased column. `Null` only ever stands for SQL NULL; a value of the wrong
/// type is an error.
fn decode_value(row: &AnyRow, alias: &str, kind: ColumnKind) -> Result<Value, Error> {
    let value = match kind {
        ColumnKind::Integer => row.try_get::<Option<i64>, _>(alias)?.map(Value::from),
        ColumnKind::Real => row.try_get::<Option<f64>, _>(alias)?.map(Value::from),
        ColumnKind::Boolean => row
            .try_get::<Option<i64>, _>(alias)?
            .map(|value| Value::Bool(value != 0)),
        ColumnKind::Text | ColumnKind::DateTime => {
            row.try_get::<Option<String>, _>(alias)?.map(Value::from)
        }
        ColumnKind::Json => match row.try_get::<Option<String>, _>(alias)? {
            Some(text) => Some(serde_json::from_str(&text)?),
            None => None,
        },
    };

    Ok(value.unwrap_or(Value::Null))
}

/// Reads one table's aliased columns out of a row. A null primary key means the joined row
/// was missing.
fn decode_table(row: &AnyRow, table: Table) -> Result<Option<Record>, Error> {
    let mut record = Record::new();
    for column in table.columns() {
        let value = decode_value(row, &column_alias(table, column.name), column.kind)?;
        if column.primary_key && value.is_null() {
            return Ok(None);
        }
        record.insert(column.field.to_string(), value);
    }
    Ok(Some(record))
}

/// Decodes every row of a single-table result, skipping rows without a primary key.
fn decode_rows(rows: &[AnyRow], table: Table) -> Result<Vec<Record>, Error> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(record) = decode_table(row, table)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn decode_count(row: &AnyRow) -> Result<Record, Error> {
    Ok(count_record(row.try_get::<i64, _>("count")?))
}

/// Best-effort decoding for rows of statements without column metadata.
fn decode_untyped(row: &AnyRow) -> Record {
    row.columns()
        .iter()
        .map(|column| {
            let index = column.ordinal();
            let value = row
                .try_get::<Option<i64>, _>(index)
                .ok()
                .flatten()
                .map(Value::from)
                .or_else(|| row.try_get::<Option<f64>, _>(index).ok().flatten().map(Value::from))
                .or_else(|| row.try_get::<Option<bool>, _>(index).ok().flatten().map(Value::from))
                .or_else(|| row.try_get::<Option<String>, _>(index).ok().flatten().map(Value::from))
                .unwrap_or(Value::Null);
            (column.name().to_string(), value)
        })
        .collect()
}

#[async_trait]
impl Backend for SqlBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sql
    }

    fn pool(&self) -> Option<&Connection> {
        Some(&self.conn)
    }

    async fn select(&self, plan: SelectPlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, joins = plan.joins.len(), "select");
        let rows = self.fetch(builder::to_select_query(&plan)).await?;

        if plan.projection == Projection::Count {
            return rows.iter().map(decode_count).collect();
        }

        if !plan.has_joins() {
            return decode_rows(&rows, plan.table);
        }

        let tables: Vec<Table> = std::iter::once(plan.table)
            .chain(plan.joins.iter().map(|join| join.table))
            .collect();

        let mut composites = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut composite = Record::new();
            for &table in &tables {
                if let Some(record) = decode_table(row, table)? {
                    composite.insert(table.name().to_string(), Value::Object(record));
                }
            }
            composites.push(composite);
        }
        Ok(composites)
    }

    async fn insert(&self, plan: InsertPlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, rows = plan.rows.len(), "insert");
        let mut inserted = Vec::new();
        for query in builder::to_insert_queries(&plan)? {
            if plan.returning {
                let rows = self.fetch(query).await?;
                inserted.extend(decode_rows(&rows, plan.table)?);
            } else {
                self.execute(query).await?;
            }
        }
        Ok(inserted)
    }

    async fn update(&self, plan: UpdatePlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, "update");
        let query = builder::to_update_query(&plan)?;
        if plan.returning {
            let rows = self.fetch(query).await?;
            decode_rows(&rows, plan.table)
        } else {
            self.execute(query).await?;
            Ok(Vec::new())
        }
    }

    async fn delete(&self, plan: DeletePlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, "delete");
        self.execute(builder::to_delete_query(&plan)).await?;
        Ok(Vec::new())
    }

    async fn raw(&self, sql: &str) -> Result<RawOutcome, Error> {
        let rows = self
            .fetch(Query {
                sql: sql.to_string(),
                args: Vec::new(),
            })
            .await?;
        Ok(RawOutcome {
            row_count: rows.len() as u64,
            rows: rows.iter().map(decode_untyped).collect(),
        })
    }

    async fn migrate(&self) -> Result<(), Error> {
        for table in Table::ALL {
            self.execute(Query {
                sql: create_table_sql(table),
                args: Vec::new(),
            })
            .await?;
        }
        info!("database schema is up to date");
        Ok(())
    }

    async fn close(&self) {
        self.conn.close().await;
    }
}
