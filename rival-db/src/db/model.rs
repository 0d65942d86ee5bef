//! Schema metadata for the entities the handle knows about.
//!
//! Implementations are generated with `#[derive(Model)]`; the SQL backend uses the column list
//! to create tables, map record fields to columns and decode rows back into records.

use super::Table;

/// How a column is stored and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    /// `0`/`1` in SQL, `bool` in records.
    Boolean,
    Text,
    DateTime,
    /// JSON text holding an array of ids.
    Json,
}

/// One column of a model's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// SQL column name (snake_case).
    pub name: &'static str,
    /// Record field name (camelCase), as produced by serde.
    pub field: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto: bool,
    pub unique: bool,
    pub size: Option<usize>,
    /// SQL default expression.
    pub default: Option<&'static str>,
    /// `(table, column)` this column references.
    pub references: Option<(&'static str, &'static str)>,
}

impl Column {
    /// Accepts either the record field name or the SQL column name.
    pub fn matches(&self, key: &str) -> bool {
        self.field == key || self.name == key
    }

    /// Column definition for `create table`.
    pub fn definition(&self) -> String {
        let mut definition = format!("{} {}", self.name, self.sql_type());

        if self.primary_key {
            #[cfg(not(feature = "postgres"))]
            definition.push_str(if self.auto {
                " primary key autoincrement"
            } else {
                " primary key"
            });
            #[cfg(feature = "postgres")]
            definition.push_str(" primary key");
        }
        if self.unique {
            definition.push_str(" unique");
        }
        if let Some(default) = self.default {
            definition.push_str(&format!(" default {default}"));
        }
        if !self.nullable && !self.primary_key {
            definition.push_str(" not null");
        }
        if let Some((table, column)) = self.references {
            definition.push_str(&format!(" references {table}({column})"));
        }
        definition
    }

    fn sql_type(&self) -> String {
        match self.kind {
            #[cfg(not(feature = "postgres"))]
            ColumnKind::Integer if self.primary_key => "integer".to_string(),
            #[cfg(feature = "postgres")]
            ColumnKind::Integer if self.primary_key && self.auto => "bigserial".to_string(),
            ColumnKind::Integer => "bigint".to_string(),
            ColumnKind::Real => "double precision".to_string(),
            // Stored as 0/1: the sqlx `Any` driver cannot decode SQLite booleans.
            ColumnKind::Boolean => "bigint".to_string(),
            ColumnKind::Text => match self.size {
                Some(size) => format!("varchar({size})"),
                None => "text".to_string(),
            },
            ColumnKind::DateTime => "varchar(40)".to_string(),
            ColumnKind::Json => "text".to_string(),
        }
    }
}

/// Implemented by every entity through `#[derive(Model)]`.
pub trait Model {
    const TABLE: Table;
    const PK: &'static str;
    const COLUMNS: &'static [Column];

    /// `create table if not exists` statement for this model.
    fn schema() -> String
    where
        Self: Sized,
    {
        create_table_sql(Self::TABLE)
    }
}

pub fn create_table_sql(table: Table) -> String {
    let columns = table
        .columns()
        .iter()
        .map(Column::definition)
        .collect::<Vec<_>>()
        .join(", ");
    format!("create table if not exists {} ({columns});", table.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_are_stored_as_integers() {
        let is_active = Table::Competitors.column("isActive").expect("column");
        assert_eq!(is_active.kind, ColumnKind::Boolean);
        assert_eq!(is_active.definition(), "is_active bigint default 1 not null");
    }

    #[test]
    fn tables_reference_their_owners() {
        let sql = create_table_sql(Table::Sources);
        assert!(sql.starts_with("create table if not exists sources ("));
        assert!(sql.contains("competitor_id bigint not null references competitors(id)"));
        assert!(sql.contains("created_at varchar(40) default current_timestamp not null"));
    }
}
