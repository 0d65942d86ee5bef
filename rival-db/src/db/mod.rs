//! The `db` module provides the table catalogue, the query builders and both backends.
//!
//! Callers never pick a backend directly: [`Database`](crate::Database) hands out builders that
//! look the same whichever backend sits behind them.

/// The `model` module defines the `Model` trait and the column metadata it carries.
pub mod model;

/// The `models` module holds the five entities and their sample rows.
pub mod models;

pub mod backend;
pub mod memory;
pub mod query;
pub mod sql;

pub use model::{Column, ColumnKind, Model};

#[cfg(not(feature = "postgres"))]
pub const PLACEHOLDER: &str = "?";

#[cfg(feature = "postgres")]
pub const PLACEHOLDER: &str = "$";

/// One row as seen by callers: a JSON object keyed by camelCase field names.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The tables known to both backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Competitors,
    Sources,
    Updates,
    Classifications,
    Digests,
}

impl Table {
    /// Every table, in foreign-key order.
    pub const ALL: [Table; 5] = [
        Table::Competitors,
        Table::Sources,
        Table::Updates,
        Table::Classifications,
        Table::Digests,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Table::Competitors => "competitors",
            Table::Sources => "sources",
            Table::Updates => "updates",
            Table::Classifications => "classifications",
            Table::Digests => "digests",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::Competitors => models::Competitor::COLUMNS,
            Table::Sources => models::Source::COLUMNS,
            Table::Updates => models::Update::COLUMNS,
            Table::Classifications => models::Classification::COLUMNS,
            Table::Digests => models::Digest::COLUMNS,
        }
    }

    pub fn primary_key(self) -> &'static str {
        match self {
            Table::Competitors => models::Competitor::PK,
            Table::Sources => models::Source::PK,
            Table::Updates => models::Update::PK,
            Table::Classifications => models::Classification::PK,
            Table::Digests => models::Digest::PK,
        }
    }

    /// Looks up the column a record key refers to.
    pub fn column(self, key: &str) -> Option<&'static Column> {
        self.columns().iter().find(|column| column.matches(key))
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|table| table.name() == s)
            .ok_or_else(|| format!("unknown table `{s}`"))
    }
}

/// What a select asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    /// Every column of the table (and of joined tables).
    #[default]
    All,
    /// A single `{"count": n}` row.
    Count,
}
