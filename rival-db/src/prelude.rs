pub use super::db::models::{Classification, Competitor, CountRow, Digest, Source, Update};
pub use super::db::query::condition::{And, Direction, JoinType, Kwargs, Operand, Or, Order};
pub use super::db::{Column, ColumnKind, Model, Projection, Record, Table};
pub use super::{database, kwargs};
pub use super::{types::*, Database, DatabaseConfig, Error, MemoryStore, RawOutcome};
pub use rival_db_derive::Model;
