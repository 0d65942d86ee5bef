use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use super::store::MemoryStore;
use crate::db::backend::{Backend, BackendKind, RawOutcome};
use crate::db::query::{DeletePlan, InsertPlan, SelectPlan, UpdatePlan};
use crate::db::{Projection, Record, Table};
use crate::utils::{count_record, record_i64, to_record};
use crate::Error;

type Snapshot = fn(&MemoryStore) -> Vec<Record>;
type Count = fn(&MemoryStore) -> usize;
type Expand = fn(&MemoryStore, Record) -> Record;

/// Per-table behaviour of the fallback: which rows a select sees, how a count is taken and
/// how a joined row is assembled. Tables without a count or expander keep the defaults
/// (`0`, rows unchanged).
struct TableBehavior {
    snapshot: Snapshot,
    count: Option<Count>,
    expand: Option<Expand>,
}

static COMPETITORS: TableBehavior = TableBehavior {
    snapshot: active_competitors,
    count: Some(count_active_competitors),
    expand: None,
};

static SOURCES: TableBehavior = TableBehavior {
    snapshot: active_sources,
    count: Some(count_active_sources),
    expand: Some(expand_source),
};

static UPDATES: TableBehavior = TableBehavior {
    snapshot: all_updates,
    count: Some(count_updates),
    expand: Some(expand_update),
};

static CLASSIFICATIONS: TableBehavior = TableBehavior {
    snapshot: all_classifications,
    count: Some(count_classifications),
    expand: None,
};

static DIGESTS: TableBehavior = TableBehavior {
    snapshot: all_digests,
    count: None,
    expand: None,
};

fn behavior(table: Table) -> &'static TableBehavior {
    match table {
        Table::Competitors => &COMPETITORS,
        Table::Sources => &SOURCES,
        Table::Updates => &UPDATES,
        Table::Classifications => &CLASSIFICATIONS,
        Table::Digests => &DIGESTS,
    }
}

fn active_competitors(store: &MemoryStore) -> Vec<Record> {
    store.active_competitors().map(to_record).collect()
}

fn active_sources(store: &MemoryStore) -> Vec<Record> {
    store.active_sources().map(to_record).collect()
}

fn all_updates(store: &MemoryStore) -> Vec<Record> {
    store.updates.iter().map(to_record).collect()
}

fn all_classifications(store: &MemoryStore) -> Vec<Record> {
    store.classifications.iter().map(to_record).collect()
}

fn all_digests(store: &MemoryStore) -> Vec<Record> {
    store.digests.iter().map(to_record).collect()
}

fn count_active_competitors(store: &MemoryStore) -> usize {
    store.active_competitors().count()
}

fn count_active_sources(store: &MemoryStore) -> usize {
    store.active_sources().count()
}

fn count_updates(store: &MemoryStore) -> usize {
    store.updates.len()
}

fn count_classifications(store: &MemoryStore) -> usize {
    store.classifications.len()
}

fn attach(composite: &mut Record, table: Table, row: Option<Record>) {
    if let Some(row) = row {
        composite.insert(table.name().to_string(), Value::Object(row));
    }
}

fn expand_source(store: &MemoryStore, source: Record) -> Record {
    let competitor = record_i64(&source, "competitorId")
        .and_then(|id| store.competitor(id))
        .map(to_record);

    let mut composite = Record::new();
    attach(&mut composite, Table::Competitors, competitor);
    attach(&mut composite, Table::Sources, Some(source));
    composite
}

fn expand_update(store: &MemoryStore, update: Record) -> Record {
    let competitor = record_i64(&update, "competitorId")
        .and_then(|id| store.competitor(id))
        .map(to_record);
    let source = record_i64(&update, "sourceId")
        .and_then(|id| store.source(id))
        .map(to_record);
    // One classification per update at most.
    let classification = record_i64(&update, "id")
        .and_then(|id| store.classification_for(id))
        .map(to_record);

    let mut composite = Record::new();
    attach(&mut composite, Table::Competitors, competitor);
    attach(&mut composite, Table::Sources, source);
    attach(&mut composite, Table::Classifications, classification);
    attach(&mut composite, Table::Updates, Some(update));
    composite
}

/// Fallback backend answering queries from a [`MemoryStore`].
///
/// Joins and counts are honoured; filters, ordering, limits and grouping are accepted and
/// ignored. Writes report plausible results without touching the store.
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    store: Arc<MemoryStore>,
}

impl MemoryEngine {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn resolve_select(&self, plan: SelectPlan) -> Vec<Record> {
        let behavior = behavior(plan.table);

        if plan.projection == Projection::Count {
            let count = behavior.count.map_or(0, |count| count(&self.store));
            return vec![count_record(count as i64)];
        }

        if !plan.conditions.is_empty()
            || !plan.order.is_empty()
            || plan.limit.is_some()
            || !plan.group_by.is_empty()
        {
            trace!(table = %plan.table, "filter, order, limit and group are not applied in memory");
        }

        let has_joins = plan.has_joins();
        let rows = plan
            .snapshot
            .unwrap_or_else(|| (behavior.snapshot)(&self.store));

        match behavior.expand {
            Some(expand) if has_joins => rows
                .into_iter()
                .map(|row| expand(&self.store, row))
                .collect(),
            _ => rows,
        }
    }

    /// Attaches `table length + position + 1` ids to the inserted rows.
    pub fn resolve_insert(&self, plan: InsertPlan) -> Vec<Record> {
        if !plan.returning {
            return Vec::new();
        }

        let len = self.store.len(plan.table);
        plan.rows
            .into_iter()
            .enumerate()
            .map(|(position, mut row)| {
                row.insert("id".to_string(), Value::from((len + position + 1) as i64));
                row
            })
            .collect()
    }

    pub fn resolve_update(&self, plan: UpdatePlan) -> Vec<Record> {
        if plan.returning {
            vec![plan.patch]
        } else {
            Vec::new()
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new(MemoryStore::seeded())
    }
}

#[async_trait]
impl Backend for MemoryEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn snapshot(&self, table: Table) -> Option<Vec<Record>> {
        Some((behavior(table).snapshot)(&self.store))
    }

    async fn select(&self, plan: SelectPlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, joins = plan.joins.len(), "select from in-memory store");
        Ok(self.resolve_select(plan))
    }

    async fn insert(&self, plan: InsertPlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, rows = plan.rows.len(), "insert into in-memory store");
        Ok(self.resolve_insert(plan))
    }

    async fn update(&self, plan: UpdatePlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, "update in in-memory store");
        Ok(self.resolve_update(plan))
    }

    async fn delete(&self, plan: DeletePlan) -> Result<Vec<Record>, Error> {
        debug!(table = %plan.table, "delete from in-memory store");
        Ok(Vec::new())
    }

    async fn raw(&self, sql: &str) -> Result<RawOutcome, Error> {
        debug!(sql, "raw statement ignored by in-memory store");
        Ok(RawOutcome::default())
    }

    async fn migrate(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::db::query::condition::{Join, JoinType};

    fn joined(table: Table) -> SelectPlan {
        let mut plan = SelectPlan::new(table, Projection::All);
        plan.joins.push(Join {
            join_type: JoinType::Right,
            table: Table::Competitors,
            on: Vec::new(),
        });
        plan
    }

    #[test]
    fn inactive_rows_are_hidden_from_snapshots_and_counts() {
        let mut store = MemoryStore::seeded();
        store.competitors[1].is_active = false;
        store.sources[0].is_active = false;
        let engine = MemoryEngine::new(store);

        let competitors = engine.resolve_select(SelectPlan::new(Table::Competitors, Projection::All));
        assert_eq!(competitors.len(), 1);
        assert_eq!(competitors[0]["id"], json!(1));

        let count = engine.resolve_select(SelectPlan::new(Table::Sources, Projection::Count));
        assert_eq!(count, vec![count_record(1)]);
    }

    #[test]
    fn digests_have_no_count() {
        let engine = MemoryEngine::default();
        let count = engine.resolve_select(SelectPlan::new(Table::Digests, Projection::Count));
        assert_eq!(count[0]["count"], json!(0));
    }

    #[test]
    fn join_on_table_without_expander_returns_snapshot() {
        let engine = MemoryEngine::default();
        let plain = engine.resolve_select(SelectPlan::new(Table::Classifications, Projection::All));
        let with_join = engine.resolve_select(joined(Table::Classifications));
        assert_eq!(plain, with_join);
    }

    #[test]
    fn missing_classification_leaves_key_absent() {
        let mut store = MemoryStore::seeded();
        store.classifications.retain(|c| c.update_id != 2);
        let engine = MemoryEngine::new(store);

        let rows = engine.resolve_select(joined(Table::Updates));
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains_key("classifications"));
        assert!(!rows[1].contains_key("classifications"));
        assert_eq!(rows[1]["sources"]["id"], json!(2));
    }

    #[test]
    fn captured_snapshot_wins_over_current_store() {
        let engine = MemoryEngine::default();
        let mut plan = SelectPlan::new(Table::Competitors, Projection::All);
        plan.snapshot = Some(Vec::new());
        assert!(engine.resolve_select(plan).is_empty());
    }

    #[test]
    fn insert_without_returning_yields_nothing() {
        let engine = MemoryEngine::default();
        let plan = InsertPlan {
            table: Table::Digests,
            rows: vec![Record::new()],
            returning: false,
        };
        assert!(engine.resolve_insert(plan).is_empty());
    }
}
