use crate::db::models::{self, Classification, Competitor, Digest, Source, Update};
use crate::db::Table;

/// Fixed sample rows served when no database is configured.
///
/// The store is built once per engine and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStore {
    pub competitors: Vec<Competitor>,
    pub sources: Vec<Source>,
    pub updates: Vec<Update>,
    pub classifications: Vec<Classification>,
    pub digests: Vec<Digest>,
}

impl MemoryStore {
    /// The sample data set, timestamped with the current time.
    pub fn seeded() -> Self {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            competitors: models::sample_competitors(),
            sources: models::sample_sources(&now),
            updates: models::sample_updates(&now),
            classifications: models::sample_classifications(),
            digests: models::sample_digests(&now),
        }
    }

    pub fn empty() -> Self {
        Self {
            competitors: Vec::new(),
            sources: Vec::new(),
            updates: Vec::new(),
            classifications: Vec::new(),
            digests: Vec::new(),
        }
    }

    /// Number of stored rows, active or not.
    pub fn len(&self, table: Table) -> usize {
        match table {
            Table::Competitors => self.competitors.len(),
            Table::Sources => self.sources.len(),
            Table::Updates => self.updates.len(),
            Table::Classifications => self.classifications.len(),
            Table::Digests => self.digests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Table::ALL.into_iter().all(|table| self.len(table) == 0)
    }

    pub fn active_competitors(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.iter().filter(|competitor| competitor.is_active)
    }

    pub fn active_sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter().filter(|source| source.is_active)
    }

    pub fn competitor(&self, id: i64) -> Option<&Competitor> {
        self.competitors.iter().find(|competitor| competitor.id == id)
    }

    pub fn source(&self, id: i64) -> Option<&Source> {
        self.sources.iter().find(|source| source.id == id)
    }

    /// First classification attached to an update.
    pub fn classification_for(&self, update_id: i64) -> Option<&Classification> {
        self.classifications
            .iter()
            .find(|classification| classification.update_id == update_id)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}
