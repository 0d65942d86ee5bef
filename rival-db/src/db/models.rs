//! Entities tracked by the application and the sample rows the fallback serves.

use serde::{Deserialize, Serialize};

use crate::types::{Boolean, DateTime, Float, IdList, Integer, Text};
use rival_db_derive::Model;

#[derive(Model, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[model(table = Competitors)]
pub struct Competitor {
    #[field(primary_key = true, auto = true)]
    pub id: Integer,
    #[field(size = 100)]
    pub name: String,
    #[field(default = true)]
    pub is_active: Boolean,
}

#[derive(Model, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[model(table = Sources)]
pub struct Source {
    #[field(primary_key = true, auto = true)]
    pub id: Integer,
    #[field(size = 100)]
    pub name: String,
    #[field(foreign_key = competitors.id)]
    pub competitor_id: Integer,
    #[field(default = true)]
    pub is_active: Boolean,
    pub last_status: Option<String>,
    pub item_selector: Option<String>,
    pub url: Text,
    #[field(default = "now")]
    pub created_at: DateTime,
}

#[derive(Model, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[model(table = Updates)]
pub struct Update {
    #[field(primary_key = true, auto = true)]
    pub id: Integer,
    pub content: Text,
    #[field(foreign_key = sources.id)]
    pub source_id: Integer,
    #[field(foreign_key = competitors.id)]
    pub competitor_id: Integer,
    #[field(default = "now")]
    pub scraped_at: DateTime,
    #[field(size = 20, default = "low")]
    pub severity: String,
}

#[derive(Model, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[model(table = Classifications)]
pub struct Classification {
    #[field(primary_key = true, auto = true)]
    pub id: Integer,
    #[field(foreign_key = updates.id)]
    pub update_id: Integer,
    #[field(foreign_key = competitors.id)]
    pub competitor_id: Integer,
    #[field(size = 50)]
    pub category: String,
    #[field(size = 20)]
    pub impact: String,
    pub confidence: Float,
}

#[derive(Model, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[model(table = Digests)]
pub struct Digest {
    #[field(primary_key = true, auto = true)]
    pub id: Integer,
    #[field(size = 200)]
    pub title: String,
    pub content: Text,
    pub classified_updates: IdList,
    #[field(default = "now")]
    pub created_at: DateTime,
}

/// Result row of a count select.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountRow {
    pub count: i64,
}

pub(crate) fn sample_competitors() -> Vec<Competitor> {
    (1..=2)
        .map(|id| Competitor {
            id,
            name: format!("Competitor {id}"),
            is_active: true,
        })
        .collect()
}

pub(crate) fn sample_sources(now: &str) -> Vec<Source> {
    [(1, ".post"), (2, ".blog")]
        .into_iter()
        .map(|(id, selector)| Source {
            id,
            name: format!("Source {id}"),
            competitor_id: id,
            is_active: true,
            last_status: Some("success".to_string()),
            item_selector: Some(selector.to_string()),
            url: format!("https://example.com/competitor{id}"),
            created_at: now.to_string(),
        })
        .collect()
}

pub(crate) fn sample_updates(now: &str) -> Vec<Update> {
    vec![
        Update {
            id: 1,
            content: "Competitor 1 launched new feature X".to_string(),
            source_id: 1,
            competitor_id: 1,
            scraped_at: now.to_string(),
            severity: "medium".to_string(),
        },
        Update {
            id: 2,
            content: "Competitor 2 updated pricing strategy".to_string(),
            source_id: 2,
            competitor_id: 2,
            scraped_at: now.to_string(),
            severity: "high".to_string(),
        },
    ]
}

pub(crate) fn sample_classifications() -> Vec<Classification> {
    vec![
        Classification {
            id: 1,
            update_id: 1,
            competitor_id: 1,
            category: "feature".to_string(),
            impact: "medium".to_string(),
            confidence: 0.85,
        },
        Classification {
            id: 2,
            update_id: 2,
            competitor_id: 2,
            category: "pricing".to_string(),
            impact: "high".to_string(),
            confidence: 0.75,
        },
    ]
}

pub(crate) fn sample_digests(now: &str) -> Vec<Digest> {
    vec![Digest {
        id: 1,
        title: "Weekly Digest".to_string(),
        content: "Summary of competitor updates...".to_string(),
        classified_updates: vec![1, 2],
        created_at: now.to_string(),
    }]
}
