use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use rival_db::prelude::*;
use rival_db::BackendKind;

#[tokio::test]
async fn missing_url_selects_fallback() {
    let database = Database::connect(&DatabaseConfig::default()).await.unwrap();
    assert!(database.is_fallback());

    let database = Database::connect(&DatabaseConfig::with_url("")).await.unwrap();
    assert_eq!(database.kind(), BackendKind::Memory);
    assert!(database.pool().is_none());
}

#[tokio::test]
async fn global_handle_is_created_once() {
    std::env::remove_var("DATABASE_URL");

    let first = database().await.unwrap();
    let second = database().await.unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(first.is_fallback());
}

#[rstest]
#[case(Table::Competitors, 2)]
#[case(Table::Sources, 2)]
#[case(Table::Updates, 2)]
#[case(Table::Classifications, 2)]
#[case(Table::Digests, 1)]
#[tokio::test]
async fn every_table_resolves(#[case] table: Table, #[case] expected: usize) {
    let database = Database::in_memory();
    let rows = database.select().from(table).execute().await.unwrap();
    assert_eq!(rows.len(), expected);
}

#[rstest]
#[case(Table::Competitors, 2)]
#[case(Table::Sources, 2)]
#[case(Table::Updates, 2)]
#[case(Table::Classifications, 2)]
#[tokio::test]
async fn count_matches_seed(#[case] table: Table, #[case] expected: i64) {
    let database = Database::in_memory();
    let rows: Vec<CountRow> = database
        .select_with(Projection::Count)
        .from(table)
        .fetch_as()
        .await
        .unwrap();
    assert_eq!(rows, vec![CountRow { count: expected }]);
}

#[tokio::test]
async fn counts_only_active_competitors_and_sources() {
    let mut store = MemoryStore::seeded();
    store.competitors[0].is_active = false;
    store.sources[1].is_active = false;
    store.updates.pop();
    let database = Database::with_store(store);

    for (table, expected) in [
        (Table::Competitors, 1),
        (Table::Sources, 1),
        (Table::Updates, 1),
        (Table::Classifications, 2),
    ] {
        let rows = database
            .select_with(Projection::Count)
            .from(table)
            .execute()
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["count"], json!(expected), "{table}");
    }

    let competitors = database.select().from(Table::Competitors).execute().await.unwrap();
    assert_eq!(competitors.len(), 1);
    assert_eq!(competitors[0]["id"], json!(2));
}

#[tokio::test]
async fn count_of_sources_is_two() {
    let database = Database::in_memory();
    let rows = database
        .select_with(Projection::Count)
        .from(Table::Sources)
        .left_join(Table::Competitors, Vec::new())
        .execute()
        .await
        .unwrap();
    assert_eq!(rows, vec![json!({"count": 2}).as_object().cloned().unwrap()]);
}

#[tokio::test]
async fn joined_sources_carry_their_competitor() {
    let database = Database::in_memory();
    let rows = database
        .select()
        .from(Table::Sources)
        .left_join(
            Table::Competitors,
            kwargs!(sources.competitor_id == competitors.id),
        )
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row["competitors"]["id"], row["sources"]["competitorId"]);
    }
}

#[tokio::test]
async fn joined_updates_follow_foreign_keys() {
    let database = Database::in_memory();
    let rows = database
        .select()
        .from(Table::Updates)
        .inner_join(Table::Sources, Vec::new())
        .inner_join(Table::Competitors, Vec::new())
        .left_join(Table::Classifications, Vec::new())
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        let update = &row["updates"];
        assert_eq!(row["competitors"]["id"], update["competitorId"]);
        assert_eq!(row["sources"]["id"], update["sourceId"]);
        assert_eq!(row["classifications"]["updateId"], update["id"]);
    }

    let first = rows.iter().find(|row| row["updates"]["id"] == json!(1)).unwrap();
    assert_eq!(first["classifications"]["category"], json!("feature"));
}

#[tokio::test]
async fn update_without_classification_has_no_classification_field() {
    let mut store = MemoryStore::seeded();
    store.classifications.clear();
    let database = Database::with_store(store);

    let rows = database
        .select()
        .from(Table::Updates)
        .left_join(Table::Classifications, Vec::new())
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| !row.contains_key("classifications")));
}

#[rstest]
#[case(Table::Competitors)]
#[case(Table::Classifications)]
#[case(Table::Digests)]
#[tokio::test]
async fn tables_without_join_mapping_ignore_joins(#[case] table: Table) {
    let database = Database::in_memory();
    let plain = database.select().from(table).execute().await.unwrap();
    let joined = database
        .select()
        .from(table)
        .right_join(Table::Updates, Vec::new())
        .execute()
        .await
        .unwrap();
    assert_eq!(plain, joined);
}

#[tokio::test]
async fn filter_order_limit_and_group_are_ignored() {
    let database = Database::in_memory();
    let plain = database.select().from(Table::Updates).execute().await.unwrap();
    let modified = database
        .select()
        .from(Table::Updates)
        .r#where(kwargs!(severity = "high"))
        .r#where(kwargs!(id > 100))
        .order_by(Order::desc("scraped_at"))
        .limit(1)
        .group_by("competitor_id")
        .execute()
        .await
        .unwrap();
    assert_eq!(plain, modified);
}

#[tokio::test]
async fn rows_deserialize_into_models() {
    let database = Database::in_memory();
    let sources: Vec<Source> = database.select().from(Table::Sources).fetch_as().await.unwrap();
    assert_eq!(sources[0].item_selector.as_deref(), Some(".post"));
    assert_eq!(sources[1].url, "https://example.com/competitor2");

    let digests: Vec<Digest> = database.select().from(Table::Digests).fetch_as().await.unwrap();
    assert_eq!(digests[0].classified_updates, vec![1, 2]);
}

#[tokio::test]
async fn insert_assigns_next_id() {
    let database = Database::in_memory();
    let rows = database
        .insert(Table::Sources)
        .values(&json!({"name": "Source 3", "competitorId": 1, "url": "https://example.com/3"}))
        .returning()
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(3));
    assert_eq!(rows[0]["name"], json!("Source 3"));
}

#[tokio::test]
async fn insert_list_assigns_sequential_ids() {
    let database = Database::in_memory();
    let competitors = vec![
        Competitor {
            name: "Acme".to_string(),
            ..Default::default()
        },
        Competitor {
            name: "Globex".to_string(),
            ..Default::default()
        },
        Competitor {
            name: "Initech".to_string(),
            ..Default::default()
        },
    ];

    let rows = database
        .insert(Table::Competitors)
        .values(&competitors)
        .returning()
        .execute()
        .await
        .unwrap();

    let ids: Vec<_> = rows.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, vec![json!(3), json!(4), json!(5)]);
    assert_eq!(rows[1]["isActive"], json!(true));
}

#[tokio::test]
async fn writes_leave_the_store_untouched() {
    let database = Database::in_memory();
    database
        .insert(Table::Updates)
        .values(&json!({"content": "new"}))
        .returning()
        .execute()
        .await
        .unwrap();
    database
        .delete(Table::Updates)
        .r#where(kwargs!(id = 1))
        .execute()
        .await
        .unwrap();

    let updates = database.select().from(Table::Updates).execute().await.unwrap();
    assert_eq!(updates.len(), 2);

    let again = database
        .insert(Table::Updates)
        .values(&json!({"content": "again"}))
        .returning()
        .execute()
        .await
        .unwrap();
    assert_eq!(again[0]["id"], json!(3));
}

#[tokio::test]
async fn insert_rejects_non_objects() {
    let database = Database::in_memory();
    let result = database.insert(Table::Digests).values(&42).returning().execute().await;
    assert!(matches!(result, Err(Error::InvalidValues(_))));
}

#[tokio::test]
async fn update_returns_patch_whatever_the_condition() {
    let database = Database::in_memory();
    let patch = json!({"lastStatus": "error", "isActive": false});

    for condition in [kwargs!(id = 1), kwargs!(id = 999), Vec::new()] {
        let rows = database
            .update(Table::Sources)
            .set(&patch)
            .r#where(condition)
            .returning()
            .execute()
            .await
            .unwrap();
        assert_eq!(rows, vec![patch.as_object().cloned().unwrap()]);
    }
}

#[tokio::test]
async fn delete_resolves_empty() {
    let database = Database::in_memory();
    for table in Table::ALL {
        let rows = database
            .delete(table)
            .r#where(kwargs!(id = 1).or(kwargs!(id = 2)))
            .execute()
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}

#[tokio::test]
async fn pool_operations_are_noops() {
    let database = Database::in_memory();
    database.migrate().await.unwrap();

    let outcome = database.raw("select 1").await.unwrap();
    assert_eq!(outcome, RawOutcome::default());

    database.close().await;
    let rows = database.select().from(Table::Competitors).execute().await.unwrap();
    assert_eq!(rows.len(), 2);
}
