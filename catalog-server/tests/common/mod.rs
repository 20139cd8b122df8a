//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};

use catalog_server::CategoryService;
use catalog_server::db::repository::category_relation;
use shared::models::CategoryRelation;
use sqlx::SqlitePool;

pub fn triples(rows: &[CategoryRelation]) -> BTreeSet<(i64, i64, i64)> {
    rows.iter()
        .map(|r| (r.ancestor_id, r.descendant_id, r.depth))
        .collect()
}

pub async fn relations(pool: &SqlitePool) -> BTreeSet<(i64, i64, i64)> {
    triples(&category_relation::find_all(pool).await.unwrap())
}

/// The closure table must equal what the parent pointers imply
pub async fn assert_closure_consistent(svc: &CategoryService, pool: &SqlitePool) {
    let categories = svc.list(true).await.unwrap();
    let parents: HashMap<i64, Option<i64>> =
        categories.iter().map(|c| (c.id, c.parent_id)).collect();

    let mut expected = BTreeSet::new();
    for c in &categories {
        expected.insert((c.id, c.id, 0));
        let mut depth = 0;
        let mut cursor = c.parent_id;
        while let Some(p) = cursor {
            depth += 1;
            expected.insert((p, c.id, depth));
            cursor = parents[&p];
        }
    }
    assert_eq!(relations(pool).await, expected);

    for c in &categories {
        assert_eq!(
            category_relation::count_self_relations(pool, c.id).await.unwrap(),
            1
        );
    }
}
