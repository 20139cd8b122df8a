//! Concurrent writers against one file-backed database

mod common;

use catalog_server::{CategoryService, DbService, ErrorCode};
use common::assert_closure_consistent;
use shared::AppResult;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup() -> (TempDir, SqlitePool, CategoryService) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let db = DbService::new(path.to_str().unwrap(), 5).await.unwrap();
    let svc = CategoryService::new(db.pool.clone());
    (dir, db.pool, svc)
}

fn move_under(parent: Option<i64>) -> CategoryUpdate {
    CategoryUpdate {
        parent_id: Some(parent),
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_creates_all_succeed() {
    let (_dir, pool, svc) = setup().await;

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.create(CategoryCreate::named(format!("Root {i}"))).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(svc.list(true).await.unwrap().len(), 100);
    assert_closure_consistent(&svc, &pool).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_creates_race_with_parent_moves() {
    let (_dir, pool, svc) = setup().await;
    let a = svc.create(CategoryCreate::named("A")).await.unwrap().id;
    let b = svc.create(CategoryCreate::named("B")).await.unwrap().id;
    let p = svc.create(CategoryCreate::under("P", a)).await.unwrap().id;

    let mut handles = Vec::new();
    for i in 0..50 {
        let creator = svc.clone();
        handles.push(tokio::spawn(async move {
            creator
                .create(CategoryCreate::under(format!("Child {i}"), p))
                .await
        }));
        let mover = svc.clone();
        let target = if i % 2 == 0 { b } else { a };
        handles.push(tokio::spawn(async move {
            mover.update(p, move_under(Some(target))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let children = svc.children(p).await.unwrap();
    assert_eq!(children.len(), 50);
    assert_closure_consistent(&svc, &pool).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crossed_moves_admit_only_one() {
    let (_dir, pool, svc) = setup().await;

    for round in 0..20 {
        let x = svc
            .create(CategoryCreate::named(format!("X {round}")))
            .await
            .unwrap()
            .id;
        let y = svc
            .create(CategoryCreate::named(format!("Y {round}")))
            .await
            .unwrap()
            .id;

        let first = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.update(x, move_under(Some(y))).await })
        };
        let second = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.update(y, move_under(Some(x))).await })
        };
        let results: Vec<AppResult<Category>> =
            vec![first.await.unwrap(), second.await.unwrap()];

        let failures: Vec<ErrorCode> = results
            .iter()
            .filter_map(|r| r.as_ref().err().map(|e| e.code))
            .collect();
        assert_eq!(failures, vec![ErrorCode::CategoryCycle]);
    }

    assert_closure_consistent(&svc, &pool).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_slug_race_reports_conflict() {
    let (_dir, pool, svc) = setup().await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.create(CategoryCreate::named("Phones")).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert_eq!(e.code, ErrorCode::CategorySlugExists),
        }
    }
    assert_eq!(created, 1);
    assert_closure_consistent(&svc, &pool).await;
}
