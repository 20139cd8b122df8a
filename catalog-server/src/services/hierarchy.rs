//! Hierarchy Builder - writes closure rows
//!
//! Every function here runs on a connection the caller already holds,
//! normally a transaction; nothing commits on its own except
//! [`build_relationship_atomic`]. A failed call leaves the transaction to be
//! rolled back by the caller (dropping it is enough).

use crate::db::{
    self,
    repository::{RepoError, category, category_relation},
};
use shared::models::CategoryRelation;
use shared::{AppError, AppResult, ErrorCode};
use sqlx::{SqliteConnection, SqlitePool};

/// Insert the `(id, id, 0)` row. A second call for the same category fails.
pub async fn create_self_relation(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    if category_relation::count_self_relations(&mut *conn, id).await? > 0 {
        return Err(relation_exists(id, id));
    }
    category_relation::insert(&mut *conn, CategoryRelation::self_relation(id))
        .await
        .map_err(|e| map_duplicate(e, id, id))?;
    tracing::debug!(category_id = id, "Self relation created");
    Ok(())
}

/// Link `descendant` under `ancestor` at `depth` and propagate the link to
/// every proper ancestor of `ancestor`.
///
/// Writes `(ancestor, descendant, depth)` and then `(x, descendant, d + depth)`
/// for each `(x, ancestor, d)` with `d > 0`. Returns the number of rows
/// written.
pub async fn build_relationship(
    conn: &mut SqliteConnection,
    ancestor: i64,
    descendant: i64,
    depth: i64,
) -> AppResult<usize> {
    if depth < 1 {
        return Err(AppError::with_message(
            ErrorCode::InvalidRelationDepth,
            format!("Relation depth must be at least 1, got {depth}"),
        )
        .with_detail("depth", depth));
    }
    for id in [ancestor, descendant] {
        if !category::exists(&mut *conn, id).await? {
            return Err(AppError::category_not_found(id));
        }
    }

    category_relation::insert(
        &mut *conn,
        CategoryRelation::new(ancestor, descendant, depth),
    )
    .await
    .map_err(|e| map_duplicate(e, ancestor, descendant))?;
    let mut written = 1;

    let upper = category_relation::find_ancestors(&mut *conn, ancestor).await?;
    for row in upper {
        category_relation::insert(
            &mut *conn,
            CategoryRelation::new(row.ancestor_id, descendant, row.depth + depth),
        )
        .await
        .map_err(|e| map_duplicate(e, row.ancestor_id, descendant))?;
        written += 1;
    }

    tracing::debug!(ancestor, descendant, depth, rows = written, "Relationship built");
    Ok(written)
}

/// [`build_relationship`] in its own transaction
pub async fn build_relationship_atomic(
    pool: &SqlitePool,
    ancestor: i64,
    descendant: i64,
    depth: i64,
) -> AppResult<usize> {
    let mut tx = db::begin_write(pool).await?;
    let written = build_relationship(&mut tx, ancestor, descendant, depth).await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(written)
}

/// Rebuild the closure rows of `id` and its whole subtree with `id` placed
/// under `new_parent` (or made a root).
///
/// The `parent_id` column is not touched here; the caller updates it in the
/// same transaction. Returns the number of subtree members rebuilt.
pub async fn rebuild_subtree(
    conn: &mut SqliteConnection,
    id: i64,
    new_parent: Option<i64>,
) -> AppResult<usize> {
    let mut nodes = category_relation::find_subtree(&mut *conn, id).await?;
    if nodes.is_empty() {
        // no closure rows yet: the category alone is the subtree
        let row = category::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))?;
        nodes.push(category_relation::SubtreeNode {
            id: row.id,
            parent_id: row.parent_id,
            depth: 0,
        });
    }

    let mut removed = 0;
    for node in &nodes {
        removed += category_relation::delete_all_involving(&mut *conn, node.id).await?;
    }

    // nodes are ordered by depth, so every parent is rebuilt before its children
    for node in &nodes {
        create_self_relation(conn, node.id).await?;
        let parent = if node.id == id { new_parent } else { node.parent_id };
        if let Some(parent) = parent {
            build_relationship(conn, parent, node.id, 1).await?;
        }
    }

    tracing::info!(
        category_id = id,
        new_parent = ?new_parent,
        members = nodes.len(),
        rows_removed = removed,
        "Subtree closure rebuilt"
    );
    Ok(nodes.len())
}

fn relation_exists(ancestor: i64, descendant: i64) -> AppError {
    AppError::with_message(
        ErrorCode::RelationExists,
        format!("Relation ({ancestor}, {descendant}) already exists"),
    )
    .with_detail("ancestor_id", ancestor)
    .with_detail("descendant_id", descendant)
}

fn map_duplicate(err: RepoError, ancestor: i64, descendant: i64) -> AppError {
    match err {
        RepoError::Duplicate(_) => relation_exists(ancestor, descendant),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_category, test_pool};

    /// 1 > 2 > 3 built through the builder
    async fn chain() -> SqlitePool {
        let pool = test_pool().await;
        seed_category(&pool, 1, "Electronics", None).await;
        seed_category(&pool, 2, "Phones", Some(1)).await;
        seed_category(&pool, 3, "Smartphones", Some(2)).await;
        let mut conn = pool.acquire().await.unwrap();
        for id in [1, 2, 3] {
            create_self_relation(&mut conn, id).await.unwrap();
        }
        assert_eq!(build_relationship(&mut conn, 1, 2, 1).await.unwrap(), 1);
        assert_eq!(build_relationship(&mut conn, 2, 3, 1).await.unwrap(), 2);
        drop(conn);
        pool
    }

    fn triples(rows: &[CategoryRelation]) -> Vec<(i64, i64, i64)> {
        rows.iter()
            .map(|r| (r.ancestor_id, r.descendant_id, r.depth))
            .collect()
    }

    #[tokio::test]
    async fn test_build_relationship_propagates_to_ancestors() {
        let pool = chain().await;
        let rows = category_relation::find_all(&pool).await.unwrap();
        assert_eq!(
            triples(&rows),
            vec![
                (1, 1, 0),
                (1, 2, 1),
                (1, 3, 2),
                (2, 2, 0),
                (2, 3, 1),
                (3, 3, 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_self_relation_only_once() {
        let pool = chain().await;
        let mut conn = pool.acquire().await.unwrap();
        let err = create_self_relation(&mut conn, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RelationExists);
    }

    #[tokio::test]
    async fn test_rejects_bad_depth_and_missing_categories() {
        let pool = chain().await;
        let mut conn = pool.acquire().await.unwrap();

        let err = build_relationship(&mut conn, 1, 3, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRelationDepth);

        let err = build_relationship(&mut conn, 99, 3, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNotFound);

        let err = build_relationship(&mut conn, 1, 99, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNotFound);
    }

    #[tokio::test]
    async fn test_atomic_variant_rolls_back_on_failure() {
        let pool = chain().await;
        seed_category(&pool, 4, "Feature Phones", None).await;
        category_relation::insert(&pool, CategoryRelation::self_relation(4))
            .await
            .unwrap();
        // (1, 4) already present: the propagated insert fails after (2, 4) was written
        category_relation::insert(&pool, CategoryRelation::new(1, 4, 7))
            .await
            .unwrap();

        let err = build_relationship_atomic(&pool, 2, 4, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RelationExists);
        assert!(!category_relation::exists_path(&pool, 2, 4).await.unwrap());
    }

    #[tokio::test]
    async fn test_rebuild_subtree_moves_whole_branch() {
        let pool = chain().await;
        seed_category(&pool, 4, "Gadgets", None).await;
        {
            let mut conn = pool.acquire().await.unwrap();
            create_self_relation(&mut conn, 4).await.unwrap();
        }

        let mut tx = pool.begin().await.unwrap();
        sqlx::query("UPDATE category SET parent_id = 4 WHERE id = 2")
            .execute(&mut *tx)
            .await
            .unwrap();
        assert_eq!(rebuild_subtree(&mut tx, 2, Some(4)).await.unwrap(), 2);
        tx.commit().await.unwrap();

        assert!(!category_relation::exists_path(&pool, 1, 2).await.unwrap());
        assert!(!category_relation::exists_path(&pool, 1, 3).await.unwrap());
        let ancestors = category_relation::find_ancestors(&pool, 3).await.unwrap();
        assert_eq!(triples(&ancestors), vec![(2, 3, 1), (4, 3, 2)]);
        for id in [1, 2, 3, 4] {
            assert_eq!(
                category_relation::count_self_relations(&pool, id)
                    .await
                    .unwrap(),
                1
            );
        }
    }

    #[tokio::test]
    async fn test_rebuild_subtree_to_root() {
        let pool = chain().await;
        let mut conn = pool.acquire().await.unwrap();
        rebuild_subtree(&mut conn, 2, None).await.unwrap();
        drop(conn);

        assert!(category_relation::find_ancestors(&pool, 2).await.unwrap().is_empty());
        assert_eq!(
            triples(&category_relation::find_ancestors(&pool, 3).await.unwrap()),
            vec![(2, 3, 1)]
        );
        assert!(category_relation::find_descendants(&pool, 1).await.unwrap().is_empty());
    }
}
