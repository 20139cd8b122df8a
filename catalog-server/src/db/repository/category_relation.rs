//! Category Relation Repository (closure table)
//!
//! Rows are `(ancestor_id, descendant_id, depth)`. Rows are inserted and
//! deleted, never updated.

use super::{RepoError, RepoResult};
use shared::models::CategoryRelation;
use sqlx::{Executor, Sqlite};

/// A member of a subtree, as needed to rebuild its closure rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct SubtreeNode {
    pub id: i64,
    pub parent_id: Option<i64>,
    /// Distance from the subtree root
    pub depth: i64,
}

/// Insert one closure row. An existing `(ancestor, descendant)` pair is a `Duplicate`.
pub async fn insert<'e, E>(ex: E, relation: CategoryRelation) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO category_relation (ancestor_id, descendant_id, depth) VALUES (?, ?, ?)")
        .bind(relation.ancestor_id)
        .bind(relation.descendant_id)
        .bind(relation.depth)
        .execute(ex)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => RepoError::Duplicate(format!(
                "Relation ({}, {}) already exists",
                relation.ancestor_id, relation.descendant_id
            )),
            other => other,
        })?;
    Ok(())
}

/// Rows where `id` is the ancestor, self row excluded
pub async fn find_descendants<'e, E>(ex: E, id: i64) -> RepoResult<Vec<CategoryRelation>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, CategoryRelation>(
        "SELECT ancestor_id, descendant_id, depth FROM category_relation \
         WHERE ancestor_id = ? AND depth > 0 ORDER BY depth, descendant_id",
    )
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Rows where `id` is the descendant, self row excluded, nearest first
pub async fn find_ancestors<'e, E>(ex: E, id: i64) -> RepoResult<Vec<CategoryRelation>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, CategoryRelation>(
        "SELECT ancestor_id, descendant_id, depth FROM category_relation \
         WHERE descendant_id = ? AND depth > 0 ORDER BY depth",
    )
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Every row touching `id`, either side
pub async fn find_involving<'e, E>(ex: E, id: i64) -> RepoResult<Vec<CategoryRelation>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, CategoryRelation>(
        "SELECT ancestor_id, descendant_id, depth FROM category_relation \
         WHERE ancestor_id = ?1 OR descendant_id = ?1 \
         ORDER BY ancestor_id, descendant_id",
    )
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_all<'e, E>(ex: E) -> RepoResult<Vec<CategoryRelation>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, CategoryRelation>(
        "SELECT ancestor_id, descendant_id, depth FROM category_relation \
         ORDER BY ancestor_id, descendant_id",
    )
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Whether `descendant` is reachable from `ancestor` (depth 0 counts)
pub async fn exists_path<'e, E>(ex: E, ancestor: i64, descendant: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM category_relation WHERE ancestor_id = ? AND descendant_id = ?",
    )
    .bind(ancestor)
    .bind(descendant)
    .fetch_optional(ex)
    .await?;
    Ok(found.is_some())
}

pub async fn count_self_relations<'e, E>(ex: E, id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM category_relation WHERE ancestor_id = ?1 AND descendant_id = ?1 AND depth = 0",
    )
    .bind(id)
    .fetch_one(ex)
    .await?;
    Ok(count)
}

/// Remove every row where `id` is ancestor or descendant, self row included
pub async fn delete_all_involving<'e, E>(ex: E, id: i64) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "DELETE FROM category_relation WHERE ancestor_id = ?1 OR descendant_id = ?1",
    )
    .bind(id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

/// `id` and everything below it, shallowest first
pub async fn find_subtree<'e, E>(ex: E, id: i64) -> RepoResult<Vec<SubtreeNode>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let nodes = sqlx::query_as::<_, SubtreeNode>(
        "SELECT c.id AS id, c.parent_id AS parent_id, r.depth AS depth \
         FROM category_relation r JOIN category c ON c.id = r.descendant_id \
         WHERE r.ancestor_id = ? ORDER BY r.depth, c.id",
    )
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(nodes)
}

/// Ids of `id` and all of its descendants
pub async fn subtree_ids<'e, E>(ex: E, id: i64) -> RepoResult<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids = sqlx::query_scalar(
        "SELECT descendant_id FROM category_relation WHERE ancestor_id = ? ORDER BY depth, descendant_id",
    )
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(ids)
}
