//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryWithDepth};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, name, slug, parent_id, description, image_url, is_active, sort_order, created_at, updated_at";

/// Fully resolved values for a new category row
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Column changes that never affect the hierarchy
#[derive(Debug, Clone, Default)]
pub struct CategoryFields {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `Some(None)` clears the column
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

pub async fn find_all(pool: &SqlitePool, include_inactive: bool) -> RepoResult<Vec<Category>> {
    let sql = if include_inactive {
        format!("SELECT {COLUMNS} FROM category ORDER BY sort_order, name")
    } else {
        format!("SELECT {COLUMNS} FROM category WHERE is_active = 1 ORDER BY sort_order, name")
    };
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(categories)
}

pub async fn find_by_id<'e, E>(ex: E, id: i64) -> RepoResult<Option<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let category =
        sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM category WHERE id = ?"))
            .bind(id)
            .fetch_optional(ex)
            .await?;
    Ok(category)
}

pub async fn find_by_slug<'e, E>(ex: E, slug: &str) -> RepoResult<Option<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let category =
        sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM category WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(ex)
            .await?;
    Ok(category)
}

pub async fn find_roots(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE parent_id IS NULL ORDER BY sort_order, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_children<'e, E>(ex: E, parent_id: i64) -> RepoResult<Vec<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE parent_id = ? ORDER BY sort_order, name"
    ))
    .bind(parent_id)
    .fetch_all(ex)
    .await?;
    Ok(categories)
}

/// Categories strictly below `id`, by depth then name
pub async fn find_descendants_of<'e, E>(ex: E, id: i64) -> RepoResult<Vec<CategoryWithDepth>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let categories = sqlx::query_as::<_, CategoryWithDepth>(&format!(
        "SELECT {COLUMNS}, r.depth AS depth FROM category \
         JOIN category_relation r ON r.descendant_id = category.id \
         WHERE r.ancestor_id = ? AND r.depth > 0 ORDER BY r.depth, category.name"
    ))
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(categories)
}

/// Categories strictly above `id`, nearest first
pub async fn find_ancestors_of<'e, E>(ex: E, id: i64) -> RepoResult<Vec<CategoryWithDepth>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let categories = sqlx::query_as::<_, CategoryWithDepth>(&format!(
        "SELECT {COLUMNS}, r.depth AS depth FROM category \
         JOIN category_relation r ON r.ancestor_id = category.id \
         WHERE r.descendant_id = ? AND r.depth > 0 ORDER BY r.depth"
    ))
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(categories)
}

/// Case-insensitive substring match on name or description
pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Category>> {
    let pattern = format!("%{}%", escape_like(query));
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category \
         WHERE name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\' \
         ORDER BY sort_order, name"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn exists<'e, E>(ex: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM category WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(found.is_some())
}

/// Whether `slug` belongs to a category other than `except_id`
pub async fn slug_taken<'e, E>(ex: E, slug: &str, except_id: Option<i64>) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE slug = ?")
        .bind(slug)
        .fetch_optional(ex)
        .await?;
    Ok(matches!(found, Some(id) if Some(id) != except_id))
}

pub async fn count_children<'e, E>(ex: E, id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE parent_id = ?")
        .bind(id)
        .fetch_one(ex)
        .await?;
    Ok(count)
}

/// Insert the row and return its id. Closure rows are the caller's job.
pub async fn insert(conn: &mut SqliteConnection, data: &NewCategory, now: i64) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO category (name, slug, parent_id, description, image_url, is_active, sort_order, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.parent_id)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(data.sort_order)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &CategoryFields,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE category SET \
            name = COALESCE(?1, name), \
            slug = COALESCE(?2, slug), \
            description = CASE WHEN ?3 THEN ?4 ELSE description END, \
            image_url = CASE WHEN ?5 THEN ?6 ELSE image_url END, \
            is_active = COALESCE(?7, is_active), \
            sort_order = COALESCE(?8, sort_order), \
            updated_at = ?9 \
         WHERE id = ?10",
    )
    .bind(&fields.name)
    .bind(&fields.slug)
    .bind(fields.description.is_some())
    .bind(fields.description.as_ref().and_then(Option::as_deref))
    .bind(fields.image_url.is_some())
    .bind(fields.image_url.as_ref().and_then(Option::as_deref))
    .bind(fields.is_active)
    .bind(fields.sort_order)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

pub async fn set_parent(
    conn: &mut SqliteConnection,
    id: i64,
    parent_id: Option<i64>,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE category SET parent_id = ?, updated_at = ? WHERE id = ?")
        .bind(parent_id)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Escape `%`, `_` and `\` for a LIKE pattern using `ESCAPE '\'`
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
