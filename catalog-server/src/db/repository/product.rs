//! Product Repository

use super::category::escape_like;
use super::{RepoError, RepoResult};
use shared::models::Product;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str =
    "id, name, description, price, category_id, is_active, created_at, updated_at";

/// One WHERE clause of a product listing. Predicates are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductPredicate {
    /// `category_id` is one of the ids (empty list matches nothing)
    CategoryIn(Vec<i64>),
    MinPrice(f64),
    MaxPrice(f64),
    /// Case-insensitive substring of name or description
    Search(String),
    Active(bool),
}

impl ProductPredicate {
    fn push(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            ProductPredicate::CategoryIn(ids) if ids.is_empty() => {
                qb.push("0");
            }
            ProductPredicate::CategoryIn(ids) => {
                qb.push("category_id IN (");
                let mut separated = qb.separated(", ");
                for id in ids {
                    separated.push_bind(*id);
                }
                separated.push_unseparated(")");
            }
            ProductPredicate::MinPrice(min) => {
                qb.push("price >= ").push_bind(*min);
            }
            ProductPredicate::MaxPrice(max) => {
                qb.push("price <= ").push_bind(*max);
            }
            ProductPredicate::Search(text) => {
                let pattern = format!("%{}%", escape_like(text));
                qb.push("(name LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\' OR description LIKE ")
                    .push_bind(pattern)
                    .push(" ESCAPE '\\')");
            }
            ProductPredicate::Active(active) => {
                qb.push("is_active = ").push_bind(*active);
            }
        }
    }
}

/// Run a filtered listing, ordered by name then id
pub async fn find_matching(
    pool: &SqlitePool,
    predicates: &[ProductPredicate],
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Product>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM product"));
    for (i, predicate) in predicates.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        predicate.push(&mut qb);
    }
    qb.push(" ORDER BY name, id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let products = qb.build_query_as::<Product>().fetch_all(pool).await?;
    Ok(products)
}

pub async fn find_by_id<'e, E>(ex: E, id: i64) -> RepoResult<Option<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let product =
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM product WHERE id = ?"))
            .bind(id)
            .fetch_optional(ex)
            .await?;
    Ok(product)
}

pub async fn count_by_category<'e, E>(ex: E, category_id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE category_id = ?")
        .bind(category_id)
        .fetch_one(ex)
        .await?;
    Ok(count)
}

pub async fn insert<'e, E>(
    ex: E,
    name: &str,
    description: Option<&str>,
    price: f64,
    category_id: i64,
    is_active: bool,
    now: i64,
) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO product (name, description, price, category_id, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(category_id)
    .bind(is_active)
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(id)
}

pub async fn update<'e, E>(
    ex: E,
    id: i64,
    data: &shared::models::ProductUpdate,
    now: i64,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "UPDATE product SET \
            name = COALESCE(?1, name), \
            description = COALESCE(?2, description), \
            price = COALESCE(?3, price), \
            category_id = COALESCE(?4, category_id), \
            is_active = COALESCE(?5, is_active), \
            updated_at = ?6 \
         WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

pub async fn delete<'e, E>(ex: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_category, test_pool};

    async fn seeded() -> SqlitePool {
        let pool = test_pool().await;
        seed_category(&pool, 1, "Electronics", None).await;
        seed_category(&pool, 2, "Garden", None).await;
        insert(&pool, "Phone", Some("Android phone"), 300.0, 1, true, 0).await.unwrap();
        insert(&pool, "Cable", None, 9.5, 1, true, 0).await.unwrap();
        insert(&pool, "Hose", Some("30m garden hose"), 25.0, 2, false, 0).await.unwrap();
        pool
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_no_predicates_lists_everything() {
        let pool = seeded().await;
        let all = find_matching(&pool, &[], 100, 0).await.unwrap();
        assert_eq!(names(&all), vec!["Cable", "Hose", "Phone"]);
    }

    #[tokio::test]
    async fn test_predicates_compose() {
        let pool = seeded().await;
        let hits = find_matching(
            &pool,
            &[
                ProductPredicate::CategoryIn(vec![1, 2]),
                ProductPredicate::MinPrice(10.0),
                ProductPredicate::Active(true),
            ],
            100,
            0,
        )
        .await
        .unwrap();
        assert_eq!(names(&hits), vec!["Phone"]);

        let hits = find_matching(&pool, &[ProductPredicate::Search("GARDEN".into())], 100, 0)
            .await
            .unwrap();
        assert_eq!(names(&hits), vec!["Hose"]);

        let hits = find_matching(&pool, &[ProductPredicate::MaxPrice(25.0)], 100, 0)
            .await
            .unwrap();
        assert_eq!(names(&hits), vec!["Cable", "Hose"]);
    }

    #[tokio::test]
    async fn test_empty_category_set_matches_nothing() {
        let pool = seeded().await;
        let hits = find_matching(&pool, &[ProductPredicate::CategoryIn(vec![])], 100, 0)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_paging() {
        let pool = seeded().await;
        let page = find_matching(&pool, &[], 1, 1).await.unwrap();
        assert_eq!(names(&page), vec!["Hose"]);
    }

    #[tokio::test]
    async fn test_count_and_delete() {
        let pool = seeded().await;
        assert_eq!(count_by_category(&pool, 1).await.unwrap(), 2);
        assert!(delete(&pool, 1).await.unwrap());
        assert!(!delete(&pool, 1).await.unwrap());
        assert_eq!(count_by_category(&pool, 1).await.unwrap(), 1);
    }
}
