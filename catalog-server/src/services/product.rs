//! Product Service
//!
//! Products exist here to block deletion of non-empty categories and to be
//! listed through a category subtree.

use super::catalog::{CatalogQuery, ProductFilter};
use crate::db::repository::{RepoError, category, product};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;
use shared::{AppError, AppResult};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct ProductService {
    pool: SqlitePool,
    catalog: CatalogQuery,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            catalog: CatalogQuery::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(&self, data: ProductCreate) -> AppResult<Product> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_price(data.price)?;
        self.ensure_category(data.category_id).await?;

        let id = product::insert(
            &self.pool,
            data.name.trim(),
            data.description.as_deref(),
            data.price,
            data.category_id,
            data.is_active.unwrap_or(true),
            now_millis(),
        )
        .await?;

        tracing::info!(product_id = id, category_id = data.category_id, "Product created");
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        product::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::product_not_found(id))
    }

    pub async fn update(&self, id: i64, mut data: ProductUpdate) -> AppResult<Product> {
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        if let Some(price) = data.price {
            validate_price(price)?;
        }
        if let Some(category_id) = data.category_id {
            self.ensure_category(category_id).await?;
        }
        data.name = data.name.map(|n| n.trim().to_string());

        product::update(&self.pool, id, &data, now_millis())
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::product_not_found(id),
                other => other.into(),
            })?;

        tracing::debug!(product_id = id, "Product updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !product::delete(&self.pool, id).await? {
            return Err(AppError::product_not_found(id));
        }
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    pub async fn list(&self, filter: ProductFilter) -> AppResult<Vec<Product>> {
        self.catalog.products(filter).await
    }

    async fn ensure_category(&self, category_id: i64) -> AppResult<()> {
        if !category::exists(&self.pool, category_id).await? {
            return Err(AppError::category_not_found(category_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_category, test_pool};
    use shared::ErrorCode;

    async fn service() -> ProductService {
        let pool = test_pool().await;
        seed_category(&pool, 1, "Electronics", None).await;
        seed_category(&pool, 2, "Garden", None).await;
        ProductService::new(pool)
    }

    fn pixel() -> ProductCreate {
        ProductCreate {
            name: " Pixel ".into(),
            description: Some("Google phone".into()),
            price: 599.0,
            category_id: 1,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let svc = service().await;
        let created = svc.create(pixel()).await.unwrap();
        assert_eq!(created.name, "Pixel");
        assert!(created.is_active);

        let updated = svc
            .update(
                created.id,
                ProductUpdate {
                    price: Some(499.0),
                    category_id: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 499.0);
        assert_eq!(updated.category_id, 2);
        assert_eq!(updated.description.as_deref(), Some("Google phone"));

        svc.delete(created.id).await.unwrap();
        assert_eq!(
            svc.get(created.id).await.unwrap_err().code,
            ErrorCode::ProductNotFound
        );
        assert!(svc.delete(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_validation() {
        let svc = service().await;

        let mut bad = pixel();
        bad.category_id = 9;
        assert_eq!(svc.create(bad).await.unwrap_err().code, ErrorCode::CategoryNotFound);

        let mut bad = pixel();
        bad.price = -1.0;
        assert_eq!(
            svc.create(bad).await.unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let svc = service().await;
        let err = svc
            .update(42, ProductUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }
}
