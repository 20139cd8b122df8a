//! Catalog Query Layer - read-only traversal of the closure table
//!
//! Descendant and ancestor lookups are single indexed queries against
//! `category_relation`; product listings expand a category to its subtree
//! the same way.

use crate::db::repository::{
    category, category_relation,
    product::{self, ProductPredicate},
};
use crate::utils::validation::MAX_QUERY_LEN;
use shared::models::{Category, CategoryWithDepth, Product, ProductQuery};
use shared::{AppError, AppResult};
use sqlx::SqlitePool;

/// Page size when the caller gives none
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// Upper bound on a single page
pub const MAX_PAGE_SIZE: i64 = 200;

/// Composable product filter. Every set field narrows the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub include_subcategories: bool,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub text: Option<String>,
    pub is_active: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            include_subcategories: true,
            min_price: None,
            max_price: None,
            text: None,
            is_active: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Products of `category_id`, and of its subcategories when `deep`
    pub fn in_category(mut self, category_id: i64, deep: bool) -> Self {
        self.category_id = Some(category_id);
        self.include_subcategories = deep;
        self
    }

    pub fn price_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn matching(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    fn validate(&self) -> AppResult<()> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(AppError::validation(format!(
                "min_price ({min}) is greater than max_price ({max})"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.offset < 0 {
            return Err(AppError::validation("offset must not be negative"));
        }
        if let Some(text) = &self.text
            && text.chars().count() > MAX_QUERY_LEN
        {
            return Err(AppError::validation(format!(
                "q is too long (max {MAX_QUERY_LEN})"
            )));
        }
        Ok(())
    }
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        Self {
            category_id: query.category_id,
            include_subcategories: query.include_subcategories,
            min_price: query.min_price,
            max_price: query.max_price,
            text: query.q.filter(|q| !q.trim().is_empty()),
            is_active: query.is_active,
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            offset: query.offset.unwrap_or(0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogQuery {
    pool: SqlitePool,
}

impl CatalogQuery {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Everything below `id`, ordered by depth then name
    pub async fn descendants(&self, id: i64) -> AppResult<Vec<CategoryWithDepth>> {
        self.ensure_exists(id).await?;
        Ok(category::find_descendants_of(&self.pool, id).await?)
    }

    /// Everything above `id`, nearest first
    pub async fn ancestors(&self, id: i64) -> AppResult<Vec<CategoryWithDepth>> {
        self.ensure_exists(id).await?;
        Ok(category::find_ancestors_of(&self.pool, id).await?)
    }

    /// Root-to-node path, the node itself last
    pub async fn breadcrumb(&self, id: i64) -> AppResult<Vec<Category>> {
        let node = category::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))?;
        let mut path: Vec<Category> = category::find_ancestors_of(&self.pool, id)
            .await?
            .into_iter()
            .rev()
            .map(|a| a.category)
            .collect();
        path.push(node);
        Ok(path)
    }

    /// `id` and all of its descendants
    pub async fn subtree_ids(&self, id: i64) -> AppResult<Vec<i64>> {
        self.ensure_exists(id).await?;
        Ok(category_relation::subtree_ids(&self.pool, id).await?)
    }

    pub async fn products(&self, filter: ProductFilter) -> AppResult<Vec<Product>> {
        filter.validate()?;

        let mut predicates = Vec::new();
        if let Some(category_id) = filter.category_id {
            let ids = if filter.include_subcategories {
                self.subtree_ids(category_id).await?
            } else {
                self.ensure_exists(category_id).await?;
                vec![category_id]
            };
            predicates.push(ProductPredicate::CategoryIn(ids));
        }
        if let Some(min) = filter.min_price {
            predicates.push(ProductPredicate::MinPrice(min));
        }
        if let Some(max) = filter.max_price {
            predicates.push(ProductPredicate::MaxPrice(max));
        }
        if let Some(text) = filter.text {
            predicates.push(ProductPredicate::Search(text.trim().to_string()));
        }
        if let Some(active) = filter.is_active {
            predicates.push(ProductPredicate::Active(active));
        }

        tracing::debug!(predicates = predicates.len(), "Listing products");
        Ok(product::find_matching(&self.pool, &predicates, filter.limit, filter.offset).await?)
    }

    async fn ensure_exists(&self, id: i64) -> AppResult<()> {
        if !category::exists(&self.pool, id).await? {
            return Err(AppError::category_not_found(id));
        }
        Ok(())
    }
}
