//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::ProductFilter;
use crate::utils::AppResult;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, CategoryWithDepth, Product, ProductQuery,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/categories - 获取所有分类
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.categories.list(query.include_inactive).await?;
    Ok(Json(categories))
}

/// GET /api/categories/roots - 获取顶级分类
pub async fn roots(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.roots().await?))
}

/// GET /api/categories/search?q= - 按名称或描述搜索
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.search(&query.q).await?))
}

/// GET /api/categories/slug/{slug}
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.categories.get_by_slug(&slug).await?))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.categories.get(id).await?))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let category = state.categories.create(payload).await?;
    Ok(Json(category))
}

/// PUT /api/categories/{id} - 更新分类 (parent_id 变化时移动整个子树)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let category = state.categories.update(id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - 删除分类 (有子分类或商品时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.categories.delete(id).await?;
    Ok(Json(true))
}

/// GET /api/categories/{id}/children - 直接子分类
pub async fn children(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.children(id).await?))
}

/// GET /api/categories/{id}/descendants - 所有后代 (按深度)
pub async fn descendants(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<CategoryWithDepth>>> {
    Ok(Json(state.catalog.descendants(id).await?))
}

/// GET /api/categories/{id}/ancestors - 所有祖先 (由近及远)
pub async fn ancestors(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<CategoryWithDepth>>> {
    Ok(Json(state.catalog.ancestors(id).await?))
}

/// GET /api/categories/{id}/breadcrumb - 从根到当前分类的路径
pub async fn breadcrumb(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.breadcrumb(id).await?))
}

/// GET /api/categories/{id}/products - 分类 (默认含子分类) 下的商品
pub async fn products(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let deep = query.include_subcategories;
    let filter = ProductFilter::from(query).in_category(id, deep);
    Ok(Json(state.catalog.products(filter).await?))
}
