//! Category Service - category lifecycle and lookups
//!
//! Every mutation runs in one `BEGIN IMMEDIATE` transaction: the category row
//! and its closure rows are committed together or not at all, and concurrent
//! writers are serialized instead of reading a stale snapshot.

use crate::db::{
    self,
    repository::{
        RepoError, category,
        category::{CategoryFields, NewCategory},
        category_relation, product,
    },
};
use crate::services::hierarchy;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_QUERY_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text, validate_slug,
};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::{derive_slug, now_millis};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone, Debug)]
pub struct CategoryService {
    pool: SqlitePool,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a category, standalone or under `parent_id`
    pub async fn create(&self, data: CategoryCreate) -> AppResult<Category> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
        let name = data.name.trim().to_string();
        let slug = resolve_slug(data.slug.as_deref(), &name)?;

        let mut tx = db::begin_write(&self.pool).await?;

        ensure_slug_free(&mut tx, &slug, None).await?;
        if let Some(parent_id) = data.parent_id {
            ensure_parent_exists(&mut tx, parent_id).await?;
        }

        let new = NewCategory {
            name,
            slug,
            parent_id: data.parent_id,
            description: data.description,
            image_url: data.image_url,
            is_active: data.is_active.unwrap_or(true),
            sort_order: data.sort_order.unwrap_or(0),
        };
        let id = category::insert(&mut tx, &new, now_millis())
            .await
            .map_err(|e| map_slug_duplicate(e, &new.slug))?;

        hierarchy::create_self_relation(&mut tx, id).await?;
        if let Some(parent_id) = new.parent_id {
            hierarchy::build_relationship(&mut tx, parent_id, id, 1).await?;
        }

        let created = category::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            category_id = id,
            parent_id = ?created.parent_id,
            slug = %created.slug,
            "Category created"
        );
        Ok(created)
    }

    /// Apply a partial update; a `parent_id` change moves the whole subtree
    pub async fn update(&self, id: i64, data: CategoryUpdate) -> AppResult<Category> {
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(description) = &data.description {
            validate_optional_text(description, "description", MAX_NOTE_LEN)?;
        }
        if let Some(image_url) = &data.image_url {
            validate_optional_text(image_url, "image_url", MAX_URL_LEN)?;
        }

        let mut tx = db::begin_write(&self.pool).await?;
        let current = category::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))?;

        let name = data.name.as_deref().map(str::trim).map(str::to_string);
        let slug = match (&data.slug, &name) {
            (Some(slug), _) => Some(resolve_slug(Some(slug.as_str()), &current.name)?),
            (None, Some(name)) if *name != current.name => Some(resolve_slug(None, name)?),
            _ => None,
        };
        if let Some(slug) = &slug
            && *slug != current.slug
        {
            ensure_slug_free(&mut tx, slug, Some(id)).await?;
        }

        let fields = CategoryFields {
            name,
            slug,
            description: data.description,
            image_url: data.image_url,
            is_active: data.is_active,
            sort_order: data.sort_order,
        };
        let now = now_millis();
        category::update_fields(&mut tx, id, &fields, now)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => slug_exists(fields.slug.as_deref().unwrap_or_default()),
                RepoError::NotFound(_) => AppError::category_not_found(id),
                other => other.into(),
            })?;

        if let Some(new_parent) = data.parent_id
            && new_parent != current.parent_id
        {
            if let Some(parent_id) = new_parent {
                ensure_no_cycle(&mut tx, id, parent_id).await?;
            }
            category::set_parent(&mut tx, id, new_parent, now).await?;
            hierarchy::rebuild_subtree(&mut tx, id, new_parent).await?;
            tracing::info!(
                category_id = id,
                old_parent = ?current.parent_id,
                new_parent = ?new_parent,
                "Category moved"
            );
        }

        let updated = category::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::debug!(category_id = id, "Category updated");
        Ok(updated)
    }

    /// Delete a leaf category that no product references
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = db::begin_write(&self.pool).await?;

        if !category::exists(&mut *tx, id).await? {
            return Err(AppError::category_not_found(id));
        }

        let children = category::count_children(&mut *tx, id).await?;
        if children > 0 {
            return Err(AppError::with_message(
                ErrorCode::CategoryHasChildren,
                format!("Category {id} has {children} subcategories"),
            )
            .with_detail("category_id", id)
            .with_detail("children", children));
        }

        let products = product::count_by_category(&mut *tx, id).await?;
        if products > 0 {
            return Err(AppError::with_message(
                ErrorCode::CategoryHasProducts,
                format!("Category {id} has {products} products"),
            )
            .with_detail("category_id", id)
            .with_detail("products", products));
        }

        let relations = category_relation::delete_all_involving(&mut *tx, id).await?;
        category::delete(&mut tx, id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(category_id = id, relations_removed = relations, "Category deleted");
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub async fn get(&self, id: i64) -> AppResult<Category> {
        category::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Category> {
        category::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::CategoryNotFound,
                    format!("Category '{slug}' not found"),
                )
                .with_detail("slug", slug)
            })
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Category>> {
        Ok(category::find_all(&self.pool, include_inactive).await?)
    }

    pub async fn roots(&self) -> AppResult<Vec<Category>> {
        Ok(category::find_roots(&self.pool).await?)
    }

    /// Direct subcategories only
    pub async fn children(&self, id: i64) -> AppResult<Vec<Category>> {
        if !category::exists(&self.pool, id).await? {
            return Err(AppError::category_not_found(id));
        }
        Ok(category::find_children(&self.pool, id).await?)
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<Category>> {
        validate_required_text(query, "q", MAX_QUERY_LEN)?;
        Ok(category::search(&self.pool, query.trim()).await?)
    }
}

/// Explicit slug wins; otherwise derive one from the name
fn resolve_slug(explicit: Option<&str>, name: &str) -> AppResult<String> {
    if let Some(slug) = explicit {
        validate_slug(slug)?;
        return Ok(slug.to_string());
    }
    let slug = derive_slug(name);
    if slug.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::InvalidSlug,
            format!("Cannot derive a slug from name '{name}'"),
        )
        .with_detail("name", name));
    }
    validate_slug(&slug)?;
    Ok(slug)
}

fn slug_exists(slug: &str) -> AppError {
    AppError::with_message(
        ErrorCode::CategorySlugExists,
        format!("Category slug '{slug}' already exists"),
    )
    .with_detail("slug", slug)
}

fn map_slug_duplicate(err: RepoError, slug: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => slug_exists(slug),
        other => other.into(),
    }
}

async fn ensure_slug_free(
    conn: &mut SqliteConnection,
    slug: &str,
    except_id: Option<i64>,
) -> AppResult<()> {
    if category::slug_taken(&mut *conn, slug, except_id).await? {
        return Err(slug_exists(slug));
    }
    Ok(())
}

async fn ensure_parent_exists(conn: &mut SqliteConnection, parent_id: i64) -> AppResult<()> {
    if !category::exists(&mut *conn, parent_id).await? {
        return Err(AppError::with_message(
            ErrorCode::ParentCategoryNotFound,
            format!("Parent category {parent_id} not found"),
        )
        .with_detail("parent_id", parent_id));
    }
    Ok(())
}

/// `parent_id` must exist and must not lie in the subtree of `id`
async fn ensure_no_cycle(conn: &mut SqliteConnection, id: i64, parent_id: i64) -> AppResult<()> {
    ensure_parent_exists(conn, parent_id).await?;
    if parent_id == id || category_relation::exists_path(&mut *conn, id, parent_id).await? {
        return Err(AppError::with_message(
            ErrorCode::CategoryCycle,
            format!("Cannot move category {id} under its own descendant {parent_id}"),
        )
        .with_detail("category_id", id)
        .with_detail("parent_id", parent_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    async fn service() -> CategoryService {
        CategoryService::new(test_pool().await)
    }

    #[tokio::test]
    async fn test_create_root_derives_slug() {
        let svc = service().await;
        let cat = svc
            .create(CategoryCreate::named("Living Room Furniture!!"))
            .await
            .unwrap();
        assert_eq!(cat.slug, "living-room-furniture");
        assert!(cat.is_root());
        assert!(cat.is_active);
        assert_eq!(
            category_relation::count_self_relations(&svc.pool, cat.id)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let svc = service().await;

        let err = svc.create(CategoryCreate::named("  ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err = svc.create(CategoryCreate::named("!!!")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSlug);

        let mut data = CategoryCreate::named("Phones");
        data.slug = Some("Not A Slug".into());
        let err = svc.create(data).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSlug);

        let err = svc.create(CategoryCreate::under("Phones", 42)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ParentCategoryNotFound);
        assert!(svc.list(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let svc = service().await;
        svc.create(CategoryCreate::named("Phones")).await.unwrap();
        let err = svc.create(CategoryCreate::named("phones")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategorySlugExists);
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_plain_update_keeps_relations() {
        let svc = service().await;
        let root = svc.create(CategoryCreate::named("Electronics")).await.unwrap();
        let child = svc
            .create(CategoryCreate::under("Phones", root.id))
            .await
            .unwrap();
        let before = category_relation::find_all(&svc.pool).await.unwrap();

        let updated = svc
            .update(
                child.id,
                CategoryUpdate {
                    name: Some("Mobile Phones".into()),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Mobile Phones");
        assert_eq!(updated.slug, "mobile-phones");
        assert!(!updated.is_active);
        assert_eq!(updated.parent_id, Some(root.id));
        assert_eq!(category_relation::find_all(&svc.pool).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_slug_collision() {
        let svc = service().await;
        svc.create(CategoryCreate::named("Phones")).await.unwrap();
        let garden = svc.create(CategoryCreate::named("Garden")).await.unwrap();
        let err = svc
            .update(
                garden.id,
                CategoryUpdate {
                    slug: Some("phones".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CategorySlugExists);
    }

    #[tokio::test]
    async fn test_move_under_descendant_is_cycle() {
        let svc = service().await;
        let a = svc.create(CategoryCreate::named("A")).await.unwrap();
        let b = svc.create(CategoryCreate::under("B", a.id)).await.unwrap();
        let c = svc.create(CategoryCreate::under("C", b.id)).await.unwrap();
        let before = category_relation::find_all(&svc.pool).await.unwrap();

        for target in [a.id, c.id] {
            let err = svc
                .update(
                    a.id,
                    CategoryUpdate {
                        parent_id: Some(Some(target)),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::CategoryCycle);
        }
        assert_eq!(category_relation::find_all(&svc.pool).await.unwrap(), before);
        assert_eq!(svc.get(a.id).await.unwrap().parent_id, None);
    }

    #[tokio::test]
    async fn test_move_to_missing_parent() {
        let svc = service().await;
        let a = svc.create(CategoryCreate::named("A")).await.unwrap();
        let err = svc
            .update(
                a.id,
                CategoryUpdate {
                    parent_id: Some(Some(77)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ParentCategoryNotFound);
    }

    #[tokio::test]
    async fn test_delete_guards() {
        let svc = service().await;
        let root = svc.create(CategoryCreate::named("Electronics")).await.unwrap();
        let leaf = svc
            .create(CategoryCreate::under("Phones", root.id))
            .await
            .unwrap();

        let err = svc.delete(root.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryHasChildren);

        product::insert(&svc.pool, "Pixel", None, 599.0, leaf.id, true, 0)
            .await
            .unwrap();
        let err = svc.delete(leaf.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryHasProducts);

        let err = svc.delete(999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryNotFound);
    }

    #[tokio::test]
    async fn test_delete_leaf_removes_relations() {
        let svc = service().await;
        let root = svc.create(CategoryCreate::named("Electronics")).await.unwrap();
        let leaf = svc
            .create(CategoryCreate::under("Phones", root.id))
            .await
            .unwrap();

        svc.delete(leaf.id).await.unwrap();
        assert!(
            category_relation::find_involving(&svc.pool, leaf.id)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(svc.get(leaf.id).await.unwrap_err().code, ErrorCode::CategoryNotFound);
        svc.delete(root.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_lookups() {
        let svc = service().await;
        let root = svc.create(CategoryCreate::named("Electronics")).await.unwrap();
        let mut hidden = CategoryCreate::under("Phones", root.id);
        hidden.is_active = Some(false);
        svc.create(hidden).await.unwrap();

        assert_eq!(svc.get_by_slug("phones").await.unwrap().parent_id, Some(root.id));
        assert_eq!(
            svc.get_by_slug("nope").await.unwrap_err().code,
            ErrorCode::CategoryNotFound
        );
        assert_eq!(svc.list(false).await.unwrap().len(), 1);
        assert_eq!(svc.list(true).await.unwrap().len(), 2);
        assert_eq!(svc.roots().await.unwrap().len(), 1);
        assert_eq!(svc.children(root.id).await.unwrap().len(), 1);
        assert_eq!(svc.search("PHO").await.unwrap().len(), 1);
        assert!(svc.search(" ").await.is_err());
        assert!(svc.children(404).await.is_err());
    }
}
