//! Category Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::double_option;

/// Category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// URL-safe unique identifier
    pub slug: String,
    /// Parent category (None = root)
    pub parent_id: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Create category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    /// Derived from `name` when absent
    pub slug: Option<String>,
    pub parent_id: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

impl CategoryCreate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn under(name: impl Into<String>, parent_id: i64) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent_id),
            ..Default::default()
        }
    }
}

/// Update category payload
///
/// `parent_id`, `description` and `image_url` distinguish "absent" (keep)
/// from `null` (clear; for `parent_id` that makes the category a root).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<i64>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Closure table row: `ancestor` reaches `descendant` in `depth` steps.
///
/// Every category owns exactly one self row (depth 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryRelation {
    pub ancestor_id: i64,
    pub descendant_id: i64,
    pub depth: i64,
}

impl CategoryRelation {
    pub fn new(ancestor_id: i64, descendant_id: i64, depth: i64) -> Self {
        Self {
            ancestor_id,
            descendant_id,
            depth,
        }
    }

    pub fn self_relation(id: i64) -> Self {
        Self::new(id, id, 0)
    }

    pub fn is_self_relation(&self) -> bool {
        self.ancestor_id == self.descendant_id && self.depth == 0
    }

    pub fn is_direct(&self) -> bool {
        self.depth == 1
    }
}

/// Category annotated with its distance from the queried node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryWithDepth {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub category: Category,
    pub depth: i64,
}
