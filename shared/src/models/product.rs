//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Category reference (required)
    pub category_id: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: i64,
    pub is_active: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Product listing query (`GET /api/products?...`)
///
/// Every field narrows the result; absent fields add no predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<i64>,
    /// Expand `category_id` to its whole subtree (default true)
    #[serde(default = "default_true")]
    pub include_subcategories: bool,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive substring of name or description
    pub q: Option<String>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category_id: None,
            include_subcategories: true,
            min_price: None,
            max_price: None,
            q: None,
            is_active: None,
            limit: None,
            offset: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_subtree() {
        let q: ProductQuery = serde_json::from_str(r#"{"category_id":1}"#).unwrap();
        assert!(q.include_subcategories);
        assert_eq!(q.category_id, Some(1));

        let q: ProductQuery =
            serde_json::from_str(r#"{"category_id":1,"include_subcategories":false}"#).unwrap();
        assert!(!q.include_subcategories);
    }
}
