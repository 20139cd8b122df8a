//! Data models
//!
//! Shared between catalog-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod product;
pub mod serde_helpers;

// Re-exports
pub use category::*;
pub use product::*;
