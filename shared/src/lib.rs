//! Shared types for the catalog service
//!
//! Domain models, the unified error system and small utilities
//! (timestamps, slug derivation) used by the server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Category, CategoryRelation, Product};
