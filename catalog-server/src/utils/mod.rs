//! 工具模块 - 日志初始化和输入校验
//!
//! 错误类型统一来自 `shared::error`，在此处重新导出。

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
