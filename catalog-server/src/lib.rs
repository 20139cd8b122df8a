//! Catalog Server - 商品目录分类层级服务
//!
//! # 架构概述
//!
//! 分类层级以闭包表 (`category_relation`) 物化存储：每个分类到其每个祖先
//! 都有一行 `(ancestor, descendant, depth)`，祖先/后代查询都是单条索引查询。
//!
//! - **数据库** (`db`): SQLite 连接池、迁移、仓储函数
//! - **服务** (`services`): 闭包表写入、分类生命周期、层级查询与商品过滤
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── services/      # 层级构建、分类、查询、商品
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、输入校验
//! └── db/            # 连接池与仓储
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerError, ServerState};
pub use db::DbService;
pub use services::{CatalogQuery, CategoryService, ProductFilter, ProductService};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env、初始化日志
pub fn setup_environment() -> Result<Config, ServerError> {
    // .env 可选，不存在时忽略
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}
