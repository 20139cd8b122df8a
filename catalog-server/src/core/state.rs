use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::services::{CatalogQuery, CategoryService, ProductService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有服务内部只持有连接池句柄，clone 成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | categories | CategoryService | 分类增删改查 |
/// | catalog | CatalogQuery | 层级查询与商品过滤 |
/// | products | ProductService | 商品增删改查 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub categories: CategoryService,
    pub catalog: CatalogQuery,
    pub products: ProductService,
}

impl ServerState {
    /// 基于已打开的数据库构造状态
    pub fn new(config: Config, db: DbService) -> Self {
        let pool = db.pool.clone();
        Self {
            config,
            categories: CategoryService::new(pool.clone()),
            catalog: CatalogQuery::new(pool.clone()),
            products: ProductService::new(pool),
            db,
        }
    }

    /// 初始化服务器状态
    ///
    /// 创建工作目录，打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        if config.db_max_connections == 0 {
            return Err(ServerError::Config(
                "DB_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }

        let db = DbService::new(&config.database_path, config.db_max_connections).await?;
        tracing::info!(work_dir = %config.work_dir, "Server state initialized");
        Ok(Self::new(config.clone(), db))
    }

    /// 内存数据库状态 (测试用)
    pub async fn in_memory(config: Config) -> Result<Self> {
        let db = DbService::in_memory().await?;
        Ok(Self::new(config, db))
    }
}
