//! 服务层 - 分类层级与目录查询
//!
//! # 服务列表
//!
//! - [`hierarchy`] - 闭包表写入 (自关联、建立关系、子树重建)
//! - [`CategoryService`] - 分类增删改查
//! - [`CatalogQuery`] - 祖先/后代/面包屑查询与商品过滤
//! - [`ProductService`] - 商品增删改查

pub mod catalog;
pub mod category;
pub mod hierarchy;
pub mod product;

pub use catalog::{CatalogQuery, ProductFilter};
pub use category::CategoryService;
pub use product::ProductService;
