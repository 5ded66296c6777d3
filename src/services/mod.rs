//! 业务逻辑服务模块
//!
//! 拉取、字段解析、过滤排序、渲染、汇总和自选存储

pub mod dashboard;  // 页面状态控制器
pub mod export;     // CSV 导出
pub mod favorites;  // 自选存储
pub mod fields;     // 字段解析
pub mod pipeline;   // 过滤/排序引擎
pub mod render;     // 表格渲染
pub mod source;     // 行情数据源
pub mod summary;    // 汇总指标

pub use dashboard::Dashboard;
pub use favorites::{Favorites, FavoritesStore, JsonFileStore, MemoryStore};
pub use source::{build_client, fetch_rows, FetchError};
