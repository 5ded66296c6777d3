//! 行情快照看板
//!
//! 从远程 JSON 接口拉取股票快照，在服务端完成搜索、排序、自选过滤和渲染，
//! 支持快捷排序按钮和 CSV 导出。

mod config;   // 配置加载
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod services; // 业务逻辑服务
mod state;    // 共享状态

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::services::{build_client, Dashboard, Favorites, JsonFileStore};
use crate::state::AppState;

/// 应用程序入口
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let loaded = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先，否则使用配置中的级别
    let level = match &loaded {
        Ok((config, _)) => config.log.level.clone(),
        Err(_) => "info".to_string(),
    };
    env_logger::init_from_env(Env::default().default_filter_or(level));

    let config = match loaded {
        Ok((config, Some(path))) => {
            log::info!("从 {} 加载配置成功", path.display());
            config
        }
        Ok((config, None)) => {
            log::info!("未找到配置文件，使用默认配置");
            config
        }
        Err(e) => {
            log::error!("配置无效: {:#}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{:#}", e)));
        }
    };

    let timezone = config
        .timezone()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let client = build_client(&config.source)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let favorites = Favorites::open(Box::new(JsonFileStore::new(
        &config.favorites.path,
        &config.favorites.storage_key,
    )));
    let state = web::Data::new(AppState::new(
        Dashboard::new(favorites, timezone),
        client,
        &config.source.url,
    ));

    // 启动时拉取一次，不阻塞服务启动
    let initial = state.clone();
    actix_web::rt::spawn(async move {
        initial.refresh().await;
    });

    log::info!("启动行情看板服务，监听 {}", config.bind_addr());

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // 添加请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config) // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
