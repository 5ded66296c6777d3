//! 应用共享状态
//!
//! 所有 worker 共用一个 Dashboard，通过同一把异步锁串行修改。

use reqwest::Client;
use tokio::sync::Mutex;

use crate::services::{fetch_rows, Dashboard};

pub struct AppState {
    pub dashboard: Mutex<Dashboard>,
    client: Client,
    source_url: String,
}

impl AppState {
    pub fn new(dashboard: Dashboard, client: Client, source_url: impl Into<String>) -> Self {
        Self {
            dashboard: Mutex::new(dashboard),
            client,
            source_url: source_url.into(),
        }
    }

    /// 重新拉取数据
    ///
    /// 拉取期间不持有锁，页面仍可访问并显示加载状态。
    /// 已有拉取在进行时直接返回。
    pub async fn refresh(&self) {
        if !self.dashboard.lock().await.begin_fetch() {
            log::info!("已有拉取在进行中，忽略本次刷新");
            return;
        }

        let result = fetch_rows(&self.client, &self.source_url).await;
        self.dashboard.lock().await.finish_fetch(result);
    }
}
