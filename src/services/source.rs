//! 行情数据源
//!
//! 一次 GET 拉取整张快照表，返回 JSON 行数组。没有重试。

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::config::SourceConfig;
use crate::models::{rows_from_json, Row};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Network response was not ok, status: {0}")]
    Status(u16),
    #[error("malformed JSON: {0}")]
    Parse(String),
}

/// 按配置创建带超时的客户端
pub fn build_client(config: &SourceConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
}

/// 拉取全部行
///
/// 返回体不是数组时视为空数据集，数组中的非对象元素被跳过。
pub async fn fetch_rows(client: &Client, url: &str) -> Result<Vec<Row>, FetchError> {
    log::info!("📡 请求行情数据 URL: {}", url);

    let response = client.get(url).send().await.map_err(FetchError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let value = response.json::<serde_json::Value>().await.map_err(|e| {
        if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Network(e)
        }
    })?;

    let rows = rows_from_json(value);
    log::info!("拉取完成，共 {} 行", rows.len());
    Ok(rows)
}
