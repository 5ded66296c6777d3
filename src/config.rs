//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 行情数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 返回 JSON 行数组的接口地址
    #[serde(default = "default_source_url")]
    pub url: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 自选股存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// 存储文件路径
    #[serde(default = "default_favorites_path")]
    pub path: PathBuf,
    /// 文件内使用的固定键名
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

/// 页面显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 状态栏时间使用的时区（IANA 名称）
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据源配置
    #[serde(default)]
    pub source: SourceConfig,
    /// 自选股配置
    #[serde(default)]
    pub favorites: FavoritesConfig,
    /// 显示配置
    #[serde(default)]
    pub display: DisplayConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_source_url() -> String {
    "https://script.google.com/macros/s/AKfycbwpMJg4V_zUHA59avHNnihIT3cSZ1u2L3qnXqtXglgqfEMg3OEVaG06AzzgT050pOeBmw/exec".to_string()
}
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_favorites_path() -> PathBuf { PathBuf::from("favorites.json") }
fn default_storage_key() -> String { "fipst_favorites_v1".to_string() }
fn default_timezone() -> String { "UTC".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            path: default_favorites_path(),
            storage_key: default_storage_key(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置，优先从文件，都不存在时使用默认值
    ///
    /// 返回配置和来源文件。文件存在但无效时返回错误，不回退到默认值。
    /// 此时日志系统还没有初始化，由调用方记录结果。
    pub fn load() -> anyhow::Result<(Self, Option<PathBuf>)> {
        Self::load_from(&["config.json", "config/config.json"])
    }

    pub fn load_from<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<(Self, Option<PathBuf>)> {
        for path in paths {
            let path = path.as_ref();
            if path.exists() {
                let config = Self::from_file(path)
                    .with_context(|| format!("加载配置文件 {} 失败", path.display()))?;
                return Ok((config, Some(path.to_path_buf())));
            }
        }
        Ok((Self::default(), None))
    }

    /// 校验数据源地址和时区
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.source.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("数据源地址必须是 http(s): {}", self.source.url);
        }
        self.timezone()?;
        Ok(())
    }

    /// 状态栏时区
    pub fn timezone(&self) -> anyhow::Result<chrono_tz::Tz> {
        self.display
            .timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow::anyhow!("无效的时区 {}: {}", self.display.timezone, e))
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
