//! 自选股存储
//!
//! 自选集合放在一个很小的键值接口后面（`load` / `save`），
//! 默认实现把列表以 JSON 数组形式写在文件里的固定键名下。
//! 存储出错不会中断页面，只记录日志并在本次会话中退化为内存集合。

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::pipeline::locale_compare;

/// 自选集合的持久化接口
pub trait FavoritesStore: Send {
    /// 读取集合，不存在或内容损坏时返回空集合
    fn load(&self) -> Result<BTreeSet<String>>;
    fn save(&mut self, favorites: &BTreeSet<String>) -> Result<()>;
}

/// JSON 文件存储
///
/// 文件内容是一个对象，自选列表存在 `key` 对应的值里，其他键原样保留。
pub struct JsonFileStore {
    path: PathBuf,
    key: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("读取自选文件失败: {}", self.path.display()))
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) | Err(_) => {
                log::warn!("自选文件 {} 内容损坏，按空处理", self.path.display());
                Ok(None)
            }
        }
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> Result<BTreeSet<String>> {
        let Some(document) = self.read_document()? else {
            return Ok(BTreeSet::new());
        };

        let favorites = match document.get(&self.key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => BTreeSet::new(),
        };
        Ok(favorites)
    }

    fn save(&mut self, favorites: &BTreeSet<String>) -> Result<()> {
        let mut document = self.read_document()?.unwrap_or_default();
        document.insert(
            self.key.clone(),
            Value::Array(favorites.iter().cloned().map(Value::String).collect()),
        );

        // 先写临时文件再改名，避免写到一半留下损坏内容
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&Value::Object(document))?)
            .with_context(|| format!("写入自选文件失败: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("替换自选文件失败: {}", self.path.display()))?;
        Ok(())
    }
}

/// 纯内存存储，进程退出即丢失
#[derive(Debug, Default)]
pub struct MemoryStore {
    favorites: BTreeSet<String>,
}

impl FavoritesStore for MemoryStore {
    fn load(&self) -> Result<BTreeSet<String>> {
        Ok(self.favorites.clone())
    }

    fn save(&mut self, favorites: &BTreeSet<String>) -> Result<()> {
        self.favorites = favorites.clone();
        Ok(())
    }
}

/// 自选集合，写穿到底层存储
pub struct Favorites {
    store: Box<dyn FavoritesStore>,
    set: BTreeSet<String>,
    /// 存储不可用后只在内存中维护
    degraded: bool,
}

impl Favorites {
    pub fn open(store: Box<dyn FavoritesStore>) -> Self {
        match store.load() {
            Ok(set) => {
                log::info!("已加载 {} 个自选", set.len());
                Self { store, set, degraded: false }
            }
            Err(e) => {
                log::error!("自选存储不可用，本次会话使用内存集合: {:#}", e);
                Self { store, set: BTreeSet::new(), degraded: true }
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStore::default()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.set.contains(symbol)
    }

    pub fn set(&self) -> &BTreeSet<String> {
        &self.set
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// 弹窗中的显示顺序
    pub fn sorted(&self) -> Vec<String> {
        let mut list: Vec<String> = self.set.iter().cloned().collect();
        list.sort_by(|a, b| locale_compare(a, b));
        list
    }

    /// 切换收藏状态，返回切换后是否在自选中
    pub fn toggle(&mut self, symbol: &str) -> bool {
        let now_on = !self.contains(symbol);
        if now_on {
            self.set.insert(symbol.to_string());
        } else {
            self.set.remove(symbol);
        }
        self.persist();
        now_on
    }

    pub fn clear(&mut self) {
        self.set.clear();
        self.persist();
    }

    fn persist(&mut self) {
        if self.degraded {
            return;
        }
        if let Err(e) = self.store.save(&self.set) {
            log::error!("保存自选失败，本次会话改用内存集合: {:#}", e);
            self.degraded = true;
        }
    }
}
