//! 页面状态控制器
//!
//! 持有数据集、自选集合和视图状态。所有修改都经过这里，渲染结果
//! 只由 (数据集, 自选集合, 视图状态) 决定。

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::export::table_to_csv;
use super::favorites::Favorites;
use super::fields::resolve;
use super::pipeline;
use super::render::{render_table, TableView};
use super::source::FetchError;
use super::summary::Summary;
use crate::models::{Field, Preset, Row, ViewState};

pub const STATUS_LOADING: &str = "Loading…";
pub const STATUS_EMPTY: &str = "No data returned";
pub const STATUS_ERROR: &str = "Error loading data";

/// 拉取进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// 页面顶部的状态信息
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub state: FetchState,
    pub text: String,
    /// "Date: YYYY-MM-DD"，首行日期无法解析时为 None
    pub date: Option<String>,
    pub summary: Option<Summary>,
}

pub struct Dashboard {
    rows: Vec<Row>,
    favorites: Favorites,
    view: ViewState,
    state: FetchState,
    status: String,
    date: Option<String>,
    summary: Option<Summary>,
    timezone: Tz,
}

impl Dashboard {
    pub fn new(favorites: Favorites, timezone: Tz) -> Self {
        Self {
            rows: Vec::new(),
            favorites,
            view: ViewState::default(),
            state: FetchState::Idle,
            status: String::new(),
            date: None,
            summary: None,
            timezone,
        }
    }

    // ==================== 拉取 ====================

    /// 标记开始拉取，已有拉取进行中时返回 false
    pub fn begin_fetch(&mut self) -> bool {
        if self.state == FetchState::Loading {
            return false;
        }
        // 刷新等同于重新加载页面：旧数据、日期、汇总和视图状态一并丢弃
        self.clear_data();
        self.state = FetchState::Loading;
        self.status = STATUS_LOADING.to_string();
        true
    }

    fn clear_data(&mut self) {
        self.rows.clear();
        self.view = ViewState::default();
        self.date = None;
        self.summary = None;
    }

    /// 安装拉取结果
    ///
    /// 成功时整体替换数据集并重置视图状态；失败时数据集为空，只留下错误状态。
    pub fn finish_fetch(&mut self, result: Result<Vec<Row>, FetchError>) {
        self.finish_fetch_at(result, Utc::now());
    }

    fn finish_fetch_at(&mut self, result: Result<Vec<Row>, FetchError>, now: DateTime<Utc>) {
        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("拉取行情数据失败: {}", e);
                self.clear_data();
                self.state = FetchState::Failed;
                self.status = STATUS_ERROR.to_string();
                return;
            }
        };

        self.clear_data();
        self.rows = rows;
        self.state = FetchState::Loaded;

        if self.rows.is_empty() {
            self.status = STATUS_EMPTY.to_string();
            return;
        }

        self.date = self
            .rows
            .first()
            .and_then(|row| resolve(row, Field::Date))
            .and_then(|value| parse_date(value, self.timezone))
            .map(|d| format!("Date: {}", d.format("%Y-%m-%d")));
        self.summary = Some(Summary::compute(&self.rows));

        let local = now.with_timezone(&self.timezone);
        self.status = format!("Updated: {}", local.format("%H:%M"));
    }

    // ==================== 视图操作 ====================

    pub fn set_search(&mut self, text: &str) {
        self.view.search_text = text.to_string();
    }

    pub fn set_favorites_only(&mut self, enabled: bool) {
        self.view.favorites_only = enabled;
    }

    /// 快捷按钮，数据集为空时不生效
    pub fn apply_preset(&mut self, preset: Preset) {
        if self.rows.is_empty() {
            return;
        }
        self.view.apply_preset(preset);
    }

    pub fn sort_by_header(&mut self, field: Field) {
        self.view.click_header(field);
    }

    // ==================== 自选 ====================

    pub fn toggle_favorite(&mut self, symbol: &str) -> bool {
        self.favorites.toggle(symbol)
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    /// 从自选弹窗选中一个代码：填入搜索框并关闭弹窗
    pub fn select_favorite(&mut self, symbol: &str) {
        self.view.search_text = symbol.to_string();
        self.view.popup_open = false;
    }

    pub fn open_popup(&mut self) {
        self.view.popup_open = true;
    }

    pub fn close_popup(&mut self) {
        self.view.popup_open = false;
    }

    // ==================== 读取 ====================

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn status(&self) -> StatusView {
        StatusView {
            state: self.state,
            text: self.status.clone(),
            date: self.date.clone(),
            summary: self.summary,
        }
    }

    /// 当前视图下的表格
    pub fn table(&self) -> TableView {
        let visible = pipeline::apply(&self.rows, self.favorites.set(), &self.view);
        render_table(&visible, self.favorites.set(), &self.view)
    }

    pub fn export_csv(&self) -> anyhow::Result<String> {
        table_to_csv(&self.table())
    }
}

/// 解析首行日期，支持 RFC 3339、ISO 日期/时间和毫秒时间戳
///
/// 带时区的时间点和时间戳换算到显示时区后取日期；不带时区的日期和
/// 日期时间按字面取日期。
pub fn parse_date(value: &serde_json::Value, tz: Tz) -> Option<NaiveDate> {
    if value.is_number() {
        let millis = match value.as_i64() {
            Some(millis) => millis,
            None => value.as_f64().filter(|f| f.is_finite())?.trunc() as i64,
        };
        return tz.timestamp_millis_opt(millis).single().map(|d| d.date_naive());
    }

    let text = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&tz).date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}
