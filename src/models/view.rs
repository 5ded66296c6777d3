//! 视图状态模型
//!
//! 搜索词、仅看自选、排序键/方向以及当前高亮的快捷按钮。
//! 只存在于内存中，每次拉取完成后重置。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Field;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    /// 表头上的方向标记
    pub fn arrow(self) -> &'static str {
        match self {
            SortDir::Asc => "▲",
            SortDir::Desc => "▼",
        }
    }
}

/// 快捷排序按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Gainers,
    Losers,
    Volume,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Gainers, Preset::Losers, Preset::Volume];

    /// 按钮对应的排序配置
    pub fn sort(self) -> (Field, SortDir) {
        match self {
            Preset::Gainers => (Field::PctChange, SortDir::Desc),
            Preset::Losers => (Field::PctChange, SortDir::Asc),
            Preset::Volume => (Field::VolumeChangePct, SortDir::Desc),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Gainers => "gainers",
            Preset::Losers => "losers",
            Preset::Volume => "volume",
        }
    }

    /// 按钮文字
    pub fn label(self) -> &'static str {
        match self {
            Preset::Gainers => "Top Gainers",
            Preset::Losers => "Top Losers",
            Preset::Volume => "Volume Movers",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("未知的快捷按钮: {}", s))
    }
}

/// 当前视图状态
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    /// 搜索框内容（原样保存，使用时再裁剪）
    pub search_text: String,
    /// 仅显示自选
    pub favorites_only: bool,
    /// 排序列，None 表示保持拉取顺序
    pub sort_key: Option<Field>,
    pub sort_dir: SortDir,
    /// 高亮中的快捷按钮
    pub active_preset: Option<Preset>,
    /// 自选弹窗是否打开
    pub popup_open: bool,
}

impl ViewState {
    /// 点击表头：同一列翻转方向，不同列重置为降序
    pub fn click_header(&mut self, field: Field) {
        if self.sort_key == Some(field) {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_key = Some(field);
            self.sort_dir = SortDir::Desc;
        }
        self.active_preset = None;
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        let (field, dir) = preset.sort();
        self.sort_key = Some(field);
        self.sort_dir = dir;
        self.active_preset = Some(preset);
    }
}
