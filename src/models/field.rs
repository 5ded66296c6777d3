//! 逻辑列定义
//!
//! 同一逻辑列在不同数据源版本中拼写不同，这里维护一张带版本号的
//! 拼写表，按优先级排列。

use serde::{Deserialize, Serialize};

/// 拼写表版本，数据源改列名时随之递增
pub const FIELD_TABLE_VERSION: u32 = 3;

/// 逻辑列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Symbol,
    Date,
    CurrentPrice,
    YesterdayClose,
    AvgVolume,
    YesterdayVolume,
    VolumeChangePct,
    High,
    Low,
    PriceChange,
    PctChange,
}

impl Field {
    /// 表格中可排序的列，按显示顺序
    pub const SORTABLE: [Field; 10] = [
        Field::Symbol,
        Field::CurrentPrice,
        Field::YesterdayClose,
        Field::AvgVolume,
        Field::YesterdayVolume,
        Field::VolumeChangePct,
        Field::High,
        Field::Low,
        Field::PriceChange,
        Field::PctChange,
    ];

    /// 可接受的键名拼写，越靠前优先级越高
    pub fn spellings(self) -> &'static [&'static str] {
        match self {
            Field::Symbol => &["Symbol", "symbol"],
            Field::Date => &["Date", "date"],
            Field::CurrentPrice => &["Current price", "Current Price"],
            Field::YesterdayClose => &["Yesterday Close", "Yesterday close"],
            Field::AvgVolume => &["Avg Volume", "Average Volume", "avg volume"],
            Field::YesterdayVolume => &["Yesterday Volume", "Yesterday volume"],
            Field::VolumeChangePct => &["Volume Change %", "Volume change %"],
            Field::High => &["High"],
            Field::Low => &["Low"],
            Field::PriceChange => &["Price change", "Price Change"],
            Field::PctChange => &["% change", "% Change", "Price Change %", "Price change %", "%change"],
        }
    }

    /// 路由和表头中使用的排序键
    pub fn key(self) -> &'static str {
        match self {
            Field::Symbol => "symbol",
            Field::Date => "date",
            Field::CurrentPrice => "current_price",
            Field::YesterdayClose => "yesterday_close",
            Field::AvgVolume => "avg_volume",
            Field::YesterdayVolume => "yesterday_volume",
            Field::VolumeChangePct => "volume_change_pct",
            Field::High => "high",
            Field::Low => "low",
            Field::PriceChange => "price_change",
            Field::PctChange => "pct_change",
        }
    }

    /// 表头文字
    pub fn label(self) -> &'static str {
        match self {
            Field::Symbol => "Symbol",
            Field::Date => "Date",
            Field::CurrentPrice => "Current Price",
            Field::YesterdayClose => "Yesterday Close",
            Field::AvgVolume => "Avg Volume",
            Field::YesterdayVolume => "Yesterday Volume",
            Field::VolumeChangePct => "Volume Change %",
            Field::High => "High",
            Field::Low => "Low",
            Field::PriceChange => "Price Change",
            Field::PctChange => "% Change",
        }
    }

    /// 根据排序键查找逻辑列
    pub fn from_key(key: &str) -> Option<Field> {
        Field::SORTABLE
            .iter()
            .copied()
            .chain(std::iter::once(Field::Date))
            .find(|f| f.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for field in Field::SORTABLE {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("Current price"), None);
    }

    #[test]
    fn test_spellings_not_shared() {
        let mut seen = std::collections::HashSet::new();
        for field in Field::SORTABLE.iter().chain([Field::Date].iter()) {
            for s in field.spellings() {
                assert!(seen.insert(*s), "拼写 {} 被多个列共用", s);
            }
        }
    }
}
