//! 汇总指标
//!
//! 基于完整的（未过滤）数据集计算，缺失值按 0 计入总和但仍计入行数。

use serde::Serialize;

use super::fields::{summary_number, to_fixed};
use crate::models::{Field, Row};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    /// 平均涨跌额
    pub avg_price_change: f64,
    /// 平均成交量
    pub avg_volume: f64,
}

impl Summary {
    pub fn compute(rows: &[Row]) -> Self {
        Self {
            avg_price_change: mean(rows, Field::PriceChange),
            avg_volume: mean(rows, Field::AvgVolume),
        }
    }

    pub fn price_change_text(&self) -> String {
        format!("Average Daily Change: {}$", to_fixed(self.avg_price_change, 2))
    }

    pub fn volume_text(&self) -> String {
        format!("Average Daily Volume: {}", to_fixed(self.avg_volume, 0))
    }
}

fn mean(rows: &[Row], field: Field) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let total: f64 = rows.iter().map(|row| summary_number(row, field)).sum();
    total / rows.len() as f64
}
