//! 字段解析与数值转换
//!
//! 所有对行数据的读取都必须经过 [`resolve`]，保证显示、排序、
//! 搜索和汇总使用同一套拼写优先级。

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::models::{Field, Row};

/// 排序前需要剔除的字符
static STRIP_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[%$,]").unwrap());

/// 浮点数前缀（与浏览器 parseFloat 的接受范围一致）
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|\d+(?:\.\d*)?(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)").unwrap()
});

/// 按拼写优先级取第一个存在、非 null、非空字符串的值
pub fn resolve(row: &Row, field: Field) -> Option<&Value> {
    field
        .spellings()
        .iter()
        .filter_map(|key| row.get(*key))
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// 取值的文本形式，缺失时返回空串
pub fn resolve_text(row: &Row, field: Field) -> String {
    resolve(row, field).map(value_text).unwrap_or_default()
}

/// 行的代码（搜索、自选和链接都用它）
pub fn symbol(row: &Row) -> String {
    resolve_text(row, Field::Symbol)
}

/// JSON 值的文本形式，字符串不带引号
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 显示用的数值转换：整个字符串必须是数字
///
/// 无法转换或不是有限数时返回 None，由渲染层显示 N/A。
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// 前缀式浮点解析，"12.5abc" 得到 12.5，无数字前缀返回 NaN
pub fn parse_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let Some(m) = FLOAT_PREFIX.find(trimmed) else {
        return f64::NAN;
    };
    let literal = m.as_str();
    if literal.ends_with("Infinity") {
        return if literal.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    literal.parse::<f64>().unwrap_or(f64::NAN)
}

/// 排序用的数值：剔除 % $ , 和首尾空白后做前缀解析
pub fn sort_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => f64::NAN,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(other) => {
            let text = value_text(other);
            parse_float(STRIP_CHARS.replace_all(&text, "").trim())
        }
    }
}

/// 汇总用的数值：缺失或无法解析都按 0 计
pub fn summary_number(row: &Row, field: Field) -> f64 {
    let n = match resolve(row, field) {
        None => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(other) => parse_float(&value_text(other)),
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// 固定小数位格式化，恰好落在中点时远离零进位
///
/// `format!` 对中点向偶数舍入（2.5 -> "2"），这里 2.5 -> "3"，0.125 -> "0.13"。
/// 只有二进制值恰好是中点才进位，1.005 实际略小于中点，仍是 "1.00"。
pub fn to_fixed(n: f64, decimals: usize) -> String {
    // -0 显示为 0
    let n = n + 0.0;
    if !n.is_finite() {
        return n.to_string();
    }

    const EXTRA: usize = 30;
    let exact = format!("{:.*}", decimals + EXTRA, n.abs());
    let tail = &exact[exact.len() - EXTRA..];
    let tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !tie {
        return format!("{:.*}", decimals, n);
    }

    // 往远离零的方向挪一个最小单位，避开中点
    let bumped = f64::from_bits(n.abs().to_bits() + 1);
    let sign = if n < 0.0 { "-" } else { "" };
    format!("{}{:.*}", sign, decimals, bumped)
}
