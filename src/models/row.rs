//! 行情行数据模型
//!
//! 数据源每次修订都可能改变列名拼写，因此行保持为原始 JSON 对象，
//! 所有读取都经过字段解析层。

use serde_json::{Map, Value};

/// 单个代码在本次拉取中的价格/成交量快照
pub type Row = Map<String, Value>;

/// 从 JSON 数组中取出行，非对象元素直接跳过
pub fn rows_from_json(value: Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                other => {
                    log::debug!("跳过非对象行: {}", other);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_from_array() {
        let rows = rows_from_json(json!([{ "Symbol": "AAA" }, 3, null, { "symbol": "BBB" }]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Symbol"], "AAA");
        assert_eq!(rows[1]["symbol"], "BBB");
    }

    #[test]
    fn test_non_array_is_empty() {
        assert!(rows_from_json(json!({ "Symbol": "AAA" })).is_empty());
        assert!(rows_from_json(json!("oops")).is_empty());
    }
}
