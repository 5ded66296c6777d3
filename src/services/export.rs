//! CSV 导出
//!
//! 读取当前渲染结果的表头和可见行。单元格内的逗号替换为空格而不是转义，
//! 下游表格依赖这种简化格式。

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::render::TableView;

/// 下载文件名
pub const CSV_FILE_NAME: &str = "table_data.csv";

pub fn table_to_csv(table: &TableView) -> Result<String> {
    // 占位行只有一个单元格，需要 flexible
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(table.headers.iter().map(|h| h.text.trim().replace(',', " ")))?;
    for row in &table.rows {
        writer.write_record(row.cells.iter().map(|c| c.text.replace(',', " ")))?;
    }

    let bytes = writer.into_inner().context("写入 CSV 失败")?;
    let mut csv = String::from_utf8(bytes).context("CSV 不是合法的 UTF-8")?;
    // 行之间用换行分隔，末尾不留换行
    if csv.ends_with('\n') {
        csv.pop();
    }
    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{rows_from_json, Field, ViewState};
    use crate::services::pipeline::apply;
    use crate::services::render::render_table;
    use serde_json::json;
    use std::collections::BTreeSet;

    #[test]
    fn test_csv_header_and_rows() {
        let rows = rows_from_json(json!([
            { "Symbol": "A,B", "Current price": 1.5, "% change": -2 }
        ]));
        let mut view = ViewState::default();
        view.click_header(Field::PctChange);

        let visible = apply(&rows, &BTreeSet::new(), &view);
        let csv = table_to_csv(&render_table(&visible, &BTreeSet::new(), &view)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "★,Symbol,Current Price,Yesterday Close,Avg Volume,Yesterday Volume,Volume Change %,High,Low,Price Change,% Change ▼"
        );
        assert_eq!(lines[1], "★,A B,1.50,N/A,N/A,N/A,N/A,N/A,N/A,N/A,-2.00%");
    }

    #[test]
    fn test_csv_keeps_leading_space_and_placeholder() {
        let rows = rows_from_json(json!([{ "Symbol": "X", "Price change": 3 }]));
        let view = ViewState::default();
        let visible = apply(&rows, &BTreeSet::new(), &view);
        let csv = table_to_csv(&render_table(&visible, &BTreeSet::new(), &view)).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(", 3.00$,N/A"));

        let csv = table_to_csv(&render_table(&[], &BTreeSet::new(), &view)).unwrap();
        assert_eq!(csv.lines().nth(1), Some("No matching results"));
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_never_quotes_cells() {
        let rows = rows_from_json(json!([
            { "Symbol": "Q\"X", "Current price": "1,234.5" },
            { "Symbol": "Z" }
        ]));
        let view = ViewState::default();
        let visible = apply(&rows, &BTreeSet::new(), &view);
        let csv = table_to_csv(&render_table(&visible, &BTreeSet::new(), &view)).unwrap();

        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("★,Q\"X,"));
        assert_eq!(lines[2].split(',').count(), 11);
    }
}
