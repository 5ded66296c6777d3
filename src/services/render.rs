//! 表格渲染
//!
//! 把过滤/排序后的行转换成结构化的单元格数据（文本 + 样式标记），
//! 不依赖任何 UI 层。HTML 页面和 CSV 导出都读取这里的结果。

use serde::Serialize;
use std::collections::BTreeSet;

use super::fields::{resolve, symbol, to_fixed, to_number};
use crate::models::{Field, Row, SortDir, ViewState};

/// 表格总列数（收藏列 + 代码列 + 9 个数值列）
pub const COLUMN_COUNT: usize = 11;

/// 空结果时的占位文字
pub const EMPTY_MESSAGE: &str = "No matching results";

/// 缺失值的显示文字
pub const MISSING: &str = "N/A";

/// 数值单元格的涨跌样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStyle {
    Positive,
    Negative,
}

impl CellStyle {
    pub fn class(self) -> &'static str {
        match self {
            CellStyle::Positive => "positive",
            CellStyle::Negative => "negative",
        }
    }
}

/// 单元格种类
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellKind {
    /// 收藏开关
    Star { on: bool },
    /// 跳转到外部行情页的代码链接
    Link { href: String },
    Number,
    /// 空结果占位，横跨整行
    Placeholder { colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub style: Option<CellStyle>,
    #[serde(flatten)]
    pub kind: CellKind,
}

impl Cell {
    fn number(text: String, style: Option<CellStyle>) -> Self {
        Self { text, style, kind: CellKind::Number }
    }
}

/// 表头单元格
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    /// 可排序列的逻辑字段，收藏列为 None
    pub field: Option<Field>,
    pub label: &'static str,
    /// 实际显示文字，当前排序列带方向箭头
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    /// 占位行没有代码
    pub symbol: Option<String>,
    pub cells: Vec<Cell>,
}

/// 一次渲染的完整结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow>,
}

impl TableView {
    /// 是否为空结果（只有占位行）
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.symbol.is_none())
    }
}

/// 渲染表头和表体
pub fn render_table(rows: &[&Row], favorites: &BTreeSet<String>, view: &ViewState) -> TableView {
    TableView {
        headers: render_headers(view.sort_key, view.sort_dir),
        rows: render_body(rows, favorites),
    }
}

/// 表头，当前排序列追加 ▲ / ▼
pub fn render_headers(sort_key: Option<Field>, sort_dir: SortDir) -> Vec<HeaderCell> {
    let star = HeaderCell {
        field: None,
        label: "★",
        text: "★".to_string(),
    };

    std::iter::once(star)
        .chain(Field::SORTABLE.iter().map(|&field| {
            let text = if sort_key == Some(field) {
                format!("{} {}", field.label(), sort_dir.arrow())
            } else {
                field.label().to_string()
            };
            HeaderCell {
                field: Some(field),
                label: field.label(),
                text,
            }
        }))
        .collect()
}

/// 表体，空结果时输出一行占位
pub fn render_body(rows: &[&Row], favorites: &BTreeSet<String>) -> Vec<RenderedRow> {
    if rows.is_empty() {
        return vec![RenderedRow {
            symbol: None,
            cells: vec![Cell {
                text: EMPTY_MESSAGE.to_string(),
                style: None,
                kind: CellKind::Placeholder { colspan: COLUMN_COUNT },
            }],
        }];
    }

    rows.iter().map(|row| render_row(row, favorites)).collect()
}

fn render_row(row: &Row, favorites: &BTreeSet<String>) -> RenderedRow {
    let symbol = symbol(row);

    let cells = vec![
        Cell {
            text: "★".to_string(),
            style: None,
            kind: CellKind::Star { on: favorites.contains(&symbol) },
        },
        Cell {
            text: symbol.clone(),
            style: None,
            kind: CellKind::Link { href: quote_url(&symbol) },
        },
        fixed_cell(row, Field::CurrentPrice, 2),
        fixed_cell(row, Field::YesterdayClose, 2),
        fixed_cell(row, Field::AvgVolume, 0),
        fixed_cell(row, Field::YesterdayVolume, 0),
        signed_cell(row, Field::VolumeChangePct, "%"),
        fixed_cell(row, Field::High, 2),
        fixed_cell(row, Field::Low, 2),
        signed_cell(row, Field::PriceChange, "$"),
        signed_cell(row, Field::PctChange, "%"),
    ];

    RenderedRow {
        symbol: Some(symbol),
        cells,
    }
}

/// 外部行情页地址，代码中的 "-" 需替换为 "-P"
pub fn quote_url(symbol: &str) -> String {
    let formatted = symbol.replace('-', "-P");
    format!(
        "https://finance.yahoo.com/quote/{0}?p={0}&.tsrc=fin-srch",
        formatted
    )
}

fn number_at(row: &Row, field: Field) -> Option<f64> {
    // -0.0 归一为 0.0，避免显示 "-0.00"
    resolve(row, field).and_then(to_number).map(|n| n + 0.0)
}

/// 固定小数位，无样式
fn fixed_cell(row: &Row, field: Field, decimals: usize) -> Cell {
    match number_at(row, field) {
        Some(n) => Cell::number(to_fixed(n, decimals), None),
        None => Cell::number(MISSING.to_string(), None),
    }
}

/// 两位小数带后缀和涨跌样式，非负数前补空格对齐
fn signed_cell(row: &Row, field: Field, suffix: &str) -> Cell {
    match number_at(row, field) {
        Some(n) if n >= 0.0 => Cell::number(format!(" {}{}", to_fixed(n, 2), suffix), Some(CellStyle::Positive)),
        Some(n) => Cell::number(format!("{}{}", to_fixed(n, 2), suffix), Some(CellStyle::Negative)),
        None => Cell::number(MISSING.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one_row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn texts(row: &RenderedRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_full_row_formatting() {
        let row = one_row(json!({
            "Symbol": "BRK-B",
            "Current Price": "412.456",
            "Yesterday close": 410,
            "Average Volume": "3456789.6",
            "Yesterday Volume": 2100000,
            "Volume Change %": -12.3456,
            "High": 415.1,
            "Low": "409.99",
            "Price Change": 2.456,
            "Price change %": "0.6"
        }));
        let favorites: BTreeSet<String> = ["BRK-B".to_string()].into_iter().collect();

        let view = render_table(&[&row], &favorites, &ViewState::default());
        assert_eq!(view.rows.len(), 1);

        let rendered = &view.rows[0];
        assert_eq!(rendered.cells.len(), COLUMN_COUNT);
        assert_eq!(
            texts(rendered),
            [
                "★", "BRK-B", "412.46", "410.00", "3456790", "2100000", "-12.35%", "415.10",
                "409.99", " 2.46$", " 0.60%"
            ]
        );

        assert_eq!(rendered.cells[0].kind, CellKind::Star { on: true });
        assert_eq!(
            rendered.cells[1].kind,
            CellKind::Link {
                href: "https://finance.yahoo.com/quote/BRK-PB?p=BRK-PB&.tsrc=fin-srch".to_string()
            }
        );
        assert_eq!(rendered.cells[6].style, Some(CellStyle::Negative));
        assert_eq!(rendered.cells[9].style, Some(CellStyle::Positive));
        assert_eq!(rendered.cells[2].style, None);
    }

    #[test]
    fn test_missing_fields_render_na_without_style() {
        let row = one_row(json!({ "Symbol": "ZZZ", "% change": null, "Price change": "" }));
        let view = render_table(&[&row], &BTreeSet::new(), &ViewState::default());

        let rendered = &view.rows[0];
        assert_eq!(rendered.cells[0].kind, CellKind::Star { on: false });
        for cell in &rendered.cells[2..] {
            assert_eq!(cell.text, MISSING);
            assert_eq!(cell.style, None);
        }
    }

    #[test]
    fn test_zero_is_positive() {
        let row = one_row(json!({ "Symbol": "Z", "% change": -0.0, "Price change": 0 }));
        let rendered = &render_body(&[&row], &BTreeSet::new())[0];
        assert_eq!(rendered.cells[10].text, " 0.00%");
        assert_eq!(rendered.cells[10].style, Some(CellStyle::Positive));
        assert_eq!(rendered.cells[9].text, " 0.00$");
    }

    #[test]
    fn test_cell_ties_round_away_from_zero() {
        let row = one_row(json!({ "Symbol": "T", "Avg Volume": 2.5, "% change": 0.125, "Price change": -0.125 }));
        let rendered = &render_body(&[&row], &BTreeSet::new())[0];
        assert_eq!(rendered.cells[4].text, "3");
        assert_eq!(rendered.cells[10].text, " 0.13%");
        assert_eq!(rendered.cells[9].text, "-0.13$");
    }

    #[test]
    fn test_empty_renders_placeholder() {
        let view = render_table(&[], &BTreeSet::new(), &ViewState::default());
        assert!(view.is_empty());
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].cells.len(), 1);

        let cell = &view.rows[0].cells[0];
        assert_eq!(cell.text, EMPTY_MESSAGE);
        assert_eq!(cell.kind, CellKind::Placeholder { colspan: COLUMN_COUNT });
    }

    #[test]
    fn test_headers_mark_sort_column() {
        let headers = render_headers(Some(Field::PctChange), SortDir::Asc);
        assert_eq!(headers.len(), COLUMN_COUNT);
        assert_eq!(headers[0].field, None);
        assert_eq!(headers[10].text, "% Change ▲");
        assert_eq!(headers[9].text, "Price Change");

        let headers = render_headers(None, SortDir::Desc);
        assert!(headers.iter().all(|h| !h.text.contains('▼')));
    }

    #[test]
    fn test_quote_url_escapes_every_dash() {
        assert_eq!(
            quote_url("A-B-C"),
            "https://finance.yahoo.com/quote/A-PB-PC?p=A-PB-PC&.tsrc=fin-srch"
        );
    }
}
