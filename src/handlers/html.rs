//! HTML 页面
//!
//! 把 Dashboard 的结构化渲染结果绑定到页面标记上。
//! 所有交互都是普通表单提交，处理完后重定向回首页。

use std::fmt::Write;

use crate::models::Preset;
use crate::services::dashboard::{Dashboard, StatusView};
use crate::services::export::CSV_FILE_NAME;
use crate::services::render::{Cell, CellKind, HeaderCell, TableView};

const STYLE: &str = r#"
body { background: #111827; color: #f9fafb; font-family: sans-serif; margin: 0 24px; }
.status-bar { display: flex; gap: 24px; padding: 12px 0; color: rgba(255,255,255,0.75); }
.controls { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-bottom: 12px; }
.controls form { display: inline; margin: 0; }
button { cursor: pointer; }
.is-active { outline: 2px solid #facc15; }
#favorites-popup { background: #1f2937; padding: 8px; margin-bottom: 12px; max-width: 320px; }
.fav-item { display: flex; justify-content: space-between; width: 100%; }
#price-table { border-collapse: collapse; width: 100%; }
#price-table th button { background: none; border: none; color: inherit; font-weight: bold; }
#price-table td { padding: 4px 8px; border-bottom: 1px solid #374151; }
.num { text-align: right; white-space: pre; font-family: monospace; }
.positive { color: #22c55e; }
.negative { color: #ef4444; }
.star-btn { background: none; border: none; color: #6b7280; }
.star-btn.is-on { color: #facc15; }
.symbol-link { color: #93c5fd; }
.empty { color: rgba(255,255,255,0.7); padding: 16px; }
#myBtn { position: fixed; bottom: 20px; right: 20px; }
"#;

/// 转义 HTML 文本和属性值
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 完整页面
pub fn render_page(dashboard: &Dashboard) -> String {
    let view = dashboard.view();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Stock Board</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body id=\"top\">\n");

    render_status(&mut html, &dashboard.status());

    // 控制栏
    html.push_str("<div class=\"controls\">\n");
    let _ = write!(
        html,
        "<form class=\"search-bar\" method=\"post\" action=\"/search\">\
         <input id=\"search-input\" name=\"q\" placeholder=\"Search symbol\" value=\"{}\">\
         <button type=\"submit\">Search</button></form>\n",
        escape(&view.search_text)
    );
    html.push_str(
        "<form method=\"post\" action=\"/refresh\"><button class=\"refresh-button\" type=\"submit\">Refresh</button></form>\n",
    );
    for preset in Preset::ALL {
        let class = match preset {
            Preset::Gainers => "button-primary",
            Preset::Losers => "button-secondary",
            Preset::Volume => "button-tertiary",
        };
        let active = if view.active_preset == Some(preset) { " is-active" } else { "" };
        let _ = write!(
            html,
            "<form method=\"post\" action=\"/preset/{}\"><button class=\"{}{}\" type=\"submit\">{}</button></form>\n",
            preset.name(),
            class,
            active,
            preset.label()
        );
    }

    let popup_action = if view.popup_open { "close" } else { "open" };
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/favorites/popup/{}\"><button id=\"favorites-button\" type=\"submit\" aria-expanded=\"{}\">★ Favorites ({})</button></form>\n",
        popup_action,
        view.popup_open,
        dashboard.favorites().len()
    );
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/favorites/only\"><input type=\"hidden\" name=\"enabled\" value=\"{}\">\
         <button id=\"favorites-only-toggle\" type=\"submit\" aria-pressed=\"{}\">Favorites only: {}</button></form>\n",
        !view.favorites_only,
        view.favorites_only,
        if view.favorites_only { "on" } else { "off" }
    );
    let _ = write!(
        html,
        "<a id=\"save-data-button\" href=\"/{0}\" download=\"{0}\">Save as CSV</a>\n",
        CSV_FILE_NAME
    );
    html.push_str("</div>\n");

    if view.popup_open {
        render_popup(&mut html, &dashboard.favorites().sorted());
    }

    render_table_html(&mut html, &dashboard.table());

    html.push_str("<a id=\"myBtn\" href=\"#top\" title=\"Go to top\">Top</a>\n");
    html.push_str("</body>\n</html>\n");
    html
}

fn render_status(html: &mut String, status: &StatusView) {
    html.push_str("<div class=\"status-bar\">\n");
    let _ = writeln!(html, "<span id=\"status-indicator\">{}</span>", escape(&status.text));
    if let Some(date) = &status.date {
        let _ = writeln!(html, "<span id=\"date-display\">{}</span>", escape(date));
    }
    if let Some(summary) = &status.summary {
        let _ = writeln!(
            html,
            "<span id=\"total-change-container\">{}</span>",
            escape(&summary.price_change_text())
        );
        let _ = writeln!(
            html,
            "<span id=\"average-volume-change-container\">{}</span>",
            escape(&summary.volume_text())
        );
    }
    html.push_str("</div>\n");
}

fn render_popup(html: &mut String, favorites: &[String]) {
    html.push_str("<div id=\"favorites-popup\" class=\"open\" aria-hidden=\"false\">\n");
    html.push_str(
        "<form method=\"post\" action=\"/favorites/popup/close\"><button id=\"favorites-close\" type=\"submit\">×</button></form>\n",
    );
    html.push_str("<div id=\"favorites-list\">\n");

    if favorites.is_empty() {
        html.push_str("<div class=\"empty\">No favorites yet. Click ★ in the table to add.</div>\n");
    }
    for symbol in favorites {
        let _ = write!(
            html,
            "<form method=\"post\" action=\"/favorites/select\"><input type=\"hidden\" name=\"symbol\" value=\"{0}\">\
             <button class=\"fav-item\" type=\"submit\"><span class=\"fav-symbol\">{0}</span><span>Open</span></button></form>\n",
            escape(symbol)
        );
    }

    html.push_str("</div>\n");
    html.push_str(
        "<form method=\"post\" action=\"/favorites/clear\"><button id=\"favorites-clear\" type=\"submit\">Clear all</button></form>\n",
    );
    html.push_str("</div>\n");
}

fn render_table_html(html: &mut String, table: &TableView) {
    html.push_str("<div class=\"table-container\">\n<table id=\"price-table\">\n<thead><tr>");
    for header in &table.headers {
        render_header(html, header);
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &table.rows {
        html.push_str("<tr>");
        for cell in &row.cells {
            render_cell(html, row.symbol.as_deref(), cell);
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
}

fn render_header(html: &mut String, header: &HeaderCell) {
    match header.field {
        Some(field) => {
            let _ = write!(
                html,
                "<th data-key=\"{0}\" data-label=\"{1}\"><form method=\"post\" action=\"/sort/{0}\">\
                 <button type=\"submit\">{2}</button></form></th>",
                field.key(),
                escape(header.label),
                escape(&header.text)
            );
        }
        None => {
            let _ = write!(html, "<th>{}</th>", escape(&header.text));
        }
    }
}

fn render_cell(html: &mut String, symbol: Option<&str>, cell: &Cell) {
    match &cell.kind {
        CellKind::Star { on } => {
            let (class, title) = if *on {
                ("star-btn is-on", "Remove favorite")
            } else {
                ("star-btn", "Add favorite")
            };
            let _ = write!(
                html,
                "<td class=\"star-cell\"><form method=\"post\" action=\"/favorites/toggle\">\
                 <input type=\"hidden\" name=\"symbol\" value=\"{}\">\
                 <button class=\"{}\" type=\"submit\" title=\"{}\">{}</button></form></td>",
                escape(symbol.unwrap_or_default()),
                class,
                title,
                escape(&cell.text)
            );
        }
        CellKind::Link { href } => {
            let _ = write!(
                html,
                "<td><a class=\"symbol-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></td>",
                escape(href),
                escape(&cell.text)
            );
        }
        CellKind::Number => {
            let class = match cell.style {
                Some(style) => format!("num {}", style.class()),
                None => "num".to_string(),
            };
            let _ = write!(html, "<td class=\"{}\">{}</td>", class, escape(&cell.text));
        }
        CellKind::Placeholder { colspan } => {
            let _ = write!(
                html,
                "<td class=\"empty\" colspan=\"{}\">{}</td>",
                colspan,
                escape(&cell.text)
            );
        }
    }
}
