//! 过滤/排序引擎
//!
//! (行集, 自选集, 视图状态) -> 有序子集 的纯函数。
//! 不排序时保持拉取顺序，过滤不改变相对顺序。

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::fields::{resolve, sort_number, symbol, value_text};
use crate::models::{Field, Row, SortDir, ViewState};

/// 依次应用搜索、仅看自选和排序
pub fn apply<'a>(rows: &'a [Row], favorites: &BTreeSet<String>, view: &ViewState) -> Vec<&'a Row> {
    let query = view.search_text.trim().to_uppercase();

    let mut out: Vec<&Row> = rows
        .iter()
        .filter(|row| query.is_empty() || symbol(row).to_uppercase().contains(&query))
        .filter(|row| !view.favorites_only || favorites.contains(&symbol(row)))
        .collect();

    if let Some(field) = view.sort_key {
        out = merge_sort_by(out, |a, b| compare_rows(a, b, field, view.sort_dir));
    }

    out
}

/// 稳定归并排序
///
/// 数值与文本混合比较不构成全序（如 "9" < "10" < "1e999" < "9"），
/// 标准库排序在检测到这种情况时会 panic，这里只按比较结果合并，不做校验。
pub fn merge_sort_by<T, F>(items: Vec<T>, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    merge_sort_inner(items, &mut compare)
}

fn merge_sort_inner<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_inner(items, compare);
    let right = merge_sort_inner(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        // 只有右边严格更小时才取右边，保证稳定
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged
}

/// 按某列比较两行，两边都能解析成有限数时按数值，否则按文本
pub fn compare_rows(a: &Row, b: &Row, field: Field, dir: SortDir) -> Ordering {
    let va = resolve(a, field);
    let vb = resolve(b, field);

    let na = sort_number(va);
    let nb = sort_number(vb);

    let out = if na.is_finite() && nb.is_finite() {
        na.partial_cmp(&nb).unwrap_or(Ordering::Equal)
    } else {
        let sa = va.map(value_text).unwrap_or_default();
        let sb = vb.map(value_text).unwrap_or_default();
        locale_compare(&sa, &sb)
    };

    match dir {
        SortDir::Asc => out,
        SortDir::Desc => out.reverse(),
    }
}

/// 近似区域化比较：先忽略大小写，再区分大小写
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Preset;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        crate::models::rows_from_json(value)
    }

    fn symbols(out: &[&Row]) -> Vec<String> {
        out.iter().map(|r| symbol(r)).collect()
    }

    fn sample() -> Vec<Row> {
        rows(json!([
            { "Symbol": "MSFT", "% change": "1.5%", "Volume Change %": 10, "Current price": "$410.10" },
            { "Symbol": "AAPL", "% Change": -0.75, "Volume Change %": 45, "Current price": "189.5" },
            { "symbol": "BRK-B", "% change": 3.1, "Volume change %": -12, "Current price": "1,234.00" },
            { "Symbol": "TSLA", "Volume Change %": 3, "Current price": "N/A" },
            { "Symbol": "AMZN", "% change": "-2.2", "Volume Change %": 45, "Current price": 178 }
        ]))
    }

    #[test]
    fn test_no_view_keeps_fetch_order() {
        let data = sample();
        let out = apply(&data, &BTreeSet::new(), &ViewState::default());
        assert_eq!(symbols(&out), ["MSFT", "AAPL", "BRK-B", "TSLA", "AMZN"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let data = sample();
        let view = ViewState { search_text: "  a ".to_string(), ..Default::default() };
        let out = apply(&data, &BTreeSet::new(), &view);
        assert_eq!(symbols(&out), ["AAPL", "TSLA", "AMZN"]);

        let view = ViewState { search_text: "k-".to_string(), ..Default::default() };
        assert_eq!(symbols(&apply(&data, &BTreeSet::new(), &view)), ["BRK-B"]);
    }

    #[test]
    fn test_clearing_search_restores_order() {
        let data = sample();
        let mut view = ViewState { search_text: "m".to_string(), ..Default::default() };
        assert_eq!(symbols(&apply(&data, &BTreeSet::new(), &view)), ["MSFT", "AMZN"]);

        view.search_text.clear();
        assert_eq!(
            symbols(&apply(&data, &BTreeSet::new(), &view)),
            symbols(&data.iter().collect::<Vec<_>>())
        );
    }

    #[test]
    fn test_favorites_only() {
        let data = sample();
        let favorites: BTreeSet<String> = ["AMZN", "BRK-B", "NFLX"].iter().map(|s| s.to_string()).collect();
        let view = ViewState { favorites_only: true, ..Default::default() };
        assert_eq!(symbols(&apply(&data, &favorites, &view)), ["BRK-B", "AMZN"]);
    }

    #[test]
    fn test_gainers_and_losers() {
        let data = rows(json!([
            { "Symbol": "AAA", "% change": 5 },
            { "Symbol": "BBB", "% change": -3 }
        ]));
        let mut view = ViewState::default();

        view.apply_preset(Preset::Gainers);
        assert_eq!(symbols(&apply(&data, &BTreeSet::new(), &view)), ["AAA", "BBB"]);

        view.apply_preset(Preset::Losers);
        assert_eq!(symbols(&apply(&data, &BTreeSet::new(), &view)), ["BBB", "AAA"]);
    }

    #[test]
    fn test_numeric_sort_strips_formatting() {
        let data = sample();
        let mut view = ViewState::default();
        view.click_header(Field::CurrentPrice);
        assert_eq!(view.sort_dir, SortDir::Desc);

        let out = apply(&data, &BTreeSet::new(), &view);
        // "N/A" 无法解析，与数值比较时退化为文本比较，排在数字文本之后
        assert_eq!(symbols(&out), ["TSLA", "BRK-B", "MSFT", "AAPL", "AMZN"]);
    }

    #[test]
    fn test_direction_symmetry_with_distinct_keys() {
        let data = sample();
        let mut view = ViewState::default();
        view.click_header(Field::PctChange);
        let desc = symbols(&apply(&data, &BTreeSet::new(), &view));

        view.click_header(Field::PctChange);
        let mut asc = symbols(&apply(&data, &BTreeSet::new(), &view));
        asc.reverse();
        assert_eq!(desc, asc);
    }

    #[test]
    fn test_ties_are_stable() {
        let data = sample();
        let mut view = ViewState::default();
        view.apply_preset(Preset::Volume);
        let out = symbols(&apply(&data, &BTreeSet::new(), &view));
        assert_eq!(out, ["AAPL", "AMZN", "MSFT", "TSLA", "BRK-B"]);

        view.click_header(Field::VolumeChangePct);
        let out = symbols(&apply(&data, &BTreeSet::new(), &view));
        assert_eq!(out, ["BRK-B", "TSLA", "MSFT", "AAPL", "AMZN"]);
    }

    #[test]
    fn test_text_sort_on_symbol() {
        let data = sample();
        let mut view = ViewState::default();
        view.click_header(Field::Symbol);
        view.click_header(Field::Symbol);
        assert_eq!(view.sort_dir, SortDir::Asc);
        assert_eq!(
            symbols(&apply(&data, &BTreeSet::new(), &view)),
            ["AAPL", "AMZN", "BRK-B", "MSFT", "TSLA"]
        );
    }

    #[test]
    fn test_inconsistent_comparator_does_not_panic() {
        let pool = ["10", "9", "1e999", "99", "19", "200", "3", "1e500", "15", "92", "-Infinity", "n/a"];
        let items: Vec<serde_json::Value> = (0..240)
            .map(|i| json!({ "Symbol": format!("S{:03}", i), "% change": pool[(i * 7 + i / 5) % pool.len()] }))
            .collect();
        let data = rows(serde_json::Value::Array(items));

        let mut view = ViewState::default();
        for _ in 0..2 {
            view.click_header(Field::PctChange);
            let out = apply(&data, &BTreeSet::new(), &view);
            assert_eq!(out.len(), data.len());

            let mut seen = symbols(&out);
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), data.len());
        }
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        let sorted = merge_sort_by(items, |a, b| a.0.cmp(&b.0));
        assert_eq!(sorted, [(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }
}
