use crate::data::datatable::{DataValue, Row};
use crate::data::filter_expr::FilterExpr;
use crate::data::sort::{sort_indices, SortState};
use std::collections::BTreeMap;
use tracing::trace;

/// Column key → filter expression. Empty expressions are inactive.
pub type ColumnFilters = BTreeMap<String, String>;

/// Apply the global search and every active column filter, returning indices
/// into `rows` in their original order. `rows` is not modified.
pub fn filter_rows(rows: &[Row], search_text: &str, filters: &ColumnFilters) -> Vec<usize> {
    let needle = search_text.to_lowercase();

    let compiled: Vec<(&str, FilterExpr)> = filters
        .iter()
        .filter_map(|(key, text)| FilterExpr::parse(text).map(|expr| (key.as_str(), expr)))
        .collect();

    let visible: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| needle.is_empty() || row.search_text().contains(&needle))
        .filter(|(_, row)| {
            compiled.iter().all(|(key, expr)| {
                expr.matches(row.get(key).unwrap_or(&DataValue::Null))
            })
        })
        .map(|(idx, _)| idx)
        .collect();

    trace!(
        target: "filter",
        "search='{}' active_filters={} kept {}/{} rows",
        needle,
        compiled.len(),
        visible.len(),
        rows.len()
    );

    visible
}

/// Filter then sort. The result is the view order as indices into `rows`.
pub fn apply_filters(
    rows: &[Row],
    search_text: &str,
    filters: &ColumnFilters,
    sort_state: &SortState,
) -> Vec<usize> {
    let mut visible = filter_rows(rows, search_text, filters);
    sort_indices(rows, &mut visible, sort_state);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sort::SortOrder;

    fn people() -> Vec<Row> {
        vec![
            Row::new(1i64).with("name", "Alice").with("city", "Madrid").with("age", 31i64),
            Row::new(2i64).with("name", "Bob").with("city", "Paris").with("age", 25i64),
            Row::new(3i64).with("name", "Alicia").with("city", "Lisbon").with("age", 44i64),
        ]
    }

    fn filters(pairs: &[(&str, &str)]) -> ColumnFilters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let rows = people();
        assert_eq!(filter_rows(&rows, "", &ColumnFilters::new()), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let rows = people();
        assert_eq!(filter_rows(&rows, "PARIS", &ColumnFilters::new()), vec![1]);
        assert_eq!(filter_rows(&rows, "ali", &ColumnFilters::new()), vec![0, 2]);
    }

    #[test]
    fn test_search_covers_numbers_and_ids() {
        let rows = people();
        assert_eq!(filter_rows(&rows, "44", &ColumnFilters::new()), vec![2]);
    }

    #[test]
    fn test_column_filters_are_conjunctive() {
        let rows = people();
        let active = filters(&[("name", "$regex:^ali"), ("age", "$gt:40")]);
        assert_eq!(filter_rows(&rows, "", &active), vec![2]);
    }

    #[test]
    fn test_empty_column_filter_is_inactive() {
        let rows = people();
        let active = filters(&[("name", ""), ("city", "")]);
        assert_eq!(filter_rows(&rows, "", &active), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_and_column_filter_combine() {
        let rows = people();
        let active = filters(&[("age", "[$gte:30 && $lte:50]")]);
        assert_eq!(filter_rows(&rows, "alic", &active), vec![0, 2]);
        assert_eq!(filter_rows(&rows, "madrid", &active), vec![0]);
    }

    #[test]
    fn test_apply_filters_sorts_after_filtering() {
        let rows = people();
        let sort = SortState::new("age", SortOrder::Descending);
        assert_eq!(
            apply_filters(&rows, "", &ColumnFilters::new(), &sort),
            vec![2, 0, 1]
        );
    }

    #[test]
    fn test_apply_filters_is_deterministic() {
        let rows = people();
        let active = filters(&[("city", "i")]);
        let sort = SortState::new("name", SortOrder::Ascending);
        let first = apply_filters(&rows, "a", &active, &sort);
        let second = apply_filters(&rows, "a", &active, &sort);
        assert_eq!(first, second);
    }
}
