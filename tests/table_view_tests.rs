// End-to-end behaviour of the table view through its public API

use bt_table::data::filter_engine::{apply_filters, ColumnFilters};
use bt_table::{
    ColumnDescriptor, ColumnType, DataValue, RecordingSink, RowId, SortOrder, SortState,
    TableEvent, TableView,
};
use serde_json::{json, Value};

fn people_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name")
            .sortable(true)
            .filterable(true),
        ColumnDescriptor::new("age", "Age")
            .with_type(ColumnType::Number)
            .sortable(true)
            .filterable(true),
        ColumnDescriptor::new("city", "City").filterable(true),
    ]
}

fn people() -> Value {
    json!([
        {"id": 1, "name": "Alice", "age": 31, "city": "Madrid"},
        {"id": 2, "name": "Bob", "age": 25, "city": "Paris"},
        {"id": 3, "name": "Alicia", "age": 44},
    ])
}

fn numbered_rows(count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| json!({"id": format!("r{i}"), "name": format!("Row {i}"), "age": i}))
            .collect(),
    )
}

fn names(view: &TableView) -> Vec<String> {
    view.paginated_rows()
        .iter()
        .map(|row| row.get("name").map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

fn recorded_view(columns: Vec<ColumnDescriptor>, rows: &Value) -> (TableView, RecordingSink) {
    let mut view = TableView::new(columns);
    let recorder = RecordingSink::new();
    view.subscribe(Box::new(recorder.clone()));
    view.set_rows_json(rows);
    (view, recorder)
}

#[test]
fn test_range_filter_keeps_middle_value() {
    let columns = vec![ColumnDescriptor::new("v", "V")
        .with_type(ColumnType::Number)
        .filterable(true)];
    let rows = json!([{"id": 1, "v": 3}, {"id": 2, "v": 7}, {"id": 3, "v": 12}]);
    let (mut view, _) = recorded_view(columns, &rows);

    view.set_column_filter("v", "[$gte:5 && $lte:10]");

    let filtered = view.all_filtered_rows();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].get("v"), Some(&DataValue::Integer(7)));
}

#[test]
fn test_regex_filter_on_names() {
    let (mut view, _) = recorded_view(people_columns(), &people());
    view.set_column_filter("name", "[$regex:^Ali]");
    assert_eq!(names(&view), vec!["Alice", "Alicia"]);

    view.set_column_filter("name", "[$nregex:^Ali]");
    assert_eq!(names(&view), vec!["Bob"]);
}

#[test]
fn test_filters_combine_across_columns() {
    let (mut view, _) = recorded_view(people_columns(), &people());
    view.set_column_filter("name", "ali");
    view.set_column_filter("age", "[$lt:40]");
    assert_eq!(names(&view), vec!["Alice"]);

    view.set_search_text("madrid");
    assert_eq!(names(&view), vec!["Alice"]);
    view.set_search_text("paris");
    assert!(view.paginated_rows().is_empty());
}

#[test]
fn test_missing_keys_filter_as_null() {
    let (mut view, _) = recorded_view(people_columns(), &people());
    // Alicia has no city; Null never matches a substring filter
    view.set_column_filter("city", "i");
    assert_eq!(names(&view), vec!["Alice", "Bob"]);
}

#[test]
fn test_apply_filters_is_pure() {
    let (view, _) = recorded_view(people_columns(), &people());
    let mut filters = ColumnFilters::new();
    filters.insert("age".to_string(), "[$gt:26]".to_string());
    let sort = SortState::new("age", SortOrder::Descending);

    let first = apply_filters(view.rows(), "ali", &filters, &sort);
    let second = apply_filters(view.rows(), "ali", &filters, &sort);
    assert_eq!(first, second);
    assert_eq!(first, vec![2, 0]);
    assert_eq!(view.rows().len(), 3);
}

#[test]
fn test_reset_view_twice_equals_once() {
    let (mut view, _) = recorded_view(people_columns(), &numbered_rows(12));
    view.set_search_text("row 1");
    view.toggle_sort("age");
    view.toggle_row_selection(&RowId::from("r1"));

    view.reset_view();
    let once = (
        names(&view),
        view.search_text().to_string(),
        view.column_filters().clone(),
        view.sort_state().clone(),
        view.current_page(),
        view.all_selected_rows(),
    );

    view.reset_view();
    let twice = (
        names(&view),
        view.search_text().to_string(),
        view.column_filters().clone(),
        view.sort_state().clone(),
        view.current_page(),
        view.all_selected_rows(),
    );

    assert_eq!(once, twice);
    assert_eq!(once.0.len(), 5);
}

#[test]
fn test_sort_tri_state_and_column_switch() {
    let (mut view, recorder) = recorded_view(people_columns(), &people());

    view.toggle_sort("name");
    assert_eq!(names(&view), vec!["Alice", "Alicia", "Bob"]);
    view.toggle_sort("name");
    assert_eq!(names(&view), vec!["Bob", "Alicia", "Alice"]);

    // Switching columns starts the new one ascending
    view.toggle_sort("age");
    assert_eq!(view.sort_state(), &SortState::new("age", SortOrder::Ascending));
    assert_eq!(view.sort_state().order_for("name"), SortOrder::None);
    assert_eq!(names(&view), vec!["Bob", "Alice", "Alicia"]);

    view.toggle_sort("age");
    view.toggle_sort("age");
    assert!(!view.sort_state().is_active());
    assert_eq!(names(&view), vec!["Alice", "Bob", "Alicia"]);

    let directions: Vec<SortOrder> = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            TableEvent::Sort { direction, .. } => Some(direction),
            _ => None,
        })
        .collect();
    assert_eq!(
        directions,
        vec![
            SortOrder::Ascending,
            SortOrder::Descending,
            SortOrder::Ascending,
            SortOrder::Descending,
            SortOrder::None,
        ]
    );
}

#[test]
fn test_search_spans_adjacent_fields() {
    let columns = vec![
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("city", "City"),
    ];
    let rows = json!([
        {"id": 1, "name": "Alice", "city": "Madrid"},
        {"id": 2, "name": "Bob", "city": "Alicante"},
    ]);
    let (mut view, _) = recorded_view(columns, &rows);

    view.set_search_text("alice madrid");
    let filtered = view.all_filtered_rows();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id(), &RowId::from(1i64));
}

#[test]
fn test_float_ids_are_accepted() {
    let columns = vec![ColumnDescriptor::new("v", "V").with_type(ColumnType::Number)];
    let rows = json!([{"id": 1.5, "v": 1}, {"id": 2.0, "v": 2}]);
    let (mut view, _) = recorded_view(columns, &rows);

    assert!(view.last_error().is_none());
    assert_eq!(view.rows().len(), 2);
    assert_eq!(view.rows()[0].id(), &RowId::Float(1.5));
    // Integral floats fold into integer ids
    assert_eq!(view.rows()[1].id(), &RowId::from(2i64));

    view.toggle_row_selection(&RowId::Float(1.5));
    let selected = view.all_selected_rows();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].get("v"), Some(&DataValue::Integer(1)));
}

#[test]
fn test_selection_persists_across_filtering() {
    let (mut view, _) = recorded_view(people_columns(), &people());
    let bob = RowId::from(2i64);
    view.toggle_row_selection(&bob);

    view.set_column_filter("name", "ali");
    assert!(view.visible_row_ids().iter().all(|id| id != &bob));
    assert!(view.is_selected(&bob));

    view.clear_column_filter("name");
    assert!(view.is_selected(&bob));
    let selected = view.all_selected_rows();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id(), &bob);
}

#[test]
fn test_twelve_rows_five_per_page() {
    let (mut view, _) = recorded_view(people_columns(), &numbered_rows(12));
    assert_eq!(view.total_pages(), 3);

    view.go_to_page(3);
    assert_eq!(names(&view), vec!["Row 11", "Row 12"]);
    assert_eq!(view.page_buttons(), vec![1, 2, 3]);
}

#[test]
fn test_page_buttons_window() {
    let (mut view, _) = recorded_view(people_columns(), &numbered_rows(25));
    assert_eq!(view.total_pages(), 5);

    assert_eq!(view.page_buttons(), vec![1, 2, 3]);
    view.go_to_page(3);
    assert_eq!(view.page_buttons(), vec![2, 3, 4]);
    view.go_to_page(5);
    assert_eq!(view.page_buttons(), vec![3, 4, 5]);
}

#[test]
fn test_select_all_is_per_page() {
    let (mut view, _) = recorded_view(people_columns(), &numbered_rows(12));

    view.toggle_select_all_visible();
    let page_one = view.visible_row_ids();

    view.go_to_page(2);
    let page_two = view.visible_row_ids();
    assert!(!view.is_all_visible_selected());
    assert!(page_two.iter().all(|id| !view.is_selected(id)));
    assert!(page_one.iter().all(|id| view.is_selected(id)));
    assert_eq!(view.all_selected_rows().len(), 5);
}

#[test]
fn test_non_array_rows_leave_caller_value_untouched() {
    let raw = json!({"id": 1, "name": "not a list"});
    let before = raw.clone();
    let (view, recorder) = recorded_view(people_columns(), &raw);

    assert_eq!(raw, before);
    assert!(view.paginated_rows().is_empty());
    assert!(view.all_filtered_rows().is_empty());
    assert!(view.last_error().is_some());
    assert!(matches!(
        recorder.last(),
        Some(TableEvent::ValidationError { .. })
    ));
}

#[test]
fn test_missing_keys_are_filled_on_copy_only() {
    let raw = people();
    let before = raw.clone();
    let (view, _) = recorded_view(people_columns(), &raw);

    assert_eq!(raw, before);
    let alicia = view
        .rows()
        .iter()
        .find(|row| row.id() == &RowId::from(3i64))
        .map(|row| row.get("city").cloned());
    assert_eq!(alicia, Some(Some(DataValue::Null)));
}

#[test]
fn test_rows_without_ids_are_rejected() {
    for rows in [
        json!([{"name": "no id"}]),
        json!([{"id": "", "name": "empty"}]),
        json!([{"id": 1}, {"id": 1}]),
        json!([1, 2, 3]),
    ] {
        let (view, _) = recorded_view(people_columns(), &rows);
        assert!(view.rows().is_empty(), "accepted {rows}");
        assert!(view.last_error().is_some());
    }
}

#[test]
fn test_async_total_rows_drive_paging() {
    let mut view = TableView::new(people_columns());
    view.set_async(true);
    view.set_total_rows(Some(100));
    view.set_rows_json(&numbered_rows(5));

    assert_eq!(view.total_row_count(), 100);
    assert_eq!(view.total_pages(), 20);
    assert_eq!(view.paginated_rows().len(), 5);

    view.set_search_text("row 3");
    assert_eq!(view.all_filtered_rows().len(), 5);
    assert_eq!(view.apply_async_search(), Some(1));
}

#[test]
fn test_events_serialize_for_the_host() {
    let (mut view, recorder) = recorded_view(people_columns(), &people());
    view.set_page_size(2);
    view.go_to_page(2);

    let wire: Vec<Value> = recorder
        .events()
        .iter()
        .map(|event| serde_json::to_value(event).unwrap())
        .collect();
    assert_eq!(
        wire,
        vec![
            json!({"event": "page-size", "pageSize": 2}),
            json!({"event": "pagination", "page": 2, "pageSize": 2}),
        ]
    );
}
