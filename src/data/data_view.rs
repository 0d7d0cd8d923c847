use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::config::config::{LabelConfig, TableConfig};
use crate::data::datatable::{ColumnDescriptor, DataTable, DataValue, Row, RowId, ID_KEY};
use crate::data::filter_engine::{apply_filters, ColumnFilters};
use crate::data::pagination::{paginate, PageInfo, PageState};
use crate::data::row_validator::{normalize_rows, validate_json_rows, RowValidationError};
use crate::data::selection::SelectionSet;
use crate::data::sort::SortState;
use crate::state::dispatcher::{EventDispatcher, TableEventSink};
use crate::state::events::TableEvent;

/// A filtered, sorted, paginated view over a row collection.
///
/// The backing rows are never reordered; the view is a list of indices into
/// them that is re-derived whenever search text, a column filter, the sort or
/// the rows themselves change. Every state change that the host should know
/// about is reported through the [`EventDispatcher`].
#[derive(Debug)]
pub struct TableView {
    /// Column schema and the validated backing rows
    source: DataTable,

    /// Row actions offered by the host: action name -> label
    actions: BTreeMap<String, String>,

    /// Host performs search/filtering
    is_async: bool,

    /// Authoritative row count reported by the host in async mode
    total_rows: Option<usize>,

    config: TableConfig,

    /// Indices into `source.rows` in view order
    filtered: Vec<usize>,

    search_text: String,
    sort_state: SortState,
    column_filters: ColumnFilters,
    selection: SelectionSet,
    page: PageState,

    last_error: Option<RowValidationError>,
    dispatcher: EventDispatcher,
}

impl TableView {
    /// Create an empty view with default configuration
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self::with_config(columns, TableConfig::default())
    }

    pub fn with_config(columns: Vec<ColumnDescriptor>, config: TableConfig) -> Self {
        let column_filters = initial_filters(&columns);
        let page_size = config.pagination.page_size.max(1);

        Self {
            source: DataTable::new(columns),
            actions: BTreeMap::new(),
            is_async: config.behavior.is_async,
            total_rows: None,
            config,
            filtered: Vec::new(),
            search_text: String::new(),
            sort_state: SortState::none(),
            column_filters,
            selection: SelectionSet::new(),
            page: PageState::new(page_size),
            last_error: None,
            dispatcher: EventDispatcher::new(),
        }
    }

    pub fn with_actions<I, K, V>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.actions = actions
            .into_iter()
            .map(|(name, label)| (name.into(), label.into()))
            .collect();
        self
    }

    /// Add a subscriber for table events
    pub fn subscribe(&mut self, sink: Box<dyn TableEventSink>) {
        self.dispatcher.subscribe(sink);
    }

    pub fn subscribe_fn<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: FnMut(&TableEvent) + 'static,
    {
        self.dispatcher.subscribe_fn(name, callback);
    }

    pub fn set_async(&mut self, is_async: bool) {
        self.is_async = is_async;
        self.refresh_total();
    }

    /// Row count reported by the host. Only used in async mode.
    pub fn set_total_rows(&mut self, total_rows: Option<usize>) {
        self.total_rows = total_rows;
        self.refresh_total();
    }

    /// Replace the column schema. Existing rows are re-normalized against it
    /// and filters on columns that are still filterable are kept.
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor>) {
        let mut filters = initial_filters(&columns);
        for (key, expr) in filters.iter_mut() {
            if let Some(existing) = self.column_filters.get(key) {
                expr.clone_from(existing);
            }
        }
        self.column_filters = filters;

        let rows = std::mem::take(&mut self.source.rows);
        self.source.columns = columns;
        let validated = normalize_rows(rows, &self.source.columns);
        self.update_rows(validated);
    }

    /// Replace the row collection from raw JSON. `raw` is not modified.
    pub fn set_rows_json(&mut self, raw: &JsonValue) {
        let validated = validate_json_rows(raw, &self.source.columns);
        self.update_rows(validated);
    }

    /// Replace the row collection with typed rows
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        let validated = normalize_rows(rows, &self.source.columns);
        self.update_rows(validated);
    }

    fn update_rows(&mut self, validated: Result<Vec<Row>, RowValidationError>) {
        match validated {
            Ok(rows) => {
                self.source.rows = rows;
                self.last_error = None;
                self.recompute();
            }
            Err(err) => {
                warn!(target: "table_view", "Invalid rows, view emptied: {}", err);
                self.source.rows.clear();
                self.filtered.clear();
                self.page.current_page = 1;
                self.refresh_total();
                let message = err.to_string();
                self.last_error = Some(err);
                self.dispatcher
                    .dispatch(TableEvent::ValidationError { message });
            }
        }
    }

    /// Filter, sort and go back to the first page
    fn recompute(&mut self) {
        self.filtered = apply_filters(
            &self.source.rows,
            &self.search_text,
            &self.column_filters,
            &self.sort_state,
        );
        self.page.current_page = 1;
        self.refresh_total();

        debug!(
            target: "table_view",
            "Recomputed view: {}/{} rows, {} pages",
            self.filtered.len(),
            self.source.row_count(),
            self.page.total_pages()
        );
    }

    fn refresh_total(&mut self) {
        self.page.total_row_count = match (self.is_async, self.total_rows) {
            (true, Some(total)) => total,
            _ => self.filtered.len(),
        };
    }

    /// Update the global search text. In async mode the text is only stored
    /// and reported; the host is expected to supply matching rows.
    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_lowercase();
        if !self.is_async {
            self.recompute();
        }
        self.dispatcher.dispatch(TableEvent::Search {
            search_text: self.search_text.clone(),
        });
    }

    /// Click on a column header. Unknown and non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, key: &str) {
        if !self.source.get_column(key).is_some_and(|c| c.sortable) {
            debug!(target: "table_view", "Ignoring sort on '{}': not sortable", key);
            return;
        }

        self.sort_state = self.sort_state.toggled(key);
        self.recompute();
        self.dispatcher.dispatch(TableEvent::Sort {
            key: self.sort_state.key.clone(),
            direction: self.sort_state.order,
        });
    }

    /// Set one column's filter expression. An empty expression disables it.
    pub fn set_column_filter(&mut self, key: &str, expression: impl Into<String>) {
        self.column_filters.insert(key.to_string(), expression.into());
        self.recompute();
        self.dispatcher.dispatch(TableEvent::Filter {
            filters: self.column_filters.clone(),
        });
    }

    pub fn clear_column_filter(&mut self, key: &str) {
        self.set_column_filter(key, String::new());
    }

    /// Change rows per page. Goes back to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            warn!(target: "table_view", "Ignoring page size 0");
            return;
        }

        self.page.page_size = page_size;
        self.page.current_page = 1;
        self.dispatcher.dispatch(TableEvent::PageSize { page_size });
        self.recompute();
    }

    /// Navigate to `page`, clamped into the available pages. Nothing is
    /// reported when the page does not change.
    pub fn go_to_page(&mut self, page: usize) {
        let page = self.page.clamp_page(page);
        if page == self.page.current_page {
            debug!(target: "table_view", "Already on page {}", page);
            return;
        }
        self.page.current_page = page;
        self.dispatcher.dispatch(TableEvent::Pagination {
            page,
            page_size: self.page.page_size,
        });
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.current_page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        self.go_to_page(self.page.total_pages());
    }

    /// Flip selection of one row. Ids that are not in the backing rows are
    /// ignored.
    pub fn toggle_row_selection(&mut self, id: &RowId) {
        let Some(row) = self.source.find_row(id).cloned() else {
            warn!(target: "table_view", "Cannot select unknown row '{}'", id);
            return;
        };

        self.selection.toggle(id);
        self.dispatcher.dispatch(TableEvent::Selection {
            selected_row: Some(row),
            selected_rows: self.all_selected_rows(),
        });
    }

    /// Select every row on the current page, or deselect them all when they
    /// are already selected. Rows on other pages keep their state.
    pub fn toggle_select_all_visible(&mut self) {
        let visible = self.visible_row_ids();
        self.selection.toggle_all(&visible);
        self.dispatcher.dispatch(TableEvent::Selection {
            selected_row: None,
            selected_rows: self.all_selected_rows(),
        });
    }

    /// True when the view is non-empty and every row on the page is selected
    pub fn is_all_visible_selected(&self) -> bool {
        if self.filtered.is_empty() {
            return false;
        }
        self.selection.contains_all(&self.visible_row_ids())
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.contains(id)
    }

    /// Back to the unfiltered, unsorted first page with nothing selected
    pub fn reset_view(&mut self) {
        self.search_text.clear();
        self.column_filters = initial_filters(&self.source.columns);
        self.sort_state = SortState::none();
        self.selection.clear();
        self.filtered = (0..self.source.row_count()).collect();
        self.page.current_page = 1;
        self.refresh_total();
    }

    /// Write `text` into an editable cell. Returns false when the column is
    /// not editable or the row does not exist.
    pub fn edit_cell(&mut self, id: &RowId, key: &str, text: impl Into<String>) -> bool {
        if key == ID_KEY || !self.source.get_column(key).is_some_and(|c| c.editable) {
            warn!(target: "table_view", "Column '{}' is not editable", key);
            return false;
        }
        let Some(row) = self.source.find_row_mut(id) else {
            warn!(target: "table_view", "Cannot edit unknown row '{}'", id);
            return false;
        };

        row.set(key, DataValue::String(text.into()));
        let row = row.clone();
        self.dispatcher.dispatch(TableEvent::CellEdit {
            header: key.to_string(),
            row,
        });
        true
    }

    /// Report a row action chosen by the user. Returns false for unknown
    /// actions or rows.
    pub fn trigger_cell_action(&mut self, id: &RowId, action: &str) -> bool {
        if !self.actions.contains_key(action) {
            warn!(target: "table_view", "Unknown cell action '{}'", action);
            return false;
        }
        if self.source.find_row(id).is_none() {
            warn!(target: "table_view", "Cell action '{}' on unknown row '{}'", action, id);
            return false;
        }

        self.dispatcher.dispatch(TableEvent::CellAction {
            row_id: id.clone(),
            action: action.to_string(),
        });
        true
    }

    /// Run the local filter pass on demand. Only meaningful in async mode;
    /// returns the number of rows in the view, or `None` when not async.
    pub fn apply_async_search(&mut self) -> Option<usize> {
        if !self.is_async {
            warn!(
                target: "table_view",
                "apply_async_search can only be called when the table is async"
            );
            return None;
        }
        self.recompute();
        info!(target: "table_view", "Async search applied: {} rows", self.filtered.len());
        Some(self.filtered.len())
    }

    /// Selected rows that still exist, in backing order
    pub fn all_selected_rows(&self) -> Vec<Row> {
        self.selection.resolve(&self.source.rows)
    }

    /// Every row that passed search and filters, in view order
    pub fn all_filtered_rows(&self) -> Vec<Row> {
        self.filtered
            .iter()
            .filter_map(|&idx| self.source.rows.get(idx))
            .cloned()
            .collect()
    }

    /// Rows on the current page
    pub fn paginated_rows(&self) -> Vec<&Row> {
        paginate(&self.filtered, &self.page)
            .iter()
            .filter_map(|&idx| self.source.rows.get(idx))
            .collect()
    }

    pub fn visible_row_ids(&self) -> Vec<RowId> {
        self.paginated_rows()
            .into_iter()
            .map(|row| row.id().clone())
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages()
    }

    pub fn page_buttons(&self) -> Vec<usize> {
        self.page.page_buttons()
    }

    pub fn page_info(&self) -> PageInfo {
        self.page.page_info()
    }

    /// Footer text rendered with the configured labels
    pub fn page_info_text(&self) -> String {
        self.labels().format_page_info(&self.page_info())
    }

    pub fn labels(&self) -> &LabelConfig {
        &self.config.labels
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.config.pagination.page_size_options
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.source.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.source.rows
    }

    pub fn actions(&self) -> &BTreeMap<String, String> {
        &self.actions
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort_state
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn column_filters(&self) -> &ColumnFilters {
        &self.column_filters
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page.page_size
    }

    pub fn total_row_count(&self) -> usize {
        self.page.total_row_count
    }

    pub fn is_first_page(&self) -> bool {
        self.page.is_first_page()
    }

    pub fn is_last_page(&self) -> bool {
        self.page.is_last_page()
    }

    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub fn last_error(&self) -> Option<&RowValidationError> {
        self.last_error.as_ref()
    }

    pub fn event_history(&self) -> &[TableEvent] {
        self.dispatcher.get_event_history()
    }
}

/// An empty expression for every filterable column
fn initial_filters(columns: &[ColumnDescriptor]) -> ColumnFilters {
    columns
        .iter()
        .filter(|c| c.filterable)
        .map(|c| (c.key.clone(), String::new()))
        .collect()
}
