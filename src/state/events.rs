//! Notifications emitted to the host

use crate::data::datatable::{Row, RowId};
use crate::data::filter_engine::ColumnFilters;
use crate::data::sort::SortOrder;
use serde::Serialize;

/// Events a table reports after a state change.
///
/// Serialized with an `event` tag carrying the wire name (`search`,
/// `selection`, `page-size`, ...) next to the payload fields, which are
/// camelCase on the wire (`searchText`, `pageSize`, `rowId`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum TableEvent {
    /// Global search text changed
    Search { search_text: String },

    /// Selection changed. `selected_row` is set for single-row toggles and
    /// absent for select-all.
    Selection {
        selected_row: Option<Row>,
        selected_rows: Vec<Row>,
    },

    /// Rows per page changed
    PageSize { page_size: usize },

    /// Page navigation
    Pagination { page: usize, page_size: usize },

    /// Sort column/direction changed
    Sort {
        key: Option<String>,
        direction: SortOrder,
    },

    /// A column filter expression changed
    Filter { filters: ColumnFilters },

    /// A row action was chosen
    CellAction { row_id: RowId, action: String },

    /// An editable cell was changed
    CellEdit { header: String, row: Row },

    /// The row collection was rejected and the view emptied
    ValidationError { message: String },
}

impl TableEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::Search { .. } => "search",
            TableEvent::Selection { .. } => "selection",
            TableEvent::PageSize { .. } => "page-size",
            TableEvent::Pagination { .. } => "pagination",
            TableEvent::Sort { .. } => "sort",
            TableEvent::Filter { .. } => "filter",
            TableEvent::CellAction { .. } => "cell-action",
            TableEvent::CellEdit { .. } => "cell-edit",
            TableEvent::ValidationError { .. } => "validation-error",
        }
    }
}
