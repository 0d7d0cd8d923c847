//! Headless engine behind an interactive data table: validates a row
//! collection, applies free-text search and per-column filter expressions,
//! sorts by one column, paginates, tracks selection and reports every state
//! change as a [`TableEvent`].

pub mod config;
pub mod data;
pub mod state;
pub mod utils;

pub use config::TableConfig;
pub use data::data_view::TableView;
pub use data::datatable::{ColumnDescriptor, ColumnType, DataValue, Row, RowId};
pub use data::row_validator::RowValidationError;
pub use data::sort::{SortOrder, SortState};
pub use state::dispatcher::{EventDispatcher, RecordingSink, TableEventSink};
pub use state::events::TableEvent;
