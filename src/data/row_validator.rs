//! Ingestion checks for the row collection.
//!
//! Rows arrive either as raw JSON (what a host page hands over) or as typed
//! [`Row`]s. Both paths end in the same shape: every declared column key is
//! present on every row (missing ones become `Null`) and every row has a
//! usable, unique id. The caller's data is never modified; normalization
//! happens on the copy the engine keeps.

use crate::data::datatable::{ColumnDescriptor, DataValue, Row, RowId, ID_KEY};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Why a row collection was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowValidationError {
    #[error("rows is invalid or not set: expected an array")]
    NotAnArray,

    #[error("rows must be an array of objects (element {index} is not)")]
    NotAnObject { index: usize },

    #[error("all rows must have an id (row {index} has none)")]
    MissingId { index: usize },

    #[error("row {index} has an unusable id: ids must be non-empty strings or finite numbers")]
    InvalidId { index: usize },

    #[error("row id '{id}' appears more than once")]
    DuplicateId { id: RowId },
}

/// Validate a raw JSON row collection and convert it into typed rows.
pub fn validate_json_rows(
    raw: &JsonValue,
    columns: &[ColumnDescriptor],
) -> Result<Vec<Row>, RowValidationError> {
    let items = raw.as_array().ok_or(RowValidationError::NotAnArray)?;

    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        return Err(RowValidationError::NotAnObject { index });
    }

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        // Checked above
        let Some(obj) = item.as_object() else {
            return Err(RowValidationError::NotAnObject { index });
        };

        let id = match obj.get(ID_KEY) {
            None | Some(JsonValue::Null) => return Err(RowValidationError::MissingId { index }),
            Some(raw_id) => {
                RowId::from_json(raw_id).ok_or(RowValidationError::InvalidId { index })?
            }
        };

        let mut row = Row::new(id);
        for (key, value) in obj {
            row.set(key.as_str(), DataValue::from_json(value));
        }
        rows.push(row);
    }

    normalize_rows(rows, columns)
}

/// Check ids and fill missing column keys on already typed rows.
pub fn normalize_rows(
    mut rows: Vec<Row>,
    columns: &[ColumnDescriptor],
) -> Result<Vec<Row>, RowValidationError> {
    let mut seen = HashSet::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.id().is_empty() {
            return Err(RowValidationError::MissingId { index });
        }
        if !seen.insert(row.id()) {
            return Err(RowValidationError::DuplicateId {
                id: row.id().clone(),
            });
        }
    }

    let mut filled = 0usize;
    for row in &mut rows {
        let before = row.len();
        row.fill_missing(columns.iter().map(|c| c.key.as_str()));
        filled += row.len() - before;
    }

    debug!(
        target: "validator",
        "Validated {} rows against {} columns ({} missing cells filled)",
        rows.len(),
        columns.len(),
        filled
    );

    Ok(rows)
}
