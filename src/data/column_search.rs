//! Builder for per-column filter expressions.
//!
//! Mirrors the column search control rendered in a filterable header: the
//! user picks a filter kind, types a value (or a min/max pair for ranges) and
//! the control produces the expression string the filter engine consumes.

use crate::data::datatable::ColumnType;
use crate::data::filter_expr::FilterOp;

/// What kind of input the column search offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInput {
    Text,
    Number,
    /// Fixed list of options; the chosen value is matched exactly
    Select,
}

impl From<ColumnType> for SearchInput {
    fn from(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Number => SearchInput::Number,
            ColumnType::String | ColumnType::Complex => SearchInput::Text,
        }
    }
}

/// Filter kind picked in the dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Range,
    Operator(FilterOp),
    StartsWith,
    EndsWith,
}

impl FilterKind {
    /// Kinds offered for an input type, in menu order
    pub fn available_for(input: SearchInput) -> Vec<FilterKind> {
        match input {
            SearchInput::Text => vec![
                FilterKind::Operator(FilterOp::Regex),
                FilterKind::Operator(FilterOp::NotRegex),
                FilterKind::StartsWith,
                FilterKind::EndsWith,
            ],
            SearchInput::Number => vec![
                FilterKind::Range,
                FilterKind::Operator(FilterOp::Eq),
                FilterKind::Operator(FilterOp::Ne),
                FilterKind::Operator(FilterOp::Gt),
                FilterKind::Operator(FilterOp::Lt),
                FilterKind::Operator(FilterOp::Gte),
                FilterKind::Operator(FilterOp::Lte),
            ],
            SearchInput::Select => Vec::new(),
        }
    }
}

/// State of one column's search control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSearch {
    input: SearchInput,
    kind: Option<FilterKind>,
    value: String,
    range_min: String,
    range_max: String,
}

impl ColumnSearch {
    pub fn new(input: SearchInput) -> Self {
        Self {
            input,
            kind: None,
            value: String::new(),
            range_min: String::new(),
            range_max: String::new(),
        }
    }

    pub fn for_column(column_type: ColumnType) -> Self {
        Self::new(column_type.into())
    }

    pub fn input(&self) -> SearchInput {
        self.input
    }

    pub fn kind(&self) -> Option<FilterKind> {
        self.kind
    }

    /// Choose a filter kind. Ranges only apply to number inputs; picking one
    /// elsewhere clears the kind.
    pub fn set_kind(&mut self, kind: Option<FilterKind>) -> String {
        self.kind = match kind {
            Some(FilterKind::Range) if self.input != SearchInput::Number => None,
            other => other,
        };
        self.expression()
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> String {
        self.value = value.into();
        self.expression()
    }

    pub fn set_range(&mut self, min: impl Into<String>, max: impl Into<String>) -> String {
        self.range_min = min.into();
        self.range_max = max.into();
        self.expression()
    }

    pub fn clear(&mut self) -> String {
        self.kind = None;
        self.value.clear();
        self.range_min.clear();
        self.range_max.clear();
        self.expression()
    }

    /// Expression for the current state. Empty means no filter.
    pub fn expression(&self) -> String {
        match self.kind {
            Some(FilterKind::Range) => {
                let min = self.range_min.trim();
                let max = self.range_max.trim();
                if min.is_empty() && max.is_empty() {
                    return String::new();
                }
                let lower = if min.is_empty() {
                    String::new()
                } else {
                    format!("{}:{}", FilterOp::Gt, min)
                };
                let upper = if max.is_empty() {
                    String::new()
                } else {
                    format!("{}:{}", FilterOp::Lt, max)
                };
                format!("[{} && {}]", lower, upper)
            }
            _ if self.value.is_empty() => String::new(),
            Some(FilterKind::Operator(op)) => format!("[{}:{}]", op, self.value),
            Some(FilterKind::StartsWith) => format!("[startsWith:{}]", self.value),
            Some(FilterKind::EndsWith) => format!("[endsWith:{}]", self.value),
            None if self.input == SearchInput::Select => {
                format!("[{}:{}]", FilterOp::Eq, self.value)
            }
            None => self.value.clone(),
        }
    }
}
