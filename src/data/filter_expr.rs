//! Per-column filter expressions.
//!
//! Grammar (one string per column):
//!
//! ```text
//! filter    := bare | "[" expr ( "&&" expr )* "]"
//! expr      := "$" op ":" value | "startsWith:" value | "endsWith:" value | bare
//! op        := eq | ne | lt | lte | gt | gte | regex | nregex
//! ```
//!
//! A bare string is a substring test. Malformed pieces never error: an
//! unparseable numeric operand or an invalid regex simply matches nothing.

use crate::data::datatable::DataValue;
use regex::{Regex, RegexBuilder};
use std::fmt;
use tracing::debug;

/// Comparison operators of the `$op:value` form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Regex,
    NotRegex,
}

impl FilterOp {
    /// Parse an operator name without the leading `$` (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "eq" => Some(FilterOp::Eq),
            "ne" => Some(FilterOp::Ne),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "regex" => Some(FilterOp::Regex),
            "nregex" => Some(FilterOp::NotRegex),
            _ => None,
        }
    }

    /// Wire form including the `$`
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::Ne => "$ne",
            FilterOp::Lt => "$lt",
            FilterOp::Lte => "$lte",
            FilterOp::Gt => "$gt",
            FilterOp::Gte => "$gte",
            FilterOp::Regex => "$regex",
            FilterOp::NotRegex => "$nregex",
        }
    }

    fn compare_numbers(&self, cell: f64, operand: f64) -> bool {
        match self {
            FilterOp::Eq => cell == operand,
            FilterOp::Ne => cell != operand,
            FilterOp::Lt => cell < operand,
            FilterOp::Lte => cell <= operand,
            FilterOp::Gt => cell > operand,
            FilterOp::Gte => cell >= operand,
            FilterOp::Regex | FilterOp::NotRegex => false,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One predicate of a filter expression
#[derive(Debug, Clone)]
pub enum Condition {
    /// `$eq`/`$ne`/`$lt`/`$lte`/`$gt`/`$gte`
    Compare { op: FilterOp, operand: String },
    /// `$regex`, `$nregex`, `startsWith`, `endsWith`. `None` when the pattern
    /// failed to compile, which matches nothing.
    Pattern { negated: bool, regex: Option<Regex> },
    /// Fallback substring test
    Contains(String),
}

impl Condition {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim_start();

        if let Some(rest) = trimmed.strip_prefix('$') {
            if let Some((name, value)) = rest.split_once(':') {
                if let Some(op) = FilterOp::from_name(name) {
                    if !value.is_empty() {
                        return Self::operator(op, value.trim());
                    }
                }
            }
        }

        if let Some(value) = strip_prefix_ignore_case(trimmed, "startsWith:") {
            return Self::pattern(&format!("^{}", regex::escape(value.trim())), false);
        }
        if let Some(value) = strip_prefix_ignore_case(trimmed, "endsWith:") {
            return Self::pattern(&format!("{}$", regex::escape(value.trim())), false);
        }

        Condition::Contains(text.to_string())
    }

    fn operator(op: FilterOp, value: &str) -> Self {
        match op {
            FilterOp::Regex => Self::pattern(value, false),
            FilterOp::NotRegex => Self::pattern(value, true),
            _ => Condition::Compare {
                op,
                operand: value.to_string(),
            },
        }
    }

    fn pattern(pattern: &str, negated: bool) -> Self {
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                debug!(target: "filter", "Invalid filter pattern '{}': {}", pattern, e);
                None
            }
        };
        Condition::Pattern { negated, regex }
    }

    /// Test a single cell value
    pub fn matches(&self, value: &DataValue) -> bool {
        match self {
            Condition::Compare { op, operand } => match value {
                DataValue::Integer(_) | DataValue::Float(_) => {
                    let Ok(operand) = operand.trim().parse::<f64>() else {
                        return false;
                    };
                    value
                        .as_f64()
                        .is_some_and(|cell| op.compare_numbers(cell, operand))
                }
                DataValue::String(s) => match op {
                    FilterOp::Eq => s.to_lowercase() == operand.to_lowercase(),
                    FilterOp::Ne => s.to_lowercase() != operand.to_lowercase(),
                    _ => false,
                },
                _ => false,
            },
            Condition::Pattern { negated, regex } => match (value, regex) {
                (DataValue::String(s), Some(regex)) => regex.is_match(s) != *negated,
                _ => false,
            },
            Condition::Contains(needle) => match value {
                DataValue::String(s) => s.to_lowercase().contains(&needle.to_lowercase()),
                DataValue::Integer(_) | DataValue::Float(_) => value.to_string().contains(needle),
                _ => false,
            },
        }
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// A parsed column filter: every condition must hold
#[derive(Debug, Clone)]
pub struct FilterExpr {
    conditions: Vec<Condition>,
}

impl FilterExpr {
    /// Parse a filter string. Returns `None` for an empty filter, which
    /// means "inactive" rather than "match nothing".
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        let conditions = match bracketed(text) {
            Some(inner) => inner.split("&&").map(|part| Condition::parse(part.trim())).collect(),
            None => vec![Condition::parse(text)],
        };

        Some(Self { conditions })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, value: &DataValue) -> bool {
        self.conditions.iter().all(|c| c.matches(value))
    }
}

/// Content between a leading `[` and trailing `]`, if non-empty
fn bracketed(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// Parse and evaluate in one step
pub fn evaluate_filter(value: &DataValue, filter: &str) -> bool {
    FilterExpr::parse(filter).map_or(true, |expr| expr.matches(value))
}
