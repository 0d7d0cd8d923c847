//! Configuration module
//!
//! Table defaults (page size, selector choices, async mode) and the label
//! bundle used by the table chrome, loadable from a TOML file.

pub mod config;

pub use config::{BehaviorConfig, LabelConfig, PaginationConfig, TableConfig};
