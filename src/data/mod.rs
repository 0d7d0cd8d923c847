//! Data layer for the table view
//!
//! Typed rows and columns, the filter and sort engines, pagination and the
//! selection set, composed by [`data_view::TableView`].

// Core data modules
pub mod data_view;
pub mod datatable;
pub mod datavalue_compare;
pub mod row_validator;

// Filtering and ordering
pub mod column_search;
pub mod filter_engine;
pub mod filter_expr;
pub mod sort;

// Paging and selection
pub mod pagination;
pub mod selection;
