//! Table views for the ARGO profile tables
//!
//! The query engine that turns a collection and a view state into a page of
//! rows, plus the table controller, column layouts and selection export built
//! on it.

pub mod export;
pub mod tables;

pub use export::{export_to_file, write_records, ExportError, ExportFormat};
pub use tables::columns::{measurement_columns, profile_columns, render_text_table, ColumnSpec};
pub use tables::{PageInfo, TableConfig, TablePage, TableView};
