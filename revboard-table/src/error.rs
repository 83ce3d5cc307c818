//! Error types
//!
//! Configuration mistakes surface as [`TableError`] when an engine is built.
//! Faults inside a single row's accessor or renderer become [`CellError`]s
//! that stay attached to that cell and never escape a render.

use std::any::Any;

use crate::value::ValueKind;

/// Error returned when a table is configured incorrectly.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A column descriptor has an empty id.
    #[error("Column at position {index} has an empty id")]
    EmptyColumnId { index: usize },

    /// Two column descriptors share an id.
    #[error("Duplicate column id '{id}'")]
    DuplicateColumnId { id: String },

    /// A sortable column does not declare a comparable value kind.
    #[error("Column '{id}' is sortable but its values ({kind}) have no total order")]
    UnsortableColumn { id: String, kind: ValueKind },

    /// Settings refer to a column that does not exist.
    #[error("Unknown column '{id}' referenced in {context}")]
    UnknownColumn { id: String, context: &'static str },

    /// Settings ask to sort by a column that is not sortable.
    #[error("Column '{id}' is not sortable")]
    NotSortable { id: String },

    /// Settings ask to hide a column that cannot be hidden.
    #[error("Column '{id}' cannot be hidden")]
    NotHideable { id: String },

    /// Page sizes must be greater than zero.
    #[error("Invalid page size {size}: must be greater than zero")]
    InvalidPageSize { size: usize },

    /// The page size options list is empty or contains zero.
    #[error("Invalid page size options {options:?}")]
    InvalidPageSizeOptions { options: Vec<usize> },

    /// Only part of the external pagination trio was supplied.
    #[error("Server pagination needs page, total_pages and on_page_change; missing {missing}")]
    IncompletePagination { missing: String },

    /// Settings could not be parsed.
    #[error("Invalid table settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl TableError {
    /// Creates a new unknown column error.
    pub fn unknown_column(id: impl Into<String>, context: &'static str) -> Self {
        Self::UnknownColumn {
            id: id.into(),
            context,
        }
    }
}

/// A fault isolated to a single cell.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CellError {
    /// The accessor panicked.
    #[error("accessor for '{column}' panicked: {message}")]
    Panicked { column: String, message: String },

    /// The accessor reported a failure.
    #[error("accessor for '{column}' failed: {message}")]
    Accessor { column: String, message: String },

    /// The accessor returned a value of the wrong kind.
    #[error("column '{column}' expects {expected} values, got {actual}")]
    KindMismatch {
        column: String,
        expected: ValueKind,
        actual: &'static str,
    },

    /// The cell renderer panicked.
    #[error("renderer for '{column}' panicked: {message}")]
    Renderer { column: String, message: String },
}

impl CellError {
    /// The column this fault belongs to.
    pub fn column(&self) -> &str {
        match self {
            CellError::Panicked { column, .. }
            | CellError::Accessor { column, .. }
            | CellError::KindMismatch { column, .. }
            | CellError::Renderer { column, .. } => column,
        }
    }
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. This function
/// attempts to extract either, falling back to a generic message.
pub fn extract_panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
