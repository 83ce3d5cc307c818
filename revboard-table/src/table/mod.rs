//! The table engine and its render output.

mod engine;
mod events;
mod render;

pub use engine::{TableEngine, validate_columns};
pub use render::{
    Body, BodyCell, BodyRow, CellContent, ColumnToggle, EmptyReason, FAULT_PLACEHOLDER, HeaderCell,
    PageSelection, PaginationFooter, TableView, Toolbar,
};
