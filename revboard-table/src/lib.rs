//! Revboard table engine
//!
//! A generic tabular data engine for report views: column visibility,
//! sorting, filtering, row selection, client or server pagination, and
//! loading/empty states over an arbitrary row type.

pub mod column;
pub mod error;
pub mod event;
pub mod filter;
pub mod options;
pub mod pagination;
pub mod pipeline;
pub mod selection;
pub mod sort;
pub mod state;
pub mod value;

mod table;

pub use column::{Alignment, ColumnDescriptor};
pub use error::{CellError, TableError};
pub use event::EventResult;
pub use filter::ColumnFilter;
pub use options::{RowIdentity, TableOptions, TableSettings};
pub use pagination::{PageChangeCallback, PageWindow, PaginationKind, PaginationMode};
pub use selection::{Selection, SelectionChange};
pub use sort::{SortDirection, SortKey, SortSpec};
pub use state::TableState;
pub use table::*;
pub use value::{CellValue, ValueKind};

/// Common imports for building tables.
pub mod prelude {
    pub use crate::{
        Alignment, Body, CellContent, CellValue, ColumnDescriptor, ColumnFilter, EventResult,
        PaginationMode, SortDirection, SortSpec, TableEngine, TableOptions, TableSettings,
        TableView, ValueKind,
    };
}
