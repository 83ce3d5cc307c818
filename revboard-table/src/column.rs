//! Column descriptors: how a table reads, labels, and renders one column.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{CellError, extract_panic_message};
use crate::sort::SortDirection;
use crate::value::{CellValue, ValueKind};

/// Reads a cell value out of a row.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Result<CellValue, String> + Send + Sync>;

/// Turns a row and its cell value into display text.
pub type CellRenderer<T> = Arc<dyn Fn(&T, &CellValue) -> String + Send + Sync>;

/// Turns a column label and its current sort direction into header text.
pub type HeaderRenderer = Arc<dyn Fn(&str, Option<SortDirection>) -> String + Send + Sync>;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Column configuration.
///
/// A descriptor names the column, says how to read its value from a row,
/// and declares what the table may do with it (sort, hide).
///
/// # Examples
///
/// ```
/// use revboard_table::{Alignment, CellValue, ColumnDescriptor, ValueKind};
///
/// struct Sale {
///     channel: String,
///     quantity: i64,
/// }
///
/// let columns = vec![
///     ColumnDescriptor::new("channel", "Channel", |s: &Sale| s.channel.as_str().into()),
///     ColumnDescriptor::new("quantity", "Qty", |s: &Sale| CellValue::from(s.quantity))
///         .kind(ValueKind::Number)
///         .sortable()
///         .align(Alignment::Right),
/// ];
/// assert!(columns[1].is_sortable());
/// ```
pub struct ColumnDescriptor<T> {
    id: String,
    label: String,
    accessor: Accessor<T>,
    kind: ValueKind,
    sortable: bool,
    hideable: bool,
    width: Option<u16>,
    align: Alignment,
    cell: Option<CellRenderer<T>>,
    header: Option<HeaderRenderer>,
}

impl<T> ColumnDescriptor<T> {
    /// Create a column with an infallible accessor.
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self::try_new(id, label, move |row: &T| Ok(accessor(row)))
    }

    /// Create a column whose accessor can fail for individual rows.
    ///
    /// A failing row renders a placeholder in this column; the rest of the
    /// table is unaffected.
    pub fn try_new<F>(id: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Result<CellValue, String> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            accessor: Arc::new(accessor),
            kind: ValueKind::Any,
            sortable: false,
            hideable: true,
            width: None,
            align: Alignment::Left,
            cell: None,
            header: None,
        }
    }

    /// Declare the kind of value the accessor produces.
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Make the column sortable.
    ///
    /// The column must also declare a sortable [`ValueKind`], otherwise
    /// building the table fails.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Prevent the column from being hidden.
    pub fn fixed(mut self) -> Self {
        self.hideable = false;
        self
    }

    /// Set a preferred width hint.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Render cells with a custom function instead of [`CellValue::display`].
    pub fn cell<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&T, &CellValue) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(renderer));
        self
    }

    /// Render the header with a custom function instead of the plain label.
    pub fn header<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&str, Option<SortDirection>) -> String + Send + Sync + 'static,
    {
        self.header = Some(Arc::new(renderer));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    pub fn width_hint(&self) -> Option<u16> {
        self.width
    }

    pub fn alignment(&self) -> Alignment {
        self.align
    }

    /// Read this column's value from a row.
    ///
    /// Panics and errors raised by the accessor, and values that do not fit
    /// the declared kind, come back as a [`CellError`].
    pub fn read(&self, row: &T) -> Result<CellValue, CellError> {
        let value = match panic::catch_unwind(AssertUnwindSafe(|| (self.accessor)(row))) {
            Ok(Ok(value)) => value,
            Ok(Err(message)) => {
                return Err(CellError::Accessor {
                    column: self.id.clone(),
                    message,
                });
            }
            Err(payload) => {
                return Err(CellError::Panicked {
                    column: self.id.clone(),
                    message: extract_panic_message(payload.as_ref()),
                });
            }
        };

        if !value.fits(self.kind) {
            return Err(CellError::KindMismatch {
                column: self.id.clone(),
                expected: self.kind,
                actual: value.type_name(),
            });
        }
        Ok(value)
    }

    /// Render a cell's display text.
    pub fn render_cell(&self, row: &T, value: &CellValue) -> Result<String, CellError> {
        let Some(renderer) = &self.cell else {
            return Ok(value.display());
        };
        panic::catch_unwind(AssertUnwindSafe(|| renderer(row, value))).map_err(|payload| {
            CellError::Renderer {
                column: self.id.clone(),
                message: extract_panic_message(payload.as_ref()),
            }
        })
    }

    /// Render the header text. A panicking header renderer falls back to the label.
    pub fn render_header(&self, sort: Option<SortDirection>) -> String {
        let Some(renderer) = &self.header else {
            return self.label.clone();
        };
        match panic::catch_unwind(AssertUnwindSafe(|| renderer(&self.label, sort))) {
            Ok(text) => text,
            Err(payload) => {
                log::warn!(
                    "Header renderer for column '{}' panicked: {}",
                    self.id,
                    extract_panic_message(payload.as_ref())
                );
                self.label.clone()
            }
        }
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            accessor: Arc::clone(&self.accessor),
            kind: self.kind,
            sortable: self.sortable,
            hideable: self.hideable,
            width: self.width,
            align: self.align,
            cell: self.cell.clone(),
            header: self.header.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("custom_cell", &self.cell.is_some())
            .field("custom_header", &self.header.is_some())
            .finish()
    }
}
