//! Table configuration.
//!
//! [`TableSettings`] is the plain-data part (page sizes, feature flags,
//! initial sort and hidden columns) and can be loaded from JSON.
//! [`TableOptions`] adds the parts that cannot be serialized: columns, rows,
//! row identity, pagination mode, and callbacks.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::column::ColumnDescriptor;
use crate::error::TableError;
use crate::pagination::PaginationMode;
use crate::selection::SelectionChange;
use crate::sort::SortSpec;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default choices offered by the page-size picker.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Computes a stable key for a row from the row and its position in the snapshot.
pub type RowIdentity<T> = Arc<dyn Fn(&T, usize) -> String + Send + Sync>;

/// Serializable table settings.
///
/// # Example
///
/// ```
/// use revboard_table::TableSettings;
///
/// let settings = TableSettings::from_json_str(r#"{
///     "initial_page_size": 20,
///     "enable_row_selection": true,
///     "hidden_columns": ["discount_mode"]
/// }"#).unwrap();
/// assert_eq!(settings.initial_page_size, 20);
/// assert_eq!(settings.page_size_options, vec![10, 20, 50, 100]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Rows per page when the table is created.
    ///
    /// Default: 10
    pub initial_page_size: usize,

    /// Page sizes offered to the user.
    ///
    /// Default: 10, 20, 50, 100
    pub page_size_options: Vec<usize>,

    /// Whether rows can be selected.
    ///
    /// Default: false
    pub enable_row_selection: bool,

    /// Whether the free-text filter box is shown and applied.
    ///
    /// Default: true
    pub enable_global_filter: bool,

    /// Columns hidden when the table is created.
    pub hidden_columns: Vec<String>,

    /// Sort applied when the table is created.
    pub initial_sort: SortSpec,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            initial_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            enable_row_selection: false,
            enable_global_filter: true,
            hidden_columns: Vec::new(),
            initial_sort: SortSpec::new(),
        }
    }
}

impl TableSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.initial_page_size = size;
        self
    }

    /// Sets the page size choices.
    pub fn with_page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// Enables row selection.
    pub fn with_row_selection(mut self) -> Self {
        self.enable_row_selection = true;
        self
    }

    /// Disables the global text filter.
    pub fn without_global_filter(mut self) -> Self {
        self.enable_global_filter = false;
        self
    }

    /// Hides a column initially.
    pub fn with_hidden_column(mut self, id: impl Into<String>) -> Self {
        self.hidden_columns.push(id.into());
        self
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.initial_sort = sort;
        self
    }

    /// Check values that do not depend on the column set.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_page_size == 0 {
            return Err(TableError::InvalidPageSize {
                size: self.initial_page_size,
            });
        }
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err(TableError::InvalidPageSizeOptions {
                options: self.page_size_options.clone(),
            });
        }
        Ok(())
    }
}

/// Callbacks invoked synchronously by engine transitions.
pub struct Callbacks<T> {
    pub(crate) on_page_size_change: Option<Box<dyn FnMut(usize)>>,
    pub(crate) on_row_selection_change: Option<Box<dyn FnMut(&SelectionChange)>>,
    pub(crate) on_row_click: Option<Box<dyn FnMut(&T, &str)>>,
    pub(crate) on_filter_change: Option<Box<dyn FnMut(&str)>>,
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            on_page_size_change: None,
            on_row_selection_change: None,
            on_row_click: None,
            on_filter_change: None,
        }
    }
}

impl<T> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_page_size_change", &self.on_page_size_change.is_some())
            .field("on_row_selection_change", &self.on_row_selection_change.is_some())
            .field("on_row_click", &self.on_row_click.is_some())
            .field("on_filter_change", &self.on_filter_change.is_some())
            .finish()
    }
}

/// Everything needed to build a [`TableEngine`](crate::TableEngine).
///
/// # Example
///
/// ```
/// use revboard_table::{ColumnDescriptor, TableEngine, TableOptions};
///
/// let columns = vec![ColumnDescriptor::new("name", "Name", |s: &String| s.as_str().into())];
/// let options = TableOptions::new(columns, vec!["a".to_string(), "b".to_string()])
///     .with_row_identity(|s: &String, _| s.clone())
///     .with_page_size(20);
/// let engine = TableEngine::new(options).unwrap();
/// assert_eq!(engine.page_size(), 20);
/// ```
pub struct TableOptions<T> {
    pub(crate) columns: Vec<ColumnDescriptor<T>>,
    pub(crate) rows: Vec<T>,
    pub(crate) row_identity: Option<RowIdentity<T>>,
    pub(crate) settings: TableSettings,
    pub(crate) loading: bool,
    pub(crate) pagination: PaginationMode,
    pub(crate) callbacks: Callbacks<T>,
}

impl<T> TableOptions<T> {
    /// Options with default settings and client pagination.
    pub fn new(columns: Vec<ColumnDescriptor<T>>, rows: Vec<T>) -> Self {
        Self {
            columns,
            rows,
            row_identity: None,
            settings: TableSettings::default(),
            loading: false,
            pagination: PaginationMode::Client,
            callbacks: Callbacks::default(),
        }
    }

    /// Key rows by a stable identity instead of their position.
    pub fn with_row_identity<F>(mut self, identity: F) -> Self
    where
        F: Fn(&T, usize) -> String + Send + Sync + 'static,
    {
        self.row_identity = Some(Arc::new(identity));
        self
    }

    /// Replace all serializable settings.
    pub fn with_settings(mut self, settings: TableSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.settings.initial_page_size = size;
        self
    }

    pub fn with_page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.settings.page_size_options = options.into();
        self
    }

    pub fn with_row_selection(mut self, enabled: bool) -> Self {
        self.settings.enable_row_selection = enabled;
        self
    }

    pub fn with_global_filter(mut self, enabled: bool) -> Self {
        self.settings.enable_global_filter = enabled;
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Choose the pagination mode. Defaults to client pagination.
    pub fn with_pagination(mut self, mode: PaginationMode) -> Self {
        self.pagination = mode;
        self
    }

    pub fn on_page_size_change(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.callbacks.on_page_size_change = Some(Box::new(callback));
        self
    }

    pub fn on_row_selection_change(
        mut self,
        callback: impl FnMut(&SelectionChange) + 'static,
    ) -> Self {
        self.callbacks.on_row_selection_change = Some(Box::new(callback));
        self
    }

    pub fn on_row_click(mut self, callback: impl FnMut(&T, &str) + 'static) -> Self {
        self.callbacks.on_row_click = Some(Box::new(callback));
        self
    }

    /// Called with the new filter text whenever the global filter changes.
    pub fn on_filter_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.callbacks.on_filter_change = Some(Box::new(callback));
        self
    }
}
