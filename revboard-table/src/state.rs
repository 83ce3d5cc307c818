//! Mutable table state.

use std::collections::{BTreeMap, HashSet};

use crate::filter::ColumnFilter;
use crate::options::TableSettings;
use crate::selection::Selection;
use crate::sort::SortSpec;

/// Everything the user can change about a table.
///
/// Owned by one engine, created from its settings, and discarded with it.
/// The engine is the only writer.
#[derive(Debug, Clone)]
pub struct TableState {
    pub sort: SortSpec,
    /// Hidden column ids; every other column is visible.
    pub hidden_columns: HashSet<String>,
    pub filter_text: String,
    pub column_filters: BTreeMap<String, ColumnFilter>,
    pub selection: Selection,
    pub page_index: usize,
    pub page_size: usize,
}

impl TableState {
    /// Initial state described by `settings`.
    pub fn new(settings: &TableSettings) -> Self {
        Self {
            sort: settings.initial_sort.clone(),
            hidden_columns: settings.hidden_columns.iter().cloned().collect(),
            filter_text: String::new(),
            column_filters: BTreeMap::new(),
            selection: Selection::new(),
            page_index: 0,
            page_size: settings.initial_page_size,
        }
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden_columns.contains(column)
    }

    /// Whether any filter (text or column) is active.
    pub fn is_filtered(&self) -> bool {
        !self.filter_text.is_empty() || !self.column_filters.is_empty()
    }
}
