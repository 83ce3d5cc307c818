//! TableEngine state, construction and derivation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::column::ColumnDescriptor;
use crate::error::TableError;
use crate::event::EventResult;
use crate::filter::ColumnFilter;
use crate::options::{Callbacks, RowIdentity, TableOptions, TableSettings};
use crate::pagination::{PageWindow, PaginationKind, PaginationMode, clamp_page, paginate};
use crate::pipeline::{ValueGrid, filter_rows, sort_rows, visible_columns};
use crate::sort::{SortDirection, SortSpec};
use crate::state::TableState;

/// Output of the last derivation pass.
#[derive(Debug, Clone)]
pub(super) struct Derived {
    /// Visible column indices, in declaration order.
    pub visible: Vec<usize>,
    /// Row indices that passed filtering, in sorted order.
    pub rows: Vec<usize>,
    pub window: PageWindow,
}

impl Derived {
    fn empty() -> Self {
        Self {
            visible: Vec::new(),
            rows: Vec::new(),
            window: paginate(0, 0, 1),
        }
    }

    /// Row indices on the current page.
    pub fn page_rows(&self) -> &[usize] {
        &self.rows[self.window.range()]
    }
}

/// A table over rows of type `T`.
///
/// The engine owns the table state and recomputes the visible rows after
/// every transition: hidden columns are dropped, rows are filtered, sorted
/// and finally paginated. Callers read the result through accessors or
/// [`render`](TableEngine::render) and feed user input back through the
/// transition methods, each of which returns an [`EventResult`].
///
/// # Example
///
/// ```
/// use revboard_table::{CellValue, ColumnDescriptor, TableEngine, TableOptions, ValueKind};
///
/// #[derive(Clone)]
/// struct Row { id: &'static str, v: i64 }
///
/// let columns = vec![
///     ColumnDescriptor::new("v", "Value", |r: &Row| CellValue::from(r.v))
///         .kind(ValueKind::Number)
///         .sortable(),
/// ];
/// let rows = vec![Row { id: "a", v: 3 }, Row { id: "b", v: 1 }, Row { id: "c", v: 2 }];
/// let mut table = TableEngine::new(
///     TableOptions::new(columns, rows).with_row_identity(|r: &Row, _| r.id.to_string()),
/// )
/// .unwrap();
///
/// table.toggle_sort("v");
/// assert_eq!(table.page_keys(), vec!["b", "c", "a"]);
/// ```
pub struct TableEngine<T> {
    pub(super) columns: Vec<ColumnDescriptor<T>>,
    pub(super) rows: Vec<T>,
    pub(super) identity: RowIdentity<T>,
    pub(super) settings: TableSettings,
    pub(super) loading: bool,
    pub(super) pagination: PaginationMode,
    pub(super) callbacks: Callbacks<T>,
    pub(super) state: TableState,
    pub(super) grid: ValueGrid,
    pub(super) derived: Derived,
}

fn positional_identity<T>() -> RowIdentity<T> {
    Arc::new(|_: &T, index: usize| index.to_string())
}

/// Check descriptor ids and sort capabilities.
pub fn validate_columns<T>(columns: &[ColumnDescriptor<T>]) -> Result<(), TableError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        if column.id().is_empty() {
            return Err(TableError::EmptyColumnId { index });
        }
        if !seen.insert(column.id()) {
            return Err(TableError::DuplicateColumnId {
                id: column.id().to_string(),
            });
        }
        if column.is_sortable() && !column.value_kind().is_sortable() {
            return Err(TableError::UnsortableColumn {
                id: column.id().to_string(),
                kind: column.value_kind(),
            });
        }
    }
    Ok(())
}

fn validate_settings<T>(
    settings: &TableSettings,
    columns: &[ColumnDescriptor<T>],
) -> Result<(), TableError> {
    settings.validate()?;

    let find = |id: &str| columns.iter().find(|c| c.id() == id);
    for id in &settings.hidden_columns {
        let column = find(id).ok_or_else(|| TableError::unknown_column(id, "hidden_columns"))?;
        if !column.is_hideable() {
            return Err(TableError::NotHideable { id: id.clone() });
        }
    }
    for key in settings.initial_sort.keys() {
        let column =
            find(&key.column).ok_or_else(|| TableError::unknown_column(&key.column, "initial_sort"))?;
        if !column.is_sortable() {
            return Err(TableError::NotSortable {
                id: key.column.clone(),
            });
        }
    }
    Ok(())
}

impl<T> TableEngine<T> {
    /// Build an engine, validating the column set, settings and pagination.
    pub fn new(options: TableOptions<T>) -> Result<Self, TableError> {
        let TableOptions {
            columns,
            rows,
            row_identity,
            settings,
            loading,
            pagination,
            callbacks,
        } = options;

        validate_columns(&columns)?;
        validate_settings(&settings, &columns)?;

        let identity = row_identity.unwrap_or_else(positional_identity);
        let grid = ValueGrid::build(&rows, &columns, identity.as_ref());
        let state = TableState::new(&settings);

        let mut engine = Self {
            columns,
            rows,
            identity,
            settings,
            loading,
            pagination,
            callbacks,
            state,
            grid,
            derived: Derived::empty(),
        };
        engine.derive();

        log::debug!(
            "Created table: {} columns, {} rows, {:?} pagination",
            engine.columns.len(),
            engine.rows.len(),
            engine.pagination
        );
        Ok(engine)
    }

    // -------------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------------

    /// Recompute visible columns, filtered and sorted rows, and the page window.
    ///
    /// In client mode an out-of-range page index is clamped here, so every
    /// transition leaves `page_index < page_count`.
    pub(super) fn derive(&mut self) {
        let visible = visible_columns(&self.columns, &self.state.hidden_columns);

        let filter_text = if self.settings.enable_global_filter {
            self.state.filter_text.as_str()
        } else {
            ""
        };
        let column_filters: Vec<(usize, &ColumnFilter)> = self
            .state
            .column_filters
            .iter()
            .filter_map(|(id, filter)| self.column_index(id).map(|index| (index, filter)))
            .collect();
        let all: Vec<usize> = (0..self.grid.len()).collect();
        let filtered = filter_rows(&self.grid, &all, &visible, filter_text, &column_filters);

        let sort_keys: Vec<(usize, SortDirection)> = self
            .state
            .sort
            .keys()
            .iter()
            .filter_map(|key| {
                self.column_index(&key.column)
                    .filter(|&index| self.columns[index].is_sortable())
                    .map(|index| (index, key.direction))
            })
            .collect();
        let sorted = sort_rows(&self.grid, &filtered, &sort_keys);

        let window = match &self.pagination {
            PaginationMode::Client => {
                let window = paginate(sorted.len(), self.state.page_index, self.state.page_size);
                if window.page_index != self.state.page_index {
                    log::debug!(
                        "Page index {} out of range after update; clamped to {}",
                        self.state.page_index,
                        window.page_index
                    );
                    self.state.page_index = window.page_index;
                }
                window
            }
            PaginationMode::Server {
                page, total_pages, ..
            } => PageWindow {
                page_index: *page,
                page_count: *total_pages,
                start: 0,
                end: sorted.len(),
            },
        };

        log::trace!(
            "Derived view: {} visible columns, {}/{} rows, page {}/{}",
            visible.len(),
            sorted.len(),
            self.grid.len(),
            window.page_index + 1,
            window.page_count
        );
        self.derived = Derived {
            visible,
            rows: sorted,
            window,
        };
    }

    fn rebuild_grid(&mut self) {
        self.grid = ValueGrid::build(&self.rows, &self.columns, self.identity.as_ref());
    }

    pub(super) fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id() == id)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    /// The current Row Source snapshot.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Precomputed accessor values for the current snapshot.
    pub fn grid(&self) -> &ValueGrid {
        &self.grid
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pagination_kind(&self) -> PaginationKind {
        self.pagination.kind()
    }

    pub fn filter_text(&self) -> &str {
        &self.state.filter_text
    }

    pub fn sort(&self) -> &SortSpec {
        &self.state.sort
    }

    /// Ids of the visible columns, in declaration order.
    pub fn visible_column_ids(&self) -> Vec<&str> {
        self.derived
            .visible
            .iter()
            .map(|&index| self.columns[index].id())
            .collect()
    }

    pub fn is_column_visible(&self, id: &str) -> bool {
        self.column_index(id).is_some() && !self.state.is_hidden(id)
    }

    /// Current zero-based page. In server mode this is the caller's page.
    pub fn page_index(&self) -> usize {
        self.derived.window.page_index
    }

    /// Page count. In server mode this is the caller's total.
    pub fn page_count(&self) -> usize {
        self.derived.window.page_count
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.settings.page_size_options
    }

    /// Number of rows that passed filtering (across all pages in client mode).
    pub fn filtered_row_count(&self) -> usize {
        self.derived.rows.len()
    }

    /// All filtered rows in display order.
    pub fn filtered_rows(&self) -> Vec<&T> {
        self.derived.rows.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows on the current page, in display order.
    pub fn page_rows(&self) -> Vec<&T> {
        self.derived
            .page_rows()
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Identity keys of the rows on the current page, in display order.
    pub fn page_keys(&self) -> Vec<&str> {
        self.derived
            .page_rows()
            .iter()
            .map(|&i| self.grid.key(i))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Row Source updates
    // -------------------------------------------------------------------------

    /// Replace the row snapshot.
    ///
    /// Selection is kept (it is keyed by identity); the page index is
    /// clamped if the new snapshot has fewer pages.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        log::debug!("Row snapshot replaced: {} -> {} rows", self.rows.len(), rows.len());
        self.rows = rows;
        self.rebuild_grid();
        self.derive();
    }

    /// Replace the column set.
    ///
    /// Sort keys, hidden flags and column filters that refer to columns no
    /// longer present are dropped.
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor<T>>) -> Result<(), TableError> {
        validate_columns(&columns)?;

        let ids: HashSet<&str> = columns.iter().map(|c| c.id()).collect();
        self.state
            .sort
            .retain_columns(|id| columns.iter().any(|c| c.id() == id && c.is_sortable()));
        self.state
            .hidden_columns
            .retain(|id| columns.iter().any(|c| c.id() == id && c.is_hideable()));
        self.state
            .column_filters
            .retain(|id, _| ids.contains(id.as_str()));

        log::debug!("Column set replaced: {} columns", columns.len());
        self.columns = columns;
        self.rebuild_grid();
        self.derive();
        Ok(())
    }

    /// Set the loading flag. While loading, sorting and row clicks are ignored.
    pub fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            log::debug!("Loading: {}", loading);
            self.loading = loading;
        }
    }

    /// Return to the initial state from settings, keeping rows and columns.
    pub fn reset(&mut self) -> EventResult {
        let removed = self.state.selection.clear();
        self.state = TableState::new(&self.settings);
        self.derive();
        self.notify_selection(Vec::new(), removed);
        log::debug!("Table state reset");
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set the free-text filter.
    ///
    /// A change moves a client-paginated table back to the first page.
    pub fn set_global_filter_text(&mut self, text: impl Into<String>) -> EventResult {
        let text = text.into();
        if !self.settings.enable_global_filter {
            log::debug!("Global filter disabled; ignoring filter text");
            return EventResult::Ignored;
        }
        if text == self.state.filter_text {
            return EventResult::Ignored;
        }

        log::debug!("Filter text: {:?}", text);
        self.state.filter_text = text;
        self.reset_page_for_filter();
        self.derive();
        if let Some(callback) = self.callbacks.on_filter_change.as_mut() {
            callback(&self.state.filter_text);
        }
        EventResult::Consumed
    }

    /// Set (or replace) the filter predicate for one column.
    pub fn set_column_filter(&mut self, column: &str, filter: ColumnFilter) -> EventResult {
        if self.column_index(column).is_none() {
            log::warn!("Ignoring filter for unknown column '{}'", column);
            return EventResult::Ignored;
        }
        if self.state.column_filters.get(column) == Some(&filter) {
            return EventResult::Ignored;
        }

        log::debug!("Column filter on '{}': {:?}", column, filter);
        self.state.column_filters.insert(column.to_string(), filter);
        self.reset_page_for_filter();
        self.derive();
        EventResult::Consumed
    }

    pub fn clear_column_filter(&mut self, column: &str) -> EventResult {
        if self.state.column_filters.remove(column).is_none() {
            return EventResult::Ignored;
        }
        self.reset_page_for_filter();
        self.derive();
        EventResult::Consumed
    }

    /// Clear the text filter and every column filter.
    pub fn clear_filters(&mut self) -> EventResult {
        if !self.state.is_filtered() {
            return EventResult::Ignored;
        }
        let text_changed = !self.state.filter_text.is_empty();
        self.state.filter_text.clear();
        self.state.column_filters.clear();
        self.reset_page_for_filter();
        self.derive();
        if text_changed {
            if let Some(callback) = self.callbacks.on_filter_change.as_mut() {
                callback("");
            }
        }
        EventResult::Consumed
    }

    fn reset_page_for_filter(&mut self) {
        if matches!(self.pagination, PaginationMode::Client) {
            self.state.page_index = 0;
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Go to a page.
    ///
    /// The request is clamped into `[0, page_count - 1]`. In client mode the
    /// page changes locally; in server mode the clamped request is forwarded
    /// through `on_page_change` and the caller reports back with
    /// [`set_server_page`](Self::set_server_page).
    pub fn set_page_index(&mut self, page: usize) -> EventResult {
        if let PaginationMode::Server {
            page: current,
            total_pages,
            on_page_change,
        } = &mut self.pagination
        {
            let target = clamp_page(page, (*total_pages).max(1));
            if target != page {
                log::warn!("Requested page {} out of range; clamped to {}", page, target);
            }
            if target == *current {
                return EventResult::Ignored;
            }
            log::debug!("Requesting server page {}", target);
            on_page_change(target);
            return EventResult::Consumed;
        }

        let target = clamp_page(page, self.derived.window.page_count);
        if target != page {
            log::warn!("Requested page {} out of range; clamped to {}", page, target);
        }
        if target == self.state.page_index {
            return EventResult::Ignored;
        }
        self.state.page_index = target;
        self.derive();
        EventResult::Consumed
    }

    pub fn next_page(&mut self) -> EventResult {
        self.set_page_index(self.page_index().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> EventResult {
        self.set_page_index(self.page_index().saturating_sub(1))
    }

    pub fn first_page(&mut self) -> EventResult {
        self.set_page_index(0)
    }

    pub fn last_page(&mut self) -> EventResult {
        self.set_page_index(self.page_count().saturating_sub(1))
    }

    /// Change the page size.
    ///
    /// In client mode the size applies immediately and the page index is
    /// clamped. In server mode the size is only forwarded through
    /// `on_page_size_change`; the rendered rows stay as they are until the
    /// caller supplies a new page.
    pub fn set_page_size(&mut self, size: usize) -> EventResult {
        if size == 0 {
            log::warn!("Ignoring page size 0");
            return EventResult::Ignored;
        }

        if let PaginationMode::Server { .. } = self.pagination {
            log::debug!("Forwarding page size {} to caller", size);
            return match self.callbacks.on_page_size_change.as_mut() {
                Some(callback) => {
                    callback(size);
                    EventResult::Consumed
                }
                None => {
                    log::warn!("Server pagination has no page size callback; ignoring {}", size);
                    EventResult::Ignored
                }
            };
        }

        if size == self.state.page_size {
            return EventResult::Ignored;
        }
        self.state.page_size = size;
        self.derive();
        if let Some(callback) = self.callbacks.on_page_size_change.as_mut() {
            callback(size);
        }
        EventResult::Consumed
    }

    /// Record a page size without notifying the caller, e.g. once the server
    /// has accepted a forwarded size.
    pub fn apply_page_size(&mut self, size: usize) -> EventResult {
        if size == 0 || size == self.state.page_size {
            return EventResult::Ignored;
        }
        self.state.page_size = size;
        self.derive();
        EventResult::Consumed
    }

    /// Report the page the caller is now showing. Server mode only.
    pub fn set_server_page(&mut self, page: usize, total_pages: usize) -> EventResult {
        let PaginationMode::Server {
            page: current,
            total_pages: total,
            ..
        } = &mut self.pagination
        else {
            log::warn!("set_server_page called on a client-paginated table");
            return EventResult::Ignored;
        };
        if (*current, *total) == (page, total_pages) {
            return EventResult::Ignored;
        }
        *current = page;
        *total = total_pages;
        self.derive();
        EventResult::Consumed
    }
}
