//! Declarative render output.
//!
//! [`TableEngine::render`] turns the current state into a [`TableView`]:
//! plain data the presentation shell draws without keeping any state of
//! its own.

use crate::column::Alignment;
use crate::error::CellError;
use crate::pagination::PaginationKind;
use crate::sort::SortDirection;

use super::engine::TableEngine;

/// Text shown in place of a cell whose accessor or renderer failed.
pub const FAULT_PLACEHOLDER: &str = "#ERR";

/// Everything needed to draw one frame of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub toolbar: Toolbar,
    pub header: Vec<HeaderCell>,
    /// Tri-state of the "select all on page" control. `None` when row
    /// selection is disabled.
    pub page_selection: Option<PageSelection>,
    pub body: Body,
    pub footer: PaginationFooter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub column_id: String,
    /// Output of the column's header renderer, or its label.
    pub label: String,
    pub width: Option<u16>,
    pub align: Alignment,
    pub sort: Option<SortDirection>,
    /// Position in a multi-key sort, zero for the primary key.
    pub sort_priority: Option<usize>,
    /// Whether clicking the header sorts. False while loading.
    pub interactive: bool,
}

/// Selection state of the rows on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    None,
    Some,
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Placeholder rows shown while the caller is fetching data.
    Loading { skeleton_rows: usize },
    Empty(EmptyReason),
    Rows(Vec<BodyRow>),
}

/// Why there is nothing to show. Not an error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The row source supplied no rows.
    NoRows,
    /// Rows exist but none pass the current filters.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyRow {
    /// Row identity key, stable across renders.
    pub key: String,
    /// Position in the row snapshot.
    pub source_index: usize,
    pub selected: bool,
    pub cells: Vec<BodyCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyCell {
    pub column_id: String,
    pub align: Alignment,
    pub content: CellContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Fault {
        placeholder: &'static str,
        message: String,
    },
}

impl CellContent {
    fn fault(error: &CellError) -> Self {
        CellContent::Fault {
            placeholder: FAULT_PLACEHOLDER,
            message: error.to_string(),
        }
    }

    /// The text to draw.
    pub fn text(&self) -> &str {
        match self {
            CellContent::Text(text) => text,
            CellContent::Fault { placeholder, .. } => placeholder,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, CellContent::Fault { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toolbar {
    /// Whether the free-text filter box is shown.
    pub filter_enabled: bool,
    pub filter_text: String,
    pub columns: Vec<ColumnToggle>,
    pub selected_count: usize,
    pub loading: bool,
}

/// One entry of the column visibility menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub column_id: String,
    pub label: String,
    pub visible: bool,
    pub hideable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationFooter {
    pub mode: PaginationKind,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    /// Rows across all pages after filtering. Unknown in server mode.
    pub total_rows: Option<usize>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> TableEngine<T> {
    /// Build the view for the current state.
    ///
    /// Cell faults appear as [`CellContent::Fault`]; the rest of the table
    /// renders normally.
    pub fn render(&self) -> TableView {
        TableView {
            toolbar: self.render_toolbar(),
            header: self.render_header(),
            page_selection: self.page_selection(),
            body: self.render_body(),
            footer: self.render_footer(),
        }
    }

    fn render_toolbar(&self) -> Toolbar {
        Toolbar {
            filter_enabled: self.settings.enable_global_filter,
            filter_text: self.state.filter_text.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| ColumnToggle {
                    column_id: column.id().to_string(),
                    label: column.label().to_string(),
                    visible: !self.state.is_hidden(column.id()),
                    hideable: column.is_hideable(),
                })
                .collect(),
            selected_count: self.state.selection.len(),
            loading: self.loading,
        }
    }

    fn render_header(&self) -> Vec<HeaderCell> {
        self.derived
            .visible
            .iter()
            .map(|&index| {
                let column = &self.columns[index];
                let sort = self.state.sort.direction_of(column.id());
                HeaderCell {
                    column_id: column.id().to_string(),
                    label: column.render_header(sort),
                    width: column.width_hint(),
                    align: column.alignment(),
                    sort,
                    sort_priority: self.state.sort.priority_of(column.id()),
                    interactive: column.is_sortable() && !self.loading,
                }
            })
            .collect()
    }

    fn page_selection(&self) -> Option<PageSelection> {
        if !self.settings.enable_row_selection {
            return None;
        }
        let keys = self.page_keys();
        let selected = keys
            .iter()
            .filter(|key| self.state.selection.is_selected(key))
            .count();
        Some(match selected {
            0 => PageSelection::None,
            n if n == keys.len() => PageSelection::All,
            _ => PageSelection::Some,
        })
    }

    fn render_body(&self) -> Body {
        if self.loading {
            return Body::Loading {
                skeleton_rows: self.state.page_size,
            };
        }
        if self.rows.is_empty() {
            return Body::Empty(EmptyReason::NoRows);
        }
        let page = self.derived.page_rows();
        if page.is_empty() {
            return Body::Empty(EmptyReason::NoMatches);
        }

        Body::Rows(page.iter().map(|&index| self.render_row(index)).collect())
    }

    fn render_row(&self, index: usize) -> BodyRow {
        let row = &self.rows[index];
        let key = self.grid.key(index);
        let cells = self
            .derived
            .visible
            .iter()
            .map(|&column_index| {
                let column = &self.columns[column_index];
                let content = match &self.grid.cell(index, column_index).value {
                    Ok(value) => match column.render_cell(row, value) {
                        Ok(text) => CellContent::Text(text),
                        Err(err) => {
                            log::warn!("Row '{}': {}", key, err);
                            CellContent::fault(&err)
                        }
                    },
                    Err(err) => CellContent::fault(err),
                };
                BodyCell {
                    column_id: column.id().to_string(),
                    align: column.alignment(),
                    content,
                }
            })
            .collect();

        BodyRow {
            key: key.to_string(),
            source_index: index,
            selected: self.state.selection.is_selected(key),
            cells,
        }
    }

    fn render_footer(&self) -> PaginationFooter {
        let window = &self.derived.window;
        let mode = self.pagination.kind();
        PaginationFooter {
            mode,
            page_index: window.page_index,
            page_count: window.page_count,
            page_size: self.state.page_size,
            page_size_options: self.settings.page_size_options.clone(),
            total_rows: match mode {
                PaginationKind::Client => Some(self.derived.rows.len()),
                PaginationKind::Server => None,
            },
            has_previous: window.page_index > 0,
            has_next: window.page_index + 1 < window.page_count,
        }
    }
}
