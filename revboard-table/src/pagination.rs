//! Pagination mode and page-window arithmetic.

use std::fmt;
use std::ops::Range;

use crate::error::TableError;

/// Callback receiving a requested zero-based page index.
pub type PageChangeCallback = Box<dyn FnMut(usize)>;

/// Who owns the page position.
///
/// Chosen once when the table is built and fixed for its lifetime.
///
/// - `Client`: the engine slices the filtered rows and computes the page count.
/// - `Server`: the caller hands over exactly one page of rows together with
///   the current page and total page count. Page requests are forwarded
///   through `on_page_change`; the engine never recomputes either number.
///
/// Pages are zero-based in both modes.
pub enum PaginationMode {
    Client,
    Server {
        page: usize,
        total_pages: usize,
        on_page_change: PageChangeCallback,
    },
}

impl PaginationMode {
    pub fn client() -> Self {
        PaginationMode::Client
    }

    pub fn server(page: usize, total_pages: usize, on_page_change: impl FnMut(usize) + 'static) -> Self {
        PaginationMode::Server {
            page,
            total_pages,
            on_page_change: Box::new(on_page_change),
        }
    }

    /// Build a mode from the optional external pagination trio.
    ///
    /// All three present selects server mode, none selects client mode, and
    /// anything in between is rejected. Zero is a valid `page` and
    /// `total_pages`; presence alone decides.
    pub fn from_signals(
        page: Option<usize>,
        total_pages: Option<usize>,
        on_page_change: Option<PageChangeCallback>,
    ) -> Result<Self, TableError> {
        match (page, total_pages, on_page_change) {
            (Some(page), Some(total_pages), Some(on_page_change)) => Ok(PaginationMode::Server {
                page,
                total_pages,
                on_page_change,
            }),
            (None, None, None) => Ok(PaginationMode::Client),
            (page, total_pages, on_page_change) => {
                let missing: Vec<&str> = [
                    ("page", page.is_none()),
                    ("total_pages", total_pages.is_none()),
                    ("on_page_change", on_page_change.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(TableError::IncompletePagination {
                    missing: missing.join(", "),
                })
            }
        }
    }

    pub fn kind(&self) -> PaginationKind {
        match self {
            PaginationMode::Client => PaginationKind::Client,
            PaginationMode::Server { .. } => PaginationKind::Server,
        }
    }
}

impl fmt::Debug for PaginationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationMode::Client => f.write_str("Client"),
            PaginationMode::Server {
                page, total_pages, ..
            } => f
                .debug_struct("Server")
                .field("page", page)
                .field("total_pages", total_pages)
                .finish_non_exhaustive(),
        }
    }
}

/// Data-only tag of the active [`PaginationMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationKind {
    Client,
    Server,
}

/// The slice of rows shown for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page index after clamping.
    pub page_index: usize,
    /// Number of pages. Always at least one in client mode; in server mode
    /// this is whatever the caller reported.
    pub page_count: usize,
    /// Start offset into the filtered rows.
    pub start: usize,
    /// End offset (exclusive) into the filtered rows.
    pub end: usize,
}

impl PageWindow {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// `ceil(total / page_size)`, at least one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a page index into `[0, page_count - 1]`.
pub fn clamp_page(page_index: usize, page_count: usize) -> usize {
    page_index.min(page_count.saturating_sub(1))
}

/// Compute the visible window for client pagination.
pub fn paginate(total: usize, page_index: usize, page_size: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let page_count = page_count(total, page_size);
    let page_index = clamp_page(page_index, page_count);
    let start = (page_index * page_size).min(total);
    let end = (start + page_size).min(total);
    PageWindow {
        page_index,
        page_count,
        start,
        end,
    }
}
