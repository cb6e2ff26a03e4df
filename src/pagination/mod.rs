//! Pagination - a uniform page view over two access patterns.
//!
//! - [`CursorPager`] follows the engine's own cursor, one `size`-limited query
//!   per page, and reports `has_next` from the engine's last evaluated key.
//!   Used where the result set is a plain key-condition query.
//! - [`slice_in_memory`] pulls the *entire* filtered result set and cuts the
//!   requested window out of it. Used where a non-key filter prevents the
//!   engine from paginating; cost grows with the partition, not the page.

mod cursor_pager;

pub use cursor_pager::CursorPager;

use serde::Serialize;

use crate::error::DocumentError;
use crate::store::PageCursor;

/// A zero-based page number and a page size of at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    pub fn of(page: usize, size: usize) -> Result<Self, DocumentError> {
        if size == 0 {
            return Err(DocumentError::Validation(
                "page size must be at least 1".into(),
            ));
        }
        Ok(Self { page, size })
    }

    pub fn first(size: usize) -> Result<Self, DocumentError> {
        Self::of(0, size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// The same size, one page further. Stays put on the last representable page.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }

    fn checked_next(&self) -> Option<Self> {
        Some(Self {
            page: self.page.checked_add(1)?,
            size: self.size,
        })
    }
}

/// A page that knows whether another follows, but not the total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub request: PageRequest,
    pub has_next: bool,
    /// Engine position after this page, present iff `has_next`.
    #[serde(skip)]
    pub cursor: Option<PageCursor>,
}

impl<T> Slice<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            content: Vec::new(),
            request,
            has_next: false,
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn next_page_request(&self) -> Option<PageRequest> {
        self.has_next.then(|| self.request.checked_next()).flatten()
    }
}

/// A page cut from a fully materialized result set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub request: PageRequest,
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// `ceil(total_elements / size)`, zero for an empty result set.
    pub fn total_pages(&self) -> usize {
        self.total_elements.div_ceil(self.request.size())
    }

    pub fn has_next(&self) -> bool {
        self.request.page() < self.total_pages().saturating_sub(1)
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn next_page_request(&self) -> Option<PageRequest> {
        self.has_next().then(|| self.request.checked_next()).flatten()
    }
}

/// Cut `request`'s window out of the full result set.
///
/// A window starting at or past the end yields empty content.
pub fn slice_in_memory<T>(mut results: Vec<T>, request: PageRequest) -> Page<T> {
    let total_elements = results.len();
    let start = request.offset();
    let content = if start < total_elements {
        let end = start.saturating_add(request.size()).min(total_elements);
        results.truncate(end);
        results.split_off(start)
    } else {
        Vec::new()
    };
    Page {
        content,
        request,
        total_elements,
    }
}
