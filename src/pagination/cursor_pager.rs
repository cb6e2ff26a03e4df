//! Page-number access over the engine's forward-only cursor.

use tracing::debug;

use super::{PageRequest, Slice};
use crate::document::Document;
use crate::store::{DocumentStore, Item, PageCursor, QueryRequest, StoreError};

/// Fetches numbered pages of a query through the engine's cursor.
///
/// The engine cannot seek by offset, so reaching page `p` costs `p + 1`
/// limited queries. Callers that already hold a cursor can resume with
/// [`CursorPager::fetch_after`] instead.
pub struct CursorPager<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> CursorPager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch page `request.page()` of `base`.
    pub fn fetch(
        &self,
        base: &QueryRequest,
        request: PageRequest,
    ) -> Result<Slice<Document>, StoreError> {
        let mut start = base.exclusive_start_key.clone();
        for skipped in 0..request.page() {
            let page = self
                .store
                .query(&self.limited(base, request).start_from(start))?;
            match page.last_evaluated_key {
                Some(key) => start = Some(key),
                None => {
                    debug!(
                        index = base.target(),
                        requested = request.page(),
                        available = skipped + 1,
                        "requested page is past the end"
                    );
                    return Ok(Slice::empty(request));
                }
            }
        }
        self.fetch_from(base, request, start)
    }

    /// Fetch the page that follows `cursor`, labelled as `request`.
    pub fn fetch_after(
        &self,
        base: &QueryRequest,
        cursor: PageCursor,
        request: PageRequest,
    ) -> Result<Slice<Document>, StoreError> {
        self.fetch_from(base, request, Some(cursor.into_key()))
    }

    fn fetch_from(
        &self,
        base: &QueryRequest,
        request: PageRequest,
        start: Option<Item>,
    ) -> Result<Slice<Document>, StoreError> {
        let page = self
            .store
            .query(&self.limited(base, request).start_from(start))?;
        let cursor = page.last_evaluated_key.map(PageCursor::new);
        Ok(Slice {
            content: page.items,
            request,
            has_next: cursor.is_some(),
            cursor,
        })
    }

    fn limited(&self, base: &QueryRequest, request: PageRequest) -> QueryRequest {
        base.clone().limit(request.size())
    }
}
