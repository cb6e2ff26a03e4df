//! Storage port - the operations the access layer needs from the engine.
//!
//! The engine is a single table keyed by document `id` with secondary
//! indexes partitioned by owner (see [`IndexName`]). Any backing
//! implementation must honor:
//!
//! - `query` returns items of one partition in sort-key order, applies the
//!   sort condition, then the limit, then the filter.
//! - `put_with_version_check` is atomic: either the stored version matched
//!   and the item was replaced with `version + 1`, or nothing changed and a
//!   [`PutOutcome::VersionConflict`] is returned.
//! - `delete_item` is unconditional and succeeds for missing keys.
//!
//! ## Example
//!
//! ```ignore
//! use docmeta::store::{DocumentStore, InMemoryDocumentStore, IndexName, QueryRequest};
//!
//! let store = InMemoryDocumentStore::new("DocumentMetadata");
//! let page = store.query(&QueryRequest::index(IndexName::OwnerCreatedAt, 7i64).limit(10))?;
//! ```

mod attribute;
mod cursor;
mod error;
mod filter;
mod in_memory;
mod query;

pub use attribute::{AttributeValue, Item};
pub use cursor::PageCursor;
pub use error::StoreError;
pub use filter::{Filter, SortCondition};
pub use in_memory::InMemoryDocumentStore;
pub use query::{IndexName, PutOutcome, QueryPage, QueryRequest};

use crate::document::Document;

/// Abstract access to the document table.
pub trait DocumentStore: Send + Sync {
    /// Name of the backing table.
    fn table_name(&self) -> &str;

    /// Point lookup by primary key.
    fn get_item(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Run one page of a key-condition query.
    fn query(&self, request: &QueryRequest) -> Result<QueryPage, StoreError>;

    /// Walk every item in the table, keeping those matching `filter`.
    ///
    /// Cost scales with table size, not result size.
    fn scan(&self, filter: Option<&Filter>) -> Result<Vec<Document>, StoreError>;

    /// Conditional write keyed on `document.version`.
    fn put_with_version_check(&self, document: &Document) -> Result<PutOutcome, StoreError>;

    /// Unconditional delete; missing keys are not an error.
    fn delete_item(&self, id: &str) -> Result<(), StoreError>;

    /// Run a query to exhaustion, following `last_evaluated_key` from page to page.
    fn query_all(&self, request: &QueryRequest) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut next = request.clone();
        loop {
            let page = self.query(&next)?;
            documents.extend(page.items);
            match page.last_evaluated_key {
                Some(key) => next.exclusive_start_key = Some(key),
                None => return Ok(documents),
            }
        }
    }
}
