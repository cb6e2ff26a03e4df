//! InMemoryDocumentStore - HashMap-backed engine for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use super::{
    AttributeValue, DocumentStore, Filter, Item, PutOutcome, QueryPage, QueryRequest, StoreError,
};
use crate::config::DocumentStoreConfig;
use crate::document::{attr, Document};

#[derive(Default)]
struct CallCounts {
    queries: AtomicUsize,
    scans: AtomicUsize,
}

/// In-memory document table with derived secondary indexes.
///
/// Items are keyed by `id`; index queries select a partition and order it by
/// the index's sort key, then by `id`. Clone-friendly via Arc: clones share
/// both the items and the call counters.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    table: String,
    storage: Arc<RwLock<HashMap<String, Item>>>,
    counts: Arc<CallCounts>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new("DocumentMetadata")
    }
}

impl InMemoryDocumentStore {
    /// Create a new empty table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            storage: Arc::new(RwLock::new(HashMap::new())),
            counts: Arc::new(CallCounts::default()),
        }
    }

    /// Empty table named after the config's prefixed table name.
    pub fn from_config(config: &DocumentStoreConfig) -> Self {
        Self::new(config.resolved_table_name())
    }

    /// Number of `query` calls served so far.
    pub fn query_count(&self) -> usize {
        self.counts.queries.load(AtomicOrdering::SeqCst)
    }

    /// Number of `scan` calls served so far.
    pub fn scan_count(&self) -> usize {
        self.counts.scans.load(AtomicOrdering::SeqCst)
    }

    pub fn reset_counts(&self) {
        self.counts.queries.store(0, AtomicOrdering::SeqCst);
        self.counts.scans.store(0, AtomicOrdering::SeqCst);
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Write a raw item with no version check, bypassing the document mapping.
    pub fn put_raw(&self, item: Item) -> Result<(), StoreError> {
        let id = item
            .get(attr::ID)
            .and_then(AttributeValue::as_str)
            .ok_or_else(|| StoreError::InvalidRequest("item has no string id".into()))?
            .to_string();
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        storage.insert(id, item);
        Ok(())
    }
}

fn id_of(item: &Item) -> &str {
    item.get(attr::ID)
        .and_then(AttributeValue::as_str)
        .unwrap_or_default()
}

/// Order within a partition: sort key first, then id.
fn position(a: &Item, b: &Item, sort_attribute: Option<&str>) -> Ordering {
    let by_sort = sort_attribute
        .and_then(|name| a.get(name)?.compare(b.get(name)?))
        .unwrap_or(Ordering::Equal);
    by_sort.then_with(|| id_of(a).cmp(id_of(b)))
}

fn key_of(item: &Item, request: &QueryRequest) -> Item {
    let mut names = vec![attr::ID, request.partition_attribute()];
    if let Some(index) = request.index {
        names.push(index.sort_attribute());
    }
    names
        .into_iter()
        .filter_map(|name| item.get(name).map(|v| (name.to_string(), v.clone())))
        .collect()
}

fn in_partition(item: &Item, request: &QueryRequest) -> bool {
    let partition_matches = item
        .get(request.partition_attribute())
        .and_then(|v| v.compare(&request.partition_value))
        == Some(Ordering::Equal);
    if !partition_matches {
        return false;
    }
    let Some(index) = request.index else {
        return true;
    };
    // Sparse index: items without a sort key value are not projected.
    match item.get(index.sort_attribute()) {
        Some(value) if !value.is_null() => request
            .sort_condition
            .as_ref()
            .map(|condition| condition.matches(value))
            .unwrap_or(true),
        _ => false,
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn get_item(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        storage.get(id).map(Document::from_item).transpose()
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryPage, StoreError> {
        self.counts.queries.fetch_add(1, AtomicOrdering::SeqCst);

        if request.consistent_read && request.index.is_some() {
            return Err(StoreError::InvalidRequest(format!(
                "consistent reads are not supported on {}",
                request.target()
            )));
        }
        if request.index.is_none() && request.sort_condition.is_some() {
            return Err(StoreError::InvalidRequest(
                "table has no sort key".into(),
            ));
        }
        if request.limit == Some(0) {
            return Err(StoreError::InvalidRequest("limit must be positive".into()));
        }

        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        let sort_attribute = request.index.map(|index| index.sort_attribute());
        let mut evaluated: Vec<&Item> = storage
            .values()
            .filter(|item| in_partition(item, request))
            .collect();
        evaluated.sort_by(|a, b| position(a, b, sort_attribute));

        if let Some(start) = &request.exclusive_start_key {
            evaluated.retain(|item| position(item, start, sort_attribute) == Ordering::Greater);
        }

        let limit = request.limit.unwrap_or(usize::MAX);
        let has_more = evaluated.len() > limit;
        evaluated.truncate(limit);
        let last_evaluated_key = if has_more {
            evaluated.last().map(|item| key_of(item, request))
        } else {
            None
        };

        let items = evaluated
            .into_iter()
            .filter(|item| {
                request
                    .filter
                    .as_ref()
                    .map(|filter| filter.matches(item))
                    .unwrap_or(true)
            })
            .map(Document::from_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    fn scan(&self, filter: Option<&Filter>) -> Result<Vec<Document>, StoreError> {
        self.counts.scans.fetch_add(1, AtomicOrdering::SeqCst);

        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        let mut matched: Vec<&Item> = storage
            .values()
            .filter(|item| filter.map(|f| f.matches(item)).unwrap_or(true))
            .collect();
        matched.sort_by(|a, b| id_of(a).cmp(id_of(b)));
        matched.into_iter().map(Document::from_item).collect()
    }

    fn put_with_version_check(&self, document: &Document) -> Result<PutOutcome, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let stored = storage.get(&document.id).map(|item| {
            item.get(attr::VERSION)
                .and_then(AttributeValue::as_i64)
                .and_then(|v| u64::try_from(v).ok())
        });

        let next_version = match (document.version, stored) {
            (None, None) => 1,
            (Some(expected), Some(Some(actual))) if expected == actual => expected
                .checked_add(1)
                .ok_or_else(|| StoreError::InvalidRequest("version overflow".into()))?,
            (expected, stored) => {
                return Ok(PutOutcome::VersionConflict {
                    id: document.id.clone(),
                    expected,
                    actual: stored.flatten(),
                })
            }
        };

        let mut saved = document.clone();
        saved.version = Some(next_version);
        storage.insert(saved.id.clone(), saved.to_item());

        Ok(PutOutcome::Written(saved))
    }

    fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        storage.remove(id);
        Ok(())
    }
}
