//! Fixtures shared by the document suites.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use docmeta::{
    AttributeValue, Document, DocumentService, DocumentStore, Filter, InMemoryDocumentStore,
    PutOutcome, QueryPage, QueryRequest, SortCondition, StoreError,
};

/// Route library logs to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn service() -> DocumentService<InMemoryDocumentStore> {
    init_tracing();
    DocumentService::with_defaults(InMemoryDocumentStore::default()).unwrap()
}

/// Now, truncated to whole seconds so encoded values sort chronologically.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

pub fn days_ago(base: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    base - Duration::days(days)
}

/// Save `count` documents `{prefix}-0..` for `owner`, created one minute apart.
pub fn seed_owner(
    service: &DocumentService<impl DocumentStore>,
    owner_id: i64,
    prefix: &str,
    count: usize,
) -> Vec<Document> {
    let base = now();
    (0..count)
        .map(|i| {
            let doc = Document::new(format!("{}-{}", prefix, i), owner_id, 1, 1)
                .created(base + Duration::minutes(i as i64), "seeder");
            service.save(&doc).unwrap()
        })
        .collect()
}

pub fn ids(documents: &[Document]) -> Vec<String> {
    let mut ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
    ids.sort();
    ids
}

pub fn strs(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Wraps the in-memory store and fails every query whose sort condition is
/// `Eq(fail_on)` with `StoreError::Unavailable`.
pub struct FailingStore {
    pub inner: InMemoryDocumentStore,
    fail_on: AttributeValue,
    failures: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: InMemoryDocumentStore, fail_on: impl Into<AttributeValue>) -> Self {
        Self {
            inner,
            fail_on: fail_on.into(),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl DocumentStore for FailingStore {
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    fn get_item(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get_item(id)
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryPage, StoreError> {
        if request.sort_condition == Some(SortCondition::Eq(self.fail_on.clone())) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("injected throttling".into()));
        }
        self.inner.query(request)
    }

    fn scan(&self, filter: Option<&Filter>) -> Result<Vec<Document>, StoreError> {
        self.inner.scan(filter)
    }

    fn put_with_version_check(&self, document: &Document) -> Result<PutOutcome, StoreError> {
        self.inner.put_with_version_check(document)
    }

    fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete_item(id)
    }
}
