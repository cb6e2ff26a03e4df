mod config;
mod document;
mod error;
mod fanout;
mod guard;
mod pagination;
mod service;
pub mod store;
pub mod timestamp;

#[cfg(feature = "http")]
pub mod http;

pub use config::{
    DocumentStoreConfig, ENV_ALLOW_FULL_SCAN, ENV_ENVIRONMENT_PREFIX, ENV_FAN_OUT_PARALLELISM,
    ENV_TABLE_NAME,
};
pub use document::{attr, Document};
pub use error::DocumentError;
pub use fanout::{AxisQuery, FanOutExecutor};
pub use guard::OptimisticGuard;
pub use pagination::{slice_in_memory, CursorPager, Page, PageRequest, Slice};
pub use service::DocumentService;
pub use store::{
    AttributeValue, DocumentStore, Filter, IndexName, InMemoryDocumentStore, Item, PageCursor,
    PutOutcome, QueryPage, QueryRequest, SortCondition, StoreError,
};
