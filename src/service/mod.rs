//! Document Service - the named query shapes over one document table.
//!
//! `DocumentService<S>` composes the storage port, the fan-out executor, the
//! pagination adapter and the optimistic concurrency guard. Each operation
//! validates its input before any storage call and passes engine failures
//! through unchanged.
//!
//! Cost profile by operation:
//!
//! | Operation | Access path |
//! |---|---|
//! | `get_by_id`, `get_by_id_and_version` | primary key |
//! | `list_by_owner` | owner/createdAt index, engine cursor |
//! | `list_by_owner_and_date_range` | owner/createdAt index, `BETWEEN` |
//! | `list_by_owner_and_categories_in`, `..._sub_categories_in` | one query per value, in parallel |
//! | `list_by_owner_and_category_and_sub_category` | owner/category index + filter |
//! | `list_by_owner_and_created_by*`, `..._updated_by` | whole owner partition + filter |
//! | `scan_by_category_and_notes_containing` | **full table scan** |
//!
//! ## Quick Start
//!
//! ```ignore
//! use docmeta::{Document, DocumentService, InMemoryDocumentStore, PageRequest};
//!
//! let service = DocumentService::with_defaults(InMemoryDocumentStore::default())?;
//! let saved = service.save(&Document::new("d1", 7, 10, 20))?;
//! assert_eq!(saved.version, Some(1));
//!
//! let first = service.list_by_owner(7, PageRequest::first(20)?)?;
//! ```

mod document_service;
mod queries;

pub use document_service::DocumentService;
