//! Optimistic concurrency guard for document saves.
//!
//! Safety rests entirely on the engine's atomic conditional write; there is
//! no lock or lease. The guard only turns the engine's conflict outcome
//! into [`DocumentError::OptimisticLockConflict`]. It never retries and
//! never touches the caller's document; a losing writer must re-read and
//! decide for itself.

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::DocumentError;
use crate::store::{DocumentStore, PutOutcome};

/// Version-checked writes against a borrowed store.
pub struct OptimisticGuard<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> OptimisticGuard<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create (`version == None`) or update (`version == Some(v)`) a document.
    ///
    /// Returns the stored document carrying its new version.
    pub fn save(&self, document: &Document) -> Result<Document, DocumentError> {
        match self.store.put_with_version_check(document)? {
            PutOutcome::Written(saved) => {
                debug!(
                    id = %saved.id,
                    previous = ?document.version,
                    version = ?saved.version,
                    "version check passed"
                );
                Ok(saved)
            }
            PutOutcome::VersionConflict {
                id,
                expected,
                actual,
            } => {
                warn!(
                    id = %id,
                    attempted_version = ?expected,
                    stored_version = ?actual,
                    "optimistic lock conflict"
                );
                Err(DocumentError::OptimisticLockConflict {
                    id,
                    attempted_version: expected,
                })
            }
        }
    }
}
