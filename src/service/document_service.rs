//! Construction, point lookups and writes.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::DocumentStoreConfig;
use crate::document::{attr, Document};
use crate::error::DocumentError;
use crate::fanout::FanOutExecutor;
use crate::guard::OptimisticGuard;
use crate::store::{DocumentStore, Filter, InMemoryDocumentStore, QueryRequest};

/// Access layer over a [`DocumentStore`].
pub struct DocumentService<S> {
    pub(super) store: S,
    pub(super) fan_out: FanOutExecutor,
    pub(super) config: DocumentStoreConfig,
}

impl<S: DocumentStore> DocumentService<S> {
    /// Fails with [`DocumentError::Config`] when the store's table is not
    /// the one the config resolves to.
    pub fn new(store: S, config: DocumentStoreConfig) -> Result<Self, DocumentError> {
        config.validate()?;
        let expected = config.resolved_table_name();
        if store.table_name() != expected {
            return Err(DocumentError::Config(format!(
                "store table {} does not match configured table {}",
                store.table_name(),
                expected
            )));
        }
        let fan_out = FanOutExecutor::new(config.fan_out_parallelism)?;
        info!(
            table = store.table_name(),
            fan_out_parallelism = config.fan_out_parallelism,
            allow_full_scan = config.allow_full_scan,
            "document service ready"
        );
        Ok(Self {
            store,
            fan_out,
            config,
        })
    }

    pub fn with_defaults(store: S) -> Result<Self, DocumentError> {
        Self::new(store, DocumentStoreConfig::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DocumentStoreConfig {
        &self.config
    }

    /// Point lookup. A missing document is `Ok(None)`, not an error.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Document>, DocumentError> {
        require_text("id", id)?;
        info!(id, "get_by_id");

        let document = self.store.get_item(id)?;

        info!(id, found = document.is_some(), "get_by_id done");
        Ok(document)
    }

    /// Strongly consistent lookup that only matches the given version.
    pub fn get_by_id_and_version(
        &self,
        id: &str,
        version: u64,
    ) -> Result<Option<Document>, DocumentError> {
        require_text("id", id)?;
        info!(id, version, "get_by_id_and_version");

        let request = QueryRequest::primary(id)
            .filter(Some(Filter::eq(attr::VERSION, version)))
            .consistent_read(true);
        let document = self.store.query(&request)?.items.into_iter().next();

        info!(id, version, found = document.is_some(), "get_by_id_and_version done");
        Ok(document)
    }

    /// Version-checked save.
    ///
    /// A document without a version is created at version 1; one with a
    /// version must match the stored version and is written as `version + 1`.
    /// A mismatch is [`DocumentError::OptimisticLockConflict`] and leaves the
    /// stored document untouched.
    pub fn save(&self, document: &Document) -> Result<Document, DocumentError> {
        require_text("id", &document.id)?;
        info!(
            id = %document.id,
            owner_id = document.owner_id,
            version = ?document.version,
            "save"
        );

        let saved = OptimisticGuard::new(&self.store).save(document)?;

        info!(id = %saved.id, version = ?saved.version, "save done");
        Ok(saved)
    }

    /// Unconditional, idempotent delete.
    ///
    /// Does not check the version: a caller holding a stale copy can still
    /// delete the document.
    pub fn delete(&self, id: &str) -> Result<(), DocumentError> {
        require_text("id", id)?;
        info!(id, "delete");

        self.store.delete_item(id)?;

        info!(id, "delete done");
        Ok(())
    }
}

impl DocumentService<InMemoryDocumentStore> {
    /// Service over a fresh in-memory table named by `config`.
    pub fn in_memory(config: DocumentStoreConfig) -> Result<Self, DocumentError> {
        Self::new(InMemoryDocumentStore::from_config(&config), config)
    }

    /// Like [`in_memory`](Self::in_memory), configured from `DOCMETA_*` variables.
    pub fn in_memory_from_env() -> Result<Self, DocumentError> {
        Self::in_memory(DocumentStoreConfig::from_env()?)
    }
}

pub(super) fn require_text(field: &str, value: &str) -> Result<(), DocumentError> {
    if value.is_empty() {
        return Err(DocumentError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

pub(super) fn require_range(
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<(), DocumentError> {
    if start > end {
        return Err(DocumentError::Validation(format!(
            "start {} is after end {}",
            start, end
        )));
    }
    Ok(())
}
