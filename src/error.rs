use thiserror::Error;

use crate::store::StoreError;

/// Error type for document access operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document changed since the caller read it; nothing was written.
    ///
    /// `attempted_version` is the version the caller saved with (`None` when
    /// the save was a create).
    #[error(
        "document {id} was modified concurrently (attempted version {}); reload and retry",
        display_version(.attempted_version)
    )]
    OptimisticLockConflict {
        id: String,
        attempted_version: Option<u64>,
    },

    /// Input rejected before any storage call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Failure from the storage engine, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

fn display_version(version: &Option<u64>) -> String {
    version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "none".to_string())
}

impl DocumentError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, DocumentError::OptimisticLockConflict { .. })
    }

    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DocumentError::OptimisticLockConflict { .. } => 409,
            DocumentError::Validation(_) => 400,
            DocumentError::Store(StoreError::InvalidCursor(_)) => 400,
            DocumentError::Store(StoreError::Unavailable(_)) => 503,
            DocumentError::Store(_) => 500,
            DocumentError::Config(_) => 500,
        }
    }
}
