use thiserror::Error;

/// Failure reported by a storage engine.
///
/// A failed version check is not an error at this level; it is reported as
/// [`PutOutcome::VersionConflict`](super::PutOutcome::VersionConflict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The engine could not be reached or failed while serving the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// An item could not be mapped to or from a document.
    #[error("item mapping error: {0}")]
    Mapping(String),

    /// A pagination token could not be decoded.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// The engine rejected the request shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}
