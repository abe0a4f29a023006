/// Errors from attribute store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Storage backend is read-only or otherwise unavailable.
    #[error("store is read-only")]
    ReadOnly,

    /// The key cannot address a top-level attribute.
    #[error("invalid attribute key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The backend refused the value written at `key`.
    #[error("write to {key:?} rejected: {reason}")]
    Rejected { key: String, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
