/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading reference data or touching the record store.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested record does not exist in the collection.
    #[error("{collection} record not found: {id}")]
    RecordNotFound {
        /// Collection that was searched.
        collection: String,
        /// The missing record id.
        id: String,
    },

    /// A stored document does not have the expected shape.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// An unknown stat key was supplied.
    #[error("unknown stat: {0}")]
    UnknownStat(String),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
