pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors returned by the storage clients
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// HTTP transport or connection error
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("{message} (status {status})")]
    Api {
        /// HTTP status returned by the store
        status: u16,
        /// Message extracted from the error body
        message: String,
    },

    /// The store answered with a body we could not read
    #[error("unexpected storage response: {0}")]
    Decode(String),

    /// Storage settings are unusable
    #[error("invalid storage configuration: {0}")]
    Config(String),
}
