use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store adapter error taxonomy.
///
/// Each variant tags the operation that failed; the payload carries the
/// offending argument or the underlying transport error so callers can log a
/// single line without unwrapping source chains.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Required connection parameter missing (e.g. empty host).
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Connection or authentication to the store failed.
    #[error("Not connected: {0}")]
    NotConnected(String),

    /// Watch stream could not be created or broke mid-flight.
    #[error("Failed to watch: {0}")]
    FailedToWatch(String),

    /// Prefix-range read failed.
    #[error("Failed to get all: {0}")]
    FailedToGetAll(String),

    /// Single-key read failed.
    #[error("Failed to get: {0}")]
    FailedToGet(String),

    /// Single-key write failed.
    #[error("Failed to put: {0}")]
    FailedToPut(String),
}
