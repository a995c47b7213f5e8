use thiserror::Error;

/// Errors reported by an object store read.
///
/// A missing object is not an error: stores return `Ok(None)` for it. These
/// variants only cover reads that failed, grouped by how the HTTP layer has
/// to answer them.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store rejected the request because of how the bucket or client is
    /// set up (wrong bucket, bad credentials, unbuildable request).
    #[error("Store misconfigured: {0}")]
    Misconfigured(String),

    /// The store rejected the key or range as out of bounds.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Any other storage or transport failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while serving a tile.
///
/// Each variant maps to exactly one HTTP status and one fixed plain-text
/// body; see the `IntoResponse` impl in the server layer.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Version segment is not `v1`..`v99`
    #[error("Invalid version segment: {version}")]
    InvalidVersion { version: String },

    /// One of the z/x/y segments is not numeric
    #[error("Invalid tile coordinate: {value}")]
    InvalidCoordinates { value: String },

    /// No object stored under the tile key
    #[error("Tile not found: {key}")]
    NotFound { key: String },

    /// Object exists but carries no bytes
    #[error("Tile content is empty: {key}")]
    EmptyBody { key: String },

    /// Store read failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
