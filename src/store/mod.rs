//! Object store layer.
//!
//! Tiles live in an external blob store keyed by string paths. The server
//! only ever performs one operation against it: fetch an object by key.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! └────────────────────┬────────────────────┘
//!                      │ get(key)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          ObjectStore Trait              │
//! │   (Option<StoredObject> or StoreError)  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            S3ObjectStore                │
//! │      (AWS S3, Cloudflare R2, MinIO)     │
//! └─────────────────────────────────────────┘
//! ```

mod object;
mod s3_store;

use async_trait::async_trait;

use crate::error::StoreError;

pub use object::{body_from_bytes, take_non_empty, ObjectBody, StoredObject};
pub use s3_store::{create_s3_client, S3ObjectStore};

/// Read access to a key-addressed blob store.
///
/// Implementations must be thread-safe; a single store is shared by every
/// request the server handles.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object stored under `key`.
    ///
    /// Returns `Ok(None)` when no object exists for the key. Errors are
    /// reserved for reads that failed, already classified into
    /// [`StoreError`] variants.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError>;

    /// Human-readable location of the store (for logging).
    fn identifier(&self) -> &str;
}
