//! Tile Service for resolving tile requests against the object store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                             │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                    get_tile()                           │    │
//! │  │  1. Validate segments   3. Read object from store       │    │
//! │  │  2. Build key           4. Reject missing/empty bodies  │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │                              │                                  │
//! │                              ▼                                  │
//! │                     ┌──────────────────┐                        │
//! │                     │   ObjectStore    │                        │
//! │                     └──────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::TileError;
use crate::store::{take_non_empty, ObjectBody, ObjectStore};

use super::request::{normalize_prefix, TileKey, TileRequest};

// =============================================================================
// Tile Response
// =============================================================================

/// A tile ready to be streamed to the client.
pub struct TileResponse {
    /// Full object key the tile was read from
    pub key: String,

    /// Object size in bytes, if the store reported one
    pub size: Option<u64>,

    /// Tile bytes, guaranteed to yield at least one byte
    pub body: ObjectBody,
}

impl std::fmt::Debug for TileResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileResponse")
            .field("key", &self.key)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tile Service
// =============================================================================

/// Service that maps tile requests onto object-store reads.
///
/// Each call performs exactly one store read. Nothing is cached and nothing
/// is retried; requests share no mutable state.
///
/// # Example
///
/// ```ignore
/// use zone_tiles::tile::{TileRequest, TileService};
///
/// let service = TileService::new(store).with_key_prefix("stalker2");
/// let tile = service.get_tile(TileRequest::new("v1", "0", "0", "0")).await?;
/// // tile.key == "stalker2/v1/0/0/0.jpg"
/// ```
pub struct TileService<S: ObjectStore> {
    store: Arc<S>,
    key_prefix: Option<String>,
}

impl<S: ObjectStore> TileService<S> {
    /// Create a new tile service reading keys at the root of the store.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            key_prefix: None,
        }
    }

    /// Create a tile service over a store shared with other components.
    pub fn with_shared_store(store: Arc<S>) -> Self {
        Self {
            store,
            key_prefix: None,
        }
    }

    /// Read tiles below `prefix` instead of the store root.
    ///
    /// Surrounding slashes are ignored; a prefix of only slashes is no prefix.
    pub fn with_key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = normalize_prefix(prefix);
        self
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the normalised key prefix, if any.
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    /// Full object key for a validated tile key.
    pub fn object_key(&self, key: &TileKey) -> String {
        key.with_prefix(self.key_prefix.as_deref())
    }

    /// Resolve a tile request to a streamable body.
    ///
    /// # Errors
    ///
    /// - [`TileError::InvalidVersion`] / [`TileError::InvalidCoordinates`]
    ///   when the segments fail validation (no store read happens)
    /// - [`TileError::NotFound`] when the store has no object for the key
    /// - [`TileError::EmptyBody`] when the object has no bytes
    /// - [`TileError::Store`] when the read itself failed
    pub async fn get_tile(&self, request: TileRequest) -> Result<TileResponse, TileError> {
        let tile_key = request.validate()?;
        let key = self.object_key(&tile_key);

        debug!(key = %key, store = self.store.identifier(), "Fetching tile");

        let object = match self.store.get(&key).await? {
            Some(object) => object,
            None => return Err(TileError::NotFound { key }),
        };

        let size = object.size();
        let body = match object.into_body() {
            Some(body) => take_non_empty(body).await?,
            None => None,
        };

        match body {
            Some(body) => Ok(TileResponse { key, size, body }),
            None => Err(TileError::EmptyBody { key }),
        }
    }
}
