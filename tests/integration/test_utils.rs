//! Test utilities for integration tests.
//!
//! This module provides an in-memory object store and helpers for driving the
//! router with `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

use zone_tiles::error::StoreError;
use zone_tiles::store::{ObjectBody, ObjectStore, StoredObject};
use zone_tiles::{create_router, RouterConfig, TileService};

// =============================================================================
// Mock Object Store
// =============================================================================

/// What the mock returns for a given key.
#[derive(Clone)]
enum MockEntry {
    Chunks(Vec<Bytes>),
    NoBody,
    Failure(StoreError),
}

/// An in-memory object store that tracks every key it is asked for.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    entries: HashMap<String, MockEntry>,
    read_count: Arc<AtomicUsize>,
    requested_keys: Arc<RwLock<Vec<String>>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object as a single chunk.
    pub fn with_object(self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.with_chunks(key, vec![data.into()])
    }

    /// Store an object whose body arrives in several chunks.
    pub fn with_chunks(mut self, key: impl Into<String>, chunks: Vec<Bytes>) -> Self {
        self.entries.insert(key.into(), MockEntry::Chunks(chunks));
        self
    }

    /// Store an object that has no body.
    pub fn with_bodyless_object(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), MockEntry::NoBody);
        self
    }

    /// Make reads of `key` fail with `error`.
    pub fn with_failure(mut self, key: impl Into<String>, error: StoreError) -> Self {
        self.entries.insert(key.into(), MockEntry::Failure(error));
        self
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub async fn requested_keys(&self) -> Vec<String> {
        self.requested_keys.read().await.clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.requested_keys.write().await.push(key.to_string());

        match self.entries.get(key) {
            None => Ok(None),
            Some(MockEntry::NoBody) => Ok(Some(StoredObject::without_body(key))),
            Some(MockEntry::Failure(err)) => Err(err.clone()),
            Some(MockEntry::Chunks(chunks)) => {
                let body: ObjectBody = stream::iter(chunks.clone().into_iter().map(Ok)).boxed();
                Ok(Some(StoredObject::new(key, body)))
            }
        }
    }

    fn identifier(&self) -> &str {
        "memory://test"
    }
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Build a router over the given store with tracing disabled.
pub fn test_router(store: MockObjectStore) -> Router {
    create_router(
        TileService::new(store),
        RouterConfig::new().with_tracing(false),
    )
}

/// Send a GET request through the router.
pub async fn get(router: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Collect a response body into a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

/// Minimal JPEG-looking payload (SOI ... EOI).
pub fn fake_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend((0u8..64).collect::<Vec<_>>());
    data.extend([0xFF, 0xD9]);
    data
}
