use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};

use crate::error::StoreError;

/// Streamed content of a stored object.
pub type ObjectBody = BoxStream<'static, Result<Bytes, StoreError>>;

/// An object returned by an [`ObjectStore`](super::ObjectStore) read.
pub struct StoredObject {
    key: String,
    size: Option<u64>,
    body: Option<ObjectBody>,
}

impl StoredObject {
    /// Create an object with a streamed body of unknown length.
    pub fn new(key: impl Into<String>, body: ObjectBody) -> Self {
        Self {
            key: key.into(),
            size: None,
            body: Some(body),
        }
    }

    /// Create an object that exists but has no body at all.
    pub fn without_body(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
            body: None,
        }
    }

    /// Create an object from an in-memory buffer.
    pub fn from_bytes(key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            key: key.into(),
            size: Some(data.len() as u64),
            body: Some(body_from_bytes(data)),
        }
    }

    /// Attach the object size reported by the store.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Key the object was stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Object size in bytes, if the store reported one.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Whether the object carries a body stream.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Consume the object and return its body stream.
    pub fn into_body(self) -> Option<ObjectBody> {
        self.body
    }
}

impl std::fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredObject")
            .field("key", &self.key)
            .field("size", &self.size)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Wrap a buffer as a single-chunk body stream.
pub fn body_from_bytes(data: impl Into<Bytes>) -> ObjectBody {
    stream::once(futures::future::ready(Ok(data.into()))).boxed()
}

/// Read the body until its first non-empty chunk.
///
/// Returns `Ok(None)` if the stream ends without yielding a single byte.
/// Otherwise returns a stream that replays the chunk that was read followed
/// by the rest of the body, so the caller still sees every byte.
pub async fn take_non_empty(mut body: ObjectBody) -> Result<Option<ObjectBody>, StoreError> {
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        if chunk.is_empty() {
            continue;
        }

        let head = stream::once(futures::future::ready(Ok(chunk)));
        return Ok(Some(head.chain(body).boxed()));
    }

    Ok(None)
}
