//! HTTP request handlers for the tile API.
//!
//! # Endpoints
//!
//! - `GET /` - Greeting text
//! - `GET /health` - Health check endpoint
//! - `GET /{version}/{z}/{x}/{y}` - Serve a tile

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{StoreError, TileError};
use crate::store::ObjectStore;
use crate::tile::{TileRequest, TileService};

/// Default greeting served on `/`.
pub const DEFAULT_GREETING: &str = "Tile server for stalker2.zone";

/// Default Cache-Control max-age in seconds (one year).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 31_536_000;

/// Content type of every served tile.
pub const TILE_CONTENT_TYPE: &str = "image/jpeg";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the tile service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: ObjectStore> {
    /// The tile service for processing tile requests
    pub tile_service: Arc<TileService<S>>,

    /// Cache-Control max-age in seconds for served tiles
    pub cache_max_age: u32,

    /// Text returned on `/`
    pub greeting: Arc<str>,
}

impl<S: ObjectStore> AppState<S> {
    /// Create a new application state with the default max-age and greeting.
    pub fn new(tile_service: TileService<S>) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            greeting: Arc::from(DEFAULT_GREETING),
        }
    }

    /// Set the Cache-Control max-age for served tiles.
    pub fn with_cache_max_age(mut self, cache_max_age: u32) -> Self {
        self.cache_max_age = cache_max_age;
        self
    }

    /// Set the greeting returned on `/`.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Arc::from(greeting.into());
        self
    }

    /// Value of the Cache-Control header on tile responses.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }
}

impl<S: ObjectStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tile_service: Arc::clone(&self.tile_service),
            cache_max_age: self.cache_max_age,
            greeting: Arc::clone(&self.greeting),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/{version}/{z}/{x}/{y}`. Kept as raw strings; validation
/// happens in the tile service.
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Dataset version (e.g. "v1")
    pub version: String,

    /// Zoom level
    pub z: String,

    /// Tile column
    pub x: String,

    /// Tile row
    pub y: String,
}

impl TilePathParams {
    /// Rebuild the parameters from the raw request path.
    ///
    /// Used when a segment does not percent-decode to UTF-8. Each segment is
    /// decoded on its own and one that fails to decode is kept as sent, so
    /// it later fails validation like any other malformed segment.
    pub fn from_raw_path(path: &str) -> Option<Self> {
        let mut segments = path.strip_prefix('/').unwrap_or(path).split('/');
        let params = Self {
            version: decode_segment(segments.next()?),
            z: decode_segment(segments.next()?),
            x: decode_segment(segments.next()?),
            y: decode_segment(segments.next()?),
        };
        segments.next().is_none().then_some(params)
    }
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

impl From<TilePathParams> for TileRequest {
    fn from(params: TilePathParams) -> Self {
        TileRequest::new(params.version, params.z, params.x, params.y)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

impl TileError {
    /// HTTP status and fixed client-facing body for this error.
    ///
    /// The body never carries the error detail; that only goes to the log.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            TileError::InvalidVersion { .. } => (
                StatusCode::BAD_REQUEST,
                "Invalid version format. Must be v1-v99.",
            ),
            TileError::InvalidCoordinates { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid tile coordinates")
            }
            TileError::NotFound { .. } => (StatusCode::NOT_FOUND, "Tile not found"),
            TileError::EmptyBody { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Tile content is empty")
            }
            TileError::Store(StoreError::Misconfigured(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid tile format or bucket configuration",
            ),
            TileError::Store(StoreError::OutOfRange(_)) => {
                (StatusCode::BAD_REQUEST, "Tile coordinates are out of range")
            }
            TileError::Store(StoreError::Backend(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    /// Short identifier used in log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            TileError::InvalidVersion { .. } => "invalid_version",
            TileError::InvalidCoordinates { .. } => "invalid_coordinates",
            TileError::NotFound { .. } => "not_found",
            TileError::EmptyBody { .. } => "empty_body",
            TileError::Store(StoreError::Misconfigured(_)) => "store_misconfigured",
            TileError::Store(StoreError::OutOfRange(_)) => "store_out_of_range",
            TileError::Store(StoreError::Backend(_)) => "store_error",
        }
    }
}

/// Convert TileError to a plain-text HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 5xx errors are logged at ERROR level
/// - 404s are logged at DEBUG level (common and expected)
/// - other 4xx errors are logged at WARN level
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let error_type = self.error_type();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Error fetching tile: {}",
                self
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Tile not found: {}",
                self
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Rejected tile request: {}",
                self
            );
        }

        (status, message).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /{version}/{z}/{x}/{y}`
///
/// # Response
///
/// - `200 OK` with the stored JPEG bytes, streamed as-is
/// - `400`/`404`/`500` with a plain-text message (see [`TileError`])
///
/// # Headers
///
/// - `Content-Type: image/jpeg`
/// - `Cache-Control: public, max-age={cache_max_age}`
pub async fn tile_handler<S: ObjectStore + 'static>(
    State(state): State<AppState<S>>,
    params: Result<Path<TilePathParams>, PathRejection>,
    uri: Uri,
) -> Result<Response, TileError> {
    let params = match params {
        Ok(Path(params)) => params,
        Err(rejection) => {
            debug!(path = %uri.path(), "Falling back to raw path segments: {}", rejection);
            TilePathParams::from_raw_path(uri.path()).ok_or_else(|| {
                TileError::InvalidCoordinates {
                    value: uri.path().to_string(),
                }
            })?
        }
    };

    let tile = state.tile_service.get_tile(params.into()).await?;

    let key = tile.key;
    // Headers are already sent by the time a chunk fails; all we can do is log
    let body = tile.body.inspect_err(move |e| {
        error!(key = %key, "Tile stream failed mid-response: {}", e);
    });

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, TILE_CONTENT_TYPE.to_string()),
            (header::CACHE_CONTROL, state.cache_control()),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

/// Greeting on the root path. Never touches the store.
///
/// # Endpoint
///
/// `GET /`
pub async fn root_handler<S: ObjectStore + 'static>(State(state): State<AppState<S>>) -> String {
    state.greeting.to_string()
}

/// Health check endpoint.
///
/// Returns 200 OK with service status and version. Does not check the store.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
