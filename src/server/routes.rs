//! Router configuration for the tile server.
//!
//! This module defines the HTTP routes and applies middleware for CORS and
//! request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                              - Greeting text
//! /health                        - Health check
//! /{version}/{z}/{x}/{y}         - Tile endpoint
//! ```
//!
//! # Example
//!
//! ```ignore
//! use zone_tiles::server::routes::{create_router, RouterConfig};
//! use zone_tiles::store::S3ObjectStore;
//! use zone_tiles::tile::TileService;
//!
//! let tile_service = TileService::new(S3ObjectStore::new(client, "tiles".to_string()));
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://stalker2.zone".to_string()]);
//!
//! let router = create_router(tile_service, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8787").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, root_handler, tile_handler, AppState, DEFAULT_CACHE_MAX_AGE, DEFAULT_GREETING,
};
use crate::store::ObjectStore;
use crate::tile::TileService;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,

    /// Text served on `/`
    pub greeting: String,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Cache max-age is one year (31536000 seconds)
    /// - The greeting is [`DEFAULT_GREETING`]
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            greeting: DEFAULT_GREETING.to_string(),
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Set the greeting served on `/`.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - The greeting, health and tile routes
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<S>(tile_service: TileService<S>, config: RouterConfig) -> Router
where
    S: ObjectStore + 'static,
{
    let app_state = AppState::new(tile_service)
        .with_cache_max_age(config.cache_max_age)
        .with_greeting(config.greeting.clone());

    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/", get(root_handler::<S>))
        .route("/health", get(health_handler))
        .route("/{version}/{z}/{x}/{y}", get(tile_handler::<S>))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
