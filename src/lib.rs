//! # Zone Tiles
//!
//! A map tile server for versioned JPEG tile pyramids stored in S3-compatible
//! object storage (AWS S3, Cloudflare R2, MinIO).
//!
//! A request for `/{version}/{z}/{x}/{y}` is validated, mapped to the object
//! key `{version}/{z}/{x}/{y}.jpg`, fetched with a single store read and
//! streamed back with long-lived caching headers.
//!
//! ## Architecture
//!
//! - [`store`] - Object store trait and the S3 implementation
//! - [`tile`] - Path validation, key derivation and the tile service
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Store and tile error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use zone_tiles::{create_router, create_s3_client, RouterConfig, S3ObjectStore, TileService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = create_s3_client(Some("http://localhost:9000"), "auto").await;
//!     let store = S3ObjectStore::new(client, "tiles".to_string());
//!     let router = create_router(TileService::new(store), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8787").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod tile;

// Re-export commonly used types
pub use config::Config;
pub use error::{StoreError, TileError};
pub use server::{
    create_router, health_handler, root_handler, tile_handler, AppState, HealthResponse,
    RouterConfig, TilePathParams,
};
pub use store::{create_s3_client, ObjectBody, ObjectStore, S3ObjectStore, StoredObject};
pub use tile::{is_numeric, is_valid_version, TileKey, TileRequest, TileResponse, TileService};
