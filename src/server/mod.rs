//! HTTP server layer for the tile server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │               GET /{version}/{z}/{x}/{y}                        │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (requests, error bodies) │  │  (router, CORS, tracing)    │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, root_handler, tile_handler, AppState, HealthResponse, TilePathParams,
    DEFAULT_CACHE_MAX_AGE, DEFAULT_GREETING, TILE_CONTENT_TYPE,
};
pub use routes::{create_router, RouterConfig};
