//! Tile service layer.
//!
//! This module turns raw tile path segments into object-store reads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │ TileRequest
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  validation  │  │  key prefixing  │  │
//! │  │  (v1..v99,   │  │  (TileKey →     │  │
//! │  │   numbers)   │  │   object key)   │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              ObjectStore                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use zone_tiles::tile::TileRequest;
//!
//! let key = TileRequest::new("v1", "4", "7", "2").validate().unwrap();
//! assert_eq!(key.as_str(), "v1/4/7/2.jpg");
//!
//! assert!(TileRequest::new("v100", "4", "7", "2").validate().is_err());
//! ```

mod request;
mod service;

pub use request::{
    is_numeric, is_valid_version, normalize_prefix, TileKey, TileRequest, TILE_EXTENSION,
};
pub use service::{TileResponse, TileService};
