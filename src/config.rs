//! Configuration management for the tile server.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TILES_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `TILES_HOST` - Server bind address (default: 0.0.0.0)
//! - `TILES_PORT` - Server port (default: 8787)
//! - `TILES_S3_BUCKET` - Bucket holding the tiles (required)
//! - `TILES_S3_PREFIX` - Key prefix inside the bucket
//! - `TILES_S3_ENDPOINT` - Custom endpoint for S3-compatible services (R2, MinIO)
//! - `TILES_S3_REGION` - Region (default: auto)
//! - `TILES_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 31536000)
//! - `TILES_GREETING` - Text served on `/`
//! - `TILES_CORS_ORIGINS` - Allowed CORS origins, comma-separated
//! - `TILES_SKIP_BUCKET_CHECK` - Skip the bucket check at startup

use clap::Parser;

use crate::server::{DEFAULT_CACHE_MAX_AGE, DEFAULT_GREETING};
use crate::tile::normalize_prefix;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8787;

/// Default region. R2 accepts "auto"; AWS users set their bucket's region.
pub const DEFAULT_REGION: &str = "auto";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Zone Tiles - a map tile server.
///
/// Serves versioned JPEG map tiles stored in S3 or S3-compatible storage
/// under `{version}/{z}/{x}/{y}.jpg`.
#[derive(Parser, Debug, Clone)]
#[command(name = "zone-tiles")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TILES_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TILES_PORT")]
    pub port: u16,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Bucket containing the tiles.
    #[arg(long, env = "TILES_S3_BUCKET")]
    pub s3_bucket: String,

    /// Key prefix inside the bucket (e.g. "stalker2").
    #[arg(long, env = "TILES_S3_PREFIX")]
    pub s3_prefix: Option<String>,

    /// Custom endpoint URL for S3-compatible services (R2, MinIO, etc.).
    ///
    /// If not specified, uses the default AWS S3 endpoint.
    #[arg(long, env = "TILES_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Region of the bucket.
    #[arg(long, default_value = DEFAULT_REGION, env = "TILES_S3_REGION")]
    pub s3_region: String,

    /// Skip the bucket reachability check at startup.
    #[arg(long, default_value_t = false, env = "TILES_SKIP_BUCKET_CHECK")]
    pub skip_bucket_check: bool,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// HTTP Cache-Control max-age in seconds for tiles.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "TILES_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Text served on the root path.
    #[arg(long, default_value = DEFAULT_GREETING, env = "TILES_GREETING")]
    pub greeting: String,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TILES_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.s3_bucket.trim().is_empty() {
            return Err(
                "Bucket name is required. Set --s3-bucket or TILES_S3_BUCKET".to_string(),
            );
        }

        if self.s3_region.trim().is_empty() {
            return Err("Region must not be empty. Use \"auto\" for R2".to_string());
        }

        if let Some(ref prefix) = self.s3_prefix {
            if normalize_prefix(prefix).is_none() {
                return Err(format!(
                    "Key prefix {:?} is empty once slashes are removed",
                    prefix
                ));
            }
        }

        if let Some(ref endpoint) = self.s3_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "S3 endpoint must be an http(s) URL, got {:?}",
                    endpoint
                ));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Key prefix with surrounding slashes removed.
    pub fn key_prefix(&self) -> Option<String> {
        self.s3_prefix.as_deref().and_then(normalize_prefix)
    }
}

// =============================================================================
// Tests
// =============================================================================
