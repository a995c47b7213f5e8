//! Zone Tiles - a map tile server.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zone_tiles::{
    config::Config,
    server::{create_router, RouterConfig},
    store::{create_s3_client, ObjectStore, S3ObjectStore},
    tile::TileService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    run_serve(config).await
}

async fn run_serve(config: Config) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Zone Tiles v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Bucket: {}", config.s3_bucket);
    if let Some(prefix) = config.key_prefix() {
        info!("  Key prefix: {}", prefix);
    }
    if let Some(ref endpoint) = config.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  S3 region: {}", config.s3_region);
    info!("  Cache-Control max-age: {}s", config.cache_max_age);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    let s3_client = create_s3_client(config.s3_endpoint.as_deref(), &config.s3_region).await;
    let store = S3ObjectStore::new(s3_client, config.s3_bucket.clone());

    if config.skip_bucket_check {
        warn!("Skipping bucket check; storage errors will surface on first request");
    } else {
        info!("Checking bucket {}...", store.identifier());
        if let Err(e) = store.check_bucket().await {
            error!("Bucket check failed: {}", e);
            error!("Please check:");
            error!("  - Your credentials are configured correctly");
            error!("  - The bucket '{}' exists and is accessible", config.s3_bucket);
            error!("  - The S3 endpoint and region are correct (if using R2/MinIO)");
            return ExitCode::FAILURE;
        }
        info!("  Bucket reachable");
    }

    let mut tile_service = TileService::new(store);
    if let Some(ref prefix) = config.s3_prefix {
        tile_service = tile_service.with_key_prefix(prefix);
    }

    let router = create_router(tile_service, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  Fetch a tile: curl http://{}/v1/0/0/0", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "zone_tiles=debug,tower_http=debug"
    } else {
        "zone_tiles=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_greeting(config.greeting.clone())
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
