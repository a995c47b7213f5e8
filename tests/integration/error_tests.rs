//! Error handling integration tests.
//!
//! Every failure path must answer with its fixed status and plain-text body,
//! and must never leak the underlying error detail.

use axum::http::StatusCode;
use bytes::Bytes;

use zone_tiles::error::StoreError;

use super::test_utils::{body_text, fake_jpeg, get, test_router, MockObjectStore};

const VERSION_MESSAGE: &str = "Invalid version format. Must be v1-v99.";
const COORDINATES_MESSAGE: &str = "Invalid tile coordinates";

// =============================================================================
// Input Validation
// =============================================================================

#[tokio::test]
async fn test_invalid_versions_rejected() {
    for version in ["v0", "v100", "V1", "version1", "v01", "1"] {
        let store = MockObjectStore::new();
        let router = test_router(store.clone());

        let response = get(router, &format!("/{}/0/0/0", version)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{version}");
        assert_eq!(body_text(response).await, VERSION_MESSAGE);
        assert_eq!(store.read_count(), 0);
    }
}

#[tokio::test]
async fn test_version_checked_before_coordinates() {
    let router = test_router(MockObjectStore::new());

    let response = get(router, "/v0/abc/abc/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, VERSION_MESSAGE);
}

#[tokio::test]
async fn test_non_numeric_coordinates_rejected() {
    for uri in ["/v1/abc/0/0", "/v1/0/abc/0", "/v1/0/0/abc", "/v1/0/0/NaN", "/v1/0/0/0.jpg"] {
        let store = MockObjectStore::new().with_object("v1/0/0/0.jpg", fake_jpeg());
        let router = test_router(store.clone());

        let response = get(router, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(response).await, COORDINATES_MESSAGE);
        assert_eq!(store.read_count(), 0);
    }
}

#[tokio::test]
async fn test_percent_encoded_whitespace_is_numeric() {
    // "%20" decodes to a blank segment, which converts to zero
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let response = get(router, "/v1/%20/0/0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.requested_keys().await, vec!["v1/ /0/0.jpg"]);
}

#[tokio::test]
async fn test_non_utf8_coordinate_rejected() {
    for uri in ["/v1/%FF/0/0", "/v1/0/%C3%28/0", "/v1/0/0/%FF"] {
        let store = MockObjectStore::new();
        let router = test_router(store.clone());

        let response = get(router, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(response).await, COORDINATES_MESSAGE);
        assert_eq!(store.read_count(), 0);
    }
}

#[tokio::test]
async fn test_non_utf8_version_rejected() {
    // Version is still checked first, even when a coordinate is also malformed
    for uri in ["/%FF/0/0/0", "/%FF/%FF/0/0"] {
        let store = MockObjectStore::new();
        let router = test_router(store.clone());

        let response = get(router, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(response).await, VERSION_MESSAGE);
        assert_eq!(store.read_count(), 0);
    }
}

#[tokio::test]
async fn test_next_line_is_not_whitespace() {
    // U+0085 is Unicode whitespace but Number() does not strip it
    let store = MockObjectStore::new().with_object("v1/5/0/0.jpg", fake_jpeg());
    let router = test_router(store.clone());

    let response = get(router, "/v1/%C2%855/0/0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, COORDINATES_MESSAGE);
    assert_eq!(store.read_count(), 0);
}

#[tokio::test]
async fn test_no_break_space_is_whitespace() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let response = get(router, "/v1/%C2%A05/0/0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.requested_keys().await, vec!["v1/\u{a0}5/0/0.jpg"]);
}

// =============================================================================
// Missing and Empty Objects
// =============================================================================

#[tokio::test]
async fn test_tile_not_found() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let response = get(router, "/v1/0/0/0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Tile not found");
    assert_eq!(store.read_count(), 1);
}

#[tokio::test]
async fn test_tile_without_body() {
    let store = MockObjectStore::new().with_bodyless_object("v1/0/0/0.jpg");
    let router = test_router(store);

    let response = get(router, "/v1/0/0/0").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Tile content is empty");
}

#[tokio::test]
async fn test_tile_with_zero_length_body() {
    let store = MockObjectStore::new().with_chunks("v1/0/0/0.jpg", vec![Bytes::new()]);
    let router = test_router(store);

    let response = get(router, "/v1/0/0/0").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Tile content is empty");
}

// =============================================================================
// Store Failures
// =============================================================================

async fn assert_store_failure(error: StoreError, status: StatusCode, message: &str) {
    let store = MockObjectStore::new().with_failure("v1/0/0/0.jpg", error);
    let router = test_router(store);

    let response = get(router, "/v1/0/0/0").await;
    assert_eq!(response.status(), status);

    let text = body_text(response).await;
    assert_eq!(text, message);
    assert!(!text.contains("detail-marker"));
}

#[tokio::test]
async fn test_misconfigured_store() {
    assert_store_failure(
        StoreError::Misconfigured("NoSuchBucket detail-marker".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR,
        "Invalid tile format or bucket configuration",
    )
    .await;
}

#[tokio::test]
async fn test_out_of_range_store_error() {
    assert_store_failure(
        StoreError::OutOfRange("KeyTooLongError detail-marker".to_string()),
        StatusCode::BAD_REQUEST,
        "Tile coordinates are out of range",
    )
    .await;
}

#[tokio::test]
async fn test_other_store_error() {
    assert_store_failure(
        StoreError::Backend("connection reset detail-marker".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
    )
    .await;
}

#[tokio::test]
async fn test_root_unaffected_by_store_failures() {
    let store = MockObjectStore::new()
        .with_failure("v1/0/0/0.jpg", StoreError::Backend("down".to_string()));
    let router = test_router(store);

    let response = get(router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Tile server for stalker2.zone");
}
