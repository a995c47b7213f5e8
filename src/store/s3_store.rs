use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use futures::stream::{self, StreamExt};
use tracing::debug;

use super::{ObjectBody, ObjectStore, StoredObject};
use crate::error::StoreError;

/// S3-backed implementation of [`ObjectStore`].
///
/// Works against AWS S3 and S3-compatible services (Cloudflare R2, MinIO).
/// Object keys are passed through unchanged; prefixing is the caller's job.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    identifier: String,
}

impl S3ObjectStore {
    /// Create a new store reading from the given bucket.
    pub fn new(client: Client, bucket: String) -> Self {
        let identifier = format!("s3://{}", bucket);
        Self {
            client,
            bucket,
            identifier,
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Check that the bucket exists and the credentials can reach it.
    ///
    /// Issues a HEAD request against the bucket.
    pub async fn check_bucket(&self) -> Result<(), StoreError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                let detail = format!("s3://{}: {}", self.bucket, e);
                match (&e, status) {
                    (SdkError::ConstructionFailure(_), _) => StoreError::Misconfigured(detail),
                    (_, Some(301 | 403 | 404)) => StoreError::Misconfigured(detail),
                    _ => StoreError::Backend(detail),
                }
            })?;

        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                let detail = format!("s3://{}/{}: {}", self.bucket, key, e);
                return match classify_get_object_error(&e) {
                    FailureClass::Missing => {
                        debug!(key = key, "Object not found in bucket");
                        Ok(None)
                    }
                    FailureClass::Misconfigured => Err(StoreError::Misconfigured(detail)),
                    FailureClass::OutOfRange => Err(StoreError::OutOfRange(detail)),
                    FailureClass::Backend => Err(StoreError::Backend(detail)),
                };
            }
        };

        let size = resp.content_length().and_then(|len| u64::try_from(len).ok());

        // Zero-length objects still carry a byte stream; treat them as bodyless
        let object = match size {
            Some(0) => StoredObject::without_body(key).with_size(0),
            Some(size) => StoredObject::new(key, byte_stream_body(resp.body)).with_size(size),
            None => StoredObject::new(key, byte_stream_body(resp.body)),
        };

        Ok(Some(object))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Adapt an SDK byte stream into an [`ObjectBody`].
fn byte_stream_body(body: ByteStream) -> ObjectBody {
    stream::unfold(body, |mut body| async move {
        body.next().await.map(|chunk| {
            let chunk = chunk.map_err(|e| StoreError::Backend(e.to_string()));
            (chunk, body)
        })
    })
    .boxed()
}

// =============================================================================
// Error Classification
// =============================================================================

/// How a failed S3 read should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    Missing,
    Misconfigured,
    OutOfRange,
    Backend,
}

/// Error codes that point at the bucket or credential setup.
const MISCONFIGURED_CODES: &[&str] = &[
    "NoSuchBucket",
    "InvalidBucketName",
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "PermanentRedirect",
    "AuthorizationHeaderMalformed",
];

/// Error codes that point at an unusable key or range.
const OUT_OF_RANGE_CODES: &[&str] = &["InvalidRange", "KeyTooLongError", "InvalidArgument"];

fn classify_get_object_error(err: &SdkError<GetObjectError>) -> FailureClass {
    match err {
        SdkError::ConstructionFailure(_) => FailureClass::Misconfigured,
        SdkError::ServiceError(service_err) => {
            if service_err.err().is_no_such_key() {
                return FailureClass::Missing;
            }
            let status = service_err.raw().status().as_u16();
            classify_service_failure(err.code(), Some(status))
        }
        _ => FailureClass::Backend,
    }
}

/// Classify a service-level failure by its S3 error code and HTTP status.
///
/// The code wins when it is recognised; the status is the fallback for
/// responses without a parseable body (HEAD-style 404s, proxies).
fn classify_service_failure(code: Option<&str>, status: Option<u16>) -> FailureClass {
    if let Some(code) = code {
        if code == "NoSuchKey" || code == "NotFound" {
            return FailureClass::Missing;
        }
        if MISCONFIGURED_CODES.contains(&code) {
            return FailureClass::Misconfigured;
        }
        if OUT_OF_RANGE_CODES.contains(&code) {
            return FailureClass::OutOfRange;
        }
    }

    match status {
        Some(404) if code.is_none() => FailureClass::Missing,
        Some(301 | 403) => FailureClass::Misconfigured,
        Some(416) => FailureClass::OutOfRange,
        _ => FailureClass::Backend,
    }
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like R2 or MinIO:
/// ```ignore
/// let client = create_s3_client(Some("https://<account>.r2.cloudflarestorage.com"), "auto").await;
/// ```
///
/// For AWS S3, pass `None` to use the default endpoint:
/// ```ignore
/// let client = create_s3_client(None, "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services generally expect path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
