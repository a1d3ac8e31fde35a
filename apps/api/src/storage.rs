//! S3 / MinIO object uploads.
//!
//! Buckets are public-read; the returned URL is handed straight to clients
//! and stored on generation and payment rows.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;

/// Uploads `bytes` under `key` and returns the public URL.
pub async fn upload(
    s3: &S3Client,
    config: &Config,
    key: &str,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String, AppError> {
    let size = bytes.len();

    s3.put_object()
        .bucket(&config.s3_bucket)
        .key(key)
        .body(ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload of '{key}' failed: {e}")))?;

    let url = public_url(&config.s3_endpoint, &config.s3_bucket, key);
    info!(key, size, "uploaded object to S3");
    Ok(url)
}

fn public_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_shape() {
        assert_eq!(
            public_url("http://localhost:9000", "tailorcv", "resumes/abc.pdf"),
            "http://localhost:9000/tailorcv/resumes/abc.pdf"
        );
    }

    #[test]
    fn test_public_url_trims_trailing_slash() {
        assert_eq!(
            public_url("https://s3.example.com/", "tailorcv", "k"),
            "https://s3.example.com/tailorcv/k"
        );
    }
}
