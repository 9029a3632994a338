//! Remote candidate fetching
//!
//! URL-sourced images are screened by the URL guard before any request
//! goes out, then streamed with a hard size cap so an unbounded body is
//! never buffered. Fetched bytes are not trusted any further than a
//! local upload: the caller runs them through the same validation
//! pipeline afterwards.

use std::time::Duration;

use futures_util::StreamExt;
use tracing::{debug, info};

use crate::config::Limits;
use crate::error::{PipelineError, ValidationError};
use crate::validate::{urlguard, Candidate};

/// Fetch a remote image candidate
pub async fn fetch_candidate(raw_url: &str, limits: &Limits) -> Result<Candidate, PipelineError> {
    let url = urlguard::check(raw_url)?;

    info!("Fetching remote image from {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(limits.request_timeout_secs))
        .build()
        .map_err(|e| PipelineError::decode(format!("failed to build HTTP client: {e}")))?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| PipelineError::decode(format!("failed to fetch image: {e}")))?;

    if !response.status().is_success() {
        return Err(PipelineError::decode(format!(
            "failed to fetch image: status {}",
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    // The response must declare itself an image before we buffer anything
    match content_type.as_deref() {
        Some(ct) if ct.starts_with("image/") => {}
        _ => return Err(ValidationError::TypeMismatch.into()),
    }

    if let Some(declared_len) = response.content_length() {
        if declared_len > limits.max_body_bytes {
            return Err(ValidationError::Oversized.into());
        }
    }

    let mut content = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| PipelineError::decode(format!("error reading image stream: {e}")))?;
        if (content.len() + chunk.len()) as u64 > limits.max_body_bytes {
            return Err(ValidationError::Oversized.into());
        }
        content.extend_from_slice(&chunk);
    }

    let filename = filename_from_url(&url);
    debug!("fetched {} bytes as {}", content.len(), filename);

    Ok(Candidate::new(content, filename, content_type))
}

/// Last path segment of the URL, or a placeholder when the path has none.
/// Validation still requires an allowed extension, so an extensionless
/// URL is rejected downstream as a type mismatch.
fn filename_from_url(url: &url::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| "image-from-url".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        let url = url::Url::parse("https://example.com/photos/cat.png").unwrap();
        assert_eq!(filename_from_url(&url), "cat.png");

        let url = url::Url::parse("https://example.com/photos/").unwrap();
        assert_eq!(filename_from_url(&url), "image-from-url");

        let url = url::Url::parse("https://example.com").unwrap();
        assert_eq!(filename_from_url(&url), "image-from-url");
    }

    #[tokio::test]
    async fn test_guard_runs_before_any_request() {
        let limits = Limits::default();

        // Unfetchable targets fail at the guard, not with a network error
        let err = fetch_candidate("ftp://example.com/z", &limits)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::BadUrlProtocol)
        ));

        let err = fetch_candidate("http://127.0.0.1/x", &limits)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::PrivateNetworkBlocked)
        ));
    }
}
