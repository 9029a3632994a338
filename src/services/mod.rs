//! Service layer
//!
//! Request/response contracts for the two external collaborators,
//! consumed as opaque HTTP endpoints. Every call carries a fixed timeout
//! and body cap, so a slow or oversized response is a failure rather
//! than a hang.

pub mod recognition;
pub mod translation;

use std::time::Duration;

use crate::config::Limits;
use crate::error::{PipelineError, ServiceStage};

/// HTTP client with the standard per-call timeout
pub(crate) fn build_client(
    limits: &Limits,
    stage: ServiceStage,
) -> Result<reqwest::Client, PipelineError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(limits.request_timeout_secs))
        .build()
        .map_err(|e| PipelineError::service(stage, format!("failed to build HTTP client: {e}")))
}

/// Read a response body, enforcing the configured size cap
pub(crate) async fn read_bounded_body(
    response: reqwest::Response,
    limits: &Limits,
    stage: ServiceStage,
) -> Result<Vec<u8>, PipelineError> {
    if let Some(declared_len) = response.content_length() {
        if declared_len > limits.max_body_bytes {
            return Err(PipelineError::service(stage, "response exceeds size limit"));
        }
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PipelineError::service(stage, format!("error reading response: {e}")))?;

    if bytes.len() as u64 > limits.max_body_bytes {
        return Err(PipelineError::service(stage, "response exceeds size limit"));
    }

    Ok(bytes.to_vec())
}
