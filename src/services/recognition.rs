//! Recognition collaborator contract
//!
//! POSTs validated image bytes as multipart form data and maps the
//! returned polygons into [`Region`] values. The service returns two
//! polygon shapes in practice, multi-vertex outlines and single-point
//! markers; both are accepted without assuming a fixed vertex count.

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Limits;
use crate::error::{PipelineError, ServiceStage};
use crate::geometry::{Point, Region, RegionShape};
use crate::services::{build_client, read_bounded_body};
use crate::validate::Candidate;

const STAGE: ServiceStage = ServiceStage::Recognition;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionResponse {
    #[serde(default)]
    recognized_text: Vec<RecognizedItem>,
}

#[derive(Debug, Deserialize)]
struct RecognizedItem {
    text: String,
    polygon: Vec<Point>,
}

/// All regions recognized in one image
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub regions: Vec<Region>,
}

impl RecognitionResult {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Text chunks in region order, for the translation request
    pub fn texts(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.text.clone()).collect()
    }
}

/// Send validated image bytes to the recognition service
pub async fn recognize(
    endpoint: &str,
    candidate: &Candidate,
    limits: &Limits,
) -> Result<RecognitionResult, PipelineError> {
    info!("Requesting text recognition for {}", candidate.filename);

    let client = build_client(limits, STAGE)?;

    let mut part = reqwest::multipart::Part::bytes(candidate.content.clone())
        .file_name(candidate.filename.clone());
    if let Some(content_type) = &candidate.content_type {
        part = part
            .mime_str(content_type)
            .map_err(|e| PipelineError::service(STAGE, format!("bad content type: {e}")))?;
    }
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = client
        .post(endpoint)
        .multipart(form)
        .send()
        .await
        .map_err(|e| PipelineError::service(STAGE, e.to_string()))?;

    if !response.status().is_success() {
        return Err(PipelineError::service(
            STAGE,
            format!("status {}", response.status()),
        ));
    }

    let body = read_bounded_body(response, limits, STAGE).await?;
    let parsed: RecognitionResponse = serde_json::from_slice(&body)
        .map_err(|e| PipelineError::service(STAGE, format!("malformed response: {e}")))?;

    let result = into_regions(parsed)?;
    debug!("recognition returned {} regions", result.regions.len());
    Ok(result)
}

/// Map wire items into regions. An empty polygon violates the contract.
fn into_regions(response: RecognitionResponse) -> Result<RecognitionResult, PipelineError> {
    let mut regions = Vec::with_capacity(response.recognized_text.len());
    for item in response.recognized_text {
        let shape = RegionShape::from_vertices(item.polygon)
            .ok_or_else(|| PipelineError::service(STAGE, "region with empty polygon in response"))?;
        regions.push(Region {
            text: item.text,
            shape,
        });
    }
    Ok(RecognitionResult { regions })
}
