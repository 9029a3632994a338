//! Translation collaborator contract
//!
//! Sends the recognized text chunks plus a target language code and gets
//! back a parallel sequence of translated strings.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Limits;
use crate::error::{PipelineError, ServiceStage};
use crate::services::{build_client, read_bounded_body};

const STAGE: ServiceStage = ServiceStage::Translation;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslationRequest<'a> {
    target_language: &'a str,
    text_chunks: &'a [String],
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    #[serde(default)]
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationItem {
    translated_text: String,
}

/// Translate recognized text chunks into the target language
pub async fn translate(
    endpoint: &str,
    target_language: &str,
    text_chunks: &[String],
    limits: &Limits,
) -> Result<Vec<String>, PipelineError> {
    info!(
        "Requesting translation of {} chunks into {}",
        text_chunks.len(),
        target_language
    );

    let client = build_client(limits, STAGE)?;
    let request = TranslationRequest {
        target_language,
        text_chunks,
    };

    let response = client
        .post(endpoint)
        .json(&request)
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
    let parsed: TranslationResponse = serde_json::from_slice(&body)
        .map_err(|e| PipelineError::service(STAGE, format!("malformed response: {e}")))?;

    let translated: Vec<String> = parsed
        .translations
        .into_iter()
        .map(|item| item.translated_text)
        .collect();

    debug!("translation returned {} chunks", translated.len());
    Ok(translated)
}
