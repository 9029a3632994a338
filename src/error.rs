//! Failure taxonomy for the validation and translation pipeline
//!
//! Every rejected candidate carries a typed reason so callers can surface
//! a human-readable message without string matching. Validation failures
//! are terminal for the candidate. Service failures keep the failing
//! stage visible: a recognition failure requires a re-upload, a
//! translation failure only needs the translation retried.

use thiserror::Error;

use crate::validate::MAX_FILE_SIZE;

/// Reasons a candidate can be rejected before any service call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("file size exceeds {}MB limit", MAX_FILE_SIZE / 1024 / 1024)]
    Oversized,
    #[error("invalid file type, only JPEG, PNG, BMP and SVG files are allowed")]
    TypeMismatch,
    #[error("file contains potentially malicious content")]
    MaliciousContent,
    #[error("invalid URL protocol, only HTTP and HTTPS are allowed")]
    BadUrlProtocol,
    #[error("access to local or private networks is not allowed")]
    PrivateNetworkBlocked,
}

/// Which external collaborator a service failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStage {
    Recognition,
    Translation,
}

impl std::fmt::Display for ServiceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStage::Recognition => write!(f, "recognition"),
            ServiceStage::Translation => write!(f, "translation"),
        }
    }
}

/// Failure of a full upload/translate cycle
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Image or file unreadable: failed reads, failed fetches, undecodable pixels
    #[error("failed to load the image: {0}")]
    Decode(String),
    #[error("{stage} service failed: {message}")]
    Service { stage: ServiceStage, message: String },
}

impl PipelineError {
    pub fn service(stage: ServiceStage, message: impl Into<String>) -> Self {
        PipelineError::Service {
            stage,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        PipelineError::Decode(message.into())
    }
}
