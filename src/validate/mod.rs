//! Candidate validation pipeline
//!
//! Ordered, short-circuiting checks applied to every untrusted image
//! before it reaches the recognition service: size cap, magic-byte
//! sniffing cross-checked against the declared extension, and an
//! active-content scan for vector payloads. URL-sourced candidates are
//! additionally screened by [`urlguard`] before any request is issued;
//! the fetched bytes then run through the same checks as a local upload.

pub mod sanitize;
pub mod sniff;
pub mod urlguard;

use tracing::debug;

use crate::error::ValidationError;

pub use sniff::ImageKind;

/// Maximum accepted candidate size in bytes (5 MiB)
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// An untrusted image candidate. Immutable once received.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Raw byte content
    pub content: Vec<u8>,
    /// Declared filename, from the upload or the URL path
    pub filename: String,
    /// Declared content type, if the source provided one
    pub content_type: Option<String>,
}

impl Candidate {
    pub fn new(
        content: Vec<u8>,
        filename: impl Into<String>,
        content_type: Option<String>,
    ) -> Self {
        Self {
            content,
            filename: filename.into(),
            content_type,
        }
    }

    /// Byte length of the content
    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Declared lower-cased filename extension, if any
    fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        Some(ext.to_lowercase())
    }
}

/// Size check: pass iff the length does not exceed [`MAX_FILE_SIZE`]
pub fn check_size(byte_length: u64) -> Result<(), ValidationError> {
    if byte_length > MAX_FILE_SIZE {
        return Err(ValidationError::Oversized);
    }
    Ok(())
}

/// Run the full validation pipeline over a candidate.
///
/// Returns the sniffed kind on pass, or the first failure encountered:
/// size cap, then signature + extension cross-check (both must map to the
/// same kind), then the active-content scan for vector payloads.
pub fn validate(candidate: &Candidate) -> Result<ImageKind, ValidationError> {
    check_size(candidate.len())?;

    let sniffed = sniff::detect(&candidate.content).ok_or(ValidationError::TypeMismatch)?;
    let declared = candidate
        .extension()
        .and_then(|ext| ImageKind::from_extension(&ext))
        .ok_or(ValidationError::TypeMismatch)?;

    if sniffed != declared {
        debug!(
            "signature/extension mismatch for {}: sniffed {:?}, declared {:?}",
            candidate.filename, sniffed, declared
        );
        return Err(ValidationError::TypeMismatch);
    }

    if sniffed.is_vector() {
        // The sanitizer is a substring heuristic; a lossy decode is fine
        let text = String::from_utf8_lossy(&candidate.content);
        sanitize::scan(&text)?;
    }

    debug!("candidate {} validated as {:?}", candidate.filename, sniffed);
    Ok(sniffed)
}
