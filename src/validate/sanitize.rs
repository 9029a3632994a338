//! Active-content screening for vector image payloads
//!
//! A substring denylist over the lower-cased SVG text. This is a
//! heuristic layer, not a parser and not a security boundary on its own:
//! it can reject harmless content that merely mentions a blocked token,
//! and it cannot catch an obfuscated payload. It backstops the signature
//! check rather than replacing it.

use crate::error::ValidationError;

/// Substrings that indicate active content inside an SVG. Matched against
/// the lower-cased payload, so `function(` covers the `Function(`
/// constructor as well.
const DENYLIST: &[&str] = &[
    "<script",
    "javascript:",
    "data:",
    "onload=",
    "onerror=",
    "onclick=",
    "onmouseover=",
    "eval(",
    "function(",
];

/// Scan decoded text for active-content patterns
pub fn scan(content: &str) -> Result<(), ValidationError> {
    let lowered = content.to_lowercase();
    if DENYLIST.iter().any(|pattern| lowered.contains(pattern)) {
        return Err(ValidationError::MaliciousContent);
    }
    Ok(())
}
