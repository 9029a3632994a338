//! File format sniffing from magic bytes
//!
//! Filenames and declared content types are attacker controlled; the
//! leading bytes are what actually identify a format. The pipeline only
//! accepts a candidate when the sniffed signature and the declared
//! extension agree, which defeats extension renaming but not a payload
//! whose first four bytes are forged.

/// Canonical image kinds accepted by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Bmp,
    Svg,
}

impl ImageKind {
    /// Map a lower-cased filename extension to a kind
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "bmp" => Some(ImageKind::Bmp),
            "svg" => Some(ImageKind::Svg),
            _ => None,
        }
    }

    /// Text-decodable kinds get an extra active-content scan
    pub fn is_vector(&self) -> bool {
        matches!(self, ImageKind::Svg)
    }
}

/// Known leading-byte signatures, hex-encoded. The list is ordered and
/// the first matching prefix wins, so a prefix must come before any
/// longer pattern it would shadow.
const SIGNATURES: &[(&str, ImageKind)] = &[
    ("FFD8FF", ImageKind::Jpeg),
    ("89504E47", ImageKind::Png),
    ("424D", ImageKind::Bmp),
    ("3C3F786D", ImageKind::Svg),
];

/// Identify the content type from the first four bytes.
/// Returns `None` for anything outside the signature table.
pub fn detect(content: &[u8]) -> Option<ImageKind> {
    let header: String = content
        .iter()
        .take(4)
        .map(|byte| format!("{:02X}", byte))
        .collect();

    SIGNATURES
        .iter()
        .find(|(signature, _)| header.starts_with(signature))
        .map(|&(_, kind)| kind)
}
