//! Base64 image helpers.
//!
//! The service takes and returns bare base64 (no `data:` URI prefix), with
//! uploads capped at 500 KB.

use crate::{Error, ErrorContext, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Upload limit for the `image` parameter, in bytes of base64 text.
pub const MAX_IMAGE_BYTES: usize = 500 * 1024;

/// Prefix browsers put in front of inline JPEG data.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Drop a leading `data:<mime>;base64,` prefix if present.
pub fn strip_data_uri(image: &str) -> &str {
    let trimmed = image.trim();
    if let Some(rest) = trimmed.strip_prefix("data:") {
        if let Some(idx) = rest.find(";base64,") {
            return &rest[idx + ";base64,".len()..];
        }
    }
    trimmed
}

/// Encode raw image bytes for upload.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Read an image file and encode it for upload.
pub fn encode_file(path: impl AsRef<Path>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(encode(&bytes))
}

/// Check an upload against the service's preconditions and return the bare base64.
pub(crate) fn validate(image: &str) -> Result<&str> {
    let image = strip_data_uri(image);
    if image.is_empty() {
        return Err(Error::validation("image", "no image uploaded"));
    }
    if image.len() > MAX_IMAGE_BYTES {
        return Err(Error::validation_with_context(
            "image exceeds the upload limit",
            ErrorContext::for_field("image")
                .and_details(format!("{} > {} bytes", image.len(), MAX_IMAGE_BYTES)),
        ));
    }
    Ok(image)
}

/// Processed image returned by the image-effect endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    base64: String,
}

impl ImageResult {
    pub fn new(base64: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
        }
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn into_base64(self) -> String {
        self.base64
    }

    /// Inline form suitable for an `<img src>` attribute.
    pub fn to_data_uri(&self) -> String {
        format!("{}{}", JPEG_DATA_URI_PREFIX, self.base64)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.base64.as_bytes())
            .map_err(|e| Error::InvalidResponse(format!("image is not valid base64: {}", e)))
    }
}

impl AsRef<str> for ImageResult {
    fn as_ref(&self) -> &str {
        &self.base64
    }
}

impl PartialEq<&str> for ImageResult {
    fn eq(&self, other: &&str) -> bool {
        self.base64 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn strips_any_base64_data_uri() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("  QUJD \n"), "QUJD");
        assert_eq!(strip_data_uri("data:text/plain,hi"), "data:text/plain,hi");
    }

    #[test]
    fn empty_image_is_rejected() {
        let err = validate("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = validate("data:image/jpeg;base64,").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let big = "A".repeat(MAX_IMAGE_BYTES + 1);
        let err = validate(&big).unwrap_err();
        assert_eq!(err.field(), Some("image"));
        let exact = "A".repeat(MAX_IMAGE_BYTES);
        assert!(validate(&exact).is_ok());
    }

    #[test]
    fn result_helpers() {
        let img = ImageResult::new(encode(b"jpeg"));
        assert_eq!(img.decode().unwrap(), b"jpeg");
        assert_eq!(img.to_data_uri(), "data:image/jpeg;base64,anBlZw==");
        assert!(ImageResult::new("%%%").decode().is_err());
    }
}
