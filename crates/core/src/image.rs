//! Image reference rules shared by the store, viewer, editor and exporter.
//!
//! A reference is one of: empty, a remote URL, a relative asset path, an
//! embedded data URI, or a transient blob URI. Blob URIs only live as long as
//! the page that created them, so they are replaced with placeholders before
//! they are persisted or exported.

use crate::error::{Error, Result};
use std::collections::HashSet;

/// Scheme of references that do not survive a reload.
pub const BLOB_SCHEME: &str = "blob:";

/// Scheme of embedded image data.
pub const DATA_SCHEME: &str = "data:";

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Placeholder used for the hero image.
pub const HERO_PLACEHOLDER: &str = "/placeholder.svg?height=600&width=400&text=Hero+Image";

/// Placeholder given to a newly added feature.
pub const NEW_FEATURE_PLACEHOLDER: &str = "/placeholder.svg?height=400&width=600&text=New+Feature";

/// Shown by the viewer when a reference is empty.
pub const NO_IMAGE_PLACEHOLDER: &str = "/placeholder.svg?height=400&width=600&text=No+Image";

/// Shown by the viewer when a reference is known to fail.
pub const IMAGE_ERROR_PLACEHOLDER: &str = "/placeholder.svg?height=400&width=600&text=Image+Error";

/// Classification of an image reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef {
    Empty,
    /// `http://` or `https://` URL.
    Remote,
    /// `data:` URI.
    Data,
    /// Transient `blob:` URI.
    Blob,
    /// Anything else, e.g. a site-relative asset path.
    Asset,
}

impl ImageRef {
    /// Classify a reference.
    pub fn classify(reference: &str) -> Self {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if trimmed.starts_with(DATA_SCHEME) {
            Self::Data
        } else if trimmed.starts_with(BLOB_SCHEME) {
            Self::Blob
        } else if trimmed.starts_with("http") {
            Self::Remote
        } else {
            Self::Asset
        }
    }

    /// Whether the reference stays valid after the session ends.
    pub fn is_durable(self) -> bool {
        !matches!(self, Self::Blob)
    }
}

/// Build a placeholder reference carrying dimensions and a text label.
pub fn placeholder_url(height: u32, width: u32, label: &str) -> String {
    format!(
        "/placeholder.svg?height={}&width={}&text={}",
        height,
        width,
        urlencoding::encode(label)
    )
}

/// Placeholder for a feature image, labelled with the feature title.
pub fn feature_placeholder(title: &str) -> String {
    placeholder_url(400, 600, title)
}

/// Replace a transient blob reference with `fallback`, keeping everything else.
///
/// Returns `None` when the reference is already durable.
pub fn sanitize_blob(reference: &str, fallback: impl FnOnce() -> String) -> Option<String> {
    if ImageRef::classify(reference) == ImageRef::Blob {
        Some(fallback())
    } else {
        None
    }
}

/// Resolve the reference the exporter should load for an image slot.
///
/// Empty and blob references become a placeholder labelled with `label`
/// (usually the slide title), since an exported document must stay valid
/// after the session ends.
pub fn export_source(reference: &str, label: &str) -> String {
    match ImageRef::classify(reference) {
        ImageRef::Empty | ImageRef::Blob => feature_placeholder(label),
        ImageRef::Remote | ImageRef::Data | ImageRef::Asset => reference.to_string(),
    }
}

/// References that failed to load, so repeated renders do not retry them.
#[derive(Debug, Clone, Default)]
pub struct ImageErrorSet {
    failed: HashSet<String>,
}

impl ImageErrorSet {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `reference` failed to load.
    pub fn record_failure(&mut self, reference: &str) {
        log::warn!("Image failed to load: {}", truncate_for_log(reference));
        self.failed.insert(reference.to_string());
    }

    /// Record that `reference` loaded, clearing any earlier failure.
    pub fn record_success(&mut self, reference: &str) {
        if self.failed.remove(reference) {
            log::debug!("Image recovered: {}", truncate_for_log(reference));
        }
    }

    /// Whether `reference` is known to fail.
    pub fn contains(&self, reference: &str) -> bool {
        self.failed.contains(reference)
    }

    /// Resolve the reference the viewer should display.
    pub fn viewer_source(&self, reference: &str) -> String {
        if ImageRef::classify(reference) == ImageRef::Empty {
            return NO_IMAGE_PLACEHOLDER.to_string();
        }
        if self.contains(reference) {
            return IMAGE_ERROR_PLACEHOLDER.to_string();
        }
        reference.to_string()
    }
}

/// Validate a user-selected file before it is turned into an image reference.
pub fn validate_upload(mime_type: &str, size: u64) -> Result<()> {
    if !mime_type.starts_with("image/") {
        return Err(Error::NotAnImage(mime_type.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(Error::FileTooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Data URIs can be megabytes long; keep log lines readable.
fn truncate_for_log(reference: &str) -> &str {
    match reference.char_indices().nth(50) {
        Some((idx, _)) => &reference[..idx],
        None => reference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(ImageRef::classify(""), ImageRef::Empty);
        assert_eq!(ImageRef::classify("   "), ImageRef::Empty);
        assert_eq!(ImageRef::classify("data:image/png;base64,AAAA"), ImageRef::Data);
        assert_eq!(
            ImageRef::classify("blob:http://localhost/1234"),
            ImageRef::Blob
        );
        assert_eq!(ImageRef::classify("https://cdn.test/a.png"), ImageRef::Remote);
        assert_eq!(ImageRef::classify(HERO_PLACEHOLDER), ImageRef::Asset);
    }

    #[test]
    fn test_placeholder_url_encodes_label() {
        assert_eq!(
            feature_placeholder("AI & ML"),
            "/placeholder.svg?height=400&width=600&text=AI%20%26%20ML"
        );
    }

    #[test]
    fn test_sanitize_blob_only_touches_blobs() {
        assert_eq!(
            sanitize_blob("blob:abc", || "x".to_string()),
            Some("x".to_string())
        );
        assert_eq!(sanitize_blob("data:image/png;base64,AA", || "x".to_string()), None);
        assert_eq!(sanitize_blob("https://a/b.png", || "x".to_string()), None);
    }

    #[test]
    fn test_export_source() {
        assert_eq!(
            export_source("blob:abc", "Threat Detection"),
            "/placeholder.svg?height=400&width=600&text=Threat%20Detection"
        );
        assert_eq!(
            export_source("", "Hero"),
            "/placeholder.svg?height=400&width=600&text=Hero"
        );
        assert_eq!(export_source("https://a/b.png", "x"), "https://a/b.png");
    }

    #[test]
    fn test_viewer_source_with_error_set() {
        let mut errors = ImageErrorSet::new();
        assert_eq!(errors.viewer_source(""), NO_IMAGE_PLACEHOLDER);
        assert_eq!(errors.viewer_source("https://a/b.png"), "https://a/b.png");

        errors.record_failure("https://a/b.png");
        assert_eq!(errors.viewer_source("https://a/b.png"), IMAGE_ERROR_PLACEHOLDER);

        errors.record_success("https://a/b.png");
        assert_eq!(errors.viewer_source("https://a/b.png"), "https://a/b.png");
    }

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload("image/png", 1024).is_ok());
        assert!(matches!(
            validate_upload("application/pdf", 1024),
            Err(Error::NotAnImage(_))
        ));
        assert!(matches!(
            validate_upload("image/jpeg", MAX_UPLOAD_BYTES + 1),
            Err(Error::FileTooLarge { .. })
        ));
        assert!(validate_upload("image/jpeg", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_upload_error_messages() {
        let err = validate_upload("image/jpeg", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 10MB.");
        assert!(err.is_validation());
    }
}
