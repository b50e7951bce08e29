//! Retrieval of remote assets for export.
//!
//! The renderer never talks to the network itself. Hosts hand it a
//! [`Fetcher`]: an HTTP client on the command line, or assets the page
//! already downloaded in the browser.

use showcase_core::{Error, Result};
use std::collections::HashMap;

/// Body and declared content type of a retrieved asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// `Content-Type` without parameters, when the source declared one.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Fetched {
    pub fn new(mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.and_then(essence),
            bytes,
        }
    }
}

/// Strip parameters from a content type: `image/svg+xml; charset=utf-8`
/// becomes `image/svg+xml`.
fn essence(content_type: &str) -> Option<String> {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    (!mime.is_empty()).then(|| mime.to_ascii_lowercase())
}

/// Retrieves a remote asset by URL.
pub trait Fetcher {
    fn fetch(&mut self, url: &str) -> Result<Fetched>;
}

/// Assets downloaded ahead of time, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct PrefetchedAssets {
    items: HashMap<String, Fetched>,
}

impl PrefetchedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, asset: Fetched) {
        self.items.insert(url.into(), asset);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.items.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Fetcher for PrefetchedAssets {
    fn fetch(&mut self, url: &str) -> Result<Fetched> {
        self.items
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("{} was not provided", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parameters_are_dropped() {
        let fetched = Fetched::new(Some("Image/SVG+XML; charset=utf-8"), Vec::new());
        assert_eq!(fetched.mime_type.as_deref(), Some("image/svg+xml"));
        assert_eq!(Fetched::new(Some(" "), Vec::new()).mime_type, None);
    }

    #[test]
    fn test_prefetched_assets() {
        let mut assets = PrefetchedAssets::new();
        assets.insert("https://a/b.png", Fetched::new(Some("image/png"), vec![1, 2]));
        assert!(assets.contains("https://a/b.png"));
        assert_eq!(assets.fetch("https://a/b.png").unwrap().bytes, vec![1, 2]);
        assert!(matches!(assets.fetch("https://a/c.png"), Err(Error::Fetch(_))));
    }
}
