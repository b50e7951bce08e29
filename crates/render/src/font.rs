//! Web font loading for exported pages.

use crate::fetch::Fetcher;
use crate::loader::encode_data_uri;
use regex::Regex;
use showcase_core::export::{FontProvider, FALLBACK_FONT_FAMILY};
use showcase_core::{Error, Result};
use std::sync::LazyLock;

/// Stylesheet serving the presentation typeface.
pub const MANROPE_STYLESHEET: &str =
    "https://fonts.googleapis.com/css2?family=Manrope:wght@200;300;400;500;600;700;800&display=swap";

pub const MANROPE_FAMILY: &str = "Manrope";

/// `url(...)` references in a stylesheet.
static FONT_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#).unwrap());

/// A font file ready to be embedded with `@font-face`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub family: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FontFace {
    pub fn new(family: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            family: family.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Family list to lay text out with: this face, then the fallback.
    pub fn font_stack(&self) -> String {
        format!("{}, {}", self.family, FALLBACK_FONT_FAMILY)
    }

    /// `@font-face` rule embedding the font as a data URI.
    pub fn css(&self) -> String {
        format!(
            "@font-face{{font-family:'{}';font-weight:400;src:url({});}}",
            self.family.replace('\'', ""),
            encode_data_uri(&self.mime_type, &self.data)
        )
    }
}

impl FontProvider for FontFace {
    fn load_font(&mut self) -> Result<String> {
        Ok(self.font_stack())
    }
}

/// Fetches a web font stylesheet, then its regular-weight font file.
///
/// The first result is kept, so a failed download is not retried within one
/// export.
pub struct WebFontProvider<F: Fetcher> {
    fetcher: F,
    stylesheet_url: String,
    family: String,
    face: Option<FontFace>,
    failure: Option<String>,
}

impl<F: Fetcher> WebFontProvider<F> {
    /// Provider for Manrope.
    pub fn new(fetcher: F) -> Self {
        Self::with_stylesheet(fetcher, MANROPE_STYLESHEET, MANROPE_FAMILY)
    }

    pub fn with_stylesheet(
        fetcher: F,
        stylesheet_url: impl Into<String>,
        family: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            stylesheet_url: stylesheet_url.into(),
            family: family.into(),
            face: None,
            failure: None,
        }
    }

    /// The loaded face, if loading already succeeded.
    pub fn face(&self) -> Option<&FontFace> {
        self.face.as_ref()
    }

    /// Download the font on first use.
    pub fn load_face(&mut self) -> Result<&FontFace> {
        if let Some(reason) = &self.failure {
            return Err(Error::Fetch(reason.clone()));
        }
        if self.face.is_none() {
            match self.download() {
                Ok(face) => {
                    log::info!("Loaded font '{}' ({} bytes)", face.family, face.data.len());
                    self.face = Some(face);
                }
                Err(e) => {
                    self.failure = Some(e.to_string());
                    return Err(e);
                }
            }
        }
        self.face
            .as_ref()
            .ok_or_else(|| Error::Fetch("Font not loaded".to_string()))
    }

    fn download(&mut self) -> Result<FontFace> {
        let stylesheet = self.fetcher.fetch(&self.stylesheet_url)?;
        let css = String::from_utf8(stylesheet.bytes)
            .map_err(|e| Error::Fetch(format!("Stylesheet is not UTF-8: {}", e)))?;
        let url = regular_font_url(&css)
            .ok_or_else(|| Error::Fetch("Stylesheet has no font URL".to_string()))?;

        let font = self.fetcher.fetch(&url)?;
        let mime_type = font
            .mime_type
            .filter(|m| m.starts_with("font/") || m.starts_with("application/"))
            .unwrap_or_else(|| font_mime_for_url(&url).to_string());
        Ok(FontFace::new(self.family.clone(), mime_type, font.bytes))
    }
}

impl<F: Fetcher> FontProvider for WebFontProvider<F> {
    fn load_font(&mut self) -> Result<String> {
        self.load_face().map(FontFace::font_stack)
    }
}

/// URL of the weight-400 face in a stylesheet, else its first font URL.
fn regular_font_url(css: &str) -> Option<String> {
    let first_url = |block: &str| {
        FONT_URL_REGEX
            .captures(block)
            .map(|caps| caps[1].to_string())
    };

    css.split("@font-face")
        .find(|block| block.contains("font-weight: 400") || block.contains("font-weight:400"))
        .and_then(first_url)
        .or_else(|| first_url(css))
}

fn font_mime_for_url(url: &str) -> &'static str {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or_default();
    if path.ends_with(".woff2") {
        "font/woff2"
    } else if path.ends_with(".woff") {
        "font/woff"
    } else if path.ends_with(".otf") {
        "font/otf"
    } else {
        "font/ttf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Fetched, PrefetchedAssets};

    const STYLESHEET: &str = "\
/* latin */
@font-face {
  font-family: 'Manrope';
  font-weight: 300;
  src: url(https://fonts.gstatic.com/s/manrope/light.ttf) format('truetype');
}
@font-face {
  font-family: 'Manrope';
  font-weight: 400;
  src: url(https://fonts.gstatic.com/s/manrope/regular.ttf) format('truetype');
}";

    fn assets() -> PrefetchedAssets {
        let mut assets = PrefetchedAssets::new();
        assets.insert(
            MANROPE_STYLESHEET,
            Fetched::new(Some("text/css"), STYLESHEET.as_bytes().to_vec()),
        );
        assets.insert(
            "https://fonts.gstatic.com/s/manrope/regular.ttf",
            Fetched::new(None, vec![0, 1, 0, 0]),
        );
        assets
    }

    #[test]
    fn test_regular_weight_is_preferred() {
        assert_eq!(
            regular_font_url(STYLESHEET).as_deref(),
            Some("https://fonts.gstatic.com/s/manrope/regular.ttf")
        );
        assert_eq!(
            regular_font_url("src: url('a.woff2')").as_deref(),
            Some("a.woff2")
        );
        assert_eq!(regular_font_url("body {}"), None);
    }

    #[test]
    fn test_web_font_loads_and_caches() {
        let mut provider = WebFontProvider::new(assets());
        assert_eq!(provider.load_font().unwrap(), "Manrope, Arial, sans-serif");

        let face = provider.face().unwrap();
        assert_eq!(face.mime_type, "font/ttf");
        assert_eq!(face.data, vec![0, 1, 0, 0]);
        assert!(face.css().starts_with("@font-face{font-family:'Manrope';"));
        assert!(face.css().contains("data:font/ttf;base64,AAEAAA=="));
    }

    #[test]
    fn test_failure_is_reported_and_remembered() {
        let mut provider = WebFontProvider::new(PrefetchedAssets::new());
        assert!(matches!(provider.load_font(), Err(Error::Fetch(_))));
        assert!(matches!(provider.load_face(), Err(Error::Fetch(_))));
        assert!(provider.face().is_none());
    }

    #[test]
    fn test_font_mime_for_url() {
        assert_eq!(font_mime_for_url("https://x/a.woff2?v=1"), "font/woff2");
        assert_eq!(font_mime_for_url("https://x/a"), "font/ttf");
    }
}
