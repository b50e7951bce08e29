//! Image loader that turns references into self-contained data URIs.
//!
//! Exported documents must not depend on the session that produced them, so
//! every image is embedded. Placeholder references are synthesized locally.
//! Remote URLs go through the host's [`Fetcher`]; without one, or when the
//! download fails, they degrade to the exporter's placeholder box.

use crate::fetch::Fetcher;
use base64::Engine as _;
use quick_xml::events::Event;
use quick_xml::Reader;
use showcase_core::crop::Size;
use showcase_core::export::{ImageLoader, LoadedImage};
use showcase_core::image::{ImageRef, DATA_SCHEME};
use showcase_core::{Error, Result};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Path of the placeholder generator, relative to the site root.
const PLACEHOLDER_PATH: &str = "/placeholder.svg";

/// Loads data URIs, placeholder references, files under an asset root and,
/// given a fetcher, remote images.
#[derive(Default)]
pub struct EmbeddedImageLoader {
    assets_dir: Option<PathBuf>,
    fetcher: Option<Box<dyn Fetcher>>,
}

impl fmt::Debug for EmbeddedImageLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedImageLoader")
            .field("assets_dir", &self.assets_dir)
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}

impl EmbeddedImageLoader {
    /// Loader without an asset root: relative paths other than placeholders
    /// fail to load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve site-relative paths against `dir`.
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Download remote images through `fetcher`.
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    fn load_remote(&mut self, url: &str) -> Result<LoadedImage> {
        let fetcher = self
            .fetcher
            .as_mut()
            .ok_or_else(|| Error::ImageLoad(format!("Remote image not fetched: {}", url)))?;
        let fetched = fetcher.fetch(url)?;
        let mime = fetched
            .mime_type
            .filter(|m| m.starts_with("image/"))
            .unwrap_or_else(|| sniff_mime(&fetched.bytes).to_string());
        let size = measure_image(&mime, &fetched.bytes)?;
        log::debug!("Fetched {} ({}, {} bytes)", url, mime, fetched.bytes.len());

        Ok(LoadedImage {
            href: encode_data_uri(&mime, &fetched.bytes),
            size,
        })
    }

    fn load_data_uri(&self, uri: &str) -> Result<LoadedImage> {
        let (mime, bytes) = decode_data_uri(uri)?;
        let size = measure_image(&mime, &bytes)?;
        Ok(LoadedImage {
            href: uri.to_string(),
            size,
        })
    }

    fn load_asset(&self, reference: &str) -> Result<LoadedImage> {
        if let Some(query) = reference.strip_prefix(PLACEHOLDER_PATH) {
            return Ok(placeholder_image(query.trim_start_matches('?')));
        }

        let dir = self.assets_dir.as_ref().ok_or_else(|| {
            Error::ImageLoad(format!("No asset directory to resolve '{}'", reference))
        })?;
        let path = asset_path(dir, reference);
        let bytes = std::fs::read(&path)
            .map_err(|e| Error::ImageLoad(format!("Failed to read '{}': {}", path.display(), e)))?;
        let mime = mime_for_path(&path);
        let size = measure_image(mime, &bytes)?;

        Ok(LoadedImage {
            href: encode_data_uri(mime, &bytes),
            size,
        })
    }
}

impl ImageLoader for EmbeddedImageLoader {
    fn load(&mut self, source: &str) -> Result<LoadedImage> {
        match ImageRef::classify(source) {
            ImageRef::Data => self.load_data_uri(source.trim()),
            ImageRef::Asset => self.load_asset(source.trim()),
            ImageRef::Remote => self.load_remote(source.trim()),
            ImageRef::Blob | ImageRef::Empty => Err(Error::ImageLoad(
                "Transient or empty image reference".to_string(),
            )),
        }
    }
}

/// Build a data URI from raw bytes.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("{}{};base64,{}", DATA_SCHEME, mime, encoded)
}

/// Split a data URI into its MIME type and decoded payload.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix(DATA_SCHEME)
        .ok_or_else(|| Error::ImageLoad("Not a data URI".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::ImageLoad("Malformed data URI".to_string()))?;

    let mut parts = meta.split(';');
    let mime = parts.next().unwrap_or_default().to_string();
    let is_base64 = parts.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::ImageLoad(format!("Invalid base64 payload: {}", e)))?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok((mime, bytes))
}

/// Guess an image type from its leading bytes.
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}

/// Read the natural size of an encoded image from its header.
fn measure_image(mime: &str, bytes: &[u8]) -> Result<Size> {
    if mime == "image/svg+xml" {
        return svg_size(bytes);
    }

    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::ImageLoad(format!("Failed to read image header: {}", e)))?
        .into_dimensions()
        .map_err(|e| Error::ImageLoad(format!("Unsupported image: {}", e)))?;

    Ok(Size::new(width as f64, height as f64))
}

/// Size of an SVG document from the root element's `width`/`height`, or
/// from its `viewBox`.
fn svg_size(bytes: &[u8]) -> Result<Size> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::ImageLoad(format!("SVG is not UTF-8: {}", e)))?;
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.name().as_ref() == b"svg" => {
                let mut width = None;
                let mut height = None;
                let mut view_box = None;

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"width" => width = parse_length(&value),
                        b"height" => height = parse_length(&value),
                        b"viewBox" => view_box = Some(value),
                        _ => {}
                    }
                }

                if let (Some(w), Some(h)) = (width, height) {
                    return Ok(Size::new(w, h));
                }
                let dims: Vec<f64> = view_box
                    .unwrap_or_default()
                    .split(|c: char| c == ' ' || c == ',')
                    .filter_map(|v| v.parse().ok())
                    .collect();
                if let &[_, _, w, h] = dims.as_slice() {
                    return Ok(Size::new(w, h));
                }
                return Err(Error::ImageLoad("SVG has no size".to_string()));
            }
            Ok(Event::Eof) => return Err(Error::ImageLoad("No <svg> element".to_string())),
            Err(e) => return Err(Error::ImageLoad(format!("Invalid SVG: {}", e))),
            _ => {}
        }
    }
}

fn parse_length(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").parse().ok()
}

/// Generate the image behind a `/placeholder.svg?height=..&width=..&text=..`
/// reference.
fn placeholder_image(query: &str) -> LoadedImage {
    let mut width = 600.0;
    let mut height = 400.0;
    let mut label = String::new();

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "width" => width = value.parse().unwrap_or(width),
            "height" => height = value.parse().unwrap_or(height),
            "text" => {
                let spaced = value.replace('+', " ");
                label = urlencoding::decode(&spaced)
                    .map(|s| s.into_owned())
                    .unwrap_or(spaced);
            }
            _ => {}
        }
    }

    let svg = placeholder_svg(width, height, &label);
    LoadedImage {
        href: encode_data_uri("image/svg+xml", svg.as_bytes()),
        size: Size::new(width, height),
    }
}

fn placeholder_svg(width: f64, height: f64, label: &str) -> String {
    let escaped = quick_xml::escape::escape(label);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r##"<rect width="{w}" height="{h}" fill="#e5e7eb"/>"##,
            r##"<text x="50%" y="50%" text-anchor="middle" dominant-baseline="middle" font-size="{fs}" fill="#9ca3af">{label}</text>"##,
            "</svg>"
        ),
        w = width,
        h = height,
        fs = (width.min(height) / 12.0).round().max(10.0),
        label = escaped
    )
}

/// Map a site-relative reference onto the asset directory, dropping any
/// query string and refusing to leave the directory.
fn asset_path(dir: &Path, reference: &str) -> PathBuf {
    let path_part = reference.split(|c| c == '?' || c == '#').next().unwrap_or_default();
    let mut path = dir.to_path_buf();
    for segment in path_part.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        path.push(segment);
    }
    path
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
