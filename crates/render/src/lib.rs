//! Export backends for Showcase Gallery: an SVG page renderer, an image
//! loader that embeds images as data URIs, web font loading and a zip
//! document sink.

pub mod document;
pub mod fetch;
pub mod font;
pub mod icons;
pub mod loader;
pub mod svg;

pub use document::{read_manifest, DocumentManifest, ZipDocument};
pub use fetch::{Fetched, Fetcher, PrefetchedAssets};
pub use font::{FontFace, WebFontProvider};
pub use loader::EmbeddedImageLoader;
pub use svg::SvgRenderer;
