//! Zip document output: one page file per slide plus a `manifest.json`
//! describing where each page sits on the printed sheet.

use serde::{Deserialize, Serialize};
use showcase_core::export::{DocumentSink, PagePlacement, RasterPage};
use showcase_core::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const MANIFEST_PATH: &str = "manifest.json";

/// Placement of one page inside the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestPage {
    pub file: String,
    pub mime_type: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentManifest {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub pages: Vec<ManifestPage>,
}

/// Collects pages in memory and packs them into a zip on `finish`.
#[derive(Debug, Default)]
pub struct ZipDocument {
    pages: Vec<(RasterPage, PagePlacement)>,
}

impl ZipDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_path(index: usize, mime_type: &str) -> String {
        let extension = match mime_type {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            _ => "svg",
        };
        format!("pages/page-{:03}.{}", index + 1, extension)
    }

    fn manifest(&self) -> DocumentManifest {
        let (page_width_mm, page_height_mm) = self
            .pages
            .first()
            .map(|(_, placement)| (placement.page_width, placement.page_height))
            .unwrap_or_default();

        let pages = self
            .pages
            .iter()
            .enumerate()
            .map(|(index, (raster, placement))| ManifestPage {
                file: Self::page_path(index, &raster.mime_type),
                mime_type: raster.mime_type.clone(),
                pixel_width: raster.width,
                pixel_height: raster.height,
                x_mm: placement.x,
                y_mm: placement.y,
                width_mm: placement.width,
                height_mm: placement.height,
            })
            .collect();

        DocumentManifest {
            page_width_mm,
            page_height_mm,
            pages,
        }
    }
}

impl DocumentSink for ZipDocument {
    fn file_extension(&self) -> &str {
        "zip"
    }

    fn add_page(&mut self, page: RasterPage, placement: PagePlacement) -> Result<()> {
        log::debug!(
            "Adding page {} ({}x{} {})",
            self.pages.len() + 1,
            page.width,
            page.height,
            page.mime_type
        );
        self.pages.push((page, placement));
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let manifest = self.manifest();
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for (entry, (raster, _)) in manifest.pages.iter().zip(&self.pages) {
            writer
                .start_file(entry.file.as_str(), options)
                .map_err(zip_error)?;
            writer.write_all(&raster.data).map_err(io_error)?;
        }

        let json = serde_json::to_vec_pretty(&manifest)?;
        writer
            .start_file(MANIFEST_PATH, options)
            .map_err(zip_error)?;
        writer.write_all(&json).map_err(io_error)?;

        let cursor = writer.finish().map_err(zip_error)?;
        self.pages.clear();
        Ok(cursor.into_inner())
    }
}

/// Read the manifest back out of a finished document.
pub fn read_manifest(bytes: &[u8]) -> Result<DocumentManifest> {
    let json = read_entry(bytes, MANIFEST_PATH)?;
    Ok(serde_json::from_str(&json)?)
}

/// Read one text entry (a page or the manifest) out of a finished document.
pub fn read_entry(bytes: &[u8], path: &str) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(zip_error)?;
    let mut file = archive.by_name(path).map_err(zip_error)?;
    let mut content = String::new();
    file.read_to_string(&mut content).map_err(io_error)?;
    Ok(content)
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::Document(e.to_string())
}

fn io_error(e: std::io::Error) -> Error {
    Error::Document(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::settings::ExportSettings;

    fn svg_page(body: &str) -> RasterPage {
        RasterPage {
            width: 2112,
            height: 1632,
            mime_type: "image/svg+xml".to_string(),
            data: format!("<svg>{}</svg>", body).into_bytes(),
        }
    }

    #[test]
    fn test_pages_and_manifest_are_written() {
        let settings = ExportSettings::default();
        let mut doc = ZipDocument::new();
        doc.add_page(svg_page("one"), PagePlacement::fit(2112, 1632, &settings))
            .unwrap();
        doc.add_page(svg_page("two"), PagePlacement::fit(2112, 1632, &settings))
            .unwrap();
        assert_eq!(doc.page_count(), 2);

        let bytes = doc.finish().unwrap();
        assert_eq!(doc.page_count(), 0);

        let manifest = read_manifest(&bytes).unwrap();
        assert_eq!(manifest.pages.len(), 2);
        assert_eq!(manifest.page_width_mm, 297.0);
        assert_eq!(manifest.page_height_mm, 210.0);
        assert_eq!(manifest.pages[0].file, "pages/page-001.svg");
        assert_eq!(manifest.pages[1].file, "pages/page-002.svg");
        assert_eq!(manifest.pages[0].x_mm, 10.0);
        assert_eq!(manifest.pages[0].width_mm, 277.0);
        assert_eq!(manifest.pages[0].height_mm, 190.0);

        assert_eq!(read_entry(&bytes, "pages/page-002.svg").unwrap(), "<svg>two</svg>");
    }

    #[test]
    fn test_empty_document_still_has_manifest() {
        let bytes = ZipDocument::new().finish().unwrap();
        let manifest = read_manifest(&bytes).unwrap();
        assert!(manifest.pages.is_empty());
    }

    #[test]
    fn test_missing_entry_is_document_error() {
        let bytes = ZipDocument::new().finish().unwrap();
        let err = read_entry(&bytes, "pages/page-001.svg").unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(read_manifest(b"nope"), Err(Error::Document(_))));
    }
}
