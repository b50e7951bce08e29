use showcase_core::export::ExportOptions;
use showcase_core::settings::ExportSettings;
use showcase_core::{default_config, EditCommand, Exporter};
use showcase_render::document::read_entry;
use showcase_render::font::MANROPE_STYLESHEET;
use showcase_render::loader::encode_data_uri;
use showcase_render::{
    read_manifest, EmbeddedImageLoader, Fetched, PrefetchedAssets, SvgRenderer, WebFontProvider,
    ZipDocument,
};

#[test]
fn default_presentation_exports_thirteen_pages() {
    let config = default_config();
    let exporter = Exporter::new(ExportSettings::default());
    let mut progress = Vec::new();

    let output = exporter
        .export(
            &config,
            &mut EmbeddedImageLoader::new(),
            &mut SvgRenderer::new(),
            &mut ZipDocument::new(),
            None,
            |p| progress.push(p),
        )
        .unwrap();

    assert_eq!(output.file_name, "june_release_presentation.zip");
    assert_eq!(output.page_count, 13);
    assert_eq!(progress.len(), 13);
    assert_eq!(progress.last().copied(), Some(100.0));

    let manifest = read_manifest(&output.bytes).unwrap();
    assert_eq!(manifest.pages.len(), 13);
    assert!(manifest.pages.iter().all(|p| p.mime_type == "image/svg+xml"));

    let intro = read_entry(&output.bytes, "pages/page-001.svg").unwrap();
    assert!(intro.contains("June Release"));
    assert!(intro.contains("data:image/svg+xml;base64,"));

    let closing = read_entry(&output.bytes, "pages/page-013.svg").unwrap();
    assert!(closing.contains("Thank You"));
}

#[test]
fn statement_slide_is_optional() {
    let config = default_config();
    let exporter = Exporter::new(ExportSettings::default())
        .with_options(ExportOptions { include_statement: true });

    let output = exporter
        .export(
            &config,
            &mut EmbeddedImageLoader::new(),
            &mut SvgRenderer::new(),
            &mut ZipDocument::new(),
            None,
            |_| {},
        )
        .unwrap();

    assert_eq!(output.page_count, 14);
}

#[test]
fn remote_images_degrade_without_aborting() {
    let config = EditCommand::SetHeroImage("https://cdn.example.com/hero.png".to_string())
        .apply(&default_config())
        .unwrap();
    let exporter = Exporter::new(ExportSettings::default());

    let output = exporter
        .export(
            &config,
            &mut EmbeddedImageLoader::new(),
            &mut SvgRenderer::new(),
            &mut ZipDocument::new(),
            None,
            |_| {},
        )
        .unwrap();

    assert_eq!(output.page_count, 13);
    let intro = read_entry(&output.bytes, "pages/page-001.svg").unwrap();
    assert!(!intro.contains("cdn.example.com"));
}

#[test]
fn remote_images_and_font_are_embedded_when_fetched() {
    let config = EditCommand::SetHeroImage("https://cdn.example.com/hero.svg".to_string())
        .apply(&default_config())
        .unwrap();

    let hero = br#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="400"/>"#;
    let mut assets = PrefetchedAssets::new();
    assets.insert(
        "https://cdn.example.com/hero.svg",
        Fetched::new(Some("image/svg+xml"), hero.to_vec()),
    );
    assets.insert(
        MANROPE_STYLESHEET,
        Fetched::new(
            Some("text/css"),
            b"@font-face { font-weight: 400; src: url(https://fonts.example.com/m.woff2); }"
                .to_vec(),
        ),
    );
    assets.insert(
        "https://fonts.example.com/m.woff2",
        Fetched::new(Some("font/woff2"), vec![0x77, 0x4f, 0x46, 0x32]),
    );

    let mut fonts = WebFontProvider::new(assets.clone());
    let face = fonts.load_face().unwrap().clone();
    let exporter = Exporter::new(ExportSettings::default());

    let output = exporter
        .export(
            &config,
            &mut EmbeddedImageLoader::new().with_fetcher(assets),
            &mut SvgRenderer::new().with_font_face(face),
            &mut ZipDocument::new(),
            Some(&mut fonts),
            |_| {},
        )
        .unwrap();

    let intro = read_entry(&output.bytes, "pages/page-001.svg").unwrap();
    assert!(!intro.contains("cdn.example.com"));
    assert!(intro.contains("font-family=\"Manrope, Arial, sans-serif\""));
    assert!(intro.contains("data:font/woff2;base64,"));
    assert!(intro.contains(&encode_data_uri("image/svg+xml", hero)));
}
