//! Document export.
//!
//! The exporter walks the configuration into an [`ExportPlan`] (one entry per
//! page), then for each page in order: loads its image, builds a static
//! [`PageLayout`], rasterizes it and commits it to the document. Image
//! failures degrade to a labelled placeholder box; any rasterizer or
//! document failure aborts the whole export without producing a file.
//!
//! Loading, rasterizing, fonts and the document format are collaborators
//! behind the traits in this module.

use crate::crop::{cover_rect, Rect, Size};
use crate::error::{Error, Result};
use crate::image::export_source;
use crate::settings::ExportSettings;
use crate::text::{export_file_name, strip_html};
use crate::types::{ModuleIcon, PresentationConfig};
use crate::viewer::NAVIGATION_HINT;

/// Font family used when no font could be loaded.
pub const FALLBACK_FONT_FAMILY: &str = "Arial, sans-serif";

/// Brand shown in every page header.
pub const BRAND_NAME: &str = "Showcase Gallery";

/// Short brand mark shown in the header logo.
pub const BRAND_MARK: &str = "SG";

/// Height of the page header on the layout canvas.
pub const HEADER_HEIGHT: u32 = 60;

/// User-facing message for an aborted export.
pub const EXPORT_FAILED_MESSAGE: &str = "Error exporting presentation. Please try again.";

/// Options for one export run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExportOptions {
    /// Add the statement slide after the intro.
    pub include_statement: bool,
}

impl From<&ExportSettings> for ExportOptions {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            include_statement: settings.include_statement,
        }
    }
}

/// What one page of the export shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedPage {
    Intro,
    Statement,
    Feature { module: usize, feature: usize },
    ThankYou,
}

/// Ordered pages of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pages: Vec<PlannedPage>,
}

impl ExportPlan {
    /// Walk `config`: intro, optional statement, every feature of every
    /// visible module, thank-you.
    pub fn build(config: &PresentationConfig, options: ExportOptions) -> Result<Self> {
        if config.visible_feature_count() == 0 {
            return Err(Error::NothingToExport);
        }

        let mut pages = vec![PlannedPage::Intro];
        if options.include_statement {
            pages.push(PlannedPage::Statement);
        }
        for (module, m) in config.visible_modules() {
            pages.extend((0..m.features.len()).map(|feature| PlannedPage::Feature { module, feature }));
        }
        pages.push(PlannedPage::ThankYou);

        Ok(Self { pages })
    }

    pub fn pages(&self) -> &[PlannedPage] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Header content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderContent {
    /// Keyboard navigation hint.
    Hint(String),
    /// Name of the module the page belongs to.
    Module(String),
}

/// An image placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSlot {
    Loaded {
        /// Embeddable reference (usually a data URI).
        href: String,
        natural: Size,
        /// Cover placement relative to the image area.
        placement: Rect,
    },
    /// Load failed: a box labelled with `label` is drawn instead.
    Missing { label: String },
}

/// Module card on the intro page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub name: String,
    pub color_hex: String,
    pub icon: ModuleIcon,
    pub feature_label: String,
}

/// Page body.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideLayout {
    Intro {
        title: String,
        subtitle: String,
        hero: ImageSlot,
        cards: Vec<CardLayout>,
    },
    Statement {
        title: String,
        description: String,
    },
    Feature {
        module_name: String,
        color_hex: String,
        icon: ModuleIcon,
        title: String,
        /// Flattened plain text.
        description: String,
        is_beta: bool,
        image: ImageSlot,
    },
    ThankYou {
        title: String,
        description: String,
    },
}

/// A complete static page handed to the rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Canvas size in CSS pixels.
    pub canvas: Size,
    /// Height of the feature image area.
    pub image_area_height: f64,
    pub font_family: String,
    pub header: HeaderContent,
    pub body: SlideLayout,
}

/// Decoded image metadata returned by an [`ImageLoader`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub href: String,
    pub size: Size,
}

/// Rasterized page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    /// Pixel width (canvas width times scale).
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Where a raster page lands on the document page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page_width: f64,
    pub page_height: f64,
}

impl PagePlacement {
    /// Fit a `width`×`height` raster into the page: full width inside the
    /// margins, height scaled proportionally and capped to the page.
    pub fn fit(width: u32, height: u32, settings: &ExportSettings) -> Self {
        let margin = settings.margin_mm;
        let image_width = settings.page_width_mm - margin * 2.0;
        let image_height = height as f64 * image_width / width.max(1) as f64;
        Self {
            x: margin,
            y: margin,
            width: image_width,
            height: image_height.min(settings.page_height_mm - margin * 2.0),
            page_width: settings.page_width_mm,
            page_height: settings.page_height_mm,
        }
    }
}

/// Resolves image references into embeddable images.
pub trait ImageLoader {
    fn load(&mut self, source: &str) -> Result<LoadedImage>;
}

/// Turns a page layout into pixels.
pub trait Rasterizer {
    fn rasterize(&mut self, layout: &PageLayout, settings: &ExportSettings) -> Result<RasterPage>;
}

/// Paginated output document.
pub trait DocumentSink {
    /// File extension of the finished document, without the dot.
    fn file_extension(&self) -> &str;

    /// Append a page.
    fn add_page(&mut self, page: RasterPage, placement: PagePlacement) -> Result<()>;

    /// Finish and return the document bytes.
    fn finish(&mut self) -> Result<Vec<u8>>;
}

/// Best-effort font retrieval. Returns the family name to lay out with.
pub trait FontProvider {
    fn load_font(&mut self) -> Result<String>;
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Export pipeline configured with page geometry and options.
#[derive(Debug, Clone)]
pub struct Exporter {
    settings: ExportSettings,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Self {
        let options = ExportOptions::from(&settings);
        Self { settings, options }
    }

    /// Override the export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Plan the pages for `config`.
    pub fn plan(&self, config: &PresentationConfig) -> Result<ExportPlan> {
        ExportPlan::build(config, self.options)
    }

    /// Run the whole pipeline. `progress` receives a percentage after each
    /// committed page.
    pub fn export<L, R, D>(
        &self,
        config: &PresentationConfig,
        loader: &mut L,
        rasterizer: &mut R,
        sink: &mut D,
        fonts: Option<&mut dyn FontProvider>,
        mut progress: impl FnMut(f64),
    ) -> Result<ExportOutput>
    where
        L: ImageLoader + ?Sized,
        R: Rasterizer + ?Sized,
        D: DocumentSink + ?Sized,
    {
        let plan = self.plan(config)?;
        let font_family = resolve_font(fonts);
        let total = plan.len();
        log::info!("Exporting {} pages with font '{}'", total, font_family);

        for (done, page) in plan.pages().iter().enumerate() {
            let layout = self.layout_page(config, page, &font_family, loader);
            let raster = rasterizer.rasterize(&layout, &self.settings).map_err(|e| {
                log::error!("Export aborted on page {}: {}", done + 1, e);
                e
            })?;
            let placement = PagePlacement::fit(raster.width, raster.height, &self.settings);
            sink.add_page(raster, placement).map_err(|e| {
                log::error!("Export aborted on page {}: {}", done + 1, e);
                e
            })?;
            progress((done + 1) as f64 / total as f64 * 100.0);
        }

        let bytes = sink.finish()?;
        let file_name = export_file_name(&config.intro_title, sink.file_extension());
        log::info!("Export finished: {} ({} bytes)", file_name, bytes.len());

        Ok(ExportOutput {
            file_name,
            bytes,
            page_count: total,
        })
    }

    /// Build the static layout of one planned page, loading its image.
    pub fn layout_page<L>(
        &self,
        config: &PresentationConfig,
        page: &PlannedPage,
        font_family: &str,
        loader: &mut L,
    ) -> PageLayout
    where
        L: ImageLoader + ?Sized,
    {
        let canvas = Size::new(
            self.settings.canvas_width as f64,
            self.settings.canvas_height as f64,
        );
        let image_area = Size::new(canvas.width, self.settings.image_area_height as f64);
        let hint = || HeaderContent::Hint(NAVIGATION_HINT.to_string());

        let (header, body) = match page {
            PlannedPage::Intro => {
                let hero_area = Size::new(
                    canvas.width * 0.3,
                    canvas.height - HEADER_HEIGHT as f64,
                );
                let cards = config
                    .visible_modules()
                    .map(|(_, m)| CardLayout {
                        name: m.name.clone(),
                        color_hex: m.color.hex().to_string(),
                        icon: m.icon,
                        feature_label: m.feature_count_label(),
                    })
                    .collect();
                (
                    hint(),
                    SlideLayout::Intro {
                        title: config.intro_title.clone(),
                        subtitle: config.intro_subtitle.clone(),
                        hero: load_slot(loader, &config.hero_image, &config.intro_title, hero_area),
                        cards,
                    },
                )
            }
            PlannedPage::Statement => (
                hint(),
                SlideLayout::Statement {
                    title: config.statement_title.clone(),
                    description: strip_html(&config.statement_description),
                },
            ),
            PlannedPage::Feature { module, feature } => {
                let m = &config.modules[*module];
                let f = &m.features[*feature];
                (
                    HeaderContent::Module(m.name.clone()),
                    SlideLayout::Feature {
                        module_name: m.name.clone(),
                        color_hex: m.color.hex().to_string(),
                        icon: m.icon,
                        title: f.title.clone(),
                        description: strip_html(&f.description),
                        is_beta: f.is_beta,
                        image: load_slot(loader, &f.image, &f.title, image_area),
                    },
                )
            }
            PlannedPage::ThankYou => (
                hint(),
                SlideLayout::ThankYou {
                    title: config.thank_you_title.clone(),
                    description: config.thank_you_description.clone(),
                },
            ),
        };

        PageLayout {
            canvas,
            image_area_height: image_area.height,
            font_family: font_family.to_string(),
            header,
            body,
        }
    }
}

fn resolve_font(fonts: Option<&mut dyn FontProvider>) -> String {
    match fonts.map(|provider| provider.load_font()) {
        Some(Ok(family)) => family,
        Some(Err(e)) => {
            log::warn!("Failed to load font, using fallback: {}", e);
            FALLBACK_FONT_FAMILY.to_string()
        }
        None => FALLBACK_FONT_FAMILY.to_string(),
    }
}

fn load_slot<L>(loader: &mut L, reference: &str, label: &str, area: Size) -> ImageSlot
where
    L: ImageLoader + ?Sized,
{
    let source = export_source(reference, label);
    match loader.load(&source) {
        Ok(image) => ImageSlot::Loaded {
            placement: cover_rect(image.size, area),
            natural: image.size,
            href: image.href,
        },
        Err(e) => {
            log::warn!("Using placeholder box for '{}': {}", label, e);
            ImageSlot::Missing {
                label: label.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_config;

    /// Loader that accepts everything except references containing "broken".
    #[derive(Default)]
    struct FakeLoader {
        requested: Vec<String>,
    }

    impl ImageLoader for FakeLoader {
        fn load(&mut self, source: &str) -> Result<LoadedImage> {
            self.requested.push(source.to_string());
            if source.contains("broken") {
                return Err(Error::ImageLoad(source.to_string()));
            }
            Ok(LoadedImage {
                href: source.to_string(),
                size: Size::new(600.0, 400.0),
            })
        }
    }

    /// Rasterizer recording page titles; fails on the page numbered `fail_on`.
    #[derive(Default)]
    struct FakeRasterizer {
        layouts: Vec<PageLayout>,
        fail_on: Option<usize>,
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(&mut self, layout: &PageLayout, settings: &ExportSettings) -> Result<RasterPage> {
            if self.fail_on == Some(self.layouts.len()) {
                return Err(Error::Rasterize("canvas lost".to_string()));
            }
            self.layouts.push(layout.clone());
            Ok(RasterPage {
                width: settings.canvas_width * settings.scale,
                height: settings.canvas_height * settings.scale,
                mime_type: "image/svg+xml".to_string(),
                data: vec![self.layouts.len() as u8],
            })
        }
    }

    #[derive(Default)]
    struct FakeSink {
        pages: Vec<(RasterPage, PagePlacement)>,
        finished: bool,
    }

    impl DocumentSink for FakeSink {
        fn file_extension(&self) -> &str {
            "pdf"
        }

        fn add_page(&mut self, page: RasterPage, placement: PagePlacement) -> Result<()> {
            self.pages.push((page, placement));
            Ok(())
        }

        fn finish(&mut self) -> Result<Vec<u8>> {
            self.finished = true;
            Ok(self.pages.iter().flat_map(|(p, _)| p.data.clone()).collect())
        }
    }

    struct NoFonts;

    impl FontProvider for NoFonts {
        fn load_font(&mut self) -> Result<String> {
            Err(Error::ImageLoad("offline".to_string()))
        }
    }

    fn run(
        config: &PresentationConfig,
        exporter: &Exporter,
    ) -> (Result<ExportOutput>, FakeRasterizer, FakeSink, Vec<f64>) {
        let mut loader = FakeLoader::default();
        let mut rasterizer = FakeRasterizer::default();
        let mut sink = FakeSink::default();
        let mut progress = Vec::new();
        let result = exporter.export(
            config,
            &mut loader,
            &mut rasterizer,
            &mut sink,
            None,
            |p| progress.push(p),
        );
        (result, rasterizer, sink, progress)
    }

    #[test]
    fn test_plan_default_page_count() {
        let plan = ExportPlan::build(&default_config(), ExportOptions::default()).unwrap();
        assert_eq!(plan.len(), 13);
        assert_eq!(plan.pages()[0], PlannedPage::Intro);
        assert_eq!(
            plan.pages()[1],
            PlannedPage::Feature {
                module: 0,
                feature: 0
            }
        );
        assert_eq!(plan.pages()[12], PlannedPage::ThankYou);
    }

    #[test]
    fn test_plan_with_statement() {
        let options = ExportOptions {
            include_statement: true,
        };
        let plan = ExportPlan::build(&default_config(), options).unwrap();
        assert_eq!(plan.len(), 14);
        assert_eq!(plan.pages()[1], PlannedPage::Statement);
    }

    #[test]
    fn test_plan_rejects_empty_export() {
        let mut config = default_config();
        for module in config.modules.iter_mut() {
            module.features.clear();
        }
        assert!(matches!(
            ExportPlan::build(&config, ExportOptions::default()),
            Err(Error::NothingToExport)
        ));
    }

    #[test]
    fn test_export_pipeline() {
        let config = default_config();
        let (result, rasterizer, sink, progress) =
            run(&config, &Exporter::new(ExportSettings::default()));
        let output = result.unwrap();

        assert_eq!(output.page_count, 13);
        assert_eq!(output.file_name, "june_release_presentation.pdf");
        assert_eq!(sink.pages.len(), 13);
        assert!(sink.finished);
        assert_eq!(progress.len(), 13);
        assert!((progress[0] - 100.0 / 13.0).abs() < 1e-9);
        assert_eq!(progress[12], 100.0);

        let first = &rasterizer.layouts[0];
        assert_eq!(first.font_family, FALLBACK_FONT_FAMILY);
        assert_eq!(first.header, HeaderContent::Hint(NAVIGATION_HINT.to_string()));
        assert_eq!(
            rasterizer.layouts[1].header,
            HeaderContent::Module("Data Science".to_string())
        );
    }

    #[test]
    fn test_page_placement_is_capped() {
        let settings = ExportSettings::default();
        let placement = PagePlacement::fit(2112, 1632, &settings);
        assert_eq!(placement.x, 10.0);
        assert_eq!(placement.width, 277.0);
        assert_eq!(placement.height, 190.0);

        let wide = PagePlacement::fit(2000, 1000, &settings);
        assert!((wide.height - 138.5).abs() < 1e-9);
    }

    #[test]
    fn test_image_failure_degrades_to_placeholder_box() {
        let mut config = default_config();
        config.modules[0].features[0].image = "https://cdn.test/broken.png".to_string();
        config.modules[0].features[1].image = "blob:http://localhost/x".to_string();

        let (result, rasterizer, _, _) = run(&config, &Exporter::new(ExportSettings::default()));
        assert!(result.is_ok());

        match &rasterizer.layouts[1].body {
            SlideLayout::Feature { image, .. } => assert_eq!(
                *image,
                ImageSlot::Missing {
                    label: "Advanced Analytics".to_string()
                }
            ),
            other => panic!("unexpected layout {:?}", other),
        }
        match &rasterizer.layouts[2].body {
            SlideLayout::Feature { image, .. } => match image {
                ImageSlot::Loaded { href, placement, .. } => {
                    assert_eq!(
                        href,
                        "/placeholder.svg?height=400&width=600&text=Machine%20Learning"
                    );
                    assert!((placement.width - 1056.0).abs() < 1e-6);
                }
                other => panic!("unexpected slot {:?}", other),
            },
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_rasterizer_failure_aborts_without_output() {
        let config = default_config();
        let mut loader = FakeLoader::default();
        let mut rasterizer = FakeRasterizer {
            fail_on: Some(3),
            ..Default::default()
        };
        let mut sink = FakeSink::default();

        let result = Exporter::new(ExportSettings::default()).export(
            &config,
            &mut loader,
            &mut rasterizer,
            &mut sink,
            None,
            |_| {},
        );

        assert!(matches!(result, Err(Error::Rasterize(_))));
        assert_eq!(sink.pages.len(), 3);
        assert!(!sink.finished);
    }

    #[test]
    fn test_font_fallback_and_descriptions_flattened() {
        let config = default_config();
        let exporter = Exporter::new(ExportSettings::default()).with_options(ExportOptions {
            include_statement: true,
        });
        let mut fonts = NoFonts;
        let mut rasterizer = FakeRasterizer::default();

        exporter
            .export(
                &config,
                &mut FakeLoader::default(),
                &mut rasterizer,
                &mut FakeSink::default(),
                Some(&mut fonts),
                |_| {},
            )
            .unwrap();

        assert_eq!(rasterizer.layouts[0].font_family, FALLBACK_FONT_FAMILY);
        match &rasterizer.layouts[1].body {
            SlideLayout::Statement { description, .. } => assert!(!description.contains('<')),
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_export_is_deterministic() {
        let config = default_config();
        let exporter = Exporter::new(ExportSettings::default());
        let (a, ..) = run(&config, &exporter);
        let (b, ..) = run(&config, &exporter);
        assert_eq!(a.unwrap(), b.unwrap());
    }
}
