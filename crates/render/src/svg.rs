//! SVG page renderer.
//!
//! Draws a [`PageLayout`] onto an SVG canvas with the same geometry the
//! viewer uses: a 60px header, a 30/70 split intro, a feature page with the
//! image area on top and the tab/description panel below.

use crate::font::FontFace;
use crate::icons::icon_shapes;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use showcase_core::crop::Rect;
use showcase_core::export::{
    CardLayout, HeaderContent, ImageSlot, PageLayout, RasterPage, Rasterizer, SlideLayout,
    BRAND_MARK, BRAND_NAME, HEADER_HEIGHT,
};
use showcase_core::settings::ExportSettings;
use showcase_core::{Error, ModuleIcon, Result};
use std::io::Cursor;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const BRAND_COLOR: &str = "#00BFA5";
const TEXT_DARK: &str = "#1f2937";
const TEXT_MUTED: &str = "#6b7280";
const BORDER: &str = "#e5e7eb";
const PANEL: &str = "#f9fafb";

/// Renders page layouts to SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    font_face: Option<FontFace>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed `face` in every page so text renders without the font installed.
    pub fn with_font_face(mut self, face: FontFace) -> Self {
        self.font_face = Some(face);
        self
    }

    /// Render `layout` to SVG markup at `scale` times the canvas size.
    pub fn render(&self, layout: &PageLayout, scale: u32) -> Result<String> {
        let mut svg = SvgWriter::new();
        let width = layout.canvas.width;
        let height = layout.canvas.height;
        let scale = scale.max(1) as f64;

        svg.decl()?;
        svg.start(
            "svg",
            &[
                ("xmlns", SVG_NS.to_string()),
                ("width", num(width * scale)),
                ("height", num(height * scale)),
                ("viewBox", format!("0 0 {} {}", num(width), num(height))),
                ("font-family", layout.font_family.clone()),
            ],
        )?;
        if let Some(face) = &self.font_face {
            svg.start("defs", &[])?;
            svg.start("style", &[])?;
            svg.write(Event::Text(BytesText::new(&face.css())))?;
            svg.end("style")?;
            svg.end("defs")?;
        }
        svg.rect(0.0, 0.0, width, height, "#ffffff", &[])?;

        match &layout.body {
            SlideLayout::Intro {
                title,
                subtitle,
                hero,
                cards,
            } => draw_intro(&mut svg, layout, title, subtitle, hero, cards)?,
            SlideLayout::Statement { title, description } => {
                draw_centered(&mut svg, layout, title, description, 48.0, 22.0)?
            }
            SlideLayout::Feature {
                color_hex,
                icon,
                title,
                description,
                is_beta,
                image,
                ..
            } => draw_feature(
                &mut svg,
                layout,
                color_hex,
                *icon,
                title,
                description,
                *is_beta,
                image,
            )?,
            SlideLayout::ThankYou { title, description } => {
                draw_centered(&mut svg, layout, title, description, 64.0, 24.0)?
            }
        }

        draw_header(&mut svg, layout)?;
        svg.end("svg")?;
        svg.finish()
    }
}

impl Rasterizer for SvgRenderer {
    fn rasterize(&mut self, layout: &PageLayout, settings: &ExportSettings) -> Result<RasterPage> {
        let markup = self.render(layout, settings.scale)?;
        Ok(RasterPage {
            width: (layout.canvas.width as u32) * settings.scale.max(1),
            height: (layout.canvas.height as u32) * settings.scale.max(1),
            mime_type: "image/svg+xml".to_string(),
            data: markup.into_bytes(),
        })
    }
}

fn draw_header(svg: &mut SvgWriter, layout: &PageLayout) -> Result<()> {
    let width = layout.canvas.width;
    let h = HEADER_HEIGHT as f64;

    svg.rect(0.0, 0.0, width, h, "#ffffff", &[("fill-opacity", "0.95".to_string())])?;
    svg.empty(
        "line",
        &[
            ("x1", "0".to_string()),
            ("y1", num(h)),
            ("x2", num(width)),
            ("y2", num(h)),
            ("stroke", BORDER.to_string()),
        ],
    )?;
    svg.rect(24.0, 14.0, 32.0, 32.0, BRAND_COLOR, &[("rx", "8".to_string())])?;
    svg.text(40.0, 35.0, BRAND_MARK, 14.0, "#ffffff", &[("text-anchor", "middle"), ("font-weight", "700")])?;
    svg.text(68.0, 36.0, BRAND_NAME, 18.0, TEXT_DARK, &[("font-weight", "600")])?;

    let label = match &layout.header {
        HeaderContent::Hint(hint) => hint,
        HeaderContent::Module(name) => name,
    };
    svg.text(width - 24.0, 36.0, label, 14.0, TEXT_MUTED, &[("text-anchor", "end")])
}

fn draw_intro(
    svg: &mut SvgWriter,
    layout: &PageLayout,
    title: &str,
    subtitle: &str,
    hero: &ImageSlot,
    cards: &[CardLayout],
) -> Result<()> {
    let top = HEADER_HEIGHT as f64;
    let hero_area = Rect::new(0.0, top, layout.canvas.width * 0.3, layout.canvas.height - top);
    svg.rect(hero_area.x, hero_area.y, hero_area.width, hero_area.height, "#1e293b", &[])?;
    draw_image_slot(svg, "hero-clip", hero_area, hero, "#94a3b8")?;

    let x = hero_area.width + 60.0;
    let content_width = layout.canvas.width - x - 60.0;
    let mut y = top + 120.0;

    svg.text(x, y, title, 48.0, TEXT_DARK, &[("font-weight", "700")])?;
    y += 44.0;
    svg.text(x, y, subtitle, 20.0, TEXT_MUTED, &[])?;
    y += 64.0;
    svg.text(x, y, "What's New", 16.0, "#374151", &[("font-weight", "600")])?;
    y += 24.0;

    let gap = 16.0;
    let card_width = (content_width - gap) / 2.0;
    let card_height = 80.0;
    for (index, card) in cards.iter().enumerate() {
        let cx = x + (index % 2) as f64 * (card_width + gap);
        let cy = y + (index / 2) as f64 * (card_height + gap);
        draw_card(svg, card, cx, cy, card_width, card_height)?;
    }
    Ok(())
}

fn draw_card(svg: &mut SvgWriter, card: &CardLayout, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
    svg.rect(
        x,
        y,
        w,
        h,
        PANEL,
        &[("rx", "12".to_string()), ("stroke", BORDER.to_string())],
    )?;
    draw_badge(svg, x + 20.0, y + 20.0, &card.color_hex, card.icon)?;
    svg.text(x + 76.0, y + 36.0, &card.name, 16.0, TEXT_DARK, &[("font-weight", "600")])?;
    svg.text(x + 76.0, y + 58.0, &card.feature_label, 14.0, TEXT_MUTED, &[])
}

/// 40×40 coloured square with a white icon.
fn draw_badge(svg: &mut SvgWriter, x: f64, y: f64, color: &str, icon: ModuleIcon) -> Result<()> {
    svg.rect(x, y, 40.0, 40.0, color, &[("rx", "8".to_string())])?;
    svg.start(
        "g",
        &[
            ("transform", format!("translate({} {}) scale({})", num(x + 10.0), num(y + 10.0), num(20.0 / 24.0))),
            ("fill", "none".to_string()),
            ("stroke", "#ffffff".to_string()),
            ("stroke-width", "2".to_string()),
            ("stroke-linecap", "round".to_string()),
            ("stroke-linejoin", "round".to_string()),
        ],
    )?;
    for (tag, attrs) in icon_shapes(icon) {
        let attrs: Vec<(&str, String)> = attrs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        svg.empty(tag, &attrs)?;
    }
    svg.end("g")
}

#[allow(clippy::too_many_arguments)]
fn draw_feature(
    svg: &mut SvgWriter,
    layout: &PageLayout,
    color: &str,
    icon: ModuleIcon,
    title: &str,
    description: &str,
    is_beta: bool,
    image: &ImageSlot,
) -> Result<()> {
    let width = layout.canvas.width;
    let top = HEADER_HEIGHT as f64;
    let area = Rect::new(0.0, top, width, layout.image_area_height);

    svg.rect(area.x, area.y, area.width, area.height, TEXT_DARK, &[])?;
    draw_image_slot(svg, "feature-clip", area, image, "#9ca3af")?;
    if is_beta {
        draw_pill(svg, width - 20.0 - 68.0, top + 20.0, 68.0, 38.0, 14.0)?;
    }

    let panel_top = area.y + area.height;
    let panel_height = layout.canvas.height - panel_top;
    svg.rect(0.0, panel_top, width, panel_height, PANEL, &[])?;
    svg.rect(0.0, panel_top, width, 60.0, "#ffffff", &[])?;
    svg.empty(
        "line",
        &[
            ("x1", "0".to_string()),
            ("y1", num(panel_top + 60.0)),
            ("x2", num(width)),
            ("y2", num(panel_top + 60.0)),
            ("stroke", BORDER.to_string()),
        ],
    )?;

    draw_badge(svg, 20.0, panel_top + 10.0, color, icon)?;
    svg.text(72.0, panel_top + 36.0, title, 15.0, "#374151", &[("font-weight", "500")])?;
    if is_beta {
        let pill_x = 72.0 + estimate_width(title, 15.0) + 8.0;
        draw_pill(svg, pill_x, panel_top + 20.0, 48.0, 22.0, 12.0)?;
    }

    let max_chars = ((width - 48.0) / (16.0 * 0.5)) as usize;
    let line_height = 16.0 * 1.6;
    let mut y = panel_top + 60.0 + 24.0 + 16.0;
    for line in description.lines().flat_map(|l| wrap(l, max_chars)) {
        if y > layout.canvas.height - 8.0 {
            break;
        }
        svg.text(24.0, y, &line, 16.0, "#4b5563", &[])?;
        y += line_height;
    }
    Ok(())
}

/// Grey "BETA" tag.
fn draw_pill(svg: &mut SvgWriter, x: f64, y: f64, w: f64, h: f64, font: f64) -> Result<()> {
    svg.rect(x, y, w, h, TEXT_MUTED, &[("rx", "6".to_string())])?;
    svg.text(
        x + w / 2.0,
        y + h / 2.0 + font * 0.35,
        "BETA",
        font,
        "#ffffff",
        &[("text-anchor", "middle"), ("font-weight", "500")],
    )
}

fn draw_centered(
    svg: &mut SvgWriter,
    layout: &PageLayout,
    title: &str,
    description: &str,
    title_size: f64,
    body_size: f64,
) -> Result<()> {
    let cx = layout.canvas.width / 2.0;
    let mut y = layout.canvas.height / 2.0 - 40.0;
    svg.text(cx, y, title, title_size, TEXT_DARK, &[("text-anchor", "middle"), ("font-weight", "700")])?;
    y += title_size * 0.6 + 30.0;

    let max_chars = (600.0 / (body_size * 0.5)) as usize;
    for line in description.lines().flat_map(|l| wrap(l, max_chars)) {
        svg.text(cx, y, &line, body_size, TEXT_MUTED, &[("text-anchor", "middle")])?;
        y += body_size * 1.5;
    }
    Ok(())
}

fn draw_image_slot(
    svg: &mut SvgWriter,
    clip_id: &str,
    area: Rect,
    slot: &ImageSlot,
    label_color: &str,
) -> Result<()> {
    match slot {
        ImageSlot::Loaded { href, placement, .. } => {
            svg.start("defs", &[])?;
            svg.start("clipPath", &[("id", clip_id.to_string())])?;
            svg.rect(area.x, area.y, area.width, area.height, "#000000", &[])?;
            svg.end("clipPath")?;
            svg.end("defs")?;
            svg.empty(
                "image",
                &[
                    ("href", href.clone()),
                    ("x", num(area.x + placement.x)),
                    ("y", num(area.y + placement.y)),
                    ("width", num(placement.width)),
                    ("height", num(placement.height)),
                    ("preserveAspectRatio", "none".to_string()),
                    ("clip-path", format!("url(#{})", clip_id)),
                ],
            )
        }
        ImageSlot::Missing { label } => {
            svg.rect(area.x, area.y, area.width, area.height, "#374151", &[])?;
            svg.text(
                area.x + area.width / 2.0,
                area.y + area.height / 2.0,
                label,
                18.0,
                label_color,
                &[("text-anchor", "middle")],
            )
        }
    }
}

/// Greedy word wrap to at most `max_chars` characters per line.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if !current.is_empty() && needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn estimate_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.55
}

/// Format a coordinate with at most two decimals.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Thin wrapper over the quick-xml writer mapping errors to render errors.
struct SvgWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl SvgWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Rasterize(format!("Failed to write SVG: {}", e)))
    }

    fn decl(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        let element =
            BytesStart::new(name).with_attributes(attrs.iter().map(|(k, v)| (*k, v.as_str())));
        self.write(Event::Start(element))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        let element =
            BytesStart::new(name).with_attributes(attrs.iter().map(|(k, v)| (*k, v.as_str())));
        self.write(Event::Empty(element))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: &str,
        extra: &[(&str, String)],
    ) -> Result<()> {
        let mut attrs = vec![
            ("x", num(x)),
            ("y", num(y)),
            ("width", num(width)),
            ("height", num(height)),
            ("fill", fill.to_string()),
        ];
        attrs.extend(extra.iter().cloned());
        self.empty("rect", &attrs)
    }

    fn text(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        size: f64,
        fill: &str,
        extra: &[(&str, &str)],
    ) -> Result<()> {
        let mut attrs = vec![
            ("x", num(x)),
            ("y", num(y)),
            ("font-size", num(size)),
            ("fill", fill.to_string()),
        ];
        attrs.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));
        self.start("text", &attrs)?;
        self.write(Event::Text(BytesText::new(content)))?;
        self.end("text")
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner().into_inner())
            .map_err(|e| Error::Rasterize(format!("SVG is not UTF-8: {}", e)))
    }
}
