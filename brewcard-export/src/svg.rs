//! Reference [`ViewCapture`]: lays an [`ExportBundle`] out as SVG.
//!
//! Layers are drawn bottom to top: photo, filter tint and scan lines, frame,
//! then the card group with its text lines. With the `raster` feature the SVG
//! can be flattened to PNG through resvg.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use brewcard_core::{
    truncate_with_ellipsis, CardContent, CardLine, CardTheme, ExportBundle, FilterProfile,
};

use crate::collaborator::{file_uri, CapturedImage, ImageFormat, ViewCapture};
use crate::{ExportError, ExportResult};

/// Card font sizes and spacing, in preview pixels.
const CARD_PADDING: f32 = 12.0;
const CARD_RADIUS: f32 = 12.0;
const TITLE_FONT: f32 = 14.0;
const BODY_FONT: f32 = 10.0;
const WATERMARK_FONT: f32 = 7.0;
const LINE_SPACING: f32 = 1.4;

/// Average glyph width as a fraction of font size, for title truncation.
const GLYPH_WIDTH: f32 = 0.62;

/// Period of the scan-line pattern, in preview pixels.
const SCAN_LINE_PERIOD: f32 = 4.0;

/// Settings for [`SvgLayoutCapture`].
#[derive(Debug, Clone)]
pub struct SvgCaptureConfig {
    /// Directory captured images are written to.
    pub output_dir: PathBuf,
    /// Output encoding.
    pub format: ImageFormat,
    /// Font family for card text.
    pub font_family: String,
    /// Directory relative frame asset paths are resolved against.
    pub asset_root: Option<PathBuf>,
}

impl SvgCaptureConfig {
    /// SVG output into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ImageFormat::Svg,
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            asset_root: None,
        }
    }
}

/// Writes each capture as `brewcard-<composition id>.<ext>`.
#[derive(Debug, Clone)]
pub struct SvgLayoutCapture {
    config: SvgCaptureConfig,
}

impl SvgLayoutCapture {
    /// Create a capture with the given settings.
    #[must_use]
    pub fn new(config: SvgCaptureConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &SvgCaptureConfig {
        &self.config
    }

    /// Lay `bundle` out as an SVG document.
    #[must_use]
    pub fn render_svg(&self, bundle: &ExportBundle) -> String {
        let (width, height) = pixel_size(bundle);
        let view_w = bundle.canvas_size.width;
        let view_h = bundle.canvas_size.height;

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {view_w} {view_h}\">",
        );

        let _ = write!(
            svg,
            "<image x=\"0\" y=\"0\" width=\"{view_w}\" height=\"{view_h}\" preserveAspectRatio=\"xMidYMid slice\" xlink:href=\"{}\"/>",
            escape_xml(&bundle.photo_uri),
        );

        if let Some(profile) = bundle.filter_profile.as_ref().filter(|p| p.has_overlay()) {
            render_filter(&mut svg, profile, bundle);
        }

        if let Some(asset) = &bundle.frame_asset {
            let href = self.resolve_asset(asset);
            let _ = write!(
                svg,
                "<image x=\"0\" y=\"0\" width=\"{view_w}\" height=\"{view_h}\" preserveAspectRatio=\"none\" xlink:href=\"{}\"/>",
                escape_xml(&href),
            );
        }

        if let Some(card) = &bundle.card {
            self.render_card(&mut svg, card, bundle);
        }

        svg.push_str("</svg>");
        svg
    }

    fn resolve_asset(&self, asset: &str) -> String {
        if asset.contains("://") || Path::new(asset).is_absolute() {
            return asset.to_string();
        }
        match &self.config.asset_root {
            Some(root) => file_uri(&root.join(asset)),
            None => asset.to_string(),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render_card(&self, svg: &mut String, card: &CardContent, bundle: &ExportBundle) {
        let s = bundle.scale_factor;
        let origin = bundle.card_origin_in_canvas();
        let (fill, ink, muted) = theme_colors(bundle.card_theme);
        let pad = CARD_PADDING * s;
        let inner_width = (bundle.card_size.width - 2.0 * pad).max(0.0);
        let font = escape_xml(&self.config.font_family);

        let _ = write!(
            svg,
            "<g transform=\"translate({},{})\"><rect width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{fill}\"/>",
            origin.x,
            origin.y,
            bundle.card_size.width,
            bundle.card_size.height,
            CARD_RADIUS * s,
        );

        let mut y = pad;
        for line in &card.lines {
            let (size, weight, color) = match line {
                CardLine::Title(_) => (TITLE_FONT, "700", ink),
                CardLine::Watermark(_) => (WATERMARK_FONT, "600", muted),
                CardLine::Roaster(_) | CardLine::Flavors(_) => (BODY_FONT, "400", muted),
                _ => (BODY_FONT, "500", ink),
            };
            let size = size * s;
            let text = if line.is_single_line() {
                let max_chars = (inner_width / (size * GLYPH_WIDTH)).floor().max(1.0) as usize;
                truncate_with_ellipsis(&line.text(), max_chars)
            } else {
                line.text()
            };
            y += size;
            let spacing = if matches!(line, CardLine::Watermark(_)) {
                " letter-spacing=\"2\""
            } else {
                ""
            };
            let _ = write!(
                svg,
                "<text x=\"{pad}\" y=\"{y}\" font-size=\"{size}\" font-weight=\"{weight}\" fill=\"{color}\" font-family=\"{font}\"{spacing}>{}</text>",
                escape_xml(&text),
            );
            y += size * (LINE_SPACING - 1.0);
        }

        svg.push_str("</g>");
    }

    async fn write_output(&self, bundle: &ExportBundle) -> ExportResult<CapturedImage> {
        let (width, height) = pixel_size(bundle);
        let format = self.config.format;
        let path = self.config.output_dir.join(format!(
            "brewcard-{}.{}",
            bundle.composition_id,
            format.extension()
        ));
        let svg = self.render_svg(bundle);

        let bytes = match format {
            ImageFormat::Svg => svg.into_bytes(),
            ImageFormat::Png => rasterize_png(&svg)?,
        };

        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Captured {} ({}x{})", path.display(), width, height);

        Ok(CapturedImage::new(path, format, width, height))
    }
}

#[async_trait]
impl ViewCapture for SvgLayoutCapture {
    async fn capture(&self, bundle: &ExportBundle) -> ExportResult<CapturedImage> {
        self.write_output(bundle)
            .await
            .map_err(|e| ExportError::CaptureFailure(e.to_string()))
    }
}

fn render_filter(svg: &mut String, profile: &FilterProfile, bundle: &ExportBundle) {
    let view_w = bundle.canvas_size.width;
    let view_h = bundle.canvas_size.height;

    if let Some(tint) = profile.tint {
        let _ = write!(
            svg,
            "<rect x=\"0\" y=\"0\" width=\"{view_w}\" height=\"{view_h}\" fill=\"{}\"/>",
            tint.to_css(),
        );
    }

    if profile.scan_lines {
        let period = SCAN_LINE_PERIOD * bundle.scale_factor;
        let _ = write!(
            svg,
            "<defs><pattern id=\"scanlines\" width=\"{view_w}\" height=\"{period}\" patternUnits=\"userSpaceOnUse\"><rect width=\"{view_w}\" height=\"{}\" fill=\"rgba(0,0,0,0.15)\"/></pattern></defs><rect x=\"0\" y=\"0\" width=\"{view_w}\" height=\"{view_h}\" fill=\"url(#scanlines)\"/>",
            period / 2.0,
        );
    }
}

const fn theme_colors(theme: CardTheme) -> (&'static str, &'static str, &'static str) {
    match theme {
        CardTheme::Light => ("rgba(255,255,255,0.92)", "#1c1917", "#57534e"),
        CardTheme::Dark => ("rgba(0,0,0,0.78)", "#fafaf9", "#d6d3d1"),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_size(bundle: &ExportBundle) -> (u32, u32) {
    (
        bundle.canvas_size.width.round().max(1.0) as u32,
        bundle.canvas_size.height.round().max(1.0) as u32,
    )
}

#[cfg(feature = "raster")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rasterize_png(svg: &str) -> ExportResult<Vec<u8>> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| ExportError::Render(format!("SVG parsing failed: {e}")))?;

    let px_w = tree.size().width() as u32;
    let px_h = tree.size().height() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| ExportError::Render("Failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Render(format!("PNG encoding failed: {e}")))
}

#[cfg(not(feature = "raster"))]
fn rasterize_png(_svg: &str) -> ExportResult<Vec<u8>> {
    Err(ExportError::Render(
        "PNG output needs the `raster` feature".to_string(),
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
