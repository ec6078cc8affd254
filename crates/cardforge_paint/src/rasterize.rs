//! Card rasterization and image export
//!
//! Paint order is fixed: size the surface, fill the rounded card shape, then
//! title, wrapped subtitle and footer. [`Rasterizer::export`] wraps the whole
//! pipeline and never fails; errors are logged and yield `None`.

use std::path::{Path, PathBuf};

use cardforge_core::{Rgb, StyleConfig, TextAlign, FALLBACK_TEXT_COLOR};
use cardforge_style::RenderableStyle;
use chrono::Utc;
use tracing::{debug, error, info};

use crate::context::{Canvas2D, FillStyle, FontSpec};
use crate::encode::ImageFormat;
use crate::error::{PaintError, Result};
use crate::gradient::fill_style_for;
use crate::path::CardPath;
use crate::text::wrap_words;

/// Device pixels per CSS pixel
pub const DEVICE_SCALE: f32 = 2.0;
/// Height of an auto-height card, as a fraction of its width
pub const AUTO_HEIGHT_RATIO: f64 = 0.6;
/// Horizontal inset of left/right aligned text
pub const TEXT_INSET: f32 = 20.0;
/// Extra space between subtitle lines
pub const LINE_GAP: f32 = 4.0;
/// Subtitle lines wrap at this fraction of the card width
pub const WRAP_RATIO: f32 = 0.8;
/// Largest surface side, in device pixels
pub const MAX_SURFACE_SIDE: u32 = 16384;

/// Text sizes actually drawn, in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextSizes {
    pub title: f32,
    pub subtitle: f32,
    pub footer: f32,
}

impl TextSizes {
    /// Configured sizes raised to floors that scale with the card width
    pub fn for_card(config: &StyleConfig, width: f32) -> Self {
        let content = &config.content;
        Self {
            title: size_or_zero(content.title_size).max(width / 20.0).max(16.0),
            subtitle: size_or_zero(content.subtitle_size)
                .max(width / 30.0)
                .max(12.0),
            footer: size_or_zero(content.footer_size).max(10.0),
        }
    }
}

fn size_or_zero(size: f64) -> f32 {
    if size.is_finite() {
        size as f32
    } else {
        0.0
    }
}

/// Card box in CSS pixels
pub fn card_size(config: &StyleConfig) -> (f32, f32) {
    let width = config.width();
    let width = if width.is_finite() && width >= 1.0 {
        width
    } else {
        1.0
    };
    let height = config
        .dimensions
        .height
        .px()
        .unwrap_or(width * AUTO_HEIGHT_RATIO);
    let height = if height.is_finite() && height >= 1.0 {
        height
    } else {
        1.0
    };
    (width as f32, height as f32)
}

/// Text anchor for the alignment
pub fn text_anchor_x(align: TextAlign, width: f32) -> f32 {
    match align {
        TextAlign::Left => TEXT_INSET,
        TextAlign::Center => width / 2.0,
        TextAlign::Right => width - TEXT_INSET,
    }
}

/// Paints cards onto any [`Canvas2D`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rasterizer {
    pub scale: f32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            scale: DEVICE_SCALE,
        }
    }
}

impl Rasterizer {
    pub fn new(scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            DEVICE_SCALE
        };
        Self { scale }
    }

    /// Paint the card onto `canvas`
    pub fn paint<C: Canvas2D + ?Sized>(
        &self,
        config: &StyleConfig,
        style: &RenderableStyle,
        canvas: &mut C,
    ) -> Result<()> {
        let (width, height) = card_size(config);
        let device_w = (width * self.scale).round().max(1.0) as u32;
        let device_h = (height * self.scale).round().max(1.0) as u32;
        if device_w > MAX_SURFACE_SIDE || device_h > MAX_SURFACE_SIDE {
            return Err(PaintError::Surface {
                width: device_w,
                height: device_h,
            });
        }
        debug!(
            "Rasterizing {}x{} card onto {}x{} surface",
            width, height, device_w, device_h
        );

        canvas.resize(device_w, device_h)?;
        canvas.scale(self.scale, self.scale);
        canvas.set_global_alpha(style.opacity as f32);

        // Background
        canvas.set_fill_style(fill_style_for(config, width, height));
        let radii = style.corner_radii.map(|r| r as f32);
        if !canvas.fill_round_rect(0.0, 0.0, width, height, radii)? {
            canvas.fill_path(&CardPath::rounded_rect_quadratic(
                0.0, 0.0, width, height, radii,
            ))?;
        }

        // Text
        let content = &config.content;
        let sizes = TextSizes::for_card(config, width);
        let x = text_anchor_x(content.text_align, width);
        canvas.set_fill_style(FillStyle::Solid(Rgb::parse_or(
            &content.text_color,
            FALLBACK_TEXT_COLOR,
        )));
        canvas.set_text_align(content.text_align);

        if !content.title.is_empty() {
            canvas.set_font(FontSpec::bold(sizes.title));
            canvas.fill_text(&content.title, x, height / 3.0)?;
        }

        canvas.set_font(FontSpec::regular(sizes.subtitle));
        let lines = wrap_words(&content.subtitle, width * WRAP_RATIO, |line| {
            canvas.measure_text(line)
        });
        let mut y = height / 2.0;
        for line in &lines {
            canvas.fill_text(line, x, y)?;
            y += sizes.subtitle + LINE_GAP;
        }

        if !content.footer.is_empty() {
            canvas.set_font(FontSpec::regular(sizes.footer));
            canvas.fill_text(&content.footer, x, height - TEXT_INSET)?;
        }
        Ok(())
    }

    /// Paint and encode
    pub fn rasterize<C: Canvas2D + ?Sized>(
        &self,
        config: &StyleConfig,
        style: &RenderableStyle,
        canvas: &mut C,
        format: ImageFormat,
        quality: f32,
    ) -> Result<Vec<u8>> {
        self.paint(config, style, canvas)?;
        canvas.encode(format, quality)
    }

    /// Paint, encode and stamp an export file; failures are logged
    pub fn export<C: Canvas2D + ?Sized>(
        &self,
        config: &StyleConfig,
        style: &RenderableStyle,
        canvas: &mut C,
        format: ImageFormat,
        quality: f32,
    ) -> Option<ExportFile> {
        match self.rasterize(config, style, canvas, format, quality) {
            Ok(bytes) => Some(ExportFile {
                format,
                bytes,
                timestamp_ms: Utc::now().timestamp_millis(),
            }),
            Err(e) => {
                error!("Card export failed: {}", e);
                None
            }
        }
    }
}

/// [`Rasterizer::export`] at the default device scale
pub fn export_image<C: Canvas2D + ?Sized>(
    config: &StyleConfig,
    style: &RenderableStyle,
    canvas: &mut C,
    format: ImageFormat,
    quality: f32,
) -> Option<ExportFile> {
    Rasterizer::default().export(config, style, canvas, format, quality)
}

/// An encoded card image ready to be written
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    /// Unix time in milliseconds when the image was encoded
    pub timestamp_ms: i64,
}

impl ExportFile {
    /// `card-design-<unix-ms>.<ext>`
    pub fn file_name(&self) -> String {
        format!(
            "card-design-{}.{}",
            self.timestamp_ms,
            self.format.extension()
        )
    }

    /// Write into `dir` under [`file_name`](Self::file_name)
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        std::fs::write(&path, &self.bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DrawCommand, RecordingCanvas};
    use crate::path::PathCommand;
    use crate::pixmap::PixmapCanvas;
    use crate::text::FontBook;
    use cardforge_core::{CardHeight, GradientKind};
    use cardforge_style::compute;

    fn record(config: &StyleConfig) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        Rasterizer::default()
            .paint(config, &compute(config), &mut canvas)
            .unwrap();
        canvas
    }

    #[test]
    fn test_surface_scaled_by_device_factor() {
        let canvas = record(&StyleConfig::default());
        assert_eq!(canvas.size(), (800, 480));
        assert_eq!(canvas.commands()[1], DrawCommand::Scale { sx: 2.0, sy: 2.0 });
    }

    #[test]
    fn test_fallback_round_rect_path() {
        let canvas = record(&StyleConfig::default());
        match &canvas.commands()[2] {
            DrawCommand::FillPath { path, alpha, .. } => {
                assert_eq!(path.commands()[0], PathCommand::MoveTo(16.0, 0.0));
                assert_eq!(path.commands().len(), 10);
                assert!((alpha - 0.95).abs() < 1e-6);
            }
            other => panic!("expected background fill, got {:?}", other),
        }
    }

    #[test]
    fn test_text_layout() {
        let mut config = StyleConfig::default();
        config.content.subtitle = "one two three four five six seven eight nine ten eleven \
                                   twelve thirteen fourteen fifteen sixteen"
            .to_string();
        let canvas = record(&config);

        let texts: Vec<_> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { x, y, font, .. } => Some((*x, *y, *font)),
                _ => None,
            })
            .collect();

        // Title, at least two subtitle lines, footer
        assert!(texts.len() >= 4);
        assert_eq!(texts[0], (200.0, 80.0, FontSpec::bold(24.0)));
        assert_eq!(texts[1].1, 120.0);
        assert!((texts[2].1 - (120.0 + 14.0 + LINE_GAP)).abs() < 1e-4);
        let footer = texts[texts.len() - 1];
        assert_eq!((footer.1, footer.2), (220.0, FontSpec::regular(12.0)));
    }

    #[test]
    fn test_subtitle_lines_fit() {
        let mut config = StyleConfig::default();
        config.content.subtitle = "lorem ipsum dolor sit amet ".repeat(8);
        let canvas = record(&config);
        let max = 400.0 * WRAP_RATIO;
        let font = FontSpec::regular(14.0);
        let mut measurer = RecordingCanvas::new();
        measurer.set_font(font);
        let texts = canvas.texts();
        for text in &texts[1..texts.len() - 1] {
            assert!(measurer.measure_text(text) <= max, "line too wide: {}", text);
        }
    }

    #[test]
    fn test_alignment_anchors() {
        assert_eq!(text_anchor_x(TextAlign::Left, 400.0), 20.0);
        assert_eq!(text_anchor_x(TextAlign::Center, 400.0), 200.0);
        assert_eq!(text_anchor_x(TextAlign::Right, 400.0), 380.0);
    }

    #[test]
    fn test_text_sizes_floor_with_width() {
        let mut config = StyleConfig::default();
        config.content.title_size = 10.0;
        config.content.subtitle_size = f64::NAN;
        config.content.footer_size = 2.0;
        let sizes = TextSizes::for_card(&config, 900.0);
        assert_eq!(sizes, TextSizes { title: 45.0, subtitle: 30.0, footer: 10.0 });
    }

    #[test]
    fn test_auto_height() {
        let mut config = StyleConfig::default();
        config.dimensions.height = CardHeight::Auto;
        assert_eq!(card_size(&config), (400.0, 240.0));
        config.dimensions.width = 500.0;
        assert_eq!(card_size(&config), (500.0, 300.0));
    }

    #[test]
    fn test_conic_exports_solid() {
        let mut config = StyleConfig::default();
        config.gradient.kind = GradientKind::Conic;
        let canvas = record(&config);
        match &canvas.commands()[2] {
            DrawCommand::FillPath { style, .. } => {
                assert_eq!(*style, FillStyle::Solid(config.primary_rgb()))
            }
            other => panic!("expected background fill, got {:?}", other),
        }
    }

    #[test]
    fn test_export_png_with_pixmap() {
        let mut config = StyleConfig::default();
        config.dimensions.width = 40.0;
        config.dimensions.height = CardHeight::Px(20.0);
        config.opacity = 100.0;
        let style = compute(&config);

        let mut canvas = PixmapCanvas::new(FontBook::empty());
        let file = export_image(&config, &style, &mut canvas, ImageFormat::Png, 0.95).unwrap();

        assert_eq!(canvas.pixmap().unwrap().width(), 80);
        assert!(file.file_name().starts_with("card-design-"));
        assert!(file.file_name().ends_with(".png"));
        let decoded = image::load_from_memory(&file.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (80, 40));
        assert_eq!(decoded.get_pixel(40, 20).0[3], 255);
    }

    struct BrokenCanvas(RecordingCanvas);

    impl Canvas2D for BrokenCanvas {
        fn resize(&mut self, width: u32, height: u32) -> Result<()> {
            Err(PaintError::Surface { width, height })
        }
        fn scale(&mut self, sx: f32, sy: f32) {
            self.0.scale(sx, sy)
        }
        fn set_global_alpha(&mut self, alpha: f32) {
            self.0.set_global_alpha(alpha)
        }
        fn set_fill_style(&mut self, style: FillStyle) {
            self.0.set_fill_style(style)
        }
        fn fill_path(&mut self, path: &CardPath) -> Result<()> {
            self.0.fill_path(path)
        }
        fn set_font(&mut self, font: FontSpec) {
            self.0.set_font(font)
        }
        fn set_text_align(&mut self, align: TextAlign) {
            self.0.set_text_align(align)
        }
        fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
            self.0.fill_text(text, x, y)
        }
        fn measure_text(&self, text: &str) -> f32 {
            self.0.measure_text(text)
        }
        fn encode(&self, format: ImageFormat, quality: f32) -> Result<Vec<u8>> {
            self.0.encode(format, quality)
        }
    }

    #[test]
    fn test_export_failure_returns_none() {
        let config = StyleConfig::default();
        let mut canvas = BrokenCanvas(RecordingCanvas::new());
        let file = export_image(&config, &compute(&config), &mut canvas, ImageFormat::Png, 1.0);
        assert!(file.is_none());
    }

    #[test]
    fn test_oversized_surface_is_an_error() {
        let mut config = StyleConfig::default();
        config.dimensions.width = 20000.0;
        config.dimensions.height = CardHeight::Px(20000.0);
        let mut canvas = RecordingCanvas::new();
        let result = Rasterizer::default().paint(&config, &compute(&config), &mut canvas);
        assert!(matches!(
            result,
            Err(PaintError::Surface {
                width: 40000,
                height: 40000
            })
        ));
        assert!(canvas.commands().is_empty());

        let mut canvas = PixmapCanvas::new(FontBook::empty());
        let file = export_image(&config, &compute(&config), &mut canvas, ImageFormat::Png, 1.0);
        assert!(file.is_none());
    }

    #[test]
    fn test_largest_surface_side_is_accepted() {
        let mut config = StyleConfig::default();
        config.dimensions.width = 8192.0;
        config.dimensions.height = CardHeight::Px(10.0);
        let mut canvas = RecordingCanvas::new();
        Rasterizer::default()
            .paint(&config, &compute(&config), &mut canvas)
            .unwrap();
        assert_eq!(canvas.size(), (MAX_SURFACE_SIDE, 20));
    }

    #[test]
    fn test_write_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExportFile {
            format: ImageFormat::Webp,
            bytes: vec![1, 2, 3],
            timestamp_ms: 1_700_000_000_000,
        };
        let path = file.write_to(dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "card-design-1700000000000.webp"
        );
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
