//! Drawing surface abstraction
//!
//! [`Canvas2D`] is the small subset of a 2D canvas context the rasterizer
//! needs. [`PixmapCanvas`](crate::PixmapCanvas) draws real pixels;
//! [`RecordingCanvas`] only records what was asked of it.

use cardforge_core::{Rgb, TextAlign};

use crate::encode::{encode_rgba, ImageFormat};
use crate::error::Result;
use crate::path::CardPath;
use crate::text::fallback_text_width;

/// A gradient color stop, offset in `0..=1`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillStop {
    pub offset: f32,
    pub color: Rgb,
}

impl FillStop {
    pub fn new(offset: f32, color: Rgb) -> Self {
        Self { offset, color }
    }
}

/// Paint used by fill operations
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    Solid(Rgb),
    Linear {
        start: (f32, f32),
        end: (f32, f32),
        stops: Vec<FillStop>,
    },
    Radial {
        center: (f32, f32),
        radius: f32,
        stops: Vec<FillStop>,
    },
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle::Solid(Rgb::BLACK)
    }
}

/// Font selection for text operations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Size in CSS pixels (before the surface scale)
    pub size: f32,
    pub bold: bool,
}

impl FontSpec {
    pub fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::regular(10.0)
    }
}

/// Canvas-like drawing context
///
/// Coordinates are in user space; [`scale`](Canvas2D::scale) maps them onto
/// the surface. Text `y` is the alphabetic baseline and text `x` is the
/// anchor selected by [`set_text_align`](Canvas2D::set_text_align).
pub trait Canvas2D {
    /// Reallocate the surface; resets the transform
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn scale(&mut self, sx: f32, sy: f32);

    /// Alpha multiplied into every later fill, `0..=1`
    fn set_global_alpha(&mut self, alpha: f32);

    fn set_fill_style(&mut self, style: FillStyle);

    fn fill_path(&mut self, path: &CardPath) -> Result<()>;

    /// Fill a rounded rectangle natively
    ///
    /// Returns `Ok(false)` when the surface has no native primitive and the
    /// caller must build the path itself.
    fn fill_round_rect(
        &mut self,
        _x: f32,
        _y: f32,
        _width: f32,
        _height: f32,
        _radii: [f32; 4],
    ) -> Result<bool> {
        Ok(false)
    }

    fn set_font(&mut self, font: FontSpec);

    fn set_text_align(&mut self, align: TextAlign);

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<()>;

    /// Advance width of `text` in the current font, user space
    fn measure_text(&self, text: &str) -> f32;

    /// Encode the surface; `quality` in `0..=1` applies to lossy formats
    fn encode(&self, format: ImageFormat, quality: f32) -> Result<Vec<u8>>;
}

/// A recorded drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize {
        width: u32,
        height: u32,
    },
    Scale {
        sx: f32,
        sy: f32,
    },
    FillPath {
        path: CardPath,
        style: FillStyle,
        alpha: f32,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        font: FontSpec,
        align: TextAlign,
        style: FillStyle,
    },
}

/// Canvas that records commands instead of drawing
///
/// Text is measured at a fixed `0.55 × size` per character, so layout is
/// reproducible without fonts. Encoding yields a blank image of the recorded
/// surface size.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    global_alpha: f32,
    fill: FillStyle,
    font: FontSpec,
    align: TextAlign,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            global_alpha: 1.0,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Surface size in device pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Text of every `FillText` command, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas2D for RecordingCanvas {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
        Ok(())
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.fill = style;
    }

    fn fill_path(&mut self, path: &CardPath) -> Result<()> {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            style: self.fill.clone(),
            alpha: self.global_alpha,
        });
        Ok(())
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            font: self.font,
            align: self.align,
            style: self.fill.clone(),
        });
        Ok(())
    }

    fn measure_text(&self, text: &str) -> f32 {
        fallback_text_width(text, self.font.size)
    }

    fn encode(&self, format: ImageFormat, quality: f32) -> Result<Vec<u8>> {
        let blank = vec![0u8; self.width as usize * self.height as usize * 4];
        encode_rgba(self.width, self.height, &blank, format, quality)
    }
}
