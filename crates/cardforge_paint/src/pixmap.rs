//! tiny-skia backed canvas

use cardforge_core::{Rgb, TextAlign};
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap, Point,
    RadialGradient, Shader, SpreadMode, Transform,
};
use tracing::{debug, warn};

use crate::context::{Canvas2D, FillStop, FillStyle, FontSpec};
use crate::encode::{encode_rgba, ImageFormat};
use crate::error::{PaintError, Result};
use crate::path::{CardPath, PathCommand};
use crate::text::FontBook;

/// Canvas drawing anti-aliased pixels into a [`Pixmap`]
pub struct PixmapCanvas {
    pixmap: Option<Pixmap>,
    transform: Transform,
    global_alpha: f32,
    fill: FillStyle,
    font: FontSpec,
    align: TextAlign,
    fonts: FontBook,
    warned_no_font: bool,
}

impl PixmapCanvas {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            pixmap: None,
            transform: Transform::identity(),
            global_alpha: 1.0,
            fill: FillStyle::default(),
            font: FontSpec::default(),
            align: TextAlign::default(),
            fonts,
            warned_no_font: false,
        }
    }

    /// The surface, once sized
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Straight-alpha RGBA bytes of the surface
    pub fn to_rgba(&self) -> Result<Vec<u8>> {
        let pixmap = self.pixmap.as_ref().ok_or(PaintError::NoSurface)?;
        Ok(pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect())
    }

    fn shader(&self) -> Shader<'static> {
        let mut shader = match &self.fill {
            FillStyle::Solid(rgb) => Shader::SolidColor(color(*rgb)),
            FillStyle::Linear { start, end, stops } => LinearGradient::new(
                Point::from_xy(start.0, start.1),
                Point::from_xy(end.0, end.1),
                gradient_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or_else(|| first_stop_shader(stops)),
            FillStyle::Radial {
                center,
                radius,
                stops,
            } => {
                let center = Point::from_xy(center.0, center.1);
                RadialGradient::new(
                    center,
                    center,
                    *radius,
                    gradient_stops(stops),
                    SpreadMode::Pad,
                    Transform::identity(),
                )
                .unwrap_or_else(|| first_stop_shader(stops))
            }
        };
        shader.apply_opacity(self.global_alpha);
        shader
    }

    fn fill_card_path(&mut self, path: &CardPath) -> Result<()> {
        let shader = self.shader();
        let transform = self.transform;
        let pixmap = self.pixmap.as_mut().ok_or(PaintError::NoSurface)?;
        let Some(path) = to_skia_path(path) else {
            debug!("Skipping degenerate path ({} commands)", path.commands().len());
            return Ok(());
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        Ok(())
    }
}

impl Canvas2D for PixmapCanvas {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let pixmap = Pixmap::new(width, height).ok_or(PaintError::Surface { width, height })?;
        self.pixmap = Some(pixmap);
        self.transform = Transform::identity();
        Ok(())
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform.pre_scale(sx, sy);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.fill = style;
    }

    fn fill_path(&mut self, path: &CardPath) -> Result<()> {
        self.fill_card_path(path)
    }

    fn fill_round_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radii: [f32; 4],
    ) -> Result<bool> {
        self.fill_card_path(&CardPath::rounded_rect(x, y, width, height, radii))?;
        Ok(true)
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        if !self.fonts.has_fonts() {
            if !self.warned_no_font {
                warn!("No font available, skipping card text");
                self.warned_no_font = true;
            }
            return Ok(());
        }

        let width = self.measure_text(text);
        let left = match self.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        let outline = self
            .fonts
            .outline(text, self.font.size, self.font.bold, left, y);
        match outline {
            Some(path) => self.fill_card_path(&path),
            None => Ok(()),
        }
    }

    fn measure_text(&self, text: &str) -> f32 {
        self.fonts.measure(text, self.font.size, self.font.bold)
    }

    fn encode(&self, format: ImageFormat, quality: f32) -> Result<Vec<u8>> {
        let pixmap = self.pixmap.as_ref().ok_or(PaintError::NoSurface)?;
        encode_rgba(
            pixmap.width(),
            pixmap.height(),
            &self.to_rgba()?,
            format,
            quality,
        )
    }
}

fn color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}

fn gradient_stops(stops: &[FillStop]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|stop| GradientStop::new(stop.offset, color(stop.color)))
        .collect()
}

fn first_stop_shader(stops: &[FillStop]) -> Shader<'static> {
    Shader::SolidColor(color(stops.first().map_or(Rgb::BLACK, |stop| stop.color)))
}

fn to_skia_path(path: &CardPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(x, y) => pb.move_to(x, y),
            PathCommand::LineTo(x, y) => pb.line_to(x, y),
            PathCommand::QuadTo { cx, cy, x, y } => pb.quad_to(cx, cy, x, y),
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => pb.cubic_to(cx1, cy1, cx2, cy2, x, y),
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(canvas: &PixmapCanvas, x: u32, y: u32) -> [u8; 4] {
        let rgba = canvas.to_rgba().unwrap();
        let width = canvas.pixmap().unwrap().width();
        let i = ((y * width + x) * 4) as usize;
        [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]]
    }

    #[test]
    fn test_draw_before_resize_fails() {
        let mut canvas = PixmapCanvas::new(FontBook::empty());
        let path = CardPath::rounded_rect(0.0, 0.0, 4.0, 4.0, [0.0; 4]);
        assert!(matches!(canvas.fill_path(&path), Err(PaintError::NoSurface)));
        assert!(matches!(
            canvas.encode(ImageFormat::Png, 1.0),
            Err(PaintError::NoSurface)
        ));
    }

    #[test]
    fn test_zero_sized_surface_is_an_error() {
        let mut canvas = PixmapCanvas::new(FontBook::empty());
        assert!(matches!(
            canvas.resize(0, 10),
            Err(PaintError::Surface { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_native_round_rect_fills_scaled() {
        let mut canvas = PixmapCanvas::new(FontBook::empty());
        canvas.resize(20, 20).unwrap();
        canvas.scale(2.0, 2.0);
        canvas.set_fill_style(FillStyle::Solid(Rgb::new(255, 0, 0)));
        assert!(canvas
            .fill_round_rect(0.0, 0.0, 10.0, 10.0, [5.0; 4])
            .unwrap());

        assert_eq!(pixel(&canvas, 10, 10), [255, 0, 0, 255]);
        // Corner outside the circle stays transparent
        assert_eq!(pixel(&canvas, 0, 0)[3], 0);
    }

    #[test]
    fn test_degenerate_path_draws_nothing() {
        let mut canvas = PixmapCanvas::new(FontBook::empty());
        canvas.resize(4, 4).unwrap();
        canvas.set_fill_style(FillStyle::Solid(Rgb::WHITE));
        canvas.fill_path(&CardPath::new()).unwrap();
        canvas.fill_path(&CardPath::new().move_to(1.0, 1.0)).unwrap();

        assert!(canvas.to_rgba().unwrap().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn test_global_alpha_applies() {
        let mut canvas = PixmapCanvas::new(FontBook::empty());
        canvas.resize(4, 4).unwrap();
        canvas.set_global_alpha(0.5);
        canvas.set_fill_style(FillStyle::Solid(Rgb::WHITE));
        canvas
            .fill_path(&CardPath::rounded_rect(0.0, 0.0, 4.0, 4.0, [0.0; 4]))
            .unwrap();

        let alpha = pixel(&canvas, 2, 2)[3];
        assert!((126..=129).contains(&alpha), "alpha {}", alpha);
    }

    #[test]
    fn test_linear_gradient_runs_left_to_right() {
        let mut canvas = PixmapCanvas::new(FontBook::empty());
        canvas.resize(100, 10).unwrap();
        canvas.set_fill_style(FillStyle::Linear {
            start: (0.0, 5.0),
            end: (100.0, 5.0),
            stops: vec![
                FillStop::new(0.0, Rgb::new(255, 0, 0)),
                FillStop::new(1.0, Rgb::new(0, 0, 255)),
            ],
        });
        canvas
            .fill_path(&CardPath::rounded_rect(0.0, 0.0, 100.0, 10.0, [0.0; 4]))
            .unwrap();

        let left = pixel(&canvas, 1, 5);
        let right = pixel(&canvas, 98, 5);
        assert!(left[0] > 240 && left[2] < 15);
        assert!(right[2] > 240 && right[0] < 15);
    }

    #[test]
    fn test_text_without_fonts_is_skipped() {
        let mut canvas = PixmapCanvas::new(FontBook::empty());
        canvas.resize(10, 10).unwrap();
        canvas.fill_text("hello", 5.0, 5.0).unwrap();
        assert!(canvas.to_rgba().unwrap().iter().all(|&b| b == 0));
    }
}
