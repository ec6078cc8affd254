//! Cardforge Paint
//!
//! Rasterizes a card style to an image file:
//!
//! - [`Canvas2D`]: canvas-like drawing context, implemented by the tiny-skia
//!   [`PixmapCanvas`] and the command-recording [`RecordingCanvas`]
//! - [`Rasterizer`]: paints the card shape, background fill and text
//! - [`FontBook`]: system font discovery, measurement and glyph outlines
//! - [`export_image`]: paint, encode and name an export file without failing
//!
//! # Example
//!
//! ```rust
//! use cardforge_core::StyleConfig;
//! use cardforge_paint::{export_image, FontBook, ImageFormat, PixmapCanvas};
//! use cardforge_style::compute;
//!
//! let config = StyleConfig::default();
//! let mut canvas = PixmapCanvas::new(FontBook::empty());
//! let file = export_image(&config, &compute(&config), &mut canvas, ImageFormat::Png, 0.95)
//!     .expect("export");
//! assert!(file.file_name().ends_with(".png"));
//! ```

pub mod context;
pub mod encode;
pub mod error;
pub mod gradient;
pub mod path;
pub mod pixmap;
pub mod rasterize;
pub mod text;

pub use context::{Canvas2D, DrawCommand, FillStop, FillStyle, FontSpec, RecordingCanvas};
pub use encode::{encode_rgba, ImageFormat, DEFAULT_QUALITY};
pub use error::{PaintError, Result};
pub use gradient::{fill_style_for, linear_endpoints};
pub use path::{clamp_radii, CardPath, PathCommand};
pub use pixmap::PixmapCanvas;
pub use rasterize::{
    card_size, export_image, text_anchor_x, ExportFile, Rasterizer, TextSizes, DEVICE_SCALE,
    MAX_SURFACE_SIDE,
};
pub use text::{fallback_text_width, wrap_words, FontBook, FALLBACK_ADVANCE};
