//! Font discovery, measurement and word wrap
//!
//! [`FontBook`] resolves one sans-serif face for regular and one for bold
//! text. Known font paths are tried first; the full system scan only runs
//! when none of them exist. Without any face, measurement falls back to a
//! fixed advance per character and outlines are unavailable.

use std::path::Path;

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use tracing::{debug, warn};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::Result;
use crate::path::{CardPath, PathCommand};

/// Advance per character, in ems, when no font is available
pub const FALLBACK_ADVANCE: f32 = 0.55;

#[cfg(target_os = "macos")]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/SFNS.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/Library/Fonts/Arial Bold.ttf",
];

#[cfg(target_os = "windows")]
const KNOWN_FONT_PATHS: &[&str] = &[
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\segoeuib.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
];

/// Named families tried when the generic sans-serif family is unmapped
const SANS_SERIF_FALLBACKS: &[&str] = &[
    "Helvetica",
    "Arial",
    "Segoe UI",
    "Roboto",
    "Noto Sans",
    "DejaVu Sans",
    "Liberation Sans",
];

/// Width of `text` at the fallback advance
pub fn fallback_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * FALLBACK_ADVANCE
}

/// Regular and bold sans-serif faces
pub struct FontBook {
    db: Database,
    regular: Option<ID>,
    bold: Option<ID>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .field("regular", &self.regular)
            .field("bold", &self.bold)
            .finish()
    }
}

impl FontBook {
    /// A book without faces; every measurement uses the fallback advance
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
            regular: None,
            bold: None,
        }
    }

    /// Discover system fonts
    pub fn discover() -> Self {
        let mut book = Self::empty();

        let mut loaded = 0;
        for path in KNOWN_FONT_PATHS {
            if Path::new(path).exists() && book.db.load_font_file(path).is_ok() {
                loaded += 1;
            }
        }
        debug!("Loaded {} known system fonts", loaded);
        book.resolve();

        if book.regular.is_none() {
            debug!("No known font resolved, scanning system fonts");
            book.db.load_system_fonts();
            book.resolve();
        }

        if !book.has_fonts() {
            warn!("No usable font found; card text will be skipped");
        }
        book
    }

    /// Add a font file and re-resolve the faces
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.db.load_font_file(path)?;
        self.resolve();
        Ok(())
    }

    /// Add in-memory font data and re-resolve the faces
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.resolve();
    }

    pub fn has_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    fn resolve(&mut self) {
        self.regular = self.query(Weight::NORMAL);
        self.bold = self.query(Weight::BOLD);
    }

    fn query(&self, weight: Weight) -> Option<ID> {
        let generic = Query {
            families: &[Family::SansSerif],
            weight,
            style: Style::Normal,
            stretch: Stretch::Normal,
        };
        if let Some(id) = self.db.query(&generic) {
            return Some(id);
        }

        for name in SANS_SERIF_FALLBACKS {
            let named = Query {
                families: &[Family::Name(name)],
                weight,
                style: Style::Normal,
                stretch: Stretch::Normal,
            };
            if let Some(id) = self.db.query(&named) {
                return Some(id);
            }
        }

        // Any face beats no text at all
        self.db.faces().next().map(|face| face.id)
    }

    fn face_id(&self, bold: bool) -> Option<ID> {
        if bold {
            self.bold.or(self.regular)
        } else {
            self.regular.or(self.bold)
        }
    }

    /// Advance width of `text` in pixels
    pub fn measure(&self, text: &str, size: f32, bold: bool) -> f32 {
        let measured = self.face_id(bold).and_then(|id| {
            self.db
                .with_face_data(id, |data, index| {
                    let face = Face::parse(data, index).ok()?;
                    let scale = size / face.units_per_em() as f32;
                    let units: f32 = text
                        .chars()
                        .map(|c| glyph_advance(&face, c) as f32)
                        .sum();
                    Some(units * scale)
                })
                .flatten()
        });
        measured.unwrap_or_else(|| fallback_text_width(text, size))
    }

    /// Glyph outlines of `text` with the baseline origin at `(x, y)`
    ///
    /// Returns `None` when no face is available.
    pub fn outline(&self, text: &str, size: f32, bold: bool, x: f32, y: f32) -> Option<CardPath> {
        let id = self.face_id(bold)?;
        self.db
            .with_face_data(id, |data, index| {
                let face = Face::parse(data, index).ok()?;
                let scale = size / face.units_per_em() as f32;
                let mut pen = GlyphPen {
                    path: CardPath::new(),
                    scale,
                    x,
                    y,
                };
                for c in text.chars() {
                    let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
                    face.outline_glyph(glyph, &mut pen);
                    pen.x += glyph_advance(&face, c) as f32 * scale;
                }
                Some(pen.path)
            })
            .flatten()
    }
}

fn glyph_advance(face: &Face<'_>, c: char) -> u16 {
    let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
    face.glyph_hor_advance(glyph).unwrap_or(0)
}

/// Maps font units (y up) onto user space (y down)
struct GlyphPen {
    path: CardPath,
    scale: f32,
    x: f32,
    y: f32,
}

impl GlyphPen {
    fn point(&self, gx: f32, gy: f32) -> (f32, f32) {
        (self.x + gx * self.scale, self.y - gy * self.scale)
    }
}

impl OutlineBuilder for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.push(PathCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.push(PathCommand::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (cx, cy) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.path.push(PathCommand::QuadTo { cx, cy, x, y });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (cx1, cy1) = self.point(x1, y1);
        let (cx2, cy2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.path.push(PathCommand::CubicTo {
            cx1,
            cy1,
            cx2,
            cy2,
            x,
            y,
        });
    }

    fn close(&mut self) {
        self.path.push(PathCommand::Close);
    }
}

/// Greedy word wrap
///
/// Words are appended while the measured line (with its trailing space)
/// stays within `max_width`. A single word wider than `max_width` gets a
/// line of its own. Blank text yields no lines.
pub fn wrap_words(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = format!("{}{} ", line, word);
        if measure(&candidate) > max_width && !line.is_empty() {
            lines.push(line.trim_end().to_string());
            line = format!("{} ", word);
        } else {
            line = candidate;
        }
    }

    let last = line.trim_end();
    if !last.is_empty() {
        lines.push(last.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> f32 {
        text.chars().count() as f32
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap_words("aa bb cc dd", 6.0, chars);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn test_wrap_long_word_alone() {
        let lines = wrap_words("a verylongword b", 5.0, chars);
        assert_eq!(lines, vec!["a", "verylongword", "b"]);
    }

    #[test]
    fn test_wrap_blank_text() {
        assert!(wrap_words("", 100.0, chars).is_empty());
        assert!(wrap_words("   ", 100.0, chars).is_empty());
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        let lines = wrap_words("  one   two ", 100.0, chars);
        assert_eq!(lines, vec!["one two"]);
    }

    #[test]
    fn test_empty_book_measures_with_fallback() {
        let book = FontBook::empty();
        assert!(!book.has_fonts());
        assert_eq!(book.measure("abc", 10.0, true), fallback_text_width("abc", 10.0));
        assert!(book.outline("abc", 10.0, false, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_garbage_font_data_is_ignored() {
        let mut book = FontBook::empty();
        book.load_font_data(vec![0u8; 16]);
        assert!(!book.has_fonts());
    }
}
