//! RGB colors as stored in a card config
//!
//! Card configs keep colors as the text the user typed. They are normalized
//! to 6-digit uppercase hex only when a style is compiled or painted, so a
//! half-typed value in a color field never poisons the stored config.
//!
//! Accepted forms: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, with or without
//! the leading `#`. Any alpha digits are discarded; alpha is always applied
//! separately by the consumer.

use std::fmt;

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{all_consuming, opt},
    sequence::preceded,
    IResult,
};
use tracing::debug;

/// An opaque 8-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color, returning `None` for anything malformed
    pub fn parse(text: &str) -> Option<Self> {
        let (_, hex) = all_consuming(hex_digits)(text.trim()).ok()?;

        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let doubled = |s: &str| channel(&s.repeat(2));

        match hex.len() {
            3 | 4 => Some(Self::new(
                doubled(&hex[0..1])?,
                doubled(&hex[1..2])?,
                doubled(&hex[2..3])?,
            )),
            6 | 8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }

    /// Parse a hex color, substituting `fallback` when the text is malformed
    pub fn parse_or(text: &str, fallback: Rgb) -> Self {
        Self::parse(text).unwrap_or_else(|| {
            debug!("Malformed color {:?}, using {}", text, fallback);
            fallback
        })
    }

    /// Normalized `#RRGGBB` form
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `#RRGGBBAA` form with an explicit alpha byte
    pub fn to_hex_with_alpha(self, alpha: u8) -> String {
        format!("{}{:02X}", self.to_hex(), alpha)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn hex_digits(input: &str) -> IResult<&str, &str> {
    preceded(opt(char('#')), take_while1(|c: char| c.is_ascii_hexdigit()))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        assert_eq!(Rgb::parse("#7c3aed"), Some(Rgb::new(124, 58, 237)));
        assert_eq!(Rgb::parse("8B5CF6"), Some(Rgb::new(0x8B, 0x5C, 0xF6)));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Rgb::parse("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse("#f008"), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn test_parse_drops_alpha_digits() {
        assert_eq!(Rgb::parse("#00000010"), Some(Rgb::BLACK));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Rgb::parse(""), None);
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#gg0000"), None);
        assert_eq!(Rgb::parse("rgb(1, 2, 3)"), None);
        assert_eq!(Rgb::parse("#ff0000 extra"), None);
    }

    #[test]
    fn test_parse_or_fallback() {
        assert_eq!(Rgb::parse_or("nope", Rgb::WHITE), Rgb::WHITE);
        assert_eq!(Rgb::parse_or(" #000 ", Rgb::WHITE), Rgb::BLACK);
    }

    #[test]
    fn test_hex_output_is_uppercase() {
        let c = Rgb::new(0x8b, 0x5c, 0xf6);
        assert_eq!(c.to_hex(), "#8B5CF6");
        assert_eq!(c.to_hex_with_alpha(0x26), "#8B5CF626");
    }
}
