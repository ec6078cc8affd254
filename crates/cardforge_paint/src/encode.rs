//! Image encoding

use std::fmt;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{PaintError, Result};

/// Quality used when none (or a non-finite one) is given
pub const DEFAULT_QUALITY: f32 = 0.95;

/// Export image format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Webp];

    /// File extension, also the name accepted by [`FromStr`]
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "webp" => Ok(ImageFormat::Webp),
            _ => Err(PaintError::UnknownFormat(s.to_string())),
        }
    }
}

/// Encode straight-alpha RGBA pixels
///
/// `quality` (`0..=1`) only affects JPEG, which has no alpha channel and is
/// flattened over black first. WEBP is written losslessly.
pub fn encode_rgba(
    width: u32,
    height: u32,
    rgba: &[u8],
    format: ImageFormat,
    quality: f32,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => {
            PngEncoder::new(&mut buf).write_image(rgba, width, height, ExtendedColorType::Rgba8)?;
        }
        ImageFormat::Jpeg => {
            let rgb = flatten_over_black(rgba);
            JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ImageFormat::Webp => {
            WebPEncoder::new_lossless(&mut buf).write_image(
                rgba,
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
    }
    Ok(buf)
}

/// Map `0..=1` onto the encoder's `1..=100`
fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        DEFAULT_QUALITY
    };
    ((quality * 100.0).round() as u8).max(1)
}

/// Drop alpha by compositing over opaque black
fn flatten_over_black(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| {
            let a = px[3] as u16;
            [0, 1, 2].map(|i| ((px[i] as u16 * a + 127) / 255) as u8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_square() -> Vec<u8> {
        [255u8, 0, 0, 255].repeat(4 * 4)
    }

    #[test]
    fn test_format_names() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Webp.to_string(), "webp");
        assert!(matches!(
            "gif".parse::<ImageFormat>(),
            Err(PaintError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_png_round_trip() {
        let bytes = encode_rgba(4, 4, &red_square(), ImageFormat::Png, 1.0).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(2, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_jpeg_and_webp_signatures() {
        let jpeg = encode_rgba(4, 4, &red_square(), ImageFormat::Jpeg, 0.8).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let webp = encode_rgba(4, 4, &red_square(), ImageFormat::Webp, 0.8).unwrap();
        assert_eq!(&webp[..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_flatten_and_quality() {
        assert_eq!(
            flatten_over_black(&[200, 100, 50, 0, 255, 255, 255, 255]),
            vec![0, 0, 0, 255, 255, 255]
        );
        assert_eq!(jpeg_quality(0.95), 95);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(f32::NAN), 95);
        assert_eq!(jpeg_quality(7.0), 100);
    }
}
