//! CSS number and color formatting

use cardforge_core::Rgb;

/// Format a number the way it appears in CSS output
///
/// Rounded to three decimals with trailing zeros trimmed; `-0` prints as `0`.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".to_string();
    }
    let mut text = format!("{:.3}", rounded);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

pub fn px(value: f64) -> String {
    format!("{}px", fmt_num(value))
}

pub fn deg(value: f64) -> String {
    format!("{}deg", fmt_num(value))
}

pub fn percent(value: f64) -> String {
    format!("{}%", fmt_num(value))
}

pub fn ms(value: f64) -> String {
    format!("{}ms", fmt_num(value))
}

/// `value` if finite, else `fallback`
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Clamp a percentage to 0-100; non-finite input becomes `fallback`
pub fn clamp_percent(value: f64, fallback: f64) -> f64 {
    finite_or(value, fallback).clamp(0.0, 100.0)
}

/// 0.0-1.0 fraction to a 0-255 channel byte
pub fn alpha_byte(fraction: f64) -> u8 {
    (finite_or(fraction, 0.0).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `rgba(r, g, b, a)` with a fractional alpha
pub fn rgba(color: Rgb, alpha: f64) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        color.r,
        color.g,
        color.b,
        fmt_num(finite_or(alpha, 1.0).clamp(0.0, 1.0))
    )
}

/// `rgba(r, g, b, a)` from an alpha byte
pub fn rgba_byte(color: Rgb, alpha: u8) -> String {
    rgba(color, f64::from(alpha) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num_trims() {
        assert_eq!(fmt_num(400.0), "400");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(-12.25), "-12.25");
        assert_eq!(fmt_num(f64::NAN), "0");
    }

    #[test]
    fn test_units() {
        assert_eq!(px(16.0), "16px");
        assert_eq!(deg(135.0), "135deg");
        assert_eq!(percent(42.5), "42.5%");
        assert_eq!(ms(3000.0), "3000ms");
    }

    #[test]
    fn test_alpha_byte_rounds_and_clamps() {
        assert_eq!(alpha_byte(0.15), 38);
        assert_eq!(alpha_byte(1.5), 255);
        assert_eq!(alpha_byte(-1.0), 0);
    }

    #[test]
    fn test_rgba() {
        let violet = Rgb::new(124, 58, 237);
        assert_eq!(rgba_byte(violet, 38), "rgba(124, 58, 237, 0.149)");
        assert_eq!(rgba(Rgb::WHITE, 0.2), "rgba(255, 255, 255, 0.2)");
    }
}
