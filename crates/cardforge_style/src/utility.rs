//! Utility-class export
//!
//! Approximates the computed style with Tailwind-style utility classes. The
//! mapping is lossy: radial and conic gradients become directional linear
//! ones, only the first shadow layer picks the shadow band, and transforms,
//! filters and animations are dropped.

use cardforge_core::{
    BorderStyle, GradientKind, Rgb, StyleConfig, FALLBACK_BORDER_COLOR, FALLBACK_FILL_COLOR,
};

use crate::compiler::RenderableStyle;
use crate::units::{alpha_byte, clamp_percent, finite_or, fmt_num};

/// Radius values with a named class
const RADIUS_CLASSES: [(f64, &str); 6] = [
    (0.0, "rounded-none"),
    (4.0, "rounded"),
    (8.0, "rounded-lg"),
    (12.0, "rounded-xl"),
    (16.0, "rounded-2xl"),
    (20.0, "rounded-3xl"),
];

/// Gradient direction suffixes, clockwise from "to top" in 45° steps
const DIRECTIONS: [&str; 8] = ["t", "tr", "r", "br", "b", "bl", "l", "tl"];

/// Classes appended to every export
const TRAILING_CLASSES: &str = "p-6 transition-all duration-300";

/// Render a space-joined utility class string
pub fn to_utility_class_text(config: &StyleConfig, style: &RenderableStyle) -> String {
    let mut classes = vec![background_classes(config)];
    classes.push(radius_classes(style.corner_radii));
    classes.push(shadow_class(config).to_string());

    let opacity = clamp_percent(config.opacity, 100.0);
    if opacity < 100.0 {
        classes.push(format!("opacity-{}", (opacity / 10.0).round() as i64 * 10));
    }

    let blur = finite_or(config.effects.blur, 0.0);
    if config.effects.glass && blur > 0.0 {
        classes.push(format!("backdrop-blur-[{}px]", fmt_num(blur)));
    }

    if let Some(border) = border_classes(config) {
        classes.push(border);
    }

    classes.push(TRAILING_CLASSES.to_string());
    classes.join(" ")
}

/// Direction suffix of the nearest 45° bucket
pub fn gradient_direction(angle: f64) -> &'static str {
    let bucket = (finite_or(angle, 135.0).rem_euclid(360.0) / 45.0).round() as usize % 8;
    DIRECTIONS[bucket]
}

fn background_classes(config: &StyleConfig) -> String {
    if config.gradient.kind == GradientKind::None {
        return format!("bg-[{}]", config.primary_rgb());
    }
    let stops = config.effective_stops();
    let color = |index: usize| {
        stops
            .get(index)
            .map_or(FALLBACK_FILL_COLOR, |stop| {
                Rgb::parse_or(&stop.color, FALLBACK_FILL_COLOR)
            })
    };
    format!(
        "bg-gradient-to-{} from-[{}] to-[{}]",
        gradient_direction(config.gradient.angle),
        color(0),
        color(stops.len().saturating_sub(1))
    )
}

fn radius_class(radius: f64) -> String {
    RADIUS_CLASSES
        .iter()
        .find(|(value, _)| *value == radius)
        .map_or_else(
            || format!("rounded-[{}px]", fmt_num(radius)),
            |(_, class)| class.to_string(),
        )
}

fn radius_classes(radii: [f64; 4]) -> String {
    let [tl, tr, br, bl] = radii;
    if tl == tr && tr == br && br == bl {
        return radius_class(tl);
    }
    ["tl", "tr", "br", "bl"]
        .iter()
        .zip(radii)
        .map(|(corner, r)| format!("rounded-{}-[{}px]", corner, fmt_num(r)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shadow band from the first layer's strength
fn shadow_class(config: &StyleConfig) -> &'static str {
    let intensity = config
        .shadow_layers
        .first()
        .map_or(0.0, |layer| clamp_percent(layer.alpha_percent, 0.0));
    match intensity {
        i if i > 20.0 => "shadow-2xl",
        i if i > 10.0 => "shadow-xl",
        i if i > 5.0 => "shadow-lg",
        i if i > 0.0 => "shadow-md",
        _ => "shadow-none",
    }
}

fn border_classes(config: &StyleConfig) -> Option<String> {
    let width = finite_or(config.border.width, 0.0);
    if width <= 0.0 {
        return None;
    }
    let color = Rgb::parse_or(&config.border.color, FALLBACK_BORDER_COLOR);
    let alpha = alpha_byte(clamp_percent(config.border.opacity, 100.0) / 100.0);
    let mut classes = format!(
        "border border-[{}px] border-[{}]",
        fmt_num(width),
        color.to_hex_with_alpha(alpha)
    );
    if config.border.style != BorderStyle::Solid {
        classes.push_str(&format!(" border-{}", config.border.style.as_str()));
    }
    Some(classes)
}
