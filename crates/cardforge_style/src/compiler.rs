//! Style compiler
//!
//! [`compute`] maps a [`StyleConfig`] to the flat property bag a renderer or
//! exporter consumes. It is total: out-of-range numbers saturate, malformed
//! colors fall back to their documented defaults, and nothing is cached.

use cardforge_core::{
    AnimationConfig, ColorStop, EffectsConfig, GradientKind, IterationCount, Rgb, ShadowLayer,
    StyleConfig, TimingCurve, FALLBACK_BORDER_COLOR, FALLBACK_FILL_COLOR, FALLBACK_SHADOW_COLOR,
    MAX_SHADOW_LAYERS,
};
use serde::Serialize;
use tracing::debug;

use crate::units::{
    alpha_byte, clamp_percent, deg, finite_or, fmt_num, ms, percent, px, rgba, rgba_byte,
};

/// Glass-mode alpha factor for the first background color
pub const GLASS_PRIMARY_ALPHA: f64 = 0.8;
/// Glass-mode alpha factor for every later background color
pub const GLASS_SECONDARY_ALPHA: f64 = 0.5;
/// Shadow alpha never exceeds this fraction of full opacity
pub const SHADOW_ALPHA_SCALE: f64 = 0.5;
/// Upper bound for the backdrop saturate percentage
pub const MAX_BACKDROP_SATURATE: f64 = 300.0;
/// Glow ring blur when neon glow is on but no shadow layer sets the strength
const DEFAULT_GLOW_STRENGTH: f64 = 10.0;

pub const TRANSITION: &str = "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)";

/// Computed visual properties of one card
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableStyle {
    pub width: String,
    pub height: String,
    pub background: String,
    pub border: String,
    pub border_radius: String,
    pub box_shadow: String,
    /// 0.0-1.0
    pub opacity: f64,
    pub transform: String,
    pub filter: String,
    pub backdrop_filter: String,
    pub animation: String,
    pub transition: String,
    /// Clamped radii, `[top_left, top_right, bottom_right, bottom_left]`
    pub corner_radii: [f64; 4],
}

impl RenderableStyle {
    /// CSS declarations in output order
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("width", self.width.clone()),
            ("height", self.height.clone()),
            ("background", self.background.clone()),
            ("border", self.border.clone()),
            ("border-radius", self.border_radius.clone()),
            ("box-shadow", self.box_shadow.clone()),
            ("opacity", fmt_num(self.opacity)),
            ("transform", self.transform.clone()),
            ("filter", self.filter.clone()),
            ("backdrop-filter", self.backdrop_filter.clone()),
            ("animation", self.animation.clone()),
            ("transition", self.transition.clone()),
            ("position", "relative".to_string()),
            ("overflow", "hidden".to_string()),
        ]
    }
}

/// Compute the renderable style of a config
pub fn compute(config: &StyleConfig) -> RenderableStyle {
    let width = finite_or(config.dimensions.width, 400.0).max(0.0);
    let height = config
        .dimensions
        .height
        .px()
        .map(|h| finite_or(h, 240.0).max(0.0));
    let corner_radii = clamped_radii(config, width, height);
    if !(0.0..=100.0).contains(&config.opacity) {
        debug!(opacity = config.opacity, "Opacity out of range, clamping");
    }

    RenderableStyle {
        width: px(width),
        height: height.map_or_else(|| "auto".to_string(), px),
        background: background(config),
        border: border(config),
        border_radius: border_radius(corner_radii),
        box_shadow: box_shadow(config),
        opacity: clamp_percent(config.opacity, 100.0) / 100.0,
        transform: transform(&config.effects),
        filter: filter(&config.effects),
        backdrop_filter: backdrop_filter(&config.effects),
        animation: animation(&config.animation),
        transition: TRANSITION.to_string(),
        corner_radii,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Background
// ─────────────────────────────────────────────────────────────────────────────

/// Alpha bytes for the first and later background colors, when glass is on
pub fn glass_alphas(config: &StyleConfig) -> Option<(u8, u8)> {
    if !config.effects.glass {
        return None;
    }
    let opacity = clamp_percent(config.opacity, 100.0) / 100.0;
    Some((
        alpha_byte(opacity * GLASS_PRIMARY_ALPHA),
        alpha_byte(opacity * GLASS_SECONDARY_ALPHA),
    ))
}

fn color_token(color: Rgb, alpha: Option<u8>) -> String {
    match alpha {
        Some(alpha) => color.to_hex_with_alpha(alpha),
        None => color.to_hex(),
    }
}

fn background(config: &StyleConfig) -> String {
    let alphas = glass_alphas(config);
    let primary_alpha = alphas.map(|(first, _)| first);

    if config.gradient.kind == GradientKind::None {
        return color_token(config.primary_rgb(), primary_alpha);
    }

    if config.gradient.stops.len() < 2 {
        debug!(
            stops = config.gradient.stops.len(),
            "Gradient needs two stops, using background and secondary colors"
        );
    }
    let stops = config.effective_stops();
    let stop_list = gradient_stops(&stops, alphas);
    let angle = deg(finite_or(config.gradient.angle, 135.0));

    match config.gradient.kind {
        GradientKind::Radial => {
            let at = config
                .gradient
                .center
                .map_or_else(|| "center".to_string(), center_position);
            format!("radial-gradient(circle at {}, {})", at, stop_list)
        }
        GradientKind::Conic => {
            let at = center_position(config.gradient.center.unwrap_or((50.0, 50.0)));
            let first = stops
                .first()
                .map(|stop| Rgb::parse_or(&stop.color, FALLBACK_FILL_COLOR))
                .unwrap_or_else(|| config.primary_rgb());
            format!(
                "conic-gradient(from {} at {}, {}, {})",
                angle,
                at,
                stop_list,
                color_token(first, primary_alpha)
            )
        }
        _ => format!("linear-gradient({}, {})", angle, stop_list),
    }
}

/// Stop list; the first stop at 0% and the last at 100% omit their position
fn gradient_stops(stops: &[ColorStop], alphas: Option<(u8, u8)>) -> String {
    let last = stops.len().saturating_sub(1);
    stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let rgb = Rgb::parse_or(&stop.color, FALLBACK_FILL_COLOR);
            let alpha = alphas.map(|(first, rest)| if i == 0 { first } else { rest });
            let color = color_token(rgb, alpha);
            let position = finite_or(stop.position, if i == 0 { 0.0 } else { 100.0 });
            let implied = (i == 0 && position == 0.0) || (i == last && position == 100.0);
            if implied {
                color
            } else {
                format!("{} {}", color, percent(position))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn center_position((x, y): (f64, f64)) -> String {
    format!("{} {}", percent(finite_or(x, 50.0)), percent(finite_or(y, 50.0)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Shadow
// ─────────────────────────────────────────────────────────────────────────────

/// Rendered alpha byte of a shadow layer: at most half of full opacity
pub fn shadow_alpha_byte(alpha_percent: f64) -> u8 {
    alpha_byte(clamp_percent(alpha_percent, 0.0) / 100.0 * SHADOW_ALPHA_SCALE)
}

fn shadow_layer(layer: &ShadowLayer) -> String {
    let color = Rgb::parse_or(&layer.color, FALLBACK_SHADOW_COLOR);
    format!(
        "{}{} {} {} {} {}",
        if layer.inset { "inset " } else { "" },
        px(finite_or(layer.offset_x, 0.0)),
        px(finite_or(layer.offset_y, 0.0)),
        px(finite_or(layer.blur, 0.0).max(0.0)),
        px(finite_or(layer.spread, 0.0)),
        rgba_byte(color, shadow_alpha_byte(layer.alpha_percent))
    )
}

/// Neon glow rings: zero offset, growing blur, fading alpha
fn glow_rings(config: &StyleConfig) -> [String; 3] {
    let glow = Rgb::parse_or(&config.border.color, FALLBACK_BORDER_COLOR);
    let strength = config
        .shadow_layers
        .first()
        .map_or(DEFAULT_GLOW_STRENGTH, |layer| {
            clamp_percent(layer.alpha_percent, 0.0) / 2.0
        });
    [(0.5, 0xFF), (1.0, 0xBF), (1.5, 0x80)].map(|(scale, alpha)| {
        format!(
            "0px 0px {} 0px {}",
            px(strength * scale),
            rgba_byte(glow, alpha)
        )
    })
}

fn box_shadow(config: &StyleConfig) -> String {
    let mut parts: Vec<String> = Vec::new();
    if config.effects.neon_glow {
        parts.extend(glow_rings(config));
    }
    parts.extend(
        config
            .shadow_layers
            .iter()
            .take(MAX_SHADOW_LAYERS)
            .map(shadow_layer),
    );

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Border and radius
// ─────────────────────────────────────────────────────────────────────────────

fn border(config: &StyleConfig) -> String {
    let width = finite_or(config.border.width, 0.0);
    if width <= 0.0 {
        return "none".to_string();
    }
    let color = Rgb::parse_or(&config.border.color, FALLBACK_BORDER_COLOR);
    let alpha = clamp_percent(config.border.opacity, 100.0) / 100.0;
    format!(
        "{} {} {}",
        px(width),
        config.border.style.as_str(),
        rgba(color, alpha)
    )
}

/// Each radius clamped to `0..=min(width, height)/2`; auto height uses the width
pub fn clamped_radii(config: &StyleConfig, width: f64, height: Option<f64>) -> [f64; 4] {
    let limit = height.map_or(width, |h| width.min(h)) / 2.0;
    config
        .border
        .radius
        .to_array()
        .map(|r| finite_or(r, 0.0).clamp(0.0, limit.max(0.0)))
}

fn border_radius(radii: [f64; 4]) -> String {
    let [tl, tr, br, bl] = radii;
    if tl == tr && tr == br && br == bl {
        px(tl)
    } else {
        radii.map(px).join(" ")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effects and animation
// ─────────────────────────────────────────────────────────────────────────────

fn transform(effects: &EffectsConfig) -> String {
    let t = &effects.transform;
    let scale = finite_or(t.scale, 1.0);
    let parts = [t.rotate, t.skew_x, t.skew_y, t.translate_x, t.translate_y]
        .map(|v| finite_or(v, 0.0));
    if scale == 1.0 && parts.iter().all(|v| *v == 0.0) {
        return "none".to_string();
    }
    let [rotate, skew_x, skew_y, translate_x, translate_y] = parts;
    format!(
        "scale({}) rotate({}) skewX({}) skewY({}) translateX({}) translateY({})",
        fmt_num(scale),
        deg(rotate),
        deg(skew_x),
        deg(skew_y),
        px(translate_x),
        px(translate_y)
    )
}

fn filter(effects: &EffectsConfig) -> String {
    let f = &effects.filter;
    let brightness = finite_or(f.brightness, 100.0).max(0.0);
    let contrast = finite_or(f.contrast, 100.0).max(0.0);
    let saturate = finite_or(f.saturate, 100.0).max(0.0);
    let hue = finite_or(f.hue, 0.0);
    if brightness == 100.0 && contrast == 100.0 && saturate == 100.0 && hue == 0.0 {
        return "none".to_string();
    }
    format!(
        "brightness({}) contrast({}) saturate({}) hue-rotate({})",
        percent(brightness),
        percent(contrast),
        percent(saturate),
        deg(hue)
    )
}

fn backdrop_filter(effects: &EffectsConfig) -> String {
    if !effects.glass {
        return "none".to_string();
    }
    let blur = finite_or(effects.blur, 0.0).max(0.0);
    let saturate = finite_or(effects.backdrop_saturate, 100.0).clamp(0.0, MAX_BACKDROP_SATURATE);
    format!("blur({}) saturate({})", px(blur), percent(saturate))
}

/// CSS form of a timing curve
pub fn timing_function(curve: TimingCurve) -> String {
    match curve {
        TimingCurve::CubicBezier(points) => {
            format!("cubic-bezier({})", points.map(fmt_num).join(", "))
        }
        named => named.name().to_string(),
    }
}

fn animation(animation: &AnimationConfig) -> String {
    if !animation.enabled {
        return "none".to_string();
    }
    let iterations = match animation.iterations {
        IterationCount::Count(n) => n.max(1).to_string(),
        IterationCount::Infinite => "infinite".to_string(),
    };
    format!(
        "{} {} {} {} {}",
        animation.kind.as_str(),
        ms(finite_or(animation.duration_ms, 3000.0).max(0.0)),
        timing_function(animation.timing),
        ms(finite_or(animation.delay_ms, 0.0)),
        iterations
    )
}
