//! Card style configuration
//!
//! [`StyleConfig`] is the single source of truth for one card design. It is
//! plain data: the style compiler, the exporters and the rasterizer all read
//! it, and only the editor state mutates it.
//!
//! Serialization goes through [`CardStyleDocument`](crate::document::CardStyleDocument),
//! which fixes the JSON key names and order.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::color::Rgb;
use crate::document::CardStyleDocument;

/// Maximum number of shadow layers a card carries
pub const MAX_SHADOW_LAYERS: usize = 2;

/// Shadow layers, inline up to [`MAX_SHADOW_LAYERS`]
pub type ShadowLayers = SmallVec<[ShadowLayer; MAX_SHADOW_LAYERS]>;

// ─────────────────────────────────────────────────────────────────────────────
// Documented color fallbacks
// ─────────────────────────────────────────────────────────────────────────────

/// Used when a background, secondary or gradient stop color is malformed
pub const FALLBACK_FILL_COLOR: Rgb = Rgb::BLACK;
/// Used when a shadow color is malformed
pub const FALLBACK_SHADOW_COLOR: Rgb = Rgb::BLACK;
/// Used when the border color is malformed
pub const FALLBACK_BORDER_COLOR: Rgb = Rgb::WHITE;
/// Used when the text color is malformed
pub const FALLBACK_TEXT_COLOR: Rgb = Rgb::WHITE;

// ─────────────────────────────────────────────────────────────────────────────
// Dimensions
// ─────────────────────────────────────────────────────────────────────────────

/// Card height: a pixel value or content-driven
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardHeight {
    Px(f64),
    Auto,
}

impl CardHeight {
    /// Pixel height, if fixed
    pub fn px(self) -> Option<f64> {
        match self {
            CardHeight::Px(h) => Some(h),
            CardHeight::Auto => None,
        }
    }
}

/// Card dimensions in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: CardHeight,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: CardHeight::Px(240.0),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gradient
// ─────────────────────────────────────────────────────────────────────────────

/// Background gradient syntax
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientKind {
    None,
    #[default]
    Linear,
    Radial,
    Conic,
}

/// A (color, position) pair along a gradient
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: String,
    /// Position in percent (0-100)
    pub position: f64,
}

impl ColorStop {
    pub fn new(color: impl Into<String>, position: f64) -> Self {
        Self {
            color: color.into(),
            position,
        }
    }
}

/// Gradient configuration
///
/// Stops are rendered in the order given. Callers are expected to supply
/// them sorted by position; an unsorted list renders as the browser would
/// render it.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientConfig {
    pub kind: GradientKind,
    /// Direction for linear, start angle for conic
    pub angle: f64,
    pub stops: Vec<ColorStop>,
    /// Center in percent for radial/conic; `None` means the box center
    pub center: Option<(f64, f64)>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle: 135.0,
            stops: vec![ColorStop::new("#8B5CF6", 0.0), ColorStop::new("#EC4899", 100.0)],
            center: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shadow and border
// ─────────────────────────────────────────────────────────────────────────────

/// One box-shadow layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowLayer {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
    /// Nominal strength in percent; rendered alpha is at most half of it
    pub alpha_percent: f64,
    pub inset: bool,
}

impl ShadowLayer {
    /// The classic single-slider shadow: intensity drives offset, blur and alpha
    pub fn from_intensity(intensity: f64, color: impl Into<String>) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: intensity / 2.0,
            blur: intensity,
            spread: 0.0,
            color: color.into(),
            alpha_percent: intensity,
            inset: false,
        }
    }
}

impl Default for ShadowLayer {
    fn default() -> Self {
        Self::from_intensity(20.0, "#000000")
    }
}

/// Border line style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Double => "double",
        }
    }
}

/// Corner radius: one value or four (clockwise from top-left)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerRadius {
    Uniform(f64),
    PerCorner([f64; 4]),
}

impl CornerRadius {
    /// Radii as `[top_left, top_right, bottom_right, bottom_left]`
    pub fn to_array(self) -> [f64; 4] {
        match self {
            CornerRadius::Uniform(r) => [r; 4],
            CornerRadius::PerCorner(radii) => radii,
        }
    }
}

impl Default for CornerRadius {
    fn default() -> Self {
        CornerRadius::Uniform(16.0)
    }
}

/// Border configuration
#[derive(Clone, Debug, PartialEq)]
pub struct BorderConfig {
    pub width: f64,
    pub color: String,
    /// Percent, 0-100
    pub opacity: f64,
    pub style: BorderStyle,
    pub radius: CornerRadius,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: "#FFFFFF".into(),
            opacity: 20.0,
            style: BorderStyle::Solid,
            radius: CornerRadius::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effects
// ─────────────────────────────────────────────────────────────────────────────

/// 2D transform parts, composed in field order
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformConfig {
    pub scale: f64,
    pub rotate: f64,
    pub skew_x: f64,
    pub skew_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotate: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

/// Color filter parts, composed in field order
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorFilter {
    pub brightness: f64,
    pub contrast: f64,
    pub saturate: f64,
    pub hue: f64,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturate: 100.0,
            hue: 0.0,
        }
    }
}

/// Glass, blur, transform and filter effects
#[derive(Clone, Debug, PartialEq)]
pub struct EffectsConfig {
    pub glass: bool,
    pub blur: f64,
    /// Percent; clamped by the compiler
    pub backdrop_saturate: f64,
    /// Prepend glow rings in the border color to the box shadow
    pub neon_glow: bool,
    pub transform: TransformConfig,
    pub filter: ColorFilter,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            glass: true,
            blur: 16.0,
            backdrop_saturate: 120.0,
            neon_glow: false,
            transform: TransformConfig::default(),
            filter: ColorFilter::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animation
// ─────────────────────────────────────────────────────────────────────────────

/// Named keyframe animation presets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    #[default]
    Float,
    Pulse,
    Glow,
    Rotate,
    Bounce,
    Shake,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 6] = [
        AnimationKind::Float,
        AnimationKind::Pulse,
        AnimationKind::Glow,
        AnimationKind::Rotate,
        AnimationKind::Bounce,
        AnimationKind::Shake,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnimationKind::Float => "float",
            AnimationKind::Pulse => "pulse",
            AnimationKind::Glow => "glow",
            AnimationKind::Rotate => "rotate",
            AnimationKind::Bounce => "bounce",
            AnimationKind::Shake => "shake",
        }
    }
}

/// Animation timing function
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimingCurve {
    Ease,
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    CubicBezier([f64; 4]),
}

impl TimingCurve {
    /// Keyword for named curves, `cubic-bezier` for custom ones
    pub fn name(self) -> &'static str {
        match self {
            TimingCurve::Ease => "ease",
            TimingCurve::Linear => "linear",
            TimingCurve::EaseIn => "ease-in",
            TimingCurve::EaseOut => "ease-out",
            TimingCurve::EaseInOut => "ease-in-out",
            TimingCurve::CubicBezier(_) => "cubic-bezier",
        }
    }

    /// Build from a keyword and an optional control-point list
    ///
    /// `cubic-bezier` without points, and unknown keywords, yield the default.
    pub fn from_parts(name: &str, curve: Option<[f64; 4]>) -> Self {
        match (name, curve) {
            ("ease", _) => TimingCurve::Ease,
            ("linear", _) => TimingCurve::Linear,
            ("ease-in", _) => TimingCurve::EaseIn,
            ("ease-out", _) => TimingCurve::EaseOut,
            ("ease-in-out", _) => TimingCurve::EaseInOut,
            ("cubic-bezier", Some(points)) => TimingCurve::CubicBezier(points),
            _ => TimingCurve::default(),
        }
    }

    pub fn control_points(self) -> Option<[f64; 4]> {
        match self {
            TimingCurve::CubicBezier(points) => Some(points),
            _ => None,
        }
    }
}

/// Animation repeat count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IterationCount {
    Count(u32),
    #[default]
    Infinite,
}

/// Animation configuration
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub kind: AnimationKind,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub iterations: IterationCount,
    pub timing: TimingCurve,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: AnimationKind::Float,
            duration_ms: 3000.0,
            delay_ms: 0.0,
            iterations: IterationCount::Infinite,
            timing: TimingCurve::EaseInOut,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content
// ─────────────────────────────────────────────────────────────────────────────

/// Horizontal text alignment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Card text
#[derive(Clone, Debug, PartialEq)]
pub struct TextContent {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub title_size: f64,
    pub subtitle_size: f64,
    pub footer_size: f64,
    pub text_color: String,
    pub text_align: TextAlign,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            title: "Premium Card Design".into(),
            subtitle: "Create stunning, modern cards with advanced styling options. \
                       Perfect for dashboards, portfolios, and modern web applications."
                .into(),
            footer: "Card Editor Pro v3.0".into(),
            title_size: 24.0,
            subtitle_size: 14.0,
            footer_size: 12.0,
            text_color: "#FFFFFF".into(),
            text_align: TextAlign::Center,
        }
    }
}

/// Content arrangement inside the card
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentLayout {
    #[default]
    Default,
    Centered,
    Split,
    Overlay,
    Minimal,
}

/// Icon decoration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconStyle {
    None,
    #[default]
    Gradient,
    Outline,
    Filled,
    Custom,
}

// ─────────────────────────────────────────────────────────────────────────────
// StyleConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Complete description of one card's visual design
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "CardStyleDocument", from = "CardStyleDocument")]
pub struct StyleConfig {
    pub dimensions: Dimensions,
    pub background_color: String,
    pub secondary_color: String,
    /// Percent, 0-100; clamped by the compiler
    pub opacity: f64,
    /// Id of the last applied template
    pub template: String,
    pub gradient: GradientConfig,
    pub shadow_layers: ShadowLayers,
    pub border: BorderConfig,
    pub effects: EffectsConfig,
    pub animation: AnimationConfig,
    pub hover_effects: bool,
    pub content: TextContent,
    pub layout: ContentLayout,
    pub icon_style: IconStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            background_color: "#8B5CF6".into(),
            secondary_color: "#EC4899".into(),
            opacity: 95.0,
            template: "glass".into(),
            gradient: GradientConfig::default(),
            shadow_layers: smallvec![ShadowLayer::default()],
            border: BorderConfig::default(),
            effects: EffectsConfig::default(),
            animation: AnimationConfig::default(),
            hover_effects: true,
            content: TextContent::default(),
            layout: ContentLayout::default(),
            icon_style: IconStyle::default(),
        }
    }
}

impl StyleConfig {
    /// Card width in pixels
    pub fn width(&self) -> f64 {
        self.dimensions.width
    }

    /// Background color, normalized
    pub fn primary_rgb(&self) -> Rgb {
        Rgb::parse_or(&self.background_color, FALLBACK_FILL_COLOR)
    }

    /// Secondary color, normalized
    pub fn secondary_rgb(&self) -> Rgb {
        Rgb::parse_or(&self.secondary_color, FALLBACK_FILL_COLOR)
    }

    /// Gradient stops actually rendered
    ///
    /// A gradient needs at least two stops; with fewer, the stops are derived
    /// from the background and secondary colors at 0% and 100%.
    pub fn effective_stops(&self) -> Vec<ColorStop> {
        if self.gradient.stops.len() >= 2 {
            self.gradient.stops.clone()
        } else {
            vec![
                ColorStop::new(self.background_color.clone(), 0.0),
                ColorStop::new(self.secondary_color.clone(), 100.0),
            ]
        }
    }

    /// Replace both colors and keep a two-stop gradient in sync with them
    pub fn set_colors(&mut self, primary: Option<&str>, secondary: Option<&str>) {
        if let Some(primary) = primary {
            self.background_color = primary.to_string();
        }
        if let Some(secondary) = secondary {
            self.secondary_color = secondary.to_string();
        }
        if self.gradient.stops.len() == 2 {
            self.gradient.stops[0].color = self.background_color.clone();
            self.gradient.stops[1].color = self.secondary_color.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_editor_defaults() {
        let config = StyleConfig::default();
        assert_eq!(config.dimensions.width, 400.0);
        assert_eq!(config.dimensions.height, CardHeight::Px(240.0));
        assert_eq!(config.opacity, 95.0);
        assert_eq!(config.gradient.kind, GradientKind::Linear);
        assert_eq!(config.shadow_layers.len(), 1);
        assert!(config.effects.glass);
    }

    #[test]
    fn test_effective_stops_derived_when_too_few() {
        let mut config = StyleConfig::default();
        config.gradient.stops = vec![ColorStop::new("#FF0000", 10.0)];
        let stops = config.effective_stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0], ColorStop::new("#8B5CF6", 0.0));
        assert_eq!(stops[1], ColorStop::new("#EC4899", 100.0));
    }

    #[test]
    fn test_set_colors_syncs_two_stop_gradient() {
        let mut config = StyleConfig::default();
        config.set_colors(Some("#3B82F6"), Some("#14B8A6"));
        assert_eq!(config.gradient.stops[0].color, "#3B82F6");
        assert_eq!(config.gradient.stops[1].color, "#14B8A6");
    }

    #[test]
    fn test_corner_radius_array_order() {
        let radius = CornerRadius::PerCorner([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(radius.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_timing_curve_from_parts() {
        assert_eq!(TimingCurve::from_parts("linear", None), TimingCurve::Linear);
        assert_eq!(
            TimingCurve::from_parts("cubic-bezier", Some([0.4, 0.0, 0.2, 1.0])),
            TimingCurve::CubicBezier([0.4, 0.0, 0.2, 1.0])
        );
        assert_eq!(TimingCurve::from_parts("cubic-bezier", None), TimingCurve::EaseInOut);
        assert_eq!(TimingCurve::from_parts("bogus", None), TimingCurve::EaseInOut);
    }
}
