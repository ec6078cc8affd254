//! JSON document form of a [`StyleConfig`]
//!
//! The document keeps the key names and nesting of the web editor's exported
//! JSON so saved styles and pasted exports stay interchangeable. The first
//! 21 keys are the legacy schema, in legacy order; everything the richer model
//! adds lives in extension keys after them.
//!
//! Reading is lenient. Numbers may arrive as numeric strings, unknown enum
//! strings and wrong-shaped values fall back to the defaults of
//! [`StyleConfig::default`], and documents written before shadow layers or
//! gradient stops existed are upgraded from `shadowIntensity`/`shadowColor`
//! and the two background colors.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::{
    AnimationConfig, AnimationKind, BorderConfig, BorderStyle, CardHeight, ColorFilter, ColorStop,
    ContentLayout, CornerRadius, Dimensions, EffectsConfig, GradientConfig, GradientKind,
    IconStyle, IterationCount, ShadowLayer, ShadowLayers, StyleConfig, TextAlign, TextContent,
    TimingCurve, TransformConfig, MAX_SHADOW_LAYERS,
};
use crate::error::Result;
use crate::value::{lenient, NumberInput};

const AUTO: &str = "auto";
const INFINITE: &str = "infinite";

/// Serialized layout of a card style
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStyleDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub card_dimensions: Option<DimensionsDoc>,
    #[serde(default, deserialize_with = "lenient")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub corner_radius: RadiusInput,
    #[serde(default)]
    pub opacity: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub selected_template: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gradient_type: Option<GradientKind>,
    #[serde(default)]
    pub gradient_angle: NumberInput,
    #[serde(default)]
    pub shadow_intensity: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub shadow_color: Option<String>,
    #[serde(default)]
    pub border_width: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub border_color: Option<String>,
    #[serde(default)]
    pub border_opacity: NumberInput,
    #[serde(default)]
    pub blur_intensity: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub glass_effect: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub animation_enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub animation_type: Option<AnimationKind>,
    #[serde(default, deserialize_with = "lenient")]
    pub hover_effects: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub text_content: Option<TextContentDoc>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_layout: Option<ContentLayout>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon_style: Option<IconStyle>,

    // Extension keys
    #[serde(default, deserialize_with = "lenient")]
    pub gradient_stops: Option<Vec<ColorStop>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub gradient_center: Option<[f64; 2]>,
    #[serde(default, deserialize_with = "lenient")]
    pub shadow_layers: Option<Vec<ShadowLayerDoc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub border_style: Option<BorderStyle>,
    #[serde(default, deserialize_with = "lenient")]
    pub effects: Option<EffectsDoc>,
    #[serde(default, deserialize_with = "lenient")]
    pub animation: Option<AnimationDoc>,
}

/// `cardDimensions`: height is a number or `"auto"`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DimensionsDoc {
    #[serde(default)]
    pub width: NumberInput,
    #[serde(default)]
    pub height: NumberInput,
}

/// `cornerRadius`: a single number or four numbers
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RadiusInput {
    PerCorner([NumberInput; 4]),
    Uniform(NumberInput),
}

impl Default for RadiusInput {
    fn default() -> Self {
        RadiusInput::Uniform(NumberInput::Missing)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContentDoc {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub footer: Option<String>,
    #[serde(default)]
    pub title_size: NumberInput,
    #[serde(default)]
    pub subtitle_size: NumberInput,
    #[serde(default)]
    pub footer_size: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text_align: Option<TextAlign>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowLayerDoc {
    #[serde(default)]
    pub offset_x: NumberInput,
    #[serde(default)]
    pub offset_y: NumberInput,
    #[serde(default)]
    pub blur: NumberInput,
    #[serde(default)]
    pub spread: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub color: Option<String>,
    #[serde(default)]
    pub alpha_percent: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub inset: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsDoc {
    #[serde(default)]
    pub backdrop_saturate: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub neon_glow: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub transform: Option<TransformConfig>,
    #[serde(default, deserialize_with = "lenient")]
    pub filter: Option<ColorFilter>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDoc {
    #[serde(default)]
    pub duration: NumberInput,
    #[serde(default)]
    pub delay: NumberInput,
    /// Positive integer or `"infinite"`
    #[serde(default)]
    pub iteration_count: NumberInput,
    #[serde(default, deserialize_with = "lenient")]
    pub timing_function: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_curve: Option<[f64; 4]>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Pretty-printed JSON text of a config, keys in document order
pub fn to_json_text(config: &StyleConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Parse JSON text produced by [`to_json_text`] or by the web editor
///
/// Fails only when the text is not JSON or not an object; bad field values
/// fall back to defaults.
pub fn from_json_text(text: &str) -> Result<StyleConfig> {
    Ok(serde_json::from_str(text)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// StyleConfig -> document
// ─────────────────────────────────────────────────────────────────────────────

impl From<StyleConfig> for CardStyleDocument {
    fn from(config: StyleConfig) -> Self {
        let first_shadow = config.shadow_layers.first();
        let shadow_intensity = first_shadow.map_or(0.0, |layer| layer.alpha_percent);
        let shadow_color = first_shadow.map_or_else(|| "#000000".to_string(), |l| l.color.clone());

        let height = match config.dimensions.height {
            CardHeight::Px(h) => NumberInput::Number(h),
            CardHeight::Auto => NumberInput::Text(AUTO.into()),
        };

        let corner_radius = match config.border.radius {
            CornerRadius::Uniform(r) => RadiusInput::Uniform(r.into()),
            CornerRadius::PerCorner(radii) => RadiusInput::PerCorner(radii.map(NumberInput::from)),
        };

        let iteration_count = match config.animation.iterations {
            IterationCount::Count(n) => NumberInput::Number(f64::from(n)),
            IterationCount::Infinite => NumberInput::Text(INFINITE.into()),
        };

        let content = config.content;

        Self {
            card_dimensions: Some(DimensionsDoc {
                width: config.dimensions.width.into(),
                height,
            }),
            background_color: Some(config.background_color),
            secondary_color: Some(config.secondary_color),
            corner_radius,
            opacity: config.opacity.into(),
            selected_template: Some(config.template),
            gradient_type: Some(config.gradient.kind),
            gradient_angle: config.gradient.angle.into(),
            shadow_intensity: shadow_intensity.into(),
            shadow_color: Some(shadow_color),
            border_width: config.border.width.into(),
            border_color: Some(config.border.color),
            border_opacity: config.border.opacity.into(),
            blur_intensity: config.effects.blur.into(),
            glass_effect: Some(config.effects.glass),
            animation_enabled: Some(config.animation.enabled),
            animation_type: Some(config.animation.kind),
            hover_effects: Some(config.hover_effects),
            text_content: Some(TextContentDoc {
                title: Some(content.title),
                subtitle: Some(content.subtitle),
                footer: Some(content.footer),
                title_size: content.title_size.into(),
                subtitle_size: content.subtitle_size.into(),
                footer_size: content.footer_size.into(),
                text_color: Some(content.text_color),
                text_align: Some(content.text_align),
            }),
            content_layout: Some(config.layout),
            icon_style: Some(config.icon_style),

            gradient_stops: Some(config.gradient.stops),
            gradient_center: config.gradient.center.map(|(x, y)| [x, y]),
            shadow_layers: Some(
                config
                    .shadow_layers
                    .into_iter()
                    .map(|layer| ShadowLayerDoc {
                        offset_x: layer.offset_x.into(),
                        offset_y: layer.offset_y.into(),
                        blur: layer.blur.into(),
                        spread: layer.spread.into(),
                        color: Some(layer.color),
                        alpha_percent: layer.alpha_percent.into(),
                        inset: Some(layer.inset),
                    })
                    .collect(),
            ),
            border_style: Some(config.border.style),
            effects: Some(EffectsDoc {
                backdrop_saturate: config.effects.backdrop_saturate.into(),
                neon_glow: Some(config.effects.neon_glow),
                transform: Some(config.effects.transform),
                filter: Some(config.effects.filter),
            }),
            animation: Some(AnimationDoc {
                duration: config.animation.duration_ms.into(),
                delay: config.animation.delay_ms.into(),
                iteration_count,
                timing_function: Some(config.animation.timing.name().to_string()),
                custom_curve: config.animation.timing.control_points(),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// document -> StyleConfig
// ─────────────────────────────────────────────────────────────────────────────

impl From<CardStyleDocument> for StyleConfig {
    fn from(doc: CardStyleDocument) -> Self {
        let defaults = StyleConfig::default();

        let dimensions = match doc.card_dimensions {
            Some(dims) => Dimensions {
                width: dims.width.resolve(defaults.dimensions.width),
                height: resolve_height(&dims.height, defaults.dimensions.height),
            },
            None => defaults.dimensions,
        };

        let background_color = doc.background_color.unwrap_or(defaults.background_color);
        let secondary_color = doc.secondary_color.unwrap_or(defaults.secondary_color);

        let gradient = GradientConfig {
            kind: doc.gradient_type.unwrap_or(defaults.gradient.kind),
            angle: doc.gradient_angle.resolve(defaults.gradient.angle),
            stops: doc.gradient_stops.unwrap_or_else(|| {
                vec![
                    ColorStop::new(background_color.clone(), 0.0),
                    ColorStop::new(secondary_color.clone(), 100.0),
                ]
            }),
            center: doc.gradient_center.map(|[x, y]| (x, y)),
        };

        let shadow_layers = match doc.shadow_layers {
            Some(layers) => resolve_shadow_layers(layers),
            None => {
                debug!("Document has no shadowLayers, deriving one from shadowIntensity");
                let intensity = doc.shadow_intensity.resolve(ShadowLayer::default().alpha_percent);
                let color = doc.shadow_color.unwrap_or_else(|| ShadowLayer::default().color);
                SmallVec::from_elem(ShadowLayer::from_intensity(intensity, color), 1)
            }
        };

        let border = BorderConfig {
            width: doc.border_width.resolve(defaults.border.width),
            color: doc.border_color.unwrap_or(defaults.border.color),
            opacity: doc.border_opacity.resolve(defaults.border.opacity),
            style: doc.border_style.unwrap_or(defaults.border.style),
            radius: resolve_radius(&doc.corner_radius, defaults.border.radius),
        };

        let effects_doc = doc.effects.unwrap_or_default();
        let effects = EffectsConfig {
            glass: doc.glass_effect.unwrap_or(defaults.effects.glass),
            blur: doc.blur_intensity.resolve(defaults.effects.blur),
            backdrop_saturate: effects_doc
                .backdrop_saturate
                .resolve(defaults.effects.backdrop_saturate),
            neon_glow: effects_doc.neon_glow.unwrap_or(defaults.effects.neon_glow),
            transform: effects_doc.transform.unwrap_or(defaults.effects.transform),
            filter: effects_doc.filter.unwrap_or(defaults.effects.filter),
        };

        let animation_doc = doc.animation.unwrap_or_default();
        let animation = AnimationConfig {
            enabled: doc.animation_enabled.unwrap_or(defaults.animation.enabled),
            kind: doc.animation_type.unwrap_or(defaults.animation.kind),
            duration_ms: animation_doc.duration.resolve(defaults.animation.duration_ms),
            delay_ms: animation_doc.delay.resolve(defaults.animation.delay_ms),
            iterations: resolve_iterations(&animation_doc.iteration_count),
            timing: animation_doc.timing_function.map_or(defaults.animation.timing, |name| {
                TimingCurve::from_parts(&name, animation_doc.custom_curve)
            }),
        };

        let content_doc = doc.text_content.unwrap_or_default();
        let base = defaults.content;
        let content = TextContent {
            title: content_doc.title.unwrap_or(base.title),
            subtitle: content_doc.subtitle.unwrap_or(base.subtitle),
            footer: content_doc.footer.unwrap_or(base.footer),
            title_size: content_doc.title_size.resolve(base.title_size),
            subtitle_size: content_doc.subtitle_size.resolve(base.subtitle_size),
            footer_size: content_doc.footer_size.resolve(base.footer_size),
            text_color: content_doc.text_color.unwrap_or(base.text_color),
            text_align: content_doc.text_align.unwrap_or(base.text_align),
        };

        StyleConfig {
            dimensions,
            background_color,
            secondary_color,
            opacity: doc.opacity.resolve(defaults.opacity),
            template: doc.selected_template.unwrap_or(defaults.template),
            gradient,
            shadow_layers,
            border,
            effects,
            animation,
            hover_effects: doc.hover_effects.unwrap_or(defaults.hover_effects),
            content,
            layout: doc.content_layout.unwrap_or(defaults.layout),
            icon_style: doc.icon_style.unwrap_or(defaults.icon_style),
        }
    }
}

fn resolve_height(input: &NumberInput, fallback: CardHeight) -> CardHeight {
    match input {
        NumberInput::Text(text) if text.trim().eq_ignore_ascii_case(AUTO) => CardHeight::Auto,
        NumberInput::Missing => fallback,
        other => match fallback {
            CardHeight::Px(h) => CardHeight::Px(other.resolve(h)),
            CardHeight::Auto => CardHeight::Auto,
        },
    }
}

fn resolve_radius(input: &RadiusInput, fallback: CornerRadius) -> CornerRadius {
    let [tl, tr, br, bl] = fallback.to_array();
    match input {
        RadiusInput::Uniform(r) => CornerRadius::Uniform(r.resolve(tl)),
        RadiusInput::PerCorner([a, b, c, d]) => {
            CornerRadius::PerCorner([a.resolve(tl), b.resolve(tr), c.resolve(br), d.resolve(bl)])
        }
    }
}

fn resolve_iterations(input: &NumberInput) -> IterationCount {
    match input {
        NumberInput::Text(text) if text.trim().eq_ignore_ascii_case(INFINITE) => {
            IterationCount::Infinite
        }
        NumberInput::Missing => IterationCount::default(),
        other => {
            let count = other.resolve(0.0).round();
            if count >= 1.0 && count <= f64::from(u32::MAX) {
                IterationCount::Count(count as u32)
            } else {
                IterationCount::default()
            }
        }
    }
}

fn resolve_shadow_layers(layers: Vec<ShadowLayerDoc>) -> ShadowLayers {
    if layers.len() > MAX_SHADOW_LAYERS {
        warn!(
            "Document has {} shadow layers, keeping the first {}",
            layers.len(),
            MAX_SHADOW_LAYERS
        );
    }
    let base = ShadowLayer::default();
    layers
        .into_iter()
        .take(MAX_SHADOW_LAYERS)
        .map(|layer| ShadowLayer {
            offset_x: layer.offset_x.resolve(base.offset_x),
            offset_y: layer.offset_y.resolve(base.offset_y),
            blur: layer.blur.resolve(base.blur),
            spread: layer.spread.resolve(base.spread),
            color: layer.color.unwrap_or_else(|| base.color.clone()),
            alpha_percent: layer.alpha_percent.resolve(base.alpha_percent),
            inset: layer.inset.unwrap_or(base.inset),
        })
        .collect()
}
