//! Editor state container
//!
//! [`EditorState`] owns the config being edited and its undo history. All
//! mutation goes through [`EditorState::dispatch`]; the style compiler and
//! the exporters only ever see `&StyleConfig`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::{
    AnimationConfig, BorderConfig, CardHeight, CornerRadius, EffectsConfig, GradientConfig,
    ShadowLayer, ShadowLayers, StyleConfig, TextContent,
};
use crate::error::{CoreError, Result};
use crate::history::History;
use crate::templates::{Palette, TemplateId};
use crate::value::number_or;

/// One edit to the config
#[derive(Clone, Debug, PartialEq)]
pub enum EditAction {
    SetDimensions {
        width: Option<f64>,
        height: Option<CardHeight>,
    },
    SetColors {
        primary: Option<String>,
        secondary: Option<String>,
    },
    SetGradient(GradientConfig),
    SetShadowLayers(ShadowLayers),
    SetBorder(BorderConfig),
    SetEffects(EffectsConfig),
    SetAnimation(AnimationConfig),
    SetContent(TextContent),
    ApplyTemplate(TemplateId),
    ApplyPalette(String),
    /// Set one field from text input, keyed by its document name
    SetField {
        key: String,
        value: String,
    },
    Reset,
    Load(Box<StyleConfig>),
    Undo,
    Redo,
}

/// Keys accepted by [`EditAction::SetField`]
pub const FIELD_KEYS: &[&str] = &[
    "width",
    "height",
    "backgroundColor",
    "secondaryColor",
    "cornerRadius",
    "opacity",
    "gradientType",
    "gradientAngle",
    "shadowIntensity",
    "shadowColor",
    "borderWidth",
    "borderColor",
    "borderOpacity",
    "borderStyle",
    "blurIntensity",
    "glassEffect",
    "backdropSaturate",
    "neonGlow",
    "animationEnabled",
    "animationType",
    "animationDuration",
    "animationDelay",
    "hoverEffects",
    "title",
    "subtitle",
    "footer",
    "textColor",
    "textAlign",
    "contentLayout",
    "iconStyle",
];

pub struct EditorState {
    config: StyleConfig,
    history: History<StyleConfig>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(StyleConfig::default())
    }
}

impl EditorState {
    pub fn new(config: StyleConfig) -> Self {
        Self {
            history: History::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply an action
    ///
    /// Any action that changes the config records a history snapshot.
    /// `Undo`/`Redo` at the ends of the history are no-ops.
    pub fn dispatch(&mut self, action: EditAction) -> Result<()> {
        let mut next = self.config.clone();

        match action {
            EditAction::Undo => {
                if let Some(snapshot) = self.history.undo() {
                    self.config = snapshot.clone();
                }
                return Ok(());
            }
            EditAction::Redo => {
                if let Some(snapshot) = self.history.redo() {
                    self.config = snapshot.clone();
                }
                return Ok(());
            }
            EditAction::SetDimensions { width, height } => {
                if let Some(width) = width {
                    next.dimensions.width = width;
                }
                if let Some(height) = height {
                    next.dimensions.height = height;
                }
            }
            EditAction::SetColors { primary, secondary } => {
                next.set_colors(primary.as_deref(), secondary.as_deref());
            }
            EditAction::SetGradient(gradient) => next.gradient = gradient,
            EditAction::SetShadowLayers(layers) => next.shadow_layers = layers,
            EditAction::SetBorder(border) => next.border = border,
            EditAction::SetEffects(effects) => next.effects = effects,
            EditAction::SetAnimation(animation) => next.animation = animation,
            EditAction::SetContent(content) => next.content = content,
            EditAction::ApplyTemplate(id) => id.apply_to(&mut next),
            EditAction::ApplyPalette(id) => Palette::find(&id)?.apply_to(&mut next),
            EditAction::SetField { key, value } => set_field(&mut next, &key, &value)?,
            EditAction::Reset => next = StyleConfig::default(),
            EditAction::Load(config) => next = *config,
        }

        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: StyleConfig) {
        if next == self.config {
            return;
        }
        self.history.push(next.clone());
        self.config = next;
    }
}

/// Set a field from its text form
///
/// Malformed values resolve to the field's default; only unknown keys fail.
pub fn set_field(config: &mut StyleConfig, key: &str, value: &str) -> Result<()> {
    let defaults = StyleConfig::default();

    match key {
        "width" => config.dimensions.width = number_or(value, defaults.dimensions.width),
        "height" => {
            config.dimensions.height = if value.trim().eq_ignore_ascii_case("auto") {
                CardHeight::Auto
            } else {
                CardHeight::Px(number_or(value, 240.0))
            }
        }
        "backgroundColor" => config.set_colors(Some(value.trim()), None),
        "secondaryColor" => config.set_colors(None, Some(value.trim())),
        "cornerRadius" => {
            let radius = number_or(value, 16.0);
            config.border.radius = CornerRadius::Uniform(radius);
        }
        "opacity" => config.opacity = number_or(value, defaults.opacity),
        "gradientType" => config.gradient.kind = enum_or(value, defaults.gradient.kind),
        "gradientAngle" => config.gradient.angle = number_or(value, defaults.gradient.angle),
        "shadowIntensity" => {
            let intensity = number_or(value, ShadowLayer::default().alpha_percent);
            let color = config
                .shadow_layers
                .first()
                .map_or_else(|| ShadowLayer::default().color, |l| l.color.clone());
            let layer = ShadowLayer::from_intensity(intensity, color);
            match config.shadow_layers.first_mut() {
                Some(first) => *first = layer,
                None => config.shadow_layers.push(layer),
            }
        }
        "shadowColor" => match config.shadow_layers.first_mut() {
            Some(first) => first.color = value.trim().to_string(),
            None => config
                .shadow_layers
                .push(ShadowLayer::from_intensity(20.0, value.trim())),
        },
        "borderWidth" => config.border.width = number_or(value, defaults.border.width),
        "borderColor" => config.border.color = value.trim().to_string(),
        "borderOpacity" => config.border.opacity = number_or(value, defaults.border.opacity),
        "borderStyle" => config.border.style = enum_or(value, defaults.border.style),
        "blurIntensity" => config.effects.blur = number_or(value, defaults.effects.blur),
        "glassEffect" => config.effects.glass = bool_or(value, defaults.effects.glass),
        "backdropSaturate" => {
            config.effects.backdrop_saturate =
                number_or(value, defaults.effects.backdrop_saturate)
        }
        "neonGlow" => config.effects.neon_glow = bool_or(value, defaults.effects.neon_glow),
        "animationEnabled" => {
            config.animation.enabled = bool_or(value, defaults.animation.enabled)
        }
        "animationType" => config.animation.kind = enum_or(value, defaults.animation.kind),
        "animationDuration" => {
            config.animation.duration_ms = number_or(value, defaults.animation.duration_ms)
        }
        "animationDelay" => {
            config.animation.delay_ms = number_or(value, defaults.animation.delay_ms)
        }
        "hoverEffects" => config.hover_effects = bool_or(value, defaults.hover_effects),
        "title" => config.content.title = value.to_string(),
        "subtitle" => config.content.subtitle = value.to_string(),
        "footer" => config.content.footer = value.to_string(),
        "textColor" => config.content.text_color = value.trim().to_string(),
        "textAlign" => config.content.text_align = enum_or(value, defaults.content.text_align),
        "contentLayout" => config.layout = enum_or(value, defaults.layout),
        "iconStyle" => config.icon_style = enum_or(value, defaults.icon_style),
        _ => return Err(CoreError::UnknownField(key.to_string())),
    }
    Ok(())
}

fn enum_or<T: DeserializeOwned>(value: &str, fallback: T) -> T {
    serde_json::from_value(Value::String(value.trim().to_ascii_lowercase())).unwrap_or_else(|_| {
        debug!("Unknown option {:?}, using default", value);
        fallback
    })
}

fn bool_or(value: &str, fallback: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => true,
        "false" | "off" | "no" | "0" => false,
        _ => {
            debug!("Malformed flag {:?}, using {}", value, fallback);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BorderStyle, GradientKind};

    fn set(editor: &mut EditorState, key: &str, value: &str) {
        editor
            .dispatch(EditAction::SetField {
                key: key.into(),
                value: value.into(),
            })
            .unwrap();
    }

    #[test]
    fn test_dispatch_records_history() {
        let mut editor = EditorState::default();
        assert!(!editor.can_undo());

        set(&mut editor, "opacity", "50");
        set(&mut editor, "borderWidth", "3px");
        assert_eq!(editor.config().opacity, 50.0);
        assert_eq!(editor.config().border.width, 3.0);

        editor.dispatch(EditAction::Undo).unwrap();
        assert_eq!(editor.config().border.width, 1.0);
        assert_eq!(editor.config().opacity, 50.0);

        editor.dispatch(EditAction::Undo).unwrap();
        assert_eq!(editor.config(), &StyleConfig::default());

        editor.dispatch(EditAction::Redo).unwrap();
        assert_eq!(editor.config().opacity, 50.0);
    }

    #[test]
    fn test_unchanged_config_not_recorded() {
        let mut editor = EditorState::default();
        set(&mut editor, "opacity", "95");
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_new_edit_after_undo_drops_redo() {
        let mut editor = EditorState::default();
        set(&mut editor, "opacity", "10");
        editor.dispatch(EditAction::Undo).unwrap();
        set(&mut editor, "opacity", "20");
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_malformed_values_use_defaults() {
        let mut editor = EditorState::default();
        set(&mut editor, "opacity", "40");
        set(&mut editor, "opacity", "lots");
        assert_eq!(editor.config().opacity, 95.0);

        set(&mut editor, "gradientType", "Radial");
        assert_eq!(editor.config().gradient.kind, GradientKind::Radial);
        set(&mut editor, "gradientType", "spiral");
        assert_eq!(editor.config().gradient.kind, GradientKind::Linear);

        set(&mut editor, "borderStyle", "dotted");
        assert_eq!(editor.config().border.style, BorderStyle::Dotted);
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let mut editor = EditorState::default();
        let result = editor.dispatch(EditAction::SetField {
            key: "sparkles".into(),
            value: "1".into(),
        });
        assert!(matches!(result, Err(CoreError::UnknownField(_))));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_shadow_intensity_rebuilds_first_layer() {
        let mut editor = EditorState::default();
        set(&mut editor, "shadowColor", "#7c3aed");
        set(&mut editor, "shadowIntensity", "30");
        let layer = &editor.config().shadow_layers[0];
        assert_eq!(layer.offset_y, 15.0);
        assert_eq!(layer.blur, 30.0);
        assert_eq!(layer.alpha_percent, 30.0);
        assert_eq!(layer.color, "#7c3aed");
    }

    #[test]
    fn test_template_and_palette_actions() {
        let mut editor = EditorState::default();
        editor
            .dispatch(EditAction::ApplyTemplate(TemplateId::Corporate))
            .unwrap();
        assert_eq!(editor.config().template, "corporate");

        editor
            .dispatch(EditAction::ApplyPalette("green-lime".into()))
            .unwrap();
        assert_eq!(editor.config().background_color, "#10B981");

        assert!(editor
            .dispatch(EditAction::ApplyPalette("nope".into()))
            .is_err());
    }

    #[test]
    fn test_every_listed_key_is_accepted() {
        let mut config = StyleConfig::default();
        for key in FIELD_KEYS {
            set_field(&mut config, key, "1").unwrap();
        }
    }

    #[test]
    fn test_height_auto() {
        let mut editor = EditorState::default();
        set(&mut editor, "height", "auto");
        assert_eq!(editor.config().dimensions.height, CardHeight::Auto);
    }
}
