//! Built-in templates and color palettes
//!
//! A template is a named partial config merged over either the defaults or
//! the current config. Palettes only touch colors.

use std::fmt;
use std::str::FromStr;

use smallvec::smallvec;

use crate::config::{
    AnimationKind, CornerRadius, ColorStop, GradientKind, ShadowLayer, ShadowLayers, StyleConfig,
};
use crate::error::CoreError;

/// Built-in template identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Minimal,
    Glass,
    Neon,
    Gradient,
    Corporate,
    Neumorphism,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        TemplateId::Minimal,
        TemplateId::Glass,
        TemplateId::Neon,
        TemplateId::Gradient,
        TemplateId::Corporate,
        TemplateId::Neumorphism,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Minimal => "minimal",
            TemplateId::Glass => "glass",
            TemplateId::Neon => "neon",
            TemplateId::Gradient => "gradient",
            TemplateId::Corporate => "corporate",
            TemplateId::Neumorphism => "neumorphism",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemplateId::Minimal => "Minimal",
            TemplateId::Glass => "Glassmorphism",
            TemplateId::Neon => "Neon Glow",
            TemplateId::Gradient => "Gradient Vibrant",
            TemplateId::Corporate => "Corporate",
            TemplateId::Neumorphism => "Neumorphism",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateId::Minimal => "Clean and simple design",
            TemplateId::Glass => "Modern glass effect with blur",
            TemplateId::Neon => "Vibrant glowing effects",
            TemplateId::Gradient => "Bold gradient backgrounds",
            TemplateId::Corporate => "Professional business style",
            TemplateId::Neumorphism => "Soft extruded surface",
        }
    }

    /// The template's partial config
    pub fn patch(self) -> TemplatePatch {
        match self {
            TemplateId::Minimal => TemplatePatch {
                glass: Some(false),
                gradient_kind: Some(GradientKind::None),
                animation_enabled: Some(false),
                shadow_layers: Some(smallvec![ShadowLayer::from_intensity(8.0, "#000000")]),
                corner_radius: Some(8.0),
                border_width: Some(1.0),
                opacity: Some(95.0),
                background_color: Some("#E5E7EB"),
                secondary_color: Some("#D1D5DB"),
                border_color: Some("#000000"),
                border_opacity: Some(10.0),
                ..TemplatePatch::default()
            },
            TemplateId::Glass => TemplatePatch {
                glass: Some(true),
                gradient_kind: Some(GradientKind::Linear),
                animation_enabled: Some(true),
                shadow_layers: Some(smallvec![ShadowLayer::from_intensity(20.0, "#000000")]),
                corner_radius: Some(16.0),
                border_width: Some(1.0),
                opacity: Some(80.0),
                blur: Some(16.0),
                background_color: Some("#8B5CF6"),
                secondary_color: Some("#EC4899"),
                border_color: Some("#FFFFFF"),
                border_opacity: Some(20.0),
                ..TemplatePatch::default()
            },
            TemplateId::Neon => TemplatePatch {
                glass: Some(false),
                gradient_kind: Some(GradientKind::None),
                animation_enabled: Some(true),
                animation_kind: Some(AnimationKind::Glow),
                shadow_layers: Some(smallvec![ShadowLayer::from_intensity(30.0, "#EC4899")]),
                corner_radius: Some(12.0),
                border_width: Some(2.0),
                opacity: Some(90.0),
                neon_glow: Some(true),
                background_color: Some("#1F2937"),
                secondary_color: Some("#374151"),
                border_color: Some("#EC4899"),
                border_opacity: Some(70.0),
                ..TemplatePatch::default()
            },
            TemplateId::Gradient => TemplatePatch {
                glass: Some(false),
                gradient_kind: Some(GradientKind::Linear),
                animation_enabled: Some(true),
                shadow_layers: Some(smallvec![ShadowLayer::from_intensity(15.0, "#000000")]),
                corner_radius: Some(20.0),
                border_width: Some(0.0),
                opacity: Some(100.0),
                background_color: Some("#F59E0B"),
                secondary_color: Some("#EF4444"),
                border_color: Some("#FFFFFF"),
                border_opacity: Some(0.0),
                ..TemplatePatch::default()
            },
            TemplateId::Corporate => TemplatePatch {
                glass: Some(false),
                gradient_kind: Some(GradientKind::None),
                animation_enabled: Some(false),
                shadow_layers: Some(smallvec![ShadowLayer::from_intensity(12.0, "#000000")]),
                corner_radius: Some(4.0),
                border_width: Some(1.0),
                opacity: Some(100.0),
                background_color: Some("#3B82F6"),
                secondary_color: Some("#60A5FA"),
                border_color: Some("#9CA3AF"),
                border_opacity: Some(50.0),
                ..TemplatePatch::default()
            },
            TemplateId::Neumorphism => TemplatePatch {
                glass: Some(false),
                gradient_kind: Some(GradientKind::None),
                animation_enabled: Some(false),
                shadow_layers: Some(smallvec![
                    ShadowLayer {
                        offset_x: 9.0,
                        offset_y: 9.0,
                        blur: 16.0,
                        spread: 0.0,
                        color: "#A3B1C6".into(),
                        alpha_percent: 60.0,
                        inset: false,
                    },
                    ShadowLayer {
                        offset_x: -9.0,
                        offset_y: -9.0,
                        blur: 16.0,
                        spread: 0.0,
                        color: "#FFFFFF".into(),
                        alpha_percent: 100.0,
                        inset: false,
                    },
                ]),
                corner_radius: Some(20.0),
                border_width: Some(0.0),
                opacity: Some(100.0),
                background_color: Some("#E0E5EC"),
                secondary_color: Some("#E0E5EC"),
                border_color: Some("#FFFFFF"),
                border_opacity: Some(0.0),
                text_color: Some("#4B5563"),
                ..TemplatePatch::default()
            },
        }
    }

    /// The template merged over [`StyleConfig::default`]
    pub fn config(self) -> StyleConfig {
        let mut config = StyleConfig::default();
        self.apply_to(&mut config);
        config
    }

    /// Merge the template over `config` and record its id
    pub fn apply_to(self, config: &mut StyleConfig) {
        self.patch().merge_into(config);
        config.template = self.as_str().to_string();
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CoreError::UnknownTemplate(s.to_string()))
    }
}

/// Partial config; `None` leaves the target field untouched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplatePatch {
    pub glass: Option<bool>,
    pub gradient_kind: Option<GradientKind>,
    pub animation_enabled: Option<bool>,
    pub animation_kind: Option<AnimationKind>,
    pub shadow_layers: Option<ShadowLayers>,
    pub corner_radius: Option<f64>,
    pub border_width: Option<f64>,
    pub opacity: Option<f64>,
    pub blur: Option<f64>,
    pub neon_glow: Option<bool>,
    pub background_color: Option<&'static str>,
    pub secondary_color: Option<&'static str>,
    pub border_color: Option<&'static str>,
    pub border_opacity: Option<f64>,
    pub text_color: Option<&'static str>,
}

impl TemplatePatch {
    pub fn merge_into(&self, config: &mut StyleConfig) {
        if let Some(glass) = self.glass {
            config.effects.glass = glass;
        }
        if let Some(kind) = self.gradient_kind {
            config.gradient.kind = kind;
        }
        if let Some(enabled) = self.animation_enabled {
            config.animation.enabled = enabled;
        }
        if let Some(kind) = self.animation_kind {
            config.animation.kind = kind;
        }
        if let Some(layers) = &self.shadow_layers {
            config.shadow_layers = layers.clone();
        }
        if let Some(radius) = self.corner_radius {
            config.border.radius = CornerRadius::Uniform(radius);
        }
        if let Some(width) = self.border_width {
            config.border.width = width;
        }
        if let Some(opacity) = self.opacity {
            config.opacity = opacity;
        }
        if let Some(blur) = self.blur {
            config.effects.blur = blur;
        }
        // Templates without the flag turn the glow off
        config.effects.neon_glow = self.neon_glow.unwrap_or(false);
        if let Some(color) = self.border_color {
            config.border.color = color.to_string();
        }
        if let Some(opacity) = self.border_opacity {
            config.border.opacity = opacity;
        }
        if let Some(color) = self.text_color {
            config.content.text_color = color.to_string();
        }
        if self.background_color.is_some() || self.secondary_color.is_some() {
            if let Some(color) = self.background_color {
                config.background_color = color.to_string();
            }
            if let Some(color) = self.secondary_color {
                config.secondary_color = color.to_string();
            }
            config.gradient.stops = vec![
                ColorStop::new(config.background_color.clone(), 0.0),
                ColorStop::new(config.secondary_color.clone(), 100.0),
            ];
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Palettes
// ─────────────────────────────────────────────────────────────────────────────

/// A named color pair, optionally with a matching text color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub id: &'static str,
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub text: Option<&'static str>,
}

pub const PALETTES: [Palette; 8] = [
    Palette::pair("purple-pink", "Purple Haze", "#8B5CF6", "#EC4899"),
    Palette::pair("blue-teal", "Ocean Breeze", "#3B82F6", "#14B8A6"),
    Palette::pair("green-lime", "Forest Dew", "#10B981", "#84CC16"),
    Palette::pair("orange-red", "Sunset Fire", "#F59E0B", "#EF4444"),
    Palette::pair("indigo-violet", "Twilight Sky", "#6366F1", "#A78BFA"),
    Palette::pair("gray-slate", "Mono Chrome", "#6B7280", "#4B5563"),
    Palette {
        id: "sunset",
        name: "Sunset Vibes",
        primary: "#FF6B6B",
        secondary: "#FFE66D",
        text: Some("#FFFFFF"),
    },
    Palette {
        id: "ocean",
        name: "Deep Ocean",
        primary: "#0077BE",
        secondary: "#00A8CC",
        text: Some("#FFFFFF"),
    },
];

impl Palette {
    const fn pair(
        id: &'static str,
        name: &'static str,
        primary: &'static str,
        secondary: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            primary,
            secondary,
            text: None,
        }
    }

    /// Look up a palette by id
    pub fn find(id: &str) -> Result<Palette, CoreError> {
        PALETTES
            .iter()
            .copied()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::UnknownPalette(id.to_string()))
    }

    pub fn apply_to(&self, config: &mut StyleConfig) {
        config.set_colors(Some(self.primary), Some(self.secondary));
        if let Some(text) = self.text {
            config.content.text_color = text.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_ids_parse() {
        for id in TemplateId::ALL {
            assert_eq!(id.as_str().parse::<TemplateId>().unwrap(), id);
        }
        assert!(matches!(
            "retro".parse::<TemplateId>(),
            Err(CoreError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_neon_template_config() {
        let config = TemplateId::Neon.config();
        assert_eq!(config.template, "neon");
        assert!(config.effects.neon_glow);
        assert!(!config.effects.glass);
        assert_eq!(config.gradient.kind, GradientKind::None);
        assert_eq!(config.animation.kind, AnimationKind::Glow);
        assert_eq!(config.shadow_layers[0].color, "#EC4899");
        assert_eq!(config.border.radius, CornerRadius::Uniform(12.0));
    }

    #[test]
    fn test_apply_keeps_unpatched_fields() {
        let mut config = StyleConfig::default();
        config.content.title = "Mine".into();
        config.dimensions.width = 512.0;
        TemplateId::Corporate.apply_to(&mut config);
        assert_eq!(config.content.title, "Mine");
        assert_eq!(config.dimensions.width, 512.0);
        assert_eq!(config.background_color, "#3B82F6");
        assert_eq!(config.gradient.stops[1].color, "#60A5FA");
    }

    #[test]
    fn test_switching_away_from_neon_clears_glow() {
        let mut config = TemplateId::Neon.config();
        TemplateId::Minimal.apply_to(&mut config);
        assert!(!config.effects.neon_glow);
    }

    #[test]
    fn test_neumorphism_has_two_layers() {
        let config = TemplateId::Neumorphism.config();
        assert_eq!(config.shadow_layers.len(), 2);
        assert_eq!(config.content.text_color, "#4B5563");
    }

    #[test]
    fn test_palette_apply() {
        let mut config = StyleConfig::default();
        Palette::find("ocean").unwrap().apply_to(&mut config);
        assert_eq!(config.background_color, "#0077BE");
        assert_eq!(config.gradient.stops[0].color, "#0077BE");
        assert_eq!(config.content.text_color, "#FFFFFF");
        assert!(Palette::find("neon-pink").is_err());
    }
}
