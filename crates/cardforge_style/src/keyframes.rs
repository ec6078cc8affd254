//! Keyframe presets for the named card animations

use cardforge_core::{AnimationKind, Rgb, StyleConfig, FALLBACK_BORDER_COLOR};

use crate::compiler::RenderableStyle;
use crate::units::{clamp_percent, px, rgba_byte};

/// One keyframe selector and its declarations
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub offsets: &'static [&'static str],
    pub declarations: Vec<(&'static str, String)>,
}

/// A named `@keyframes` rule
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes {
    pub name: &'static str,
    pub frames: Vec<Keyframe>,
}

fn frame(offsets: &'static [&'static str], property: &'static str, value: &str) -> Keyframe {
    Keyframe {
        offsets,
        declarations: vec![(property, value.to_string())],
    }
}

/// Keyframes for the config's animation kind
///
/// Only `glow` depends on the config: it pulses an extra ring around the
/// computed box shadow.
pub fn keyframes_for(config: &StyleConfig, style: &RenderableStyle) -> Keyframes {
    let kind = config.animation.kind;
    let frames = match kind {
        AnimationKind::Float => vec![
            frame(&["0%", "100%"], "transform", "translateY(0px)"),
            frame(&["50%"], "transform", "translateY(-8px)"),
        ],
        AnimationKind::Pulse => vec![
            frame(&["0%", "100%"], "transform", "scale(1)"),
            frame(&["50%"], "transform", "scale(1.03)"),
        ],
        AnimationKind::Glow => {
            let ring = glow_ring(config);
            let peak = if style.box_shadow == "none" {
                ring
            } else {
                format!("{}, {}", style.box_shadow, ring)
            };
            vec![
                frame(&["0%", "100%"], "box-shadow", &style.box_shadow),
                frame(&["50%"], "box-shadow", &peak),
            ]
        }
        AnimationKind::Rotate => vec![
            frame(&["0%"], "transform", "rotate(0deg)"),
            frame(&["100%"], "transform", "rotate(360deg)"),
        ],
        AnimationKind::Bounce => vec![
            frame(&["0%", "20%", "50%", "80%", "100%"], "transform", "translateY(0px)"),
            frame(&["40%"], "transform", "translateY(-12px)"),
            frame(&["60%"], "transform", "translateY(-6px)"),
        ],
        AnimationKind::Shake => vec![
            frame(&["0%", "100%"], "transform", "translateX(0px)"),
            frame(&["25%"], "transform", "translateX(-4px)"),
            frame(&["75%"], "transform", "translateX(4px)"),
        ],
    };

    Keyframes {
        name: kind.as_str(),
        frames,
    }
}

/// Wide ring in the neon color (border) or the background color
fn glow_ring(config: &StyleConfig) -> String {
    let color = if config.effects.neon_glow {
        Rgb::parse_or(&config.border.color, FALLBACK_BORDER_COLOR)
    } else {
        config.primary_rgb()
    };
    let intensity = config
        .shadow_layers
        .first()
        .map_or(20.0, |layer| clamp_percent(layer.alpha_percent, 0.0));
    format!("0px 0px {} 0px {}", px(intensity * 2.0), rgba_byte(color, 0x40))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compute;

    #[test]
    fn test_every_kind_has_frames() {
        let mut config = StyleConfig::default();
        for kind in AnimationKind::ALL {
            config.animation.kind = kind;
            let keyframes = keyframes_for(&config, &compute(&config));
            assert_eq!(keyframes.name, kind.as_str());
            assert!(keyframes.frames.len() >= 2);
        }
    }

    #[test]
    fn test_glow_extends_box_shadow() {
        let mut config = StyleConfig::default();
        config.animation.kind = AnimationKind::Glow;
        let style = compute(&config);
        let keyframes = keyframes_for(&config, &style);

        assert_eq!(keyframes.frames[0].declarations[0].1, style.box_shadow);
        let peak = &keyframes.frames[1].declarations[0].1;
        assert!(peak.starts_with(&style.box_shadow));
        assert!(peak.ends_with("0px 0px 40px 0px rgba(139, 92, 246, 0.251)"));
    }

    #[test]
    fn test_glow_without_shadow() {
        let mut config = StyleConfig::default();
        config.animation.kind = AnimationKind::Glow;
        config.shadow_layers.clear();
        let keyframes = keyframes_for(&config, &compute(&config));
        assert_eq!(
            keyframes.frames[1].declarations[0].1,
            "0px 0px 40px 0px rgba(139, 92, 246, 0.251)"
        );
    }
}
