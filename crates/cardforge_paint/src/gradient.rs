//! Fill style for the card background

use cardforge_core::{GradientKind, Rgb, StyleConfig, FALLBACK_FILL_COLOR};
use tracing::warn;

use crate::context::{FillStop, FillStyle};

/// Fill style reproducing the configured background over a `width × height`
/// box
///
/// Only the first and last stops are used. Linear endpoints follow the CSS
/// angle convention (0° points up, 90° right); radial gradients are
/// centered with radius `max(width, height) / 2`. Conic gradients are not
/// supported and fall back to the solid primary color.
pub fn fill_style_for(config: &StyleConfig, width: f32, height: f32) -> FillStyle {
    let primary = config.primary_rgb();
    match config.gradient.kind {
        GradientKind::None => FillStyle::Solid(primary),
        GradientKind::Conic => {
            warn!("Conic gradients cannot be rasterized, using the primary color");
            FillStyle::Solid(primary)
        }
        GradientKind::Linear => {
            let (start, end) = linear_endpoints(config.gradient.angle, width, height);
            FillStyle::Linear {
                start,
                end,
                stops: end_stops(config),
            }
        }
        GradientKind::Radial => FillStyle::Radial {
            center: (width / 2.0, height / 2.0),
            radius: width.max(height) / 2.0,
            stops: end_stops(config),
        },
    }
}

/// Start and end points of a CSS-angled linear gradient across the box
pub fn linear_endpoints(angle: f64, width: f32, height: f32) -> ((f32, f32), (f32, f32)) {
    let angle = if angle.is_finite() { angle } else { 135.0 };
    let radians = (angle - 90.0).to_radians();
    let (sin, cos) = (radians.sin() as f32, radians.cos() as f32);
    let (hw, hh) = (width / 2.0, height / 2.0);
    (
        (hw * (1.0 - cos), hh * (1.0 - sin)),
        (hw * (1.0 + cos), hh * (1.0 + sin)),
    )
}

fn end_stops(config: &StyleConfig) -> Vec<FillStop> {
    let stops = config.effective_stops();
    let color = |stop: Option<&cardforge_core::ColorStop>| {
        stop.map_or(FALLBACK_FILL_COLOR, |stop| {
            Rgb::parse_or(&stop.color, FALLBACK_FILL_COLOR)
        })
    };
    vec![
        FillStop::new(0.0, color(stops.first())),
        FillStop::new(1.0, color(stops.last())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardforge_core::ColorStop;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    #[test]
    fn test_linear_endpoints_follow_css_angles() {
        let (start, end) = linear_endpoints(90.0, 400.0, 200.0);
        assert!(close(start, (0.0, 100.0)) && close(end, (400.0, 100.0)));

        let (start, end) = linear_endpoints(180.0, 400.0, 200.0);
        assert!(close(start, (200.0, 0.0)) && close(end, (200.0, 200.0)));

        let (start, end) = linear_endpoints(0.0, 400.0, 200.0);
        assert!(close(start, (200.0, 200.0)) && close(end, (200.0, 0.0)));
    }

    #[test]
    fn test_linear_uses_first_and_last_stop() {
        let mut config = StyleConfig::default();
        config.gradient.stops = vec![
            ColorStop::new("#FF0000", 0.0),
            ColorStop::new("#00FF00", 50.0),
            ColorStop::new("#0000FF", 100.0),
        ];
        match fill_style_for(&config, 400.0, 240.0) {
            FillStyle::Linear { stops, .. } => {
                assert_eq!(stops.len(), 2);
                assert_eq!(stops[0], FillStop::new(0.0, Rgb::new(255, 0, 0)));
                assert_eq!(stops[1], FillStop::new(1.0, Rgb::new(0, 0, 255)));
            }
            other => panic!("expected linear fill, got {:?}", other),
        }
    }

    #[test]
    fn test_radial_centered() {
        let mut config = StyleConfig::default();
        config.gradient.kind = GradientKind::Radial;
        match fill_style_for(&config, 400.0, 240.0) {
            FillStyle::Radial { center, radius, .. } => {
                assert_eq!(center, (200.0, 120.0));
                assert_eq!(radius, 200.0);
            }
            other => panic!("expected radial fill, got {:?}", other),
        }
    }

    #[test]
    fn test_conic_falls_back_to_primary() {
        let mut config = StyleConfig::default();
        config.gradient.kind = GradientKind::Conic;
        assert_eq!(
            fill_style_for(&config, 400.0, 240.0),
            FillStyle::Solid(Rgb::new(0x8B, 0x5C, 0xF6))
        );
    }

    #[test]
    fn test_no_gradient_is_solid() {
        let mut config = StyleConfig::default();
        config.gradient.kind = GradientKind::None;
        config.background_color = "not a color".to_string();
        assert_eq!(
            fill_style_for(&config, 10.0, 10.0),
            FillStyle::Solid(FALLBACK_FILL_COLOR)
        );
    }
}
