//! Card outline paths
//!
//! A small command list that any [`Canvas2D`](crate::Canvas2D) can fill. Two
//! rounded-rectangle builders exist: [`CardPath::rounded_rect`] uses cubic
//! circle approximations and backs the native round-rect of the pixmap
//! canvas, [`CardPath::rounded_rect_quadratic`] is the portable fallback with
//! one quadratic curve per corner.

/// Magic number for cubic Bézier circle approximation
const KAPPA: f32 = 0.552_284_8;

/// A single path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    CubicTo {
        cx1: f32,
        cy1: f32,
        cx2: f32,
        cy2: f32,
        x: f32,
        y: f32,
    },
    Close,
}

/// A fillable outline
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardPath {
    commands: Vec<PathCommand>,
}

impl CardPath {
    /// Create a new empty path
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(x, y));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(x, y));
        self
    }

    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadTo { cx, cy, x, y });
        self
    }

    pub fn cubic_to(mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::CubicTo {
            cx1,
            cy1,
            cx2,
            cy2,
            x,
            y,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Append a command in place (used by glyph outlining)
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Rounded rectangle from four quadratic corners and four edges
    ///
    /// Clockwise from the end of the top-left corner. Radii are `[tl, tr, br,
    /// bl]` and are clamped to half the shorter side.
    pub fn rounded_rect_quadratic(x: f32, y: f32, w: f32, h: f32, radii: [f32; 4]) -> Self {
        let [tl, tr, br, bl] = clamp_radii(w, h, radii);
        Self::new()
            .move_to(x + tl, y)
            .line_to(x + w - tr, y)
            .quad_to(x + w, y, x + w, y + tr)
            .line_to(x + w, y + h - br)
            .quad_to(x + w, y + h, x + w - br, y + h)
            .line_to(x + bl, y + h)
            .quad_to(x, y + h, x, y + h - bl)
            .line_to(x, y + tl)
            .quad_to(x, y, x + tl, y)
            .close()
    }

    /// Rounded rectangle with cubic circle-approximation corners
    pub fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radii: [f32; 4]) -> Self {
        let [tl, tr, br, bl] = clamp_radii(w, h, radii);
        let k = 1.0 - KAPPA;

        let mut path = Self::new().move_to(x + tl, y);

        // Top edge
        path = path.line_to(x + w - tr, y);
        if tr > 0.0 {
            path = path.cubic_to(x + w - tr * k, y, x + w, y + tr * k, x + w, y + tr);
        }

        // Right edge
        path = path.line_to(x + w, y + h - br);
        if br > 0.0 {
            path = path.cubic_to(
                x + w,
                y + h - br * k,
                x + w - br * k,
                y + h,
                x + w - br,
                y + h,
            );
        }

        // Bottom edge
        path = path.line_to(x + bl, y + h);
        if bl > 0.0 {
            path = path.cubic_to(x + bl * k, y + h, x, y + h - bl * k, x, y + h - bl);
        }

        // Left edge
        path = path.line_to(x, y + tl);
        if tl > 0.0 {
            path = path.cubic_to(x, y + tl * k, x + tl * k, y, x + tl, y);
        }

        path.close()
    }
}

/// Clamp corner radii to `[0, min(w, h) / 2]`
pub fn clamp_radii(w: f32, h: f32, radii: [f32; 4]) -> [f32; 4] {
    let max_r = (w.min(h) / 2.0).max(0.0);
    radii.map(|r| if r.is_finite() { r.clamp(0.0, max_r) } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_fallback_is_clockwise_from_top_left() {
        let path = CardPath::rounded_rect_quadratic(0.0, 0.0, 400.0, 240.0, [16.0; 4]);
        let commands = path.commands();

        assert_eq!(commands.len(), 10);
        assert_eq!(commands[0], PathCommand::MoveTo(16.0, 0.0));
        assert_eq!(commands[1], PathCommand::LineTo(384.0, 0.0));
        assert_eq!(
            commands[2],
            PathCommand::QuadTo {
                cx: 400.0,
                cy: 0.0,
                x: 400.0,
                y: 16.0
            }
        );
        assert_eq!(commands[3], PathCommand::LineTo(400.0, 224.0));
        assert_eq!(commands[5], PathCommand::LineTo(16.0, 240.0));
        assert_eq!(commands[7], PathCommand::LineTo(0.0, 16.0));
        assert_eq!(
            commands[8],
            PathCommand::QuadTo {
                cx: 0.0,
                cy: 0.0,
                x: 16.0,
                y: 0.0
            }
        );
        assert_eq!(commands[9], PathCommand::Close);
    }

    #[test]
    fn test_radii_clamped_to_half_short_side() {
        assert_eq!(clamp_radii(100.0, 40.0, [50.0, 10.0, -5.0, f32::NAN]), [20.0, 10.0, 0.0, 0.0]);

        let path = CardPath::rounded_rect_quadratic(0.0, 0.0, 100.0, 40.0, [999.0; 4]);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(20.0, 0.0));
    }

    #[test]
    fn test_cubic_rect_skips_square_corners() {
        let path = CardPath::rounded_rect(0.0, 0.0, 10.0, 10.0, [0.0; 4]);
        let curves = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
            .count();
        assert_eq!(curves, 0);

        let path = CardPath::rounded_rect(0.0, 0.0, 10.0, 10.0, [2.0, 0.0, 2.0, 0.0]);
        let curves = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
            .count();
        assert_eq!(curves, 2);
    }
}
