//! CSS text export

use cardforge_core::StyleConfig;

use crate::compiler::RenderableStyle;
use crate::keyframes::{keyframes_for, Keyframes};
use crate::units::px;

/// Hover transform applied by the `:hover` block
pub const HOVER_TRANSFORM: &str = "scale(1.02)";
/// Breakpoint of the responsive block
pub const RESPONSIVE_MAX_WIDTH: &str = "768px";

/// Options for [`to_css_text`]
#[derive(Clone, Debug, PartialEq)]
pub struct CssExportOptions {
    pub selector: String,
    pub minify: bool,
    /// Emit the `:hover` block; the config must also have hover effects on
    pub include_hover: bool,
    /// Emit `@keyframes`; the config must also have animation on
    pub include_animations: bool,
    pub include_responsive: bool,
}

impl Default for CssExportOptions {
    fn default() -> Self {
        Self {
            selector: ".card".to_string(),
            minify: false,
            include_hover: true,
            include_animations: true,
            include_responsive: false,
        }
    }
}

/// Render the computed style as a CSS stylesheet
pub fn to_css_text(
    config: &StyleConfig,
    style: &RenderableStyle,
    options: &CssExportOptions,
) -> String {
    let writer = CssWriter {
        minify: options.minify,
    };
    let selector = options.selector.as_str();
    let mut blocks = vec![writer.rule(selector, &style.declarations(), 0)];

    if options.include_hover && config.hover_effects {
        let hover = [("transform", HOVER_TRANSFORM.to_string())];
        blocks.push(writer.rule(&format!("{}:hover", selector), &hover, 0));
    }

    if options.include_animations && config.animation.enabled {
        blocks.push(writer.keyframes(&keyframes_for(config, style)));
    }

    if options.include_responsive {
        let body = [
            ("width", "100%".to_string()),
            ("max-width", px(style_width(config))),
        ];
        let inner = writer.rule(selector, &body, 1);
        blocks.push(writer.at_rule(
            &format!("@media (max-width: {})", RESPONSIVE_MAX_WIDTH),
            &[inner],
        ));
    }

    if options.minify {
        blocks.concat()
    } else {
        let mut text = blocks.join("\n\n");
        text.push('\n');
        text
    }
}

fn style_width(config: &StyleConfig) -> f64 {
    let width = config.dimensions.width;
    if width.is_finite() {
        width.max(0.0)
    } else {
        400.0
    }
}

struct CssWriter {
    minify: bool,
}

impl CssWriter {
    fn indent(&self, depth: usize) -> String {
        if self.minify {
            String::new()
        } else {
            "  ".repeat(depth)
        }
    }

    fn rule(&self, selector: &str, declarations: &[(&str, String)], depth: usize) -> String {
        let pad = self.indent(depth);
        if self.minify {
            let body: Vec<String> = declarations
                .iter()
                .map(|(name, value)| format!("{}:{}", name, value))
                .collect();
            return format!("{}{{{}}}", selector, body.join(";"));
        }

        let inner = self.indent(depth + 1);
        let mut out = format!("{}{} {{\n", pad, selector);
        for (name, value) in declarations {
            out.push_str(&format!("{}{}: {};\n", inner, name, value));
        }
        out.push_str(&pad);
        out.push('}');
        out
    }

    fn at_rule(&self, prelude: &str, children: &[String]) -> String {
        if self.minify {
            format!("{}{{{}}}", prelude, children.concat())
        } else {
            format!("{} {{\n{}\n}}", prelude, children.join("\n"))
        }
    }

    fn keyframes(&self, keyframes: &Keyframes) -> String {
        let frames: Vec<String> = keyframes
            .frames
            .iter()
            .map(|frame| {
                let separator = if self.minify { "," } else { ", " };
                let selector = frame.offsets.join(separator);
                if self.minify {
                    self.rule(&selector, &frame.declarations, 1)
                } else {
                    let body: Vec<String> = frame
                        .declarations
                        .iter()
                        .map(|(name, value)| format!("{}: {};", name, value))
                        .collect();
                    format!("{}{} {{ {} }}", self.indent(1), selector, body.join(" "))
                }
            })
            .collect();
        self.at_rule(&format!("@keyframes {}", keyframes.name), &frames)
    }
}
