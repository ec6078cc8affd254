//! Cardforge Style
//!
//! Pure style computation for card configs:
//!
//! - [`compute`]: config to [`RenderableStyle`], the flat CSS property bag
//! - [`to_css_text`]: stylesheet with hover, keyframes and responsive blocks
//! - [`to_utility_class_text`]: lossy utility-class approximation
//!
//! Nothing here allocates state between calls; the same config always yields
//! the same output.
//!
//! # Example
//!
//! ```rust
//! use cardforge_core::StyleConfig;
//! use cardforge_style::{compute, to_css_text, CssExportOptions};
//!
//! let config = StyleConfig::default();
//! let style = compute(&config);
//! let css = to_css_text(&config, &style, &CssExportOptions::default());
//! assert!(css.starts_with(".card {"));
//! ```

pub mod compiler;
pub mod css;
pub mod keyframes;
pub mod units;
pub mod utility;

pub use compiler::{
    compute, glass_alphas, shadow_alpha_byte, timing_function, RenderableStyle,
    GLASS_PRIMARY_ALPHA, GLASS_SECONDARY_ALPHA, SHADOW_ALPHA_SCALE,
};
pub use css::{to_css_text, CssExportOptions};
pub use keyframes::{keyframes_for, Keyframe, Keyframes};
pub use utility::{gradient_direction, to_utility_class_text};
