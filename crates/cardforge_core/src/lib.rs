//! Cardforge Core
//!
//! The data side of the card style editor:
//!
//! - **Style model**: [`StyleConfig`] and its sub-configs, with editor defaults
//! - **Lenient input**: hex colors and unit-suffixed numbers that never fail
//! - **JSON document**: the stable, round-trippable JSON form of a config
//! - **Templates & palettes**: closed tables of named partial configs
//! - **Editor state**: action dispatch over a bounded undo/redo history
//! - **Saved styles**: named snapshots persisted through a storage backend
//!
//! # Example
//!
//! ```rust
//! use cardforge_core::{from_json_text, to_json_text, EditAction, EditorState, TemplateId};
//!
//! let mut editor = EditorState::default();
//! editor.dispatch(EditAction::ApplyTemplate(TemplateId::Neon)).unwrap();
//! editor
//!     .dispatch(EditAction::SetField { key: "opacity".into(), value: "80".into() })
//!     .unwrap();
//!
//! let text = to_json_text(editor.config()).unwrap();
//! assert_eq!(&from_json_text(&text).unwrap(), editor.config());
//! ```

pub mod color;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod store;
pub mod templates;
pub mod value;

pub use color::Rgb;
pub use config::{
    AnimationConfig, AnimationKind, BorderConfig, BorderStyle, CardHeight, ColorFilter, ColorStop,
    ContentLayout, CornerRadius, Dimensions, EffectsConfig, GradientConfig, GradientKind,
    IconStyle, IterationCount, ShadowLayer, ShadowLayers, StyleConfig, TextAlign, TextContent,
    TimingCurve, TransformConfig, FALLBACK_BORDER_COLOR, FALLBACK_FILL_COLOR,
    FALLBACK_SHADOW_COLOR, FALLBACK_TEXT_COLOR, MAX_SHADOW_LAYERS,
};
pub use document::{from_json_text, to_json_text, CardStyleDocument};
pub use editor::{set_field, EditAction, EditorState, FIELD_KEYS};
pub use error::{CoreError, Result};
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use store::{
    FileStorage, MemoryStorage, SavedStyle, SavedStyleStore, StorageBackend, SAVED_STYLES_KEY,
};
pub use templates::{Palette, TemplateId, TemplatePatch, PALETTES};
pub use value::{number_or, parse_number, NumberInput};
