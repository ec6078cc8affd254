//! Core error types

use std::io;
use thiserror::Error;

/// Errors raised by the editor state, saved-style store and document codec
#[derive(Error, Debug)]
pub enum CoreError {
    /// IO error from a storage backend
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON document could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `SetField` was given a key that names no config field
    #[error("Unknown style field: {0}")]
    UnknownField(String),

    /// Template id not in the template table
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Palette id not in the palette table
    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    /// Saving a style requires a non-blank name
    #[error("Style name must not be empty")]
    EmptyStyleName,

    /// No saved style with the given id
    #[error("No saved style with id {0}")]
    StyleNotFound(i64),
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
