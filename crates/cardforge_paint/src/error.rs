//! Paint error types

use std::io;
use thiserror::Error;

/// Errors raised while rasterizing or encoding a card
#[derive(Error, Debug)]
pub enum PaintError {
    /// The drawing surface could not be allocated
    #[error("Cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    /// Drawing was attempted before the surface was sized
    #[error("Canvas has no surface")]
    NoSurface,

    /// Export format name not recognized
    #[error("Unknown image format: {0}")]
    UnknownFormat(String),

    /// Image encoder failure
    #[error("Encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// IO error while writing an export file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for paint operations
pub type Result<T> = std::result::Result<T, PaintError>;
