//! Crate-wide error types.
//!
//! Each concern gets its own `thiserror`-derived enum; [`Error`] composes them
//! so callers (chiefly the CLI) can propagate with a single `?` chain.

use thiserror::Error as ThisError;

/// Errors raised while resolving tape geometry.
#[derive(Debug, ThisError)]
pub enum GeometryError {
    #[error("unknown tape id: {0:?}")]
    UnknownTape(String),
    #[error(
        "image is too tall for tape {tape:?}: {image_height} px does not fit in {usable} usable px"
    )]
    ImageTooTall {
        tape: String,
        image_height: u32,
        usable: u32,
    },
    #[error(
        "image height {image_height} does not exactly fill the usable height {usable} for tape {tape:?}; pass center=true or rescale"
    )]
    GeometryMismatch {
        tape: String,
        image_height: u32,
        usable: u32,
    },
}

/// Errors raised while decoding a captured command stream or status frame.
#[derive(Debug, ThisError)]
pub enum DecodeError {
    #[error("unexpected end of stream at offset {offset}, expected {expected} more byte(s)")]
    Truncated { offset: usize, expected: usize },
    #[error("unknown opcode 0x{opcode:02X} at offset {offset}")]
    UnknownOpcode { offset: usize, opcode: u8 },
    #[error("status frame must be exactly 32 bytes, got {0}")]
    WrongStatusLength(usize),
}

/// The crate-level error type.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("unknown compression token: {0:?}")]
    UnknownCompression(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to decode PNG: {0}")]
    Png(#[from] png::DecodingError),

    #[error("failed to write PNG: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("unsupported PNG color type: {0:?}")]
    UnsupportedPngColor(png::ColorType),
}

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;
