// SPDX-License-Identifier: MIT
//
// Unified error types for the utilbox engine.

use thiserror::Error;

/// Top-level error type for all utilbox operations.
#[derive(Debug, Error)]
pub enum UtilboxError {
    // -- Image errors --
    #[error("invalid image input: {0}")]
    InvalidImageInput(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- PDF errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- QR errors --
    #[error("QR encoding failed: {0}")]
    QrError(String),

    // -- Conversion errors --
    #[error("no conversion path from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    // -- Resource bounds --
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("image of {pixels} pixels exceeds the {limit} pixel limit")]
    ImageTooLarge { pixels: u64, limit: u64 },

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UtilboxError>;
