//! Loader Error Handling
//!
//! This module provides the error types for the Dreamcast RAM loader using
//! `thiserror`.
//!
//! # Error Categories
//! - **Recognition errors**: the image is not a Dreamcast RAM dump
//! - **Interaction errors**: the user declined the load-address chooser
//! - **Database errors**: the host rejected a segment or mapping
//! - **Port config errors**: the embedded I/O port resource is malformed

use thiserror::Error;

/// Loader error types.
///
/// Uses `thiserror` for typed errors with detailed messages. The CLI wraps
/// these in `anyhow` for context chaining.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The file is not an accepted RAM dump size.
    ///
    /// Recognition accepts exactly 16 MiB and 32 MiB images; everything else
    /// is rejected without side effects.
    #[error("unrecognized image: {size} bytes is not a Dreamcast RAM dump (expected 16 MiB or 32 MiB)\nSuggestion: {suggestion}")]
    UnrecognizedImage { size: u64, suggestion: String },

    /// The user cancelled the load-address chooser.
    ///
    /// The load is aborted; any rollback of already-written peripheral
    /// segments is the host's concern.
    #[error("Loading was canceled!")]
    Cancelled,

    /// The host refused to create a segment.
    #[error("segment conflict: {name} [0x{start:08X}, 0x{end:08X}) overlaps an existing segment")]
    SegmentConflict { name: String, start: u32, end: u32 },

    /// A requested load base is not one of the fixed RAM window candidates.
    #[error("invalid load base 0x{base:08X}\nSuggestion: {suggestion}")]
    InvalidLoadBase { base: u32, suggestion: String },

    /// A file mapping fell outside the segment it targets.
    #[error("mapping [0x{start:08X}, 0x{end:08X}) does not fit any segment")]
    MappingOutOfRange { start: u32, end: u32 },

    /// The embedded I/O port resource could not be parsed.
    #[error("port config error ({device}, line {line}): {message}")]
    PortConfig {
        device: String,
        line: usize,
        message: String,
    },

    /// The requested device has no section in the port resource.
    #[error("no I/O port table for device {device}")]
    UnknownDevice { device: String },

    /// Underlying I/O error while reading the image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoaderError {
    /// Create a recognition error for a rejected file size.
    pub fn unrecognized(size: u64) -> Self {
        Self::UnrecognizedImage {
            size,
            suggestion: "Check that the file is a full RAM dump, not a trimmed or padded one."
                .to_string(),
        }
    }

    /// Create an invalid-base error listing the accepted candidates.
    pub fn invalid_base(base: u32, candidates: &[u32]) -> Self {
        let list = candidates
            .iter()
            .map(|c| format!("0x{c:08X}"))
            .collect::<Vec<_>>()
            .join(", ");
        Self::InvalidLoadBase {
            base,
            suggestion: format!("Pick one of the fixed RAM windows: {list}."),
        }
    }
}
