//! RAM Dump Recognition
//!
//! This module recognizes raw SEGA Dreamcast RAM dumps. A dump carries no
//! header or magic; the only recognition signal is its exact length.
//!
//! # Accepted Images
//! - **16 MiB** (0x01000000 bytes): a dump of the stock main RAM
//! - **32 MiB** (0x02000000 bytes): a dump covering the full RAM window
//!
//! Both report the same format label ("SEGA DREAMCAST RAM") and processor
//! ("SH4"); the recognized length is kept so the load stage maps exactly the
//! bytes that exist.

use anyhow::{Context, Result};
use std::path::Path;

use super::error::LoaderError;

/// Format label reported for accepted images.
pub const FORMAT_NAME: &str = "SEGA DREAMCAST RAM";

/// Processor label reported for accepted images.
pub const PROCESSOR: &str = "SH4";

/// The two accepted dump lengths, in bytes.
pub const RAM_DUMP_SIZES: [u64; 2] = [16 * 1024 * 1024, 32 * 1024 * 1024];

/// Recognition verdict for an accepted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizedFormat {
    /// Fixed format label
    pub format_name: &'static str,
    /// Fixed target processor label
    pub processor: &'static str,
    /// Recognized image length in bytes
    pub image_len: u64,
}

/// Check whether a file of `len` bytes is an accepted RAM dump.
///
/// Returns `None` for every length other than the two accepted sizes. A
/// rejection has no side effects; this is the silent non-acceptance path.
pub fn probe(len: u64) -> Option<RecognizedFormat> {
    if !RAM_DUMP_SIZES.contains(&len) {
        return None;
    }
    Some(RecognizedFormat {
        format_name: FORMAT_NAME,
        processor: PROCESSOR,
        image_len: len,
    })
}

/// A recognized RAM dump with its bytes in memory.
#[derive(Debug, Clone)]
pub struct RamImage {
    format: RecognizedFormat,
    data: Vec<u8>,
}

impl RamImage {
    /// Wrap raw bytes as a RAM image, validating the length.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, LoaderError> {
        let format =
            probe(data.len() as u64).ok_or_else(|| LoaderError::unrecognized(data.len() as u64))?;
        Ok(Self { format, data })
    }

    /// Read a RAM dump from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read RAM dump: {}", path.display()))?;
        let image = Self::from_bytes(data)
            .with_context(|| format!("Not a Dreamcast RAM dump: {}", path.display()))?;
        log::debug!(
            "recognized {} ({} bytes) as {}",
            path.display(),
            image.len(),
            image.format.format_name
        );
        Ok(image)
    }

    /// The recognition verdict for this image.
    pub fn format(&self) -> RecognizedFormat {
        self.format
    }

    /// Image length in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// True when the image holds no bytes. Cannot happen for a recognized
    /// image; provided for the usual pairing with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw dump bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
