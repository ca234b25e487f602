//! Error types for icon generation, encoding and persistence.
//!
//! The procedural renderer itself has no error path; everything here belongs
//! to the edges of the crate (input validation, the remote collaborator,
//! encoders and the library store).

use thiserror::Error;

// ============================================================================
// Input Validation
// ============================================================================

/// Errors raised while building an [`IconSpec`](crate::IconSpec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// A color string was not a 6-digit `#rrggbb` value.
    #[error("invalid hex color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// The requested export size is outside the supported range.
    #[error("icon size {size} is outside the supported range {min}..={max}")]
    SizeOutOfRange { size: u32, min: u32, max: u32 },
}

// ============================================================================
// Generation
// ============================================================================

/// Failures of the remote image-generation path.
///
/// Only [`RateLimited`](Self::RateLimited) and
/// [`QuotaExceeded`](Self::QuotaExceeded) are meant for the user;
/// [`RemoteGenerationFailed`](Self::RemoteGenerationFailed) is recovered by
/// falling back to the procedural renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Network error, unexpected status, or a malformed response body.
    #[error("remote generation failed: {0}")]
    RemoteGenerationFailed(String),

    /// The remote service answered 429.
    #[error("Rate limit exceeded. Please try again later. ({0})")]
    RateLimited(String),

    /// The remote service answered 402.
    #[error("Usage limit reached. Please add credits to continue. ({0})")]
    QuotaExceeded(String),
}

impl GenerationError {
    /// Returns true if the caller should fall back to the procedural renderer
    /// instead of reporting this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RemoteGenerationFailed(_))
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Errors raised while producing PNG or ICO bytes, or decoding a source image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Zero-sized images cannot be encoded.
    #[error("cannot encode an empty image")]
    EmptyImage,

    /// The export size is outside `MIN_ICON_SIZE..=MAX_ICON_SIZE`.
    #[error("export size {size} is outside the supported range {min}..={max}")]
    SizeOutOfRange { size: u32, min: u32, max: u32 },

    /// The pixel buffer does not hold `size * size` RGBA pixels.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for a {size}x{size} image")]
    BufferSize {
        size: u32,
        expected: usize,
        actual: usize,
    },

    /// The source image is not square.
    #[error("source image is {width}x{height}, icons must be square")]
    NotSquare { width: u32, height: u32 },

    /// The source could not be read as an image.
    #[error("unreadable source image: {0}")]
    UnreadableSource(String),

    /// The underlying image codec failed.
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// Writing the output buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Library
// ============================================================================

/// Errors raised by the saved-icon library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The stored list could not be (de)serialized.
    #[error("library serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Icons are saved under a non-blank name.
    #[error("icon name must not be blank")]
    BlankName,

    /// The backing store rejected the operation.
    #[error("library store error: {0}")]
    Store(String),
}
