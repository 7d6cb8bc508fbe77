//! Error types for the segmentation and quantization engine.

use crate::core_modules::bounding_box::BoundingBox;

/// Errors reported to the caller. Empty results (no sprites, uniform image)
/// are never errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The image has a zero dimension or its buffer does not match its size.
    #[error("invalid image: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// A region does not fit inside the image it is applied to.
    #[error("region {bbox:?} is outside the {width}x{height} image")]
    OutOfBounds {
        bbox: BoundingBox,
        width: u32,
        height: u32,
    },

    /// Nearest-color lookup over zero entries is undefined.
    #[error("palette has no entries")]
    InvalidPalette,

    /// A parallel worker task panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
