//! Unified error type for the stipple-core public API.
//!
//! Every variant is a contract violation by the caller. Degenerate but valid
//! parameters (out-of-range thresholds, empty images) never produce an error.

use thiserror::Error;

/// Unified error type for the stipple-core public API.
///
/// # Example
///
/// ```
/// use stipple_core::{DitherError, RgbaImage};
///
/// let pixels = [0u8; 7];
/// let err = RgbaImage::new(&pixels, 1, 2).unwrap_err();
/// assert!(matches!(err, DitherError::LengthMismatch { expected: 8, actual: 7 }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DitherError {
    /// Pixel buffer length does not match `width * height * 4`.
    #[error("pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// `width * height * 4` does not fit in `usize`.
    #[error("image dimensions overflow: {width}x{height}")]
    DimensionOverflow { width: usize, height: usize },

    /// A pool buffer of zero bytes was requested.
    #[error("buffer size must be positive")]
    ZeroSizedBuffer,

    /// A blue noise mask was requested with an unusable edge length.
    #[error("invalid blue noise mask size: {0}")]
    InvalidMaskSize(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = DitherError::LengthMismatch {
            expected: 16,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "pixel buffer length mismatch: expected 16 bytes, got 12"
        );
    }

    #[test]
    fn test_dimension_overflow_message() {
        let err = DitherError::DimensionOverflow {
            width: usize::MAX,
            height: 2,
        };
        assert!(err.to_string().starts_with("image dimensions overflow"));
    }

    #[test]
    fn test_zero_sized_buffer_message() {
        assert_eq!(
            DitherError::ZeroSizedBuffer.to_string(),
            "buffer size must be positive"
        );
    }

    #[test]
    fn test_invalid_mask_size_message() {
        assert_eq!(
            DitherError::InvalidMaskSize(0).to_string(),
            "invalid blue noise mask size: 0"
        );
    }
}
