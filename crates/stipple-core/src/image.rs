//! Validated RGBA input and the luminance field derived from it.

use crate::api::DitherError;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Rec. 601 luma weights for R, G and B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// A borrowed row-major RGBA8 pixel buffer with known dimensions.
///
/// Construction is the only place the length contract is checked, so every
/// algorithm that takes an `RgbaImage` can index without re-validating.
#[derive(Debug, Clone, Copy)]
pub struct RgbaImage<'a> {
    pixels: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> RgbaImage<'a> {
    /// Wrap `pixels` as a `width`×`height` RGBA image.
    ///
    /// Fails with [`DitherError::LengthMismatch`] unless
    /// `pixels.len() == width * height * 4`.
    pub fn new(pixels: &'a [u8], width: usize, height: usize) -> Result<Self, DitherError> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(DitherError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length in bytes of the RGBA output for this image.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// One luma value per pixel, alpha ignored.
    pub fn luminance(&self) -> Vec<f32> {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|px| {
                LUMA_WEIGHTS[0] * f32::from(px[0])
                    + LUMA_WEIGHTS[1] * f32::from(px[1])
                    + LUMA_WEIGHTS[2] * f32::from(px[2])
            })
            .collect()
    }
}

/// `width * height * 4`, or [`DitherError::DimensionOverflow`].
pub fn buffer_len(width: usize, height: usize) -> Result<usize, DitherError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(DitherError::DimensionOverflow { width, height })
}

/// Write a luminance field into an RGBA buffer as opaque gray.
///
/// Values are clamped to `[0, 255]` and rounded.
pub(crate) fn write_gray(field: &[f32], out: &mut [u8]) {
    for (value, px) in field.iter().zip(out.chunks_exact_mut(CHANNELS)) {
        let v = value.clamp(0.0, 255.0).round() as u8;
        px[0] = v;
        px[1] = v;
        px[2] = v;
        px[3] = 255;
    }
}
