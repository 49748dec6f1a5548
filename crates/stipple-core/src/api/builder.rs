//! Ditherer builder -- the primary ergonomic entry point for the crate.
//!
//! [`Ditherer`] owns one blue noise provider and one buffer pool, so repeated
//! passes (frames, preview re-renders) share the mask and recycle output
//! buffers instead of allocating.

use crate::blue_noise::BlueNoise;
use crate::dither::{Algorithm, Dither, DitherOptions, ErrorDiffusion, OrderedDither};
use crate::image::RgbaImage;
use crate::pool::BufferPool;

use super::DitherError;

/// High-level dithering service.
///
/// # Design
///
/// - Configuration methods consume and return `self` (standard builder pattern)
/// - [`dither()`](Self::dither) takes `&mut self` because it draws output
///   buffers from the owned pool; hand them back with
///   [`recycle()`](Self::recycle) once displayed
/// - The blue noise mask is only built if an ordered algorithm runs
///
/// # Example
///
/// ```
/// use stipple_core::{Algorithm, DitherOptions, Ditherer};
///
/// let mut ditherer = Ditherer::new(DitherOptions::new().threshold(100.0))
///     .algorithm(Algorithm::Atkinson)
///     .pool_capacity(2);
///
/// let frame = [90u8, 90, 90, 255].repeat(16);
/// let out = ditherer.dither(&frame, 4, 4).unwrap();
/// assert_eq!(out.len(), frame.len());
/// ditherer.recycle(out);
///
/// let again = ditherer.dither(&frame, 4, 4).unwrap();
/// assert_eq!(ditherer.pool().stats().reused, 1);
/// # ditherer.recycle(again);
/// ```
#[derive(Debug, Default)]
pub struct Ditherer {
    options: DitherOptions,
    algorithm: Algorithm,
    blue_noise: BlueNoise,
    pool: BufferPool,
}

impl Ditherer {
    /// Create a ditherer using Floyd-Steinberg, the default 64×64 mask and a
    /// default-capacity pool.
    pub fn new(options: DitherOptions) -> Self {
        Self {
            options,
            algorithm: Algorithm::default(),
            blue_noise: BlueNoise::new(),
            pool: BufferPool::new(),
        }
    }

    /// Set the dithering algorithm.
    #[inline]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the number of buffers the pool retains per size.
    #[inline]
    pub fn pool_capacity(mut self, max_per_bucket: usize) -> Self {
        self.pool.configure(max_per_bucket);
        self
    }

    /// Replace the blue noise provider (custom size or seed).
    #[inline]
    pub fn blue_noise(mut self, blue_noise: BlueNoise) -> Self {
        self.blue_noise = blue_noise;
        self
    }

    /// Replace the options between passes, e.g. after a threshold change.
    pub fn set_options(&mut self, options: DitherOptions) {
        self.options = options;
    }

    #[inline]
    pub fn options(&self) -> &DitherOptions {
        &self.options
    }

    #[inline]
    pub fn selected_algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[inline]
    pub fn blue_noise_provider(&self) -> &BlueNoise {
        &self.blue_noise
    }

    #[inline]
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    #[inline]
    pub fn pool_mut(&mut self) -> &mut BufferPool {
        &mut self.pool
    }

    /// Dither raw RGBA pixels into a pooled monochrome RGBA buffer.
    ///
    /// Fails with [`DitherError::LengthMismatch`] when `pixels` does not
    /// hold exactly `width * height` RGBA pixels. A zero-sized image yields
    /// an empty buffer. If the pass fails the pooled buffer is returned to
    /// the pool before the error propagates.
    pub fn dither(
        &mut self,
        pixels: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, DitherError> {
        let image = RgbaImage::new(pixels, width, height)?;
        if image.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(width, height, algorithm = %self.algorithm, "Dithering frame");

        let mut output = self.pool.lease(image.byte_len())?;
        match self.algorithm.kernel() {
            Some(kernel) => {
                ErrorDiffusion(kernel).dither_into(&image, &self.options, &mut output)?;
            }
            None => {
                let mask = self.blue_noise.mask();
                OrderedDither(&mask).dither_into(&image, &self.options, &mut output)?;
            }
        }
        Ok(output.into_inner())
    }

    /// Hand an output buffer back for reuse by later passes.
    pub fn recycle(&mut self, buffer: Vec<u8>) {
        self.pool.release(buffer);
    }
}
