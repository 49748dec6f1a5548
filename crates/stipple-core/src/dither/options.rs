//! Dithering options and configuration.
//!
//! This module provides the [`DitherOptions`] value object shared by every
//! algorithm in the crate.

use serde::{Deserialize, Serialize};

/// Neutral threshold in the middle of the 8-bit range.
pub const DEFAULT_THRESHOLD: f32 = 128.0;

/// Configuration options for dithering.
///
/// # Defaults
///
/// - Threshold: 128 (middle gray)
/// - Invert: disabled (dark input produces black output)
/// - Serpentine scanning: enabled (eliminates directional artifacts)
///
/// # Example
///
/// ```
/// use stipple_core::DitherOptions;
///
/// let options = DitherOptions::new()
///     .threshold(100.0)
///     .serpentine(false);
/// assert_eq!(options.levels(), (0, 255));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherOptions {
    /// Luminance at or above which a pixel becomes the high level.
    ///
    /// Values outside `[0, 255]` are accepted. Any negative threshold makes
    /// every pixel high and any threshold above `255` (or NaN) makes every
    /// pixel low, so output is not continuous at the range edges. A black
    /// row at `0.0` diffuses to one high pixel followed by low ones, while
    /// the same row at `-0.01` is entirely high.
    ///
    /// Default: `128.0`
    pub threshold: f32,

    /// Swap the output levels so bright input becomes black.
    ///
    /// Default: `false`
    pub invert: bool,

    /// Enable serpentine scanning (alternating row direction).
    ///
    /// When enabled, odd rows are processed right-to-left and the diffusion
    /// kernel is horizontally flipped. This eliminates the diagonal "worm"
    /// artifacts of pure left-to-right diffusion. Ordered dithering ignores it.
    ///
    /// Default: `true`
    pub serpentine: bool,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            invert: false,
            serpentine: true,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the luminance threshold.
    #[inline]
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set output inversion.
    #[inline]
    pub fn invert(mut self, enabled: bool) -> Self {
        self.invert = enabled;
        self
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    /// `(low, high)` output levels: below-threshold and at-or-above.
    #[inline]
    pub fn levels(&self) -> (u8, u8) {
        if self.invert {
            (255, 0)
        } else {
            (0, 255)
        }
    }
}
