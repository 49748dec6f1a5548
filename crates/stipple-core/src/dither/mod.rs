//! Monochrome dithering algorithms.
//!
//! # Algorithms
//!
//! - **Error diffusion** ([`ErrorDiffusion`]): thresholds pixels in scan
//!   order and pushes the quantization error onto unvisited neighbors.
//!   Floyd-Steinberg is the default kernel; Atkinson, Sierra Lite and
//!   Jarvis-Judice-Ninke are also available.
//! - **Ordered** ([`OrderedDither`]): compares each pixel against a blue
//!   noise mask cell. Fully independent per pixel.
//!
//! # Architecture
//!
//! All algorithms implement the [`Dither`] trait and read a validated
//! [`RgbaImage`]. Output is always RGBA with equal color channels set to
//! one of the two levels from [`DitherOptions::levels`] and alpha 255.
//!
//! # Example
//!
//! ```
//! use stipple_core::{diffuse, DitherOptions, RgbaImage};
//!
//! let pixels = [255u8, 255, 255, 255, 0, 0, 0, 255];
//! let image = RgbaImage::new(&pixels, 2, 1).unwrap();
//! let out = diffuse(&image, &DitherOptions::new().serpentine(false));
//! assert_eq!(out, pixels);
//! ```

mod error_diffusion;
mod kernel;
mod options;
mod ordered;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error_diffusion::{diffuse, diffuse_into, diffuse_with_kernel, ErrorDiffusion};
pub use kernel::*;
pub use options::{DitherOptions, DEFAULT_THRESHOLD};
pub use ordered::{ordered_dither, OrderedDither};

use crate::api::DitherError;
use crate::image::RgbaImage;

/// Trait for monochrome dithering algorithms.
///
/// Implementors provide [`dither_pass`](Self::dither_pass) over an output
/// buffer whose length has already been checked; the provided methods own
/// the length contract.
pub trait Dither {
    /// Dither `image` into `out`, which is exactly `image.byte_len()` long.
    fn dither_pass(&self, image: &RgbaImage<'_>, options: &DitherOptions, out: &mut [u8]);

    /// Dither `image` into a caller-provided buffer.
    ///
    /// Fails with [`DitherError::LengthMismatch`] unless `out` is exactly as
    /// long as the image's RGBA buffer.
    fn dither_into(
        &self,
        image: &RgbaImage<'_>,
        options: &DitherOptions,
        out: &mut [u8],
    ) -> Result<(), DitherError> {
        check_output_len(image, out)?;
        self.dither_pass(image, options, out);
        Ok(())
    }

    /// Dither `image` into a newly allocated RGBA buffer.
    fn dither(&self, image: &RgbaImage<'_>, options: &DitherOptions) -> Vec<u8> {
        let mut out = vec![0u8; image.byte_len()];
        self.dither_pass(image, options, &mut out);
        out
    }
}

/// Fail with [`DitherError::LengthMismatch`] unless `out` fits `image`.
pub(crate) fn check_output_len(image: &RgbaImage<'_>, out: &[u8]) -> Result<(), DitherError> {
    if out.len() != image.byte_len() {
        return Err(DitherError::LengthMismatch {
            expected: image.byte_len(),
            actual: out.len(),
        });
    }
    Ok(())
}

/// Dither algorithm selection for the [`Ditherer`](crate::Ditherer) facade
/// and configuration files.
///
/// # Example
///
/// ```
/// use stipple_core::Algorithm;
///
/// let algorithm: Algorithm = "blue-noise".parse().unwrap();
/// assert_eq!(algorithm, Algorithm::BlueNoise);
/// assert_eq!(algorithm.to_string(), "blue-noise");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Floyd-Steinberg error diffusion (100% propagation).
    #[default]
    FloydSteinberg,

    /// Atkinson error diffusion (75% propagation).
    Atkinson,

    /// Sierra Lite error diffusion (3 neighbors).
    SierraLite,

    /// Jarvis-Judice-Ninke error diffusion (12 neighbors over 3 rows).
    JarvisJudiceNinke,

    /// Ordered dithering against the blue noise mask.
    BlueNoise,
}

impl Algorithm {
    /// All algorithms, in display order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::FloydSteinberg,
        Algorithm::Atkinson,
        Algorithm::SierraLite,
        Algorithm::JarvisJudiceNinke,
        Algorithm::BlueNoise,
    ];

    /// Diffusion kernel, or `None` for ordered dithering.
    pub fn kernel(self) -> Option<Kernel> {
        match self {
            Algorithm::FloydSteinberg => Some(FLOYD_STEINBERG),
            Algorithm::Atkinson => Some(ATKINSON),
            Algorithm::SierraLite => Some(SIERRA_LITE),
            Algorithm::JarvisJudiceNinke => Some(JARVIS_JUDICE_NINKE),
            Algorithm::BlueNoise => None,
        }
    }

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::FloydSteinberg => "floyd-steinberg",
            Algorithm::Atkinson => "atkinson",
            Algorithm::SierraLite => "sierra-lite",
            Algorithm::JarvisJudiceNinke => "jarvis-judice-ninke",
            Algorithm::BlueNoise => "blue-noise",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dither algorithm '{0}'")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == needle)
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_floyd_steinberg() {
        assert_eq!(Algorithm::default(), Algorithm::FloydSteinberg);
        assert_eq!(Algorithm::default().kernel(), Some(FLOYD_STEINBERG));
    }

    #[test]
    fn test_names_round_trip_through_parse() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Floyd-Steinberg".parse(), Ok(Algorithm::FloydSteinberg));
        assert_eq!(" ATKINSON ".parse(), Ok(Algorithm::Atkinson));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "bayer".parse::<Algorithm>().unwrap_err();
        assert_eq!(err.to_string(), "unknown dither algorithm 'bayer'");
    }

    #[test]
    fn test_serde_names_match_display() {
        for algorithm in Algorithm::ALL {
            let json = serde_json::to_string(&algorithm).unwrap();
            assert_eq!(json, format!("\"{algorithm}\""));
        }
    }

    #[test]
    fn test_only_blue_noise_has_no_kernel() {
        for algorithm in Algorithm::ALL {
            assert_eq!(
                algorithm.kernel().is_none(),
                algorithm == Algorithm::BlueNoise
            );
        }
    }

    /// Writes the pixel index into the red channel.
    struct IndexPass;

    impl Dither for IndexPass {
        fn dither_pass(&self, _: &RgbaImage<'_>, _: &DitherOptions, out: &mut [u8]) {
            for (i, px) in out.chunks_exact_mut(4).enumerate() {
                px[0] = i as u8;
            }
        }
    }

    #[test]
    fn test_dither_into_checks_length_before_pass() {
        let pixels = [0u8; 8];
        let image = RgbaImage::new(&pixels, 2, 1).unwrap();
        let mut short = [9u8; 4];
        let err = IndexPass
            .dither_into(&image, &DitherOptions::new(), &mut short)
            .unwrap_err();
        assert_eq!(
            err,
            DitherError::LengthMismatch {
                expected: 8,
                actual: 4
            }
        );
        assert_eq!(short, [9u8; 4], "pass must not run on a rejected buffer");
    }

    #[test]
    fn test_provided_dither_allocates_full_image() {
        let pixels = [0u8; 12];
        let image = RgbaImage::new(&pixels, 3, 1).unwrap();
        let out = IndexPass.dither(&image, &DitherOptions::new());
        assert_eq!(out.len(), 12);
        assert_eq!(out[8], 2);
    }

    #[test]
    fn test_check_output_len() {
        let pixels = [0u8; 8];
        let image = RgbaImage::new(&pixels, 2, 1).unwrap();
        assert!(check_output_len(&image, &[0u8; 8]).is_ok());
        assert!(check_output_len(&image, &[0u8; 4]).is_err());
    }
}
