//! Error diffusion dithering over a luminance field.
//!
//! Each pixel is thresholded in scan order and the difference between its
//! (already error-adjusted) luminance and the chosen level is pushed onto
//! neighbors that have not been visited yet. Contributions that would land
//! outside the raster are dropped, so edge pixels absorb slightly less error.

use crate::api::DitherError;
use crate::image::{write_gray, RgbaImage};

use super::{Dither, DitherOptions, Kernel, FLOYD_STEINBERG};

/// Error diffusion with a fixed kernel.
///
/// # Example
///
/// ```
/// use stipple_core::{Dither, DitherOptions, ErrorDiffusion, RgbaImage, ATKINSON};
///
/// let pixels = [200u8, 200, 200, 255].repeat(4);
/// let image = RgbaImage::new(&pixels, 2, 2).unwrap();
/// let out = ErrorDiffusion(ATKINSON).dither(&image, &DitherOptions::new());
/// assert_eq!(out.len(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDiffusion(pub Kernel);

impl Default for ErrorDiffusion {
    fn default() -> Self {
        Self(FLOYD_STEINBERG)
    }
}

impl Dither for ErrorDiffusion {
    fn dither_pass(&self, image: &RgbaImage<'_>, options: &DitherOptions, out: &mut [u8]) {
        let field = diffuse_field(image, &self.0, options);
        write_gray(&field, out);
    }
}

/// Floyd-Steinberg error diffusion into a new monochrome RGBA buffer.
///
/// The input is read-only. Every output pixel has equal R, G and B set to
/// one of the two levels of `options` and an alpha of 255.
pub fn diffuse(image: &RgbaImage<'_>, options: &DitherOptions) -> Vec<u8> {
    diffuse_with_kernel(image, &FLOYD_STEINBERG, options)
}

/// Error diffusion with an arbitrary kernel into a new RGBA buffer.
pub fn diffuse_with_kernel(
    image: &RgbaImage<'_>,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    ErrorDiffusion(*kernel).dither(image, options)
}

/// Error diffusion into a caller-provided buffer (e.g. one from a pool).
pub fn diffuse_into(
    image: &RgbaImage<'_>,
    kernel: &Kernel,
    options: &DitherOptions,
    out: &mut [u8],
) -> Result<(), DitherError> {
    ErrorDiffusion(*kernel).dither_into(image, options, out)
}

/// Run the diffusion pass and return the quantized field.
fn diffuse_field(image: &RgbaImage<'_>, kernel: &Kernel, options: &DitherOptions) -> Vec<f32> {
    let width = image.width();
    let height = image.height();
    let mut field = image.luminance();

    let (low, high) = options.levels();
    let (low, high) = (f32::from(low), f32::from(high));

    // Beyond the byte range no source luminance can cross the threshold.
    // Accumulated error still could, so skip the pass entirely.
    if options.threshold < 0.0 {
        field.fill(high);
        return field;
    }
    if options.threshold.is_nan() || options.threshold > 255.0 {
        field.fill(low);
        return field;
    }

    let divisor = f32::from(kernel.divisor);

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let idx = y * width + x;

            let old = field[idx];
            let new = if old >= options.threshold { high } else { low };
            field[idx] = new;

            let error = old - new;
            if error == 0.0 {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                // Flip dx for serpentine reverse rows
                let dx = if reverse { -dx } else { dx };
                let nx = x as i64 + i64::from(dx);
                let ny = y + dy as usize;
                if nx < 0 || nx as usize >= width || ny >= height {
                    continue;
                }
                field[ny * width + nx as usize] += error * f32::from(weight) / divisor;
            }
        }
    }

    field
}
