//! Blue noise ordered dithering.
//!
//! Every pixel is compared against the mask cell it falls on, independent of
//! its neighbors. There is no error propagation and no scan direction, so
//! `serpentine` is ignored and the pattern tiles with the mask.
//!
//! The user threshold shifts luminance before the comparison: 128 is
//! neutral, lower values brighten the result and higher values darken it.

use crate::blue_noise::BlueNoiseMask;
use crate::image::{RgbaImage, CHANNELS};

use super::{Dither, DitherOptions, DEFAULT_THRESHOLD};

/// Ordered dithering against a blue noise mask.
#[derive(Debug, Clone, Copy)]
pub struct OrderedDither<'m>(pub &'m BlueNoiseMask);

impl Dither for OrderedDither<'_> {
    fn dither_pass(&self, image: &RgbaImage<'_>, options: &DitherOptions, out: &mut [u8]) {
        threshold_pass(image, self.0, options, out);
    }
}

/// Ordered dithering into a new monochrome RGBA buffer.
pub fn ordered_dither(
    image: &RgbaImage<'_>,
    mask: &BlueNoiseMask,
    options: &DitherOptions,
) -> Vec<u8> {
    OrderedDither(mask).dither(image, options)
}

fn threshold_pass(
    image: &RgbaImage<'_>,
    mask: &BlueNoiseMask,
    options: &DitherOptions,
    out: &mut [u8],
) {
    let cells = (mask.size() * mask.size()) as f32;
    let (low, high) = options.levels();
    let bias = DEFAULT_THRESHOLD - options.threshold;
    let width = image.width();

    for (idx, (luma, px)) in image
        .luminance()
        .into_iter()
        .zip(out.chunks_exact_mut(CHANNELS))
        .enumerate()
    {
        let x = (idx % width) as i64;
        let y = (idx / width) as i64;
        // Cell centers keep pure black and pure white solid
        let cell = (mask.rank(x, y) as f32 + 0.5) / cells;
        let value = (luma + bias) / 255.0;
        let level = if value > cell { high } else { low };
        px[0] = level;
        px[1] = level;
        px[2] = level;
        px[3] = 255;
    }
}
