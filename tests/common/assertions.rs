//! Assertion helpers for tests.

use std::path::Path;

use pretty_assertions::assert_eq;
use stipple::png_io::{self, DecodedImage};
use stipple_core::BufferPool;

/// Decode a PNG file written by the CLI
pub fn read_png(path: &Path) -> DecodedImage {
    let mut pool = BufferPool::new();
    png_io::read_rgba(path, &mut pool)
        .unwrap_or_else(|e| panic!("Expected readable PNG at {}: {e}", path.display()))
}

/// Assert every pixel is opaque black or opaque white
pub fn assert_binary(image: &DecodedImage) {
    for (i, px) in image.pixels.chunks_exact(4).enumerate() {
        assert!(
            px[0] == 0 || px[0] == 255,
            "Pixel {i} has non-binary level {}",
            px[0]
        );
        assert_eq!(px[0], px[1], "Pixel {i} channels differ");
        assert_eq!(px[1], px[2], "Pixel {i} channels differ");
        assert_eq!(px[3], 255, "Pixel {i} is not opaque");
    }
}

/// Fraction of white pixels
pub fn white_ratio(image: &DecodedImage) -> f64 {
    let total = image.pixels.len() / 4;
    let white = image.pixels.chunks_exact(4).filter(|px| px[0] == 255).count();
    white as f64 / total as f64
}
