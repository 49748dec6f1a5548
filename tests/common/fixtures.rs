//! Test fixtures: synthetic PNG images and config files.

use std::path::{Path, PathBuf};

use stipple::png_io;

/// Sample config with one preset per algorithm family
pub const PRESETS_YAML: &str = r#"
pool:
  max_per_bucket: 2
mask:
  size: 8
  seed: "integration"
presets:
  newsprint:
    threshold: 110
    algorithm: atkinson
  noise:
    algorithm: blue-noise
  negative:
    invert: true
"#;

/// Horizontal gray ramp from black to white, RGBA.
pub fn gradient_rgba(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .flat_map(|i| {
            let v = ((i % width) * 255 / (width - 1).max(1)) as u8;
            [v, v, v, 255]
        })
        .collect()
}

/// Write `gradient_rgba` as a PNG under `dir`.
pub fn write_gradient_png(dir: &Path, width: usize, height: usize) -> PathBuf {
    let path = dir.join("gradient.png");
    let png = png_io::encode_rgba(width, height, &gradient_rgba(width, height)).unwrap();
    std::fs::write(&path, png).unwrap();
    path
}

/// Write a solid 8-bit grayscale PNG under `dir`.
pub fn write_gray_png(dir: &Path, value: u8, width: usize, height: usize) -> PathBuf {
    let path = dir.join(format!("gray_{value}.png"));
    let png = png_io::encode_gray(width, height, &vec![value; width * height]).unwrap();
    std::fs::write(&path, png).unwrap();
    path
}

/// Write the sample presets file under `dir`.
pub fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("stipple.yaml");
    std::fs::write(&path, PRESETS_YAML).unwrap();
    path
}
