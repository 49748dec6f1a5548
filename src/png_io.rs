//! PNG decoding to pooled RGBA8 buffers and encoding of dithered output.

use std::io::{Cursor, Read};
use std::path::Path;

use stipple_core::{buffer_len, BufferPool};

use crate::error::CliError;

/// An RGBA8 image whose pixel buffer came from a [`BufferPool`].
#[derive(Debug)]
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

/// Decode a PNG of any color type and bit depth into RGBA8.
///
/// Palette and low bit depth images are expanded and 16-bit channels are
/// stripped to 8 bits before conversion. The returned buffer is acquired from
/// `pool`; release it there when done.
pub fn decode_rgba<R: Read>(reader: R, pool: &mut BufferPool) -> Result<DecodedImage, CliError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut raw = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut raw)?;
    let raw = &raw[..info.buffer_size()];

    let width = info.width as usize;
    let height = info.height as usize;
    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(CliError::UnsupportedPng(
                "indexed color was not expanded".to_string(),
            ))
        }
    };
    if info.bit_depth != png::BitDepth::Eight {
        return Err(CliError::UnsupportedPng(format!(
            "bit depth {:?} after expansion",
            info.bit_depth
        )));
    }

    let len = buffer_len(width, height)?;
    let mut pixels = pool.acquire(len)?;

    let row_len = width * channels;
    let rows = raw.chunks_exact(info.line_size).take(height);
    for (src_row, dst_row) in rows.zip(pixels.chunks_exact_mut(width * 4)) {
        for (src, dst) in src_row[..row_len]
            .chunks_exact(channels)
            .zip(dst_row.chunks_exact_mut(4))
        {
            let rgba = match *src {
                [g] => [g, g, g, 255],
                [g, a] => [g, g, g, a],
                [r, g, b] => [r, g, b, 255],
                [r, g, b, a] => [r, g, b, a],
                _ => continue,
            };
            dst.copy_from_slice(&rgba);
        }
    }

    tracing::debug!(width, height, channels, "Decoded PNG");
    Ok(DecodedImage {
        width,
        height,
        pixels,
    })
}

/// Read and decode a PNG file.
pub fn read_rgba(path: &Path, pool: &mut BufferPool) -> Result<DecodedImage, CliError> {
    let file = std::fs::File::open(path)?;
    decode_rgba(std::io::BufReader::new(file), pool)
}

/// Encode RGBA8 pixels as a PNG.
pub fn encode_rgba(width: usize, height: usize, pixels: &[u8]) -> Result<Vec<u8>, CliError> {
    encode(width, height, png::ColorType::Rgba, pixels)
}

/// Encode 8-bit grayscale pixels as a PNG.
pub fn encode_gray(width: usize, height: usize, pixels: &[u8]) -> Result<Vec<u8>, CliError> {
    encode(width, height, png::ColorType::Grayscale, pixels)
}

fn encode(
    width: usize,
    height: usize,
    color_type: png::ColorType,
    pixels: &[u8],
) -> Result<Vec<u8>, CliError> {
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(CliError::UnsupportedPng(format!(
            "dimensions {width}x{height} exceed PNG limits"
        )));
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, w, h);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Best);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels)?;
    }
    Ok(buf.into_inner())
}
