//! stipple-core: monochrome dithering for still frames
//!
//! This library turns RGBA pixel buffers into two-level output with error
//! diffusion or blue noise ordered dithering, and keeps the supporting
//! pieces (seeded noise, mask construction, buffer reuse) explicit and
//! owned rather than global.
//!
//! # Quick Start
//!
//! The [`Ditherer`] builder is the primary entry point:
//!
//! ```
//! use stipple_core::{DitherOptions, Ditherer};
//!
//! let mut ditherer = Ditherer::new(DitherOptions::new());
//! let pixels = [255u8, 255, 255, 255, 0, 0, 0, 255];
//! let out = ditherer.dither(&pixels, 2, 1).unwrap();
//! assert_eq!(out, pixels);
//! ```
//!
//! # Direct API
//!
//! Every stage is usable on its own:
//!
//! - [`SeededRng`] / [`hash_to_seed`]: reproducible uniform noise
//! - [`BlueNoiseMask`] / [`BlueNoise`]: farthest-point threshold masks
//! - [`diffuse`], [`diffuse_with_kernel`], [`ordered_dither`]: the passes
//! - [`BufferPool`]: exact-size buffer reuse with RAII [`Lease`]s
//!
//! # Pipeline
//!
//! ```text
//! RGBA bytes  (caller, possibly from BufferPool::acquire)
//!     |
//!     v
//! RgbaImage::new        (length contract checked once)
//!     |
//!     v
//! luminance field       (0.299 R + 0.587 G + 0.114 B, f32)
//!     |
//!     +---> error diffusion   (threshold, push error to unvisited neighbors)
//!     |
//!     +---> ordered dither    (compare against BlueNoiseMask cell)
//!     |
//!     v
//! RGBA bytes  (R = G = B in {low, high}, A = 255)
//! ```
//!
//! # Concurrency
//!
//! Nothing here locks. [`BufferPool`] and [`Ditherer`] take `&mut self` for
//! every mutation, so the borrow checker enforces a single writer; parallel
//! workers each own one. Built masks are immutable and shared via `Arc`.

pub mod api;
pub mod blue_noise;
pub mod dither;
pub mod image;
pub mod pool;
pub mod rng;


pub use api::{DitherError, Ditherer};
pub use blue_noise::{
    BlueNoise, BlueNoiseMask, BLUE_NOISE_SEED, BLUE_NOISE_SIZE, MAX_BLUE_NOISE_SIZE,
};
pub use dither::{
    diffuse, diffuse_into, diffuse_with_kernel, ordered_dither, Algorithm, Dither,
    DitherOptions, ErrorDiffusion, Kernel, OrderedDither, ParseAlgorithmError, ATKINSON,
    FLOYD_STEINBERG, JARVIS_JUDICE_NINKE, SIERRA_LITE,
};
pub use image::{buffer_len, RgbaImage};
pub use pool::{BufferPool, Lease, PoolStats, DEFAULT_MAX_PER_BUCKET};
pub use rng::{hash_to_seed, SeededRng};
