//! Stipple - monochrome dithering for PNG images
//!
//! Command-line front end for `stipple-core`.
//! This library exposes modules for integration testing.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod png_io;
