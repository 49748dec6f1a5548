use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use stipple_core::Algorithm;

#[derive(Debug, Parser)]
#[command(name = "stipple")]
#[command(about = "Monochrome error diffusion and blue noise dithering for PNG images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Dither a PNG image to black and white
    Dither(DitherArgs),
    /// Render the blue noise mask as a grayscale PNG
    Mask(MaskArgs),
    /// List presets from the config file
    Presets {
        /// Config file (defaults to $STIPPLE_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct DitherArgs {
    /// Input PNG file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output PNG file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Luminance threshold (0-255, default 128)
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<f32>,

    /// Bright input becomes black
    #[arg(long)]
    pub invert: bool,

    /// Scan every row left to right
    #[arg(long)]
    pub no_serpentine: bool,

    /// Algorithm: floyd-steinberg, atkinson, sierra-lite, jarvis-judice-ninke, blue-noise
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Config file (defaults to $STIPPLE_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start from a named preset; flags override its fields
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Run the pass N times through the same buffer pool
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Print buffer pool statistics as JSON
    #[arg(long)]
    pub stats: bool,
}

#[derive(Debug, Args)]
pub struct MaskArgs {
    /// Output PNG file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Mask edge length in pixels, 1 to 256 (overrides the config)
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Seed text (overrides the config)
    #[arg(long)]
    pub seed_text: Option<String>,

    /// Config file (defaults to $STIPPLE_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
