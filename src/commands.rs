//! Subcommand execution.
//!
//! Each runner takes parsed arguments plus a writer for user-facing output,
//! so integration tests can drive the CLI without spawning a process.

use std::io::Write;
use std::path::Path;

use stipple_core::{BlueNoiseMask, Ditherer};

use crate::cli::{Cli, Commands, DitherArgs, MaskArgs};
use crate::config::{Preset, StippleConfig};
use crate::error::CliError;
use crate::png_io;

/// Dispatch a parsed command line.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<(), CliError> {
    match cli.command {
        Commands::Dither(args) => run_dither(&args, out),
        Commands::Mask(args) => run_mask(&args),
        Commands::Presets { config } => run_presets(config.as_deref(), out),
    }
}

/// Dither a PNG file and write the monochrome result.
pub fn run_dither<W: Write>(args: &DitherArgs, out: &mut W) -> Result<(), CliError> {
    let config = StippleConfig::load(args.config.as_deref())?;
    let preset = match &args.preset {
        Some(name) => *config.preset(name)?,
        None => Preset::default(),
    };

    let mut options = preset.options();
    if let Some(threshold) = args.threshold {
        options.threshold = threshold;
    }
    if args.invert {
        options.invert = true;
    }
    if args.no_serpentine {
        options.serpentine = false;
    }
    let algorithm = args.algorithm.unwrap_or(preset.algorithm);

    let mut ditherer = Ditherer::new(options)
        .algorithm(algorithm)
        .pool_capacity(config.pool.max_per_bucket)
        .blue_noise(config.mask.provider()?);

    let image = png_io::read_rgba(&args.input, ditherer.pool_mut())?;
    tracing::info!(
        input = %args.input.display(),
        width = image.width,
        height = image.height,
        %algorithm,
        "Dithering image"
    );

    let mut output = ditherer.dither(&image.pixels, image.width, image.height)?;
    for _ in 1..args.repeat {
        ditherer.recycle(output);
        output = ditherer.dither(&image.pixels, image.width, image.height)?;
    }

    let png = png_io::encode_rgba(image.width, image.height, &output)?;
    std::fs::write(&args.output, &png)?;
    tracing::info!(
        output = %args.output.display(),
        bytes = png.len(),
        "Wrote dithered image"
    );

    ditherer.recycle(output);
    ditherer.recycle(image.pixels);

    if args.stats {
        let stats = serde_json::to_string_pretty(&ditherer.pool().stats())?;
        writeln!(out, "{stats}")?;
    }
    Ok(())
}

/// Write the blue noise mask as an 8-bit grayscale PNG.
pub fn run_mask(args: &MaskArgs) -> Result<(), CliError> {
    let config = StippleConfig::load(args.config.as_deref())?;
    let mut mask_config = config.mask;
    if let Some(size) = args.size {
        mask_config.size = size;
    }
    if let Some(seed) = &args.seed_text {
        mask_config.seed = Some(seed.clone());
    }

    let provider = mask_config.provider()?;
    let mask = provider.mask();
    let png = png_io::encode_gray(mask.size(), mask.size(), &mask_levels(&mask))?;
    std::fs::write(&args.output, &png)?;
    tracing::info!(
        output = %args.output.display(),
        size = provider.size(),
        seed = provider.seed(),
        "Wrote blue noise mask"
    );
    Ok(())
}

/// Mask ranks scaled linearly onto 0..=255.
pub fn mask_levels(mask: &BlueNoiseMask) -> Vec<u8> {
    let max = (mask.size() * mask.size()).saturating_sub(1).max(1) as u64;
    mask.ranks()
        .iter()
        .map(|&rank| (u64::from(rank) * 255 / max) as u8)
        .collect()
}

/// Print every configured preset, one per line.
pub fn run_presets<W: Write>(config: Option<&Path>, out: &mut W) -> Result<(), CliError> {
    let config = StippleConfig::load(config)?;
    if config.presets.is_empty() {
        writeln!(out, "No presets configured")?;
        return Ok(());
    }
    for (name, preset) in &config.presets {
        writeln!(
            out,
            "{name}: algorithm={} threshold={} invert={} serpentine={}",
            preset.algorithm, preset.threshold, preset.invert, preset.serpentine
        )?;
    }
    Ok(())
}
