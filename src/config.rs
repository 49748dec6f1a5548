use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use stipple_core::{
    hash_to_seed, Algorithm, BlueNoise, DitherError, DitherOptions, BLUE_NOISE_SEED,
    BLUE_NOISE_SIZE, DEFAULT_MAX_PER_BUCKET,
};

use crate::error::CliError;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV: &str = "STIPPLE_CONFIG";

/// Stipple configuration loaded from a YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StippleConfig {
    /// Buffer pool settings
    pub pool: PoolConfig,

    /// Blue noise mask settings
    pub mask: MaskConfig,

    /// Named dither presets
    pub presets: BTreeMap<String, Preset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Buffers retained per size bucket
    pub max_per_bucket: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_per_bucket: DEFAULT_MAX_PER_BUCKET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Mask edge length in pixels
    pub size: usize,

    /// Seed text, hashed into the generator seed
    pub seed: Option<String>,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            size: BLUE_NOISE_SIZE,
            seed: None,
        }
    }
}

impl MaskConfig {
    /// Generator seed: the hashed seed text, or the fixed default.
    pub fn seed_value(&self) -> u32 {
        self.seed.as_deref().map_or(BLUE_NOISE_SEED, hash_to_seed)
    }

    /// Unbuilt provider for this mask.
    pub fn provider(&self) -> Result<BlueNoise, DitherError> {
        BlueNoise::with_params(self.size, self.seed_value())
    }
}

/// A named set of dither settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub threshold: f32,
    pub invert: bool,
    pub serpentine: bool,
    pub algorithm: Algorithm,
}

impl Default for Preset {
    fn default() -> Self {
        let options = DitherOptions::default();
        Self {
            threshold: options.threshold,
            invert: options.invert,
            serpentine: options.serpentine,
            algorithm: Algorithm::default(),
        }
    }
}

impl Preset {
    pub fn options(&self) -> DitherOptions {
        DitherOptions::new()
            .threshold(self.threshold)
            .invert(self.invert)
            .serpentine(self.serpentine)
    }
}

impl StippleConfig {
    /// Config path from the flag, falling back to `STIPPLE_CONFIG`.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Load configuration, using defaults when no file is configured or the
    /// configured file does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = Self::resolve_path(explicit) else {
            tracing::debug!("No config file configured, using defaults");
            return Ok(Self::default());
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_yaml(&content).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            presets = config.presets.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Look up a preset by name
    pub fn preset(&self, name: &str) -> Result<&Preset, CliError> {
        self.presets
            .get(name)
            .ok_or_else(|| CliError::UnknownPreset(name.to_string()))
    }
}
