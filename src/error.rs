use std::path::PathBuf;

use stipple_core::DitherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("Unsupported PNG: {0}")]
    UnsupportedPng(String),

    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Dither error: {0}")]
    Dither(#[from] DitherError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_unknown_preset() {
        let error = CliError::UnknownPreset("poster".to_string());
        assert_eq!(error.to_string(), "Unknown preset: poster");
    }

    #[test]
    fn test_cli_error_unsupported_png() {
        let error = CliError::UnsupportedPng("image too large".to_string());
        assert_eq!(error.to_string(), "Unsupported PNG: image too large");
    }

    #[test]
    fn test_cli_error_from_dither() {
        let error: CliError = DitherError::ZeroSizedBuffer.into();
        assert!(matches!(error, CliError::Dither(_)));
        assert_eq!(
            error.to_string(),
            "Dither error: buffer size must be positive"
        );
    }

    #[test]
    fn test_cli_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CliError = io_error.into();
        assert!(matches!(error, CliError::Io(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_cli_error_config_names_path() {
        let source = serde_yaml::from_str::<u32>("not a number").unwrap_err();
        let error = CliError::Config {
            path: PathBuf::from("stipple.yaml"),
            source,
        };
        assert!(error.to_string().starts_with("Invalid config stipple.yaml: "));
    }
}
