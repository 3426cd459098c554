//! Configuration file handling for termdots.
//!
//! Loads render defaults from `~/.config/termdots/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::raster::{Charset, DitherKernel, RasterError, RasterOptions, ThresholdMode};

/// Configuration file structure for termdots.
/// Loaded from ~/.config/termdots/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[render]` table. Every key is optional; missing keys keep the built-in default.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    pub threshold: Option<String>,
    pub threshold_arg: Option<u32>,
    pub charset: Option<String>,
    pub kernel: Option<String>,
    pub dither: Option<f64>,
    pub brightness: Option<u32>,
    pub interpolate: Option<bool>,
    pub invert: Option<bool>,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Render options with config values layered over the built-in defaults.
    ///
    /// Unknown names are reported here, before any image is touched.
    pub fn raster_options(&self) -> Result<RasterOptions, RasterError> {
        let render = &self.render;
        let mut options = RasterOptions::default();

        if let Some(name) = &render.threshold {
            options.threshold = name.parse::<ThresholdMode>()?;
        }
        if let Some(name) = &render.charset {
            options.charset = name.parse::<Charset>()?;
        }
        if let Some(name) = &render.kernel {
            options.kernel = name.parse::<DitherKernel>()?;
        }
        if render.threshold_arg.is_some() {
            options.threshold_arg = render.threshold_arg;
        }
        if let Some(dither) = render.dither {
            options.dither = dither;
        }
        if let Some(brightness) = render.brightness {
            options.brightness = brightness;
        }
        if let Some(interpolate) = render.interpolate {
            options.interpolate = interpolate;
        }
        if let Some(invert) = render.invert {
            options.invert = invert;
        }

        Ok(options)
    }
}

/// Commented default config written by `termdots config init`.
pub const DEFAULT_CONFIG: &str = r#"# termdots configuration

[render]
# Threshold mode: const, extrema, median, percentile, local
threshold = "local"
# Argument for the threshold mode (const: 0-255, percentile: 0-99,
# local: blur radius, 0 = derived from image size)
# threshold_arg = 0
# Character set: braille, blocks, ascii
charset = "braille"
# Dither kernel: atkinson, floyd-steinberg
kernel = "atkinson"
# Error preservation factor (0.0 disables dithering)
dither = 0.0
# Brightness adjustment in percent
brightness = 100
# Bilinear sampling
interpolate = true
# Invert output
invert = false
"#;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("termdots").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/termdots/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        let options = config.raster_options().unwrap();
        assert_eq!(options, RasterOptions::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_render_values_applied() {
        let config: Config = toml::from_str(
            r#"
            [render]
            threshold = "percentile"
            threshold_arg = 30
            charset = "blocks"
            kernel = "floyd-steinberg"
            dither = 0.5
            brightness = 120
            interpolate = false
            invert = true
            "#,
        )
        .unwrap();
        let options = config.raster_options().unwrap();
        assert_eq!(options.threshold, ThresholdMode::Percentile);
        assert_eq!(options.threshold_arg, Some(30));
        assert_eq!(options.charset, Charset::Blocks);
        assert_eq!(options.kernel, DitherKernel::FloydSteinberg);
        assert_eq!(options.dither, 0.5);
        assert_eq!(options.brightness, 120);
        assert!(!options.interpolate);
        assert!(options.invert);
    }

    #[test]
    fn test_unknown_charset_is_error() {
        let config: Config = toml::from_str("[render]\ncharset = \"hieroglyphs\"\n").unwrap();
        assert!(matches!(
            config.raster_options(),
            Err(RasterError::UnknownCharset(_))
        ));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        assert!(toml::from_str::<Config>("[render]\ncolour = true\n").is_err());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("termdots/config.toml"));
    }
}
