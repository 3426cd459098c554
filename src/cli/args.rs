//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{CharacterSet, Kernel, ThresholdChoice};
use crate::raster::{RasterOptions, Zoom, MAX_BRIGHTNESS};

/// Parse and validate zoom factor (> 0)
fn parse_zoom(s: &str) -> Result<f64, String> {
    let zoom: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(format!("Zoom must be a positive number, got {}", zoom));
    }
    Ok(zoom)
}

/// Parse and validate brightness percentage (0-199)
fn parse_brightness(s: &str) -> Result<u32, String> {
    let level: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid brightness", s))?;
    if level > MAX_BRIGHTNESS {
        return Err(format!(
            "Brightness must be between 0 and {}, got {}",
            MAX_BRIGHTNESS, level
        ));
    }
    Ok(level)
}

/// Parse and validate dither factor (0.0-1.0)
fn parse_dither(s: &str) -> Result<f64, String> {
    let factor: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=1.0).contains(&factor) {
        return Err(format!(
            "Dither factor must be between 0.0 and 1.0, got {}",
            factor
        ));
    }
    Ok(factor)
}

/// Render an image as braille, block or ASCII characters
#[derive(Parser, Debug)]
#[command(name = "termdots")]
#[command(version, about = "Render images as text in the terminal", long_about = None)]
#[command(subcommand_negates_reqs = true)]
#[command(
    after_help = "The terminal size can be forced with TERM_RCWH=<rows>x<cols>[x<width>x<height>]."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input image, or "-" to read an image (or a path to one) from stdin
    #[arg(required = true, value_name = "FILE")]
    pub input: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,

    /// Print debug information to stderr
    #[arg(short, long)]
    pub debug: bool,

    /// Never print more rows than the terminal has
    #[arg(short = 'y', long)]
    pub crop_y: bool,

    /// Zoom factor relative to terminal pixels
    #[arg(short, long, value_name = "FACTOR", value_parser = parse_zoom, conflicts_with = "fit_x")]
    pub zoom: Option<f64>,

    /// Scale the image to the terminal width
    #[arg(short = 'x', long)]
    pub fit_x: bool,

    /// Invert output (for light terminals)
    #[arg(short = 'v', long)]
    pub invert: bool,

    /// Sharpen edges; repeat for more strength
    #[arg(short = 'a', long, action = ArgAction::Count)]
    pub sharpen: u8,

    /// Disable bilinear sampling
    #[arg(short = 'A', long)]
    pub aliasing: bool,

    /// Brightness in percent (0-199)
    #[arg(short, long, value_name = "LEVEL", value_parser = parse_brightness)]
    pub brightness: Option<u32>,

    /// Error diffusion factor (0.0-1.0); bare flag means 1.0
    #[arg(
        short = 'e',
        long,
        value_name = "FACTOR",
        num_args = 0..=1,
        default_missing_value = "1.0",
        value_parser = parse_dither
    )]
    pub dither: Option<f64>,

    /// Dither kernel
    #[arg(short = 'D', long = "dmethod", value_name = "KERNEL", conflicts_with = "floyd")]
    pub kernel: Option<Kernel>,

    /// Shorthand for --dmethod floyd-steinberg
    #[arg(long)]
    pub floyd: bool,

    /// Threshold mode
    #[arg(short = 'm', long, value_name = "MODE")]
    pub threshold: Option<ThresholdChoice>,

    /// Argument for the threshold mode
    #[arg(short = 't', long, value_name = "NUM")]
    pub threshold_arg: Option<u32>,

    /// Output character set
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Layer the command-line flags over `options` (usually from the config file).
    pub fn apply(&self, options: &mut RasterOptions) {
        if self.fit_x {
            options.zoom = Zoom::FitWidth;
        } else if let Some(zoom) = self.zoom {
            options.zoom = Zoom::Factor(zoom);
        }
        if self.invert {
            options.invert = true;
        }
        if self.crop_y {
            options.crop_y = true;
        }
        if self.aliasing {
            options.interpolate = false;
        }
        if self.sharpen > 0 {
            options.sharpen = self.sharpen;
        }
        if let Some(brightness) = self.brightness {
            options.brightness = brightness;
        }
        if let Some(dither) = self.dither {
            options.dither = dither;
        }
        if self.floyd {
            options.kernel = Kernel::FloydSteinberg.into();
        } else if let Some(kernel) = self.kernel {
            options.kernel = kernel.into();
        }
        if let Some(threshold) = self.threshold {
            options.threshold = threshold.into();
        }
        if self.threshold_arg.is_some() {
            options.threshold_arg = self.threshold_arg;
        }
        if let Some(charset) = self.charset {
            options.charset = charset.into();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Charset, DitherKernel, ThresholdMode};

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["termdots", "cat.png"]);
        assert_eq!(args.input.as_deref(), Some("cat.png"));
        assert!(args.output.is_none());
        assert!(!args.force);
        assert!(!args.debug);
        assert!(!args.crop_y);
        assert!(args.zoom.is_none());
        assert!(!args.fit_x);
        assert!(!args.invert);
        assert_eq!(args.sharpen, 0);
        assert!(!args.aliasing);
        assert!(args.brightness.is_none());
        assert!(args.dither.is_none());
        assert!(args.kernel.is_none());
        assert!(args.threshold.is_none());
        assert!(args.charset.is_none());
        assert!(args.config.is_none());
        assert!(args.command.is_none());
    }

    #[test]
    fn test_args_input_required() {
        assert!(Args::try_parse_from(["termdots"]).is_err());
    }

    #[test]
    fn test_args_stdin_input() {
        let args = Args::parse_from(["termdots", "-"]);
        assert_eq!(args.input.as_deref(), Some("-"));
    }

    #[test]
    fn test_args_zoom() {
        let args = Args::parse_from(["termdots", "-z", "2.5", "a.png"]);
        assert_eq!(args.zoom, Some(2.5));

        assert!(Args::try_parse_from(["termdots", "-z", "0", "a.png"]).is_err());
        assert!(Args::try_parse_from(["termdots", "-z", "-1", "a.png"]).is_err());
        assert!(Args::try_parse_from(["termdots", "-z", "big", "a.png"]).is_err());
    }

    #[test]
    fn test_args_zoom_conflicts_with_fit() {
        assert!(Args::try_parse_from(["termdots", "-z", "2", "-x", "a.png"]).is_err());
    }

    #[test]
    fn test_args_brightness_range() {
        let args = Args::parse_from(["termdots", "-b", "150", "a.png"]);
        assert_eq!(args.brightness, Some(150));

        assert!(Args::try_parse_from(["termdots", "-b", "200", "a.png"]).is_err());
    }

    #[test]
    fn test_args_dither_optional_value() {
        let args = Args::parse_from(["termdots", "a.png", "-e"]);
        assert_eq!(args.dither, Some(1.0));

        let args = Args::parse_from(["termdots", "--dither", "0.5", "a.png"]);
        assert_eq!(args.dither, Some(0.5));

        assert!(Args::try_parse_from(["termdots", "-e", "1.5", "a.png"]).is_err());
    }

    #[test]
    fn test_args_sharpen_count() {
        let args = Args::parse_from(["termdots", "-aaa", "a.png"]);
        assert_eq!(args.sharpen, 3);
    }

    #[test]
    fn test_args_kernel_values() {
        let args = Args::parse_from(["termdots", "-D", "atkinson", "a.png"]);
        assert_eq!(args.kernel, Some(Kernel::Atkinson));

        let args = Args::parse_from(["termdots", "--dmethod", "floyd-steinberg", "a.png"]);
        assert_eq!(args.kernel, Some(Kernel::FloydSteinberg));

        assert!(Args::try_parse_from(["termdots", "-D", "atkinson", "--floyd", "a.png"]).is_err());
    }

    #[test]
    fn test_args_threshold_values() {
        let args = Args::parse_from(["termdots", "-m", "percentile", "-t", "30", "a.png"]);
        assert_eq!(args.threshold, Some(ThresholdChoice::Percentile));
        assert_eq!(args.threshold_arg, Some(30));

        let args = Args::parse_from(["termdots", "--threshold", "const", "a.png"]);
        assert_eq!(args.threshold, Some(ThresholdChoice::Const));

        assert!(Args::try_parse_from(["termdots", "-m", "otsu", "a.png"]).is_err());
    }

    #[test]
    fn test_args_charset_values() {
        let args = Args::parse_from(["termdots", "--charset", "blocks", "a.png"]);
        assert_eq!(args.charset, Some(CharacterSet::Blocks));

        let args = Args::parse_from(["termdots", "--charset", "ascii", "a.png"]);
        assert_eq!(args.charset, Some(CharacterSet::Ascii));
    }

    #[test]
    fn test_args_config_option() {
        let args = Args::parse_from(["termdots", "--config", "/tmp/config.toml", "a.png"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));

        let args = Args::parse_from(["termdots", "-c", "/tmp/test.toml", "a.png"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn test_args_config_show_subcommand() {
        let args = Args::parse_from(["termdots", "config", "show"]);
        assert!(args.input.is_none());
        match args.command {
            Some(Command::Config {
                action: ConfigAction::Show,
            }) => (),
            _ => panic!("Expected Config Show subcommand"),
        }
    }

    #[test]
    fn test_args_config_init_subcommand() {
        let args = Args::parse_from(["termdots", "config", "init"]);
        match args.command {
            Some(Command::Config {
                action: ConfigAction::Init,
            }) => (),
            _ => panic!("Expected Config Init subcommand"),
        }
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::parse_from([
            "termdots",
            "-x",
            "-v",
            "-y",
            "-A",
            "-aa",
            "-b",
            "80",
            "-e",
            "0.75",
            "--floyd",
            "-m",
            "median",
            "--charset",
            "ascii",
            "a.png",
        ]);
        let mut options = RasterOptions::default();
        args.apply(&mut options);

        assert_eq!(options.zoom, Zoom::FitWidth);
        assert!(options.invert);
        assert!(options.crop_y);
        assert!(!options.interpolate);
        assert_eq!(options.sharpen, 2);
        assert_eq!(options.brightness, 80);
        assert_eq!(options.dither, 0.75);
        assert_eq!(options.kernel, DitherKernel::FloydSteinberg);
        assert_eq!(options.threshold, ThresholdMode::Median);
        assert_eq!(options.charset, Charset::Ascii);
    }

    #[test]
    fn test_apply_keeps_config_values() {
        let args = Args::parse_from(["termdots", "a.png"]);
        let mut options = RasterOptions {
            brightness: 120,
            dither: 0.5,
            charset: Charset::Blocks,
            threshold_arg: Some(20),
            ..Default::default()
        };
        let before = options.clone();
        args.apply(&mut options);
        assert_eq!(options, before);
    }
}
