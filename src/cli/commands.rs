//! Handlers for rendering an image and for config actions.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::args::{Args, ConfigAction};
use crate::config::{self, Config, ConfigError};
use crate::raster::{self, RasterError};
use crate::source::{self, SourceError};
use crate::terminal::{self, GeometryError};

/// Errors surfaced to the user by the command handlers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("no input image given")]
    MissingInput,

    #[error("output file {} already exists! set option --force to overwrite", .0.display())]
    OutputExists(PathBuf),

    #[error("failed to write output '{path}': {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config file already exists: {} (use 'termdots config show' to view it)", .0.display())]
    ConfigExists(PathBuf),
}

/// Render the input image and write the lines to stdout or `--output`.
pub fn render(args: &Args) -> Result<(), CliError> {
    let input = args.input.as_deref().ok_or(CliError::MissingInput)?;

    let config = Config::load(args.config.as_deref())?;
    let mut options = config.raster_options()?;
    args.apply(&mut options);
    options.validate()?;

    if let Some(path) = &args.output {
        if path.exists() && !args.force {
            return Err(CliError::OutputExists(path.clone()));
        }
    }

    let image = source::load(input)?;
    let geometry = terminal::detect()?;
    let lines = raster::rasterize(&image, &geometry, &options)?;
    log::debug!("rendered {} lines", lines.len());

    match &args.output {
        Some(path) => write_file(path, &lines),
        None => {
            let stdout = std::io::stdout();
            write_lines(&mut stdout.lock(), &lines).map_err(|e| CliError::Output {
                path: "<stdout>".to_string(),
                source: e,
            })
        }
    }
}

fn write_file(path: &Path, lines: &[String]) -> Result<(), CliError> {
    let to_error = |e| CliError::Output {
        path: path.display().to_string(),
        source: e,
    };
    let file = std::fs::File::create(path).map_err(to_error)?;
    let mut writer = std::io::BufWriter::new(file);
    write_lines(&mut writer, lines).map_err(to_error)?;
    log::debug!("wrote output to {}", path.display());
    Ok(())
}

/// Write each line followed by a newline.
pub fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), CliError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(config_path.as_path()))?;
            let options = config.raster_options()?;

            println!("Current configuration:");
            println!("  Threshold: {}", options.threshold);
            match options.threshold_arg {
                Some(arg) => println!("  Threshold arg: {}", arg),
                None => println!("  Threshold arg: default"),
            }
            println!("  Charset: {}", options.charset);
            println!("  Kernel: {}", options.kernel);
            println!("  Dither: {}", options.dither);
            println!("  Brightness: {}%", options.brightness);
            println!(
                "  Interpolate: {}",
                if options.interpolate { "yes" } else { "no" }
            );
            println!("  Invert: {}", if options.invert { "yes" } else { "no" });
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            init_config(&config_path)?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}

/// Write the default config to `path`, refusing to overwrite.
pub fn init_config(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::ConfigExists(path.to_path_buf()));
    }

    let to_error = |e| {
        CliError::Config(ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, config::DEFAULT_CONFIG).map_err(to_error)
}
