//! Image loading from a file or stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::raster::PixelBuffer;

/// Input name that reads from stdin.
pub const STDIN_NAME: &str = "-";

/// Errors that can occur while loading the input image.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read image from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("failed to decode image '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

/// Load `input` as a luminance buffer. `-` reads stdin.
pub fn load(input: &str) -> Result<PixelBuffer, SourceError> {
    let image = if input == STDIN_NAME {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(SourceError::Stdin)?;
        load_stdin_bytes(&bytes)?
    } else {
        open(Path::new(input))?
    };
    log::debug!("image dimensions: {}x{}", image.width(), image.height());
    Ok(PixelBuffer::from_image(&image))
}

/// Decode an image file.
pub fn open(path: &Path) -> Result<DynamicImage, SourceError> {
    log::debug!("input file: {}", path.display());
    let bytes = std::fs::read(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode(&bytes, &path.display().to_string())
}

/// Interpret stdin contents.
///
/// Stdin may carry either a path to an image (as UTF-8 text) or the image
/// bytes themselves; a readable path wins.
pub fn load_stdin_bytes(bytes: &[u8]) -> Result<DynamicImage, SourceError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        let candidate = Path::new(text.trim());
        if !text.trim().is_empty() && candidate.is_file() {
            return open(candidate);
        }
    }
    decode(bytes, "<stdin>")
}

fn decode(bytes: &[u8], name: &str) -> Result<DynamicImage, SourceError> {
    image::load_from_memory(bytes).map_err(|e| SourceError::Decode {
        name: name.to_string(),
        source: e,
    })
}
