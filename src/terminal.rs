//! Terminal geometry detection.
//!
//! Resolution order:
//! 1. `TERM_RCWH` environment variable, `RxC` or `RxCxWxH`
//! 2. `TIOCGWINSZ` on stdout, then stdin
//! 3. a fixed fallback
//!
//! Terminals that report no pixel size get one synthesised from the
//! character grid (9x19 pixels per cell).

use crate::raster::TermGeometry;

/// Environment variable that forces a terminal size.
pub const TERM_RCWH_VAR: &str = "TERM_RCWH";

/// Geometry used when nothing can be detected.
pub const FALLBACK_GEOMETRY: TermGeometry = TermGeometry {
    rows: 53,
    cols: 53,
    width_px: 477,
    height_px: 1007,
};

/// Errors from a malformed `TERM_RCWH` value.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("wrong number of values in TERM_RCWH: '{0}' (expected RxC or RxCxWxH)")]
    WrongArity(String),

    #[error("invalid number '{value}' in TERM_RCWH: '{raw}'")]
    InvalidNumber { value: String, raw: String },

    #[error("TERM_RCWH must not contain zero dimensions: '{0}'")]
    ZeroDimension(String),
}

/// Parse a `RxC` or `RxCxWxH` geometry string.
pub fn parse_rcwh(raw: &str) -> Result<TermGeometry, GeometryError> {
    let values = raw
        .trim()
        .split('x')
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| GeometryError::InvalidNumber {
                value: v.to_string(),
                raw: raw.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let geometry = match values[..] {
        [r, c] => TermGeometry::from_chars(r, c),
        [r, c, w, h] => TermGeometry::new(r, c, w, h),
        _ => return Err(GeometryError::WrongArity(raw.to_string())),
    };
    if geometry.validate().is_err() {
        return Err(GeometryError::ZeroDimension(raw.to_string()));
    }
    Ok(geometry)
}

/// Detect the geometry of the controlling terminal.
///
/// Only a malformed `TERM_RCWH` is an error; detection failures fall
/// through to [`FALLBACK_GEOMETRY`].
pub fn detect() -> Result<TermGeometry, GeometryError> {
    if let Ok(raw) = std::env::var(TERM_RCWH_VAR) {
        if !raw.is_empty() {
            log::debug!("got fixed terminal size from {}: {}", TERM_RCWH_VAR, raw);
            return parse_rcwh(&raw);
        }
    }

    for (name, fd) in [("stdout", 1), ("stdin", 0)] {
        match query_window_size(fd) {
            Some(geometry) => {
                log::debug!(
                    "terminal size from {}: {}x{} characters, {}x{} px",
                    name,
                    geometry.cols,
                    geometry.rows,
                    geometry.width_px,
                    geometry.height_px
                );
                return Ok(geometry);
            }
            None => log::debug!("could not determine terminal size for {}", name),
        }
    }

    log::debug!("falling back to default terminal geometry");
    Ok(FALLBACK_GEOMETRY)
}

#[cfg(unix)]
fn query_window_size(fd: i32) -> Option<TermGeometry> {
    // SAFETY: winsize is plain old data and TIOCGWINSZ only writes into it.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };
    if rc != 0 || ws.ws_row == 0 || ws.ws_col == 0 {
        return None;
    }

    let (rows, cols) = (ws.ws_row as u32, ws.ws_col as u32);
    if ws.ws_xpixel == 0 || ws.ws_ypixel == 0 {
        log::debug!("window size made up based on terminal size");
        return Some(TermGeometry::from_chars(rows, cols));
    }
    Some(TermGeometry::new(
        rows,
        cols,
        ws.ws_xpixel as u32,
        ws.ws_ypixel as u32,
    ))
}

#[cfg(not(unix))]
fn query_window_size(_fd: i32) -> Option<TermGeometry> {
    None
}
