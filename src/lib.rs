//! termdots library crate.
//!
//! Renders raster images as braille, block or ASCII text sized for the
//! current terminal. The [`raster`] module holds the pipeline; the other
//! modules load input, detect the terminal and read configuration.

pub mod cli;
pub mod config;
pub mod raster;
pub mod source;
pub mod terminal;
