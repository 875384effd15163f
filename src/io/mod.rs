//! Input/output operations and error handling

/// Command-line interface and batch map processing
pub mod cli;
/// Default parameters, palette and output settings
pub mod configuration;
/// Error types shared by the whole crate
pub mod error;
/// PNG map import and export
pub mod image;
/// Progress bars for batch runs
pub mod progress;
/// Animated GIF capture of a search
pub mod visualization;
