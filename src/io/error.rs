//! Error types for grid access, map loading and synthesizer misuse

use std::fmt;
use std::path::PathBuf;

/// Main error type for all wall synthesis operations
///
/// Recoverable search outcomes (no buildings, exhausted frontier, too many
/// segments) are not errors; they are reported through
/// [`RunStatus::Failed`](crate::algorithm::synthesizer::RunStatus::Failed).
#[derive(Debug)]
pub enum WallError {
    /// Coordinate lies outside the grid rectangle
    OutOfBounds {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Grid width
        width: usize,
        /// Grid height
        height: usize,
    },

    /// Operation is not legal in the synthesizer's current state
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the synthesizer was in
        state: &'static str,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Text map could not be parsed
    MapParse {
        /// One-based line number of the offending row
        line: usize,
        /// Description of the problem
        reason: String,
    },

    /// Source data doesn't meet requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Failed to load a map image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for WallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "Cell ({x}, {y}) is outside the {width}x{height} grid"
                )
            }
            Self::InvalidState { operation, state } => {
                write!(f, "Cannot {operation} while the synthesizer is {state}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MapParse { line, reason } => {
                write!(f, "Invalid map at line {line}: {reason}")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for WallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for wall synthesis results
pub type Result<T> = std::result::Result<T, WallError>;

impl From<image::ImageError> for WallError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for WallError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> WallError {
    WallError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an out-of-bounds error for a grid of the given size
pub const fn out_of_bounds(x: usize, y: usize, width: usize, height: usize) -> WallError {
    WallError::OutOfBounds {
        x,
        y,
        width,
        height,
    }
}

/// Create an error for a filesystem path that cannot be used as a target
pub fn io_error(msg: &str) -> WallError {
    WallError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}
