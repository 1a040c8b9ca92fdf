//! Error types for the drawing engine and its front-end collaborators

use thiserror::Error;

/// Errors raised by pixelpad
#[derive(Error, Debug)]
pub enum PadError {
    /// The display surface could not be created or cannot be drawn to
    #[error("display surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Grid or surface geometry that would produce an empty grid
    #[error("invalid grid geometry: {0}")]
    InvalidGeometry(String),

    /// Reading or writing a config/snapshot file failed
    #[error("config I/O failed for '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config or snapshot JSON could not be (de)serialized
    #[error("config JSON error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// The snapshot publisher could not reach its broker
    #[error("publish failed: {0}")]
    Publish(String),

    /// The remote control socket could not be set up
    #[error("control socket error: {0}")]
    Control(String),

    /// Presenting the surface to a window failed
    #[error("present failed: {0}")]
    Present(String),
}

/// Result type for pixelpad operations
pub type Result<T> = std::result::Result<T, PadError>;
