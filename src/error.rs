//! Error types for the gauge widget and its demo window

use std::path::PathBuf;

use thiserror::Error;

/// Error type for gauge operations
#[derive(Error, Debug)]
pub enum GaugeError {
    /// A config or font file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font file was read but is not a usable TrueType/OpenType font
    #[error("Not a usable font file: {}", .0.display())]
    FontParse(PathBuf),

    /// Config file is not valid TOML or has mistyped keys
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// Color string is not `#RRGGBB` or `#RRGGBBAA`
    #[error("Invalid color: {0:?} (expected #RRGGBB or #RRGGBBAA)")]
    InvalidColor(String),

    /// Event loop could not be created or exited abnormally
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation failed
    #[error("Window error: {0}")]
    Window(#[from] winit::error::OsError),

    /// Pixel surface creation or presentation failed
    #[error("Pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),
}

/// Result type for gauge operations
pub type Result<T> = std::result::Result<T, GaugeError>;
