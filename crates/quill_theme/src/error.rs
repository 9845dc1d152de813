//! Theme error types

use thiserror::Error;

/// Errors raised while loading theme files
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The file is not valid TOML or has the wrong shape
    #[error("Theme parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to read a theme file
    #[error("Theme file could not be read: {0}")]
    Io(#[from] std::io::Error),

    /// A color value is not `#rrggbb` or `#rrggbbaa`
    #[error("Invalid color for '{token}': {value}")]
    InvalidColor { token: String, value: String },

    /// Unknown color or font key, or unknown parent preset
    #[error("Unknown theme key: {0}")]
    UnknownToken(String),
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
