//! Application error types

use quill_gpu::RendererError;
use quill_platform::PlatformError;
use quill_theme::ThemeError;
use thiserror::Error;

/// Errors that stop an application from starting or running
#[derive(Error, Debug)]
pub enum AppError {
    /// The configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),

    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
