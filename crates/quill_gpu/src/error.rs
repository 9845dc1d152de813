//! Renderer errors

use thiserror::Error;

/// Error type for renderer creation and frame presentation
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("No suitable GPU adapter found")]
    AdapterNotFound,

    #[error("Failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Surface does not support this adapter")]
    SurfaceUnsupported,

    #[error("Failed to acquire surface texture: {0}")]
    SurfaceTexture(#[from] wgpu::SurfaceError),

    #[error("Shader compilation error: {0}")]
    Shader(String),
}

pub type Result<T> = std::result::Result<T, RendererError>;
