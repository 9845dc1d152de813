use thiserror::Error;

/// Font loading errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("Invalid font data: {0}")]
    InvalidFont(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
