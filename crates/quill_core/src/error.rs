use thiserror::Error;

/// Errors from the core runtime
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("UI thread is gone, callback dropped")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, CoreError>;
