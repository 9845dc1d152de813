//! Quill Application Framework
//!
//! Opens a window, runs the frame loop and draws with the GPU renderer.
//!
//! # Example
//!
//! ```ignore
//! use quill_app::{init_logging, App, AppConfig};
//! use quill_widgets::{Label, Root};
//!
//! fn main() -> quill_app::Result<()> {
//!     let config = AppConfig::load("quill.toml")?;
//!     init_logging(&config.log_filter);
//!
//!     App::new(Root::new(Label::new("Hello Quill!")))
//!         .with_config(config)
//!         .run()
//! }
//! ```

mod app;
pub mod config;
mod error;
mod logging;
pub mod session;

pub use app::{App, Prepared};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use logging::init_logging;
pub use session::{FrameOutput, Session};
