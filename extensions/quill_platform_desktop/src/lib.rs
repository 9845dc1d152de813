//! Quill Desktop Platform
//!
//! Windowing and input for macOS, Windows, and Linux.

pub mod event_loop;
pub mod input;
pub mod window;

pub use event_loop::{DesktopEvent, DesktopEventLoop, WakeProxy};
pub use window::DesktopWindow;
