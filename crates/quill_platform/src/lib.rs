//! Quill Platform Abstraction
//!
//! What a windowing backend has to provide to run a Quill application:
//!
//! - [`EventLoop`] and [`Window`]: the native loop and its window
//! - [`PlatformEvent`] and [`InputEvent`]: events in Quill's terms
//! - [`InputRouter`]: mouse grab and click rules applied to the input state
//! - [`ClipboardSync`]: the system clipboard mirrored into the state
//!
//! Backends live in their own crates, such as `quill_platform_desktop`.

pub mod clipboard;
pub mod error;
pub mod event;
pub mod input;
pub mod window;

pub use clipboard::{ClipboardBackend, ClipboardSync, SystemClipboard};
pub use error::{PlatformError, Result};
pub use event::{ControlFlow, EventLoop, InputEvent, PlatformEvent};
pub use input::{ClickCounter, InputRouter, MULTI_CLICK_DISTANCE, MULTI_CLICK_INTERVAL};
pub use window::{Window, WindowConfig};
