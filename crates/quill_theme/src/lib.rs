//! Quill theme system
//!
//! Widgets read their colors and fonts from an `Arc<Theme>` they are given at
//! construction, defaulting to [`default_theme`]. Themes resolve missing
//! tokens through their parent, so a custom theme only lists what it changes.
//!
//! ```rust,ignore
//! use quill_theme::{ColorToken, Theme};
//!
//! let mut theme = Theme::derive(&quill_theme::dark());
//! theme.set_color(ColorToken::Selection, quill_paint::Color::from_hex(0x3355aa));
//! root.set_theme(&std::sync::Arc::new(theme));
//! ```

pub mod error;
pub mod file;
pub mod presets;
pub mod theme;
pub mod tokens;

pub use error::{Result, ThemeError};
pub use file::resolve_theme;
pub use presets::{dark, default_theme, light, ThemePreset};
pub use theme::Theme;
pub use tokens::{ColorToken, FontToken};
