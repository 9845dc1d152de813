//! Quill paint layer
//!
//! Geometry and color primitives, font and icon contracts, and the draw
//! command [`Buffer`] that components render into.

pub mod buffer;
pub mod color;
pub mod command;
pub mod font;
pub mod geometry;
pub mod icon;
pub mod image;

pub use buffer::Buffer;
pub use color::Color;
pub use command::{Command, CommandList};
pub use font::{snap_font_size, FixedFontLookup, FixedMetrics, Font, FontLookup, FontMetrics};
pub use geometry::{Point, Rect};
pub use icon::IconLookup;
pub use self::image::{ImageHandle, ImageId, WeakImage};
