//! Text support for Quill
//!
//! - [`FontLibrary`]: resolves font names, discovers system fonts with
//!   fontdb, measures with ttf-parser and rasterizes with swash
//! - [`TextLabel`]: cached measurement and aligned single-line drawing
//! - word boundaries for text editing

pub mod error;
pub mod face;
pub mod label;
pub mod library;
pub mod rasterizer;
pub mod word;

pub use error::{Result, TextError};
pub use face::{subpixel_phases, FontData, FontFace};
pub use label::TextLabel;
pub use library::{canonical_name, FontLibrary, GlyphProvider, CANONICAL_FONTS};
pub use rasterizer::{GlyphRasterizer, RasterizedGlyph};
pub use word::{find_word, next_word, previous_word};
