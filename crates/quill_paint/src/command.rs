//! Draw commands

use crate::color::Color;
use crate::font::Font;
use crate::geometry::{Point, Rect};
use crate::image::ImageHandle;

/// A single drawing operation
///
/// Coordinates are relative to the offset of the [`CommandList`] holding the command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Fill a rectangle with a solid color
    Fill { rect: Rect, color: Color },
    /// One-pixel outline along the inside of a rectangle
    Outline { rect: Rect, color: Color },
    /// A single line of text; `position` is the left end of the baseline
    Text {
        position: Point,
        text: String,
        font: Font,
        color: Color,
    },
    /// Soft drop shadow behind `rect`, blurred over `radius` pixels
    Shadow {
        rect: Rect,
        color: Color,
        radius: i32,
    },
    /// A named icon, centered in `rect` at the largest size that fits
    Icon {
        rect: Rect,
        name: String,
        color: Color,
    },
    /// A whole image stretched over `rect`
    ///
    /// `update` marks images whose pixels may change between frames.
    Image {
        rect: Rect,
        image: ImageHandle,
        color: Color,
        update: bool,
    },
    /// The `source` region of an image stretched over `rect`
    SubImage {
        rect: Rect,
        image: ImageHandle,
        source: Rect,
        color: Color,
        update: bool,
    },
}

impl Command {
    /// Short name used in logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Fill { .. } => "fill",
            Command::Outline { .. } => "outline",
            Command::Text { .. } => "text",
            Command::Shadow { .. } => "shadow",
            Command::Icon { .. } => "icon",
            Command::Image { .. } => "image",
            Command::SubImage { .. } => "sub_image",
        }
    }
}

/// Commands sharing one absolute offset and clip rectangle
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandList {
    /// Absolute position of the coordinate origin of `commands`
    pub offset: Point,
    /// Absolute clip rectangle
    pub clip: Rect,
    pub commands: Vec<Command>,
}
