//! Glyph rasterization using swash
//!
//! Produces single-channel coverage bitmaps for the glyph atlas. Glyphs can
//! be rendered at a horizontal sub-pixel offset so that text keeps its
//! fractional positions without a bitmap per exact position.

use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Format, Vector};

use crate::face::FontFace;

/// Rasterized glyph bitmap with placement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterizedGlyph {
    /// Coverage, one byte per pixel, rows top to bottom
    pub bitmap: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the left edge
    pub left: i32,
    /// Offset from the baseline up to the top edge
    pub top: i32,
    /// Horizontal advance to the next pen position
    pub advance: f32,
}

impl RasterizedGlyph {
    /// A glyph without pixels, such as a space or a missing character
    pub fn empty(advance: f32) -> Self {
        Self {
            advance,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Glyph rasterizer using swash
pub struct GlyphRasterizer {
    scale_context: ScaleContext,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        Self {
            scale_context: ScaleContext::new(),
        }
    }

    /// Rasterize `c` shifted right by `x_offset` pixels (in `[0, 1)`)
    ///
    /// Characters the font has no glyph for come back empty with zero advance.
    pub fn rasterize(&mut self, face: &FontFace, c: char, x_offset: f32) -> RasterizedGlyph {
        let data = face.data();
        let Some(font) = swash::FontRef::from_index(data.bytes(), data.index() as usize) else {
            tracing::warn!("swash could not read font data");
            return RasterizedGlyph::empty(0.0);
        };
        let glyph_id = font.charmap().map(c);
        if glyph_id == 0 {
            return RasterizedGlyph::empty(0.0);
        }
        let advance = face.char_advance(c);

        let mut scaler = self
            .scale_context
            .builder(font)
            .size(face.size())
            .build();

        let image = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ])
        .format(Format::Alpha)
        .offset(Vector::new(x_offset, 0.0))
        .render(&mut scaler, glyph_id);

        match image {
            Some(img) => {
                let bitmap = match img.content {
                    // color glyphs are drawn as their coverage
                    Content::Color => img.data.chunks_exact(4).map(|px| px[3]).collect(),
                    Content::SubpixelMask => img.data.chunks_exact(4).map(|px| px[1]).collect(),
                    Content::Mask => img.data,
                };
                RasterizedGlyph {
                    bitmap,
                    width: img.placement.width,
                    height: img.placement.height,
                    left: img.placement.left,
                    top: img.placement.top,
                    advance,
                }
            }
            None => RasterizedGlyph::empty(advance),
        }
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_glyph() {
        let g = RasterizedGlyph::empty(4.0);
        assert!(g.is_empty());
        assert_eq!(g.advance, 4.0);
    }
}
