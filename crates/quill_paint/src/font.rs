//! Font descriptions and the font lookup contract

use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A font family name and pixel size
///
/// Fonts are plain values: commands reference them by value and the renderer
/// resolves them to faces through a [`FontLookup`].
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub name: String,
    pub size: f32,
}

impl Font {
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("default", 12.0)
    }
}

// Sizes are compared bitwise so that fonts can key hash maps.
impl Eq for Font {}

impl Hash for Font {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
    }
}

/// Measurements of a resolved font
pub trait FontMetrics {
    /// Distance from the baseline to the top of the tallest glyph
    fn ascent(&self) -> i32;
    /// Distance from the baseline to the bottom of the lowest glyph
    fn descent(&self) -> i32;
    /// Recommended distance between two baselines
    fn line_height(&self) -> i32;
    /// Horizontal advance of `text`, including kerning
    fn advance(&self, text: &str) -> f32;
    /// Byte index of the character boundary closest to the horizontal offset `x`
    fn index(&self, text: &str, x: f32) -> usize;
}

/// Resolves font descriptions to supported fonts and their metrics
pub trait FontLookup {
    /// Canonicalize a font description
    ///
    /// Must be a pure function of its argument and idempotent:
    /// `closest(&closest(f)) == closest(f)`.
    fn closest(&self, font: &Font) -> Font;

    /// Metrics for the closest supported font
    fn metrics(&self, font: &Font) -> Rc<dyn FontMetrics>;
}

/// Clamp a size to the supported range and snap it to half pixels
pub fn snap_font_size(size: f32) -> f32 {
    if !(size >= 5.0) {
        5.0
    } else if size > 72.0 {
        72.0
    } else {
        (size * 2.0 + 0.5).floor() / 2.0
    }
}

/// Deterministic metrics where every character has the same advance
///
/// Used when no font face can be loaded, and as the test font.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMetrics {
    size: f32,
}

impl FixedMetrics {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    /// Advance of a single character
    pub fn char_advance(&self) -> f32 {
        (self.size / 2.0).round()
    }
}

impl FontMetrics for FixedMetrics {
    fn ascent(&self) -> i32 {
        (self.size * 0.8).ceil() as i32
    }

    fn descent(&self) -> i32 {
        (self.size * 0.2).ceil() as i32
    }

    fn line_height(&self) -> i32 {
        (self.size * 1.2).ceil() as i32
    }

    fn advance(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_advance()
    }

    fn index(&self, text: &str, x: f32) -> usize {
        let adv = self.char_advance();
        let mut pos = 0.0;
        for (i, _) in text.char_indices() {
            if x < pos + adv / 2.0 {
                return i;
            }
            pos += adv;
        }
        text.len()
    }
}

/// A [`FontLookup`] that knows every family name and measures with [`FixedMetrics`]
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedFontLookup;

impl FontLookup for FixedFontLookup {
    fn closest(&self, font: &Font) -> Font {
        Font::new(font.name.clone(), snap_font_size(font.size))
    }

    fn metrics(&self, font: &Font) -> Rc<dyn FontMetrics> {
        Rc::new(FixedMetrics::new(snap_font_size(font.size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_font_size() {
        assert_eq!(snap_font_size(1.0), 5.0);
        assert_eq!(snap_font_size(100.0), 72.0);
        assert_eq!(snap_font_size(12.2), 12.0);
        assert_eq!(snap_font_size(12.3), 12.5);
        assert_eq!(snap_font_size(f32::NAN), 5.0);
    }

    #[test]
    fn test_fixed_lookup_closest_is_idempotent() {
        let lookup = FixedFontLookup;
        for size in [0.0, 4.9, 7.26, 12.0, 13.74, 80.0] {
            let once = lookup.closest(&Font::new("anything", size));
            assert_eq!(lookup.closest(&once), once, "size {size}");
        }
    }

    #[test]
    fn test_fixed_metrics_index() {
        let m = FixedMetrics::new(12.0);
        assert_eq!(m.char_advance(), 6.0);
        assert_eq!(m.advance("hello"), 30.0);
        assert_eq!(m.index("hello", 0.0), 0);
        assert_eq!(m.index("hello", 2.9), 0);
        assert_eq!(m.index("hello", 3.0), 1);
        assert_eq!(m.index("hello", 29.0), 5);
        assert_eq!(m.index("héllo", 9.5), 3);
    }
}
