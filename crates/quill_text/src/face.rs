//! A font file at one pixel size

use std::cell::RefCell;
use std::sync::Arc;

use quill_paint::FontMetrics;
use rustc_hash::FxHashMap;
use ttf_parser::{Face, GlyphId};

use crate::error::{Result, TextError};

/// Font file bytes shared between all sizes of a face
#[derive(Clone)]
pub struct FontData {
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl FontData {
    /// Validate `bytes` as a font and wrap it
    pub fn new(bytes: Vec<u8>, index: u32) -> Result<Self> {
        Face::parse(&bytes, index).map_err(|e| TextError::InvalidFont(e.to_string()))?;
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Face index inside a font collection
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Family name recorded in the font, if any
    pub fn family_name(&self) -> Option<String> {
        let face = Face::parse(&self.bytes, self.index).ok()?;
        face.names()
            .into_iter()
            .filter(|n| n.name_id == ttf_parser::name_id::FAMILY)
            .find_map(|n| n.to_string())
    }
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// A font face scaled to a pixel size
///
/// Implements [`FontMetrics`] with per-character advances and pair kerning
/// from the legacy `kern` table.
pub struct FontFace {
    data: FontData,
    size: f32,
    scale: f32,
    ascent: i32,
    descent: i32,
    line_height: i32,
    advances: RefCell<FxHashMap<char, f32>>,
}

impl FontFace {
    pub fn new(data: FontData, size: f32) -> Result<Self> {
        let face = Face::parse(data.bytes(), data.index())
            .map_err(|e| TextError::InvalidFont(e.to_string()))?;
        let scale = size / face.units_per_em() as f32;
        let ascent = (face.ascender() as f32 * scale).ceil() as i32;
        let descent = (-(face.descender() as f32) * scale).ceil() as i32;
        let height = face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32;
        let line_height = (height * scale).ceil() as i32;
        Ok(Self {
            data,
            size,
            scale,
            ascent,
            descent,
            line_height,
            advances: RefCell::new(FxHashMap::default()),
        })
    }

    pub fn data(&self) -> &FontData {
        &self.data
    }

    /// Pixel size
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Height of an atlas line holding this face's glyphs
    pub fn glyph_height(&self) -> i32 {
        self.ascent + self.descent + 1
    }

    /// Horizontal sub-pixel positions a glyph is rasterized at
    ///
    /// Larger sizes use fewer phases; the position error matters less there.
    pub fn subpixel_phases(&self) -> u32 {
        subpixel_phases(self.size)
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(self.data.bytes(), self.data.index()).ok()
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face()?.glyph_index(c).map(|g| g.0)
    }

    /// Horizontal advance of a single character, without kerning
    pub fn char_advance(&self, c: char) -> f32 {
        match self.face() {
            Some(face) => self.advance_with(&face, c),
            None => 0.0,
        }
    }

    /// Kerning adjustment between two characters
    pub fn kerning(&self, left: char, right: char) -> f32 {
        match self.face() {
            Some(face) => self.kern_with(&face, left, right),
            None => 0.0,
        }
    }

    fn advance_with(&self, face: &Face<'_>, c: char) -> f32 {
        if let Some(&adv) = self.advances.borrow().get(&c) {
            return adv;
        }
        let adv = face
            .glyph_index(c)
            .and_then(|g| face.glyph_hor_advance(g))
            .map_or(0.0, |a| a as f32 * self.scale);
        self.advances.borrow_mut().insert(c, adv);
        adv
    }

    fn kern_with(&self, face: &Face<'_>, left: char, right: char) -> f32 {
        let (Some(l), Some(r)) = (face.glyph_index(left), face.glyph_index(right)) else {
            return 0.0;
        };
        kern_pair(face, l, r).map_or(0.0, |k| k as f32 * self.scale)
    }

    /// Walk `text`, calling `f(byte_index, x_before, advance)` for every character
    fn walk(&self, text: &str, mut f: impl FnMut(usize, f32, f32) -> bool) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let mut x = 0.0;
        let mut last = None;
        for (i, c) in text.char_indices() {
            if let Some(prev) = last {
                x += self.kern_with(&face, prev, c);
            }
            let adv = self.advance_with(&face, c);
            if !f(i, x, adv) {
                return x;
            }
            x += adv;
            last = Some(c);
        }
        x
    }
}

fn kern_pair(face: &Face<'_>, left: GlyphId, right: GlyphId) -> Option<i16> {
    let kern = face.tables().kern?;
    kern.subtables
        .into_iter()
        .filter(|s| s.horizontal && !s.variable)
        .find_map(|s| s.glyphs_kerning(left, right))
}

/// Sub-pixel phases used for a pixel size
pub fn subpixel_phases(size: f32) -> u32 {
    if size < 20.0 {
        4
    } else if size < 30.0 {
        2
    } else {
        1
    }
}

impl FontMetrics for FontFace {
    fn ascent(&self) -> i32 {
        self.ascent
    }

    fn descent(&self) -> i32 {
        self.descent
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn advance(&self, text: &str) -> f32 {
        self.walk(text, |_, _, _| true)
    }

    fn index(&self, text: &str, x: f32) -> usize {
        let mut found = text.len();
        self.walk(text, |i, pos, adv| {
            if x < pos + adv / 2.0 {
                found = i;
                false
            } else {
                true
            }
        });
        found
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("data", &self.data)
            .field("size", &self.size)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .finish()
    }
}
