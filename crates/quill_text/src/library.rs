//! Font library: name resolution, system font discovery and metrics cache
//!
//! Fonts are requested by name. The canonical names are `sans` and `mono`
//! with optional `-bold` and `-italic` suffixes (`mono-bold-italic`). Any
//! other name resolves by the words it contains, so `"bold"` becomes
//! `sans-bold` and `"monospace italic"` becomes `mono-italic`, unless the
//! name was registered as a custom font or alias.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use lru::LruCache;
use quill_paint::{snap_font_size, FixedMetrics, Font, FontLookup, FontMetrics};
use rustc_hash::FxHashMap;

use crate::error::{Result, TextError};
use crate::face::{FontData, FontFace};
use crate::rasterizer::{GlyphRasterizer, RasterizedGlyph};

/// The canonical font names
pub const CANONICAL_FONTS: [&str; 8] = [
    "sans",
    "sans-bold",
    "sans-italic",
    "sans-bold-italic",
    "mono",
    "mono-bold",
    "mono-italic",
    "mono-bold-italic",
];

const FACE_CACHE_CAPACITY: usize = 64;

/// Map any font name onto a canonical name by its style words
pub fn canonical_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let mut canonical = String::from(if lower.contains("mono") { "mono" } else { "sans" });
    if lower.contains("bold") {
        canonical.push_str("-bold");
    }
    if lower.contains("italic") {
        canonical.push_str("-italic");
    }
    canonical
}

/// Source of faces and glyph bitmaps for the renderer
pub trait GlyphProvider: FontLookup {
    /// The face for the closest supported font, if one could be loaded
    fn face(&self, font: &Font) -> Option<Rc<FontFace>>;

    /// Rasterize `c` in `font` at a horizontal sub-pixel offset
    fn rasterize(&self, font: &Font, c: char, x_offset: f32) -> RasterizedGlyph;

    /// Kerning between two characters of `font`
    fn kerning(&self, font: &Font, left: char, right: char) -> f32;

    /// Number of sub-pixel phases glyphs of `font` are rasterized at
    fn subpixel_phases(&self, font: &Font) -> u32 {
        crate::face::subpixel_phases(font.size)
    }
}

/// Font registry implementing [`FontLookup`] and [`GlyphProvider`]
pub struct FontLibrary {
    families: FxHashMap<String, FontData>,
    aliases: FxHashMap<String, String>,
    faces: RefCell<LruCache<Font, Option<Rc<FontFace>>>>,
    rasterizer: RefCell<GlyphRasterizer>,
}

impl FontLibrary {
    /// A library without any font files
    ///
    /// Every font measures with [`FixedMetrics`] and renders no glyphs.
    pub fn empty() -> Self {
        Self {
            families: FxHashMap::default(),
            aliases: FxHashMap::default(),
            faces: RefCell::new(LruCache::new(
                NonZeroUsize::new(FACE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
            rasterizer: RefCell::new(GlyphRasterizer::new()),
        }
    }

    /// Discover system fonts for every canonical name
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("fontdb found {} faces", db.len());

        let mut library = Self::empty();
        for name in CANONICAL_FONTS {
            let family = if name.starts_with("mono") {
                Family::Monospace
            } else {
                Family::SansSerif
            };
            let weight = if name.contains("bold") { 700 } else { 400 };
            let italic = name.contains("italic");
            match load_from_db(&db, family, weight, italic) {
                Ok(data) => {
                    library.families.insert(name.to_owned(), data);
                }
                Err(e) => tracing::warn!("No system font for '{}': {}", name, e),
            }
        }
        tracing::info!(
            "Font library ready with {}/{} system faces",
            library.families.len(),
            CANONICAL_FONTS.len()
        );
        library
    }

    /// Register a font file under `name`, replacing any previous font of that name
    pub fn add(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        let data = FontData::new(bytes, 0)?;
        tracing::debug!(
            "Registered font '{}' ({})",
            name,
            data.family_name().unwrap_or_else(|| "unnamed".to_owned())
        );
        self.families.insert(name.to_owned(), data);
        self.faces.borrow_mut().clear();
        Ok(())
    }

    /// Make `alias` resolve to the registered font `name`
    pub fn add_alias(&mut self, name: &str, alias: &str) -> Result<()> {
        let target = self.resolve_name(name);
        if !self.families.contains_key(&target) {
            return Err(TextError::FontLoad(format!("no font named '{name}'")));
        }
        self.aliases.insert(alias.to_owned(), target);
        self.faces.borrow_mut().clear();
        Ok(())
    }

    /// Check whether a font file is loaded for `name`
    pub fn has_face(&self, name: &str) -> bool {
        self.families.contains_key(&self.resolve_name(name))
    }

    fn resolve_name(&self, name: &str) -> String {
        if self.families.contains_key(name) {
            return name.to_owned();
        }
        if let Some(target) = self.aliases.get(name) {
            return target.clone();
        }
        canonical_name(name)
    }

    fn load_face(&self, font: &Font) -> Option<Rc<FontFace>> {
        if let Some(cached) = self.faces.borrow_mut().get(font) {
            return cached.clone();
        }
        let face = self.families.get(&font.name).and_then(|data| {
            FontFace::new(data.clone(), font.size)
                .map_err(|e| tracing::warn!("Failed to load face '{}': {}", font.name, e))
                .ok()
                .map(Rc::new)
        });
        self.faces.borrow_mut().put(font.clone(), face.clone());
        face
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::system()
    }
}

fn load_from_db(db: &Database, family: Family<'_>, weight: u16, italic: bool) -> Result<FontData> {
    let families = [family];
    let mut query = Query {
        families: &families,
        weight: Weight(weight),
        style: if italic { Style::Italic } else { Style::Normal },
        stretch: Stretch::Normal,
    };
    let id = match db.query(&query) {
        Some(id) => id,
        None if italic => {
            query.style = Style::Oblique;
            db.query(&query)
                .ok_or_else(|| TextError::FontLoad("no matching face".to_owned()))?
        }
        None => return Err(TextError::FontLoad("no matching face".to_owned())),
    };

    let (src, index) = db
        .face_source(id)
        .ok_or_else(|| TextError::FontLoad("font source not found".to_owned()))?;
    let bytes = match src {
        Source::File(path) => std::fs::read(&path).map_err(|e| {
            TextError::FontLoad(format!("failed to read font file {:?}: {}", path, e))
        })?,
        Source::Binary(arc) => arc.as_ref().as_ref().to_vec(),
        Source::SharedFile(_path, data) => data.as_ref().as_ref().to_vec(),
    };
    FontData::new(bytes, index)
}

impl FontLookup for FontLibrary {
    fn closest(&self, font: &Font) -> Font {
        Font::new(self.resolve_name(&font.name), snap_font_size(font.size))
    }

    fn metrics(&self, font: &Font) -> Rc<dyn FontMetrics> {
        let font = self.closest(font);
        match self.load_face(&font) {
            Some(face) => face as Rc<dyn FontMetrics>,
            None => Rc::new(FixedMetrics::new(font.size)),
        }
    }
}

impl GlyphProvider for FontLibrary {
    fn face(&self, font: &Font) -> Option<Rc<FontFace>> {
        self.load_face(&self.closest(font))
    }

    fn rasterize(&self, font: &Font, c: char, x_offset: f32) -> RasterizedGlyph {
        match self.face(font) {
            Some(face) => self.rasterizer.borrow_mut().rasterize(&face, c, x_offset),
            None => RasterizedGlyph::empty(0.0),
        }
    }

    fn kerning(&self, font: &Font, left: char, right: char) -> f32 {
        self.face(font).map_or(0.0, |face| face.kerning(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        assert_eq!(canonical_name("default"), "sans");
        assert_eq!(canonical_name("bold"), "sans-bold");
        assert_eq!(canonical_name("Monospace Italic"), "mono-italic");
        assert_eq!(canonical_name("italic bold mono"), "mono-bold-italic");
        for name in CANONICAL_FONTS {
            assert_eq!(canonical_name(name), name);
        }
    }

    #[test]
    fn test_closest_is_idempotent() {
        let lib = FontLibrary::empty();
        for (name, size) in [("default", 12.0), ("bold", 3.0), ("mono", 13.3), ("x", 99.0)] {
            let once = lib.closest(&Font::new(name, size));
            assert_eq!(lib.closest(&once), once);
        }
        assert_eq!(lib.closest(&Font::new("bold", 12.2)), Font::new("sans-bold", 12.0));
    }

    #[test]
    fn test_empty_library_falls_back_to_fixed_metrics() {
        let lib = FontLibrary::empty();
        let m = lib.metrics(&Font::new("sans", 12.0));
        assert_eq!(m.advance("abc"), 18.0);
        assert!(lib.face(&Font::default()).is_none());
        assert!(lib.rasterize(&Font::default(), 'a', 0.0).is_empty());
        assert_eq!(lib.kerning(&Font::default(), 'A', 'V'), 0.0);
    }

    #[test]
    fn test_alias_requires_target() {
        let mut lib = FontLibrary::empty();
        assert!(lib.add_alias("sans", "ui").is_err());
        assert!(lib.add("custom", vec![1, 2, 3]).is_err());
    }
}
