//! Glyph atlas
//!
//! Glyphs are packed into fixed-size alpha textures ("pages"). A page is cut
//! into horizontal lines from top to bottom. Every line is either free or
//! owned by exactly one font, and a font fills its current line left to
//! right. When a line is full the font takes a new line: the first free line
//! that is tall enough, split if it is taller than needed. Without one, the
//! least recently used line of the page is evicted. Lines already drawn from
//! in the current frame stay, so a page full of them starts a new page.
//!
//! Each page tracks the fraction of its height in use. Once every page is
//! above the soft ceiling, lines unused for `gc_frames` frames are reclaimed
//! round-robin before another page is allocated.

use quill_paint::{Font, FontLookup, Rect};
use quill_text::GlyphProvider;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::backend::{RenderBackend, TextureFormat, TextureId};
use crate::config::RendererConfig;

slotmap::new_key_type! {
    struct LineKey;
}

#[derive(Debug)]
struct Line {
    owner: Option<Font>,
    y: i32,
    h: i32,
    /// Next free column
    x: i32,
    used: u64,
}

#[derive(Debug)]
struct Page {
    texture: TextureId,
    /// Lines ordered by `y`, covering the whole page
    lines: Vec<LineKey>,
    space: f32,
}

/// A glyph ready to draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasGlyph {
    /// Page holding the bitmap; `None` for glyphs without pixels
    pub texture: Option<TextureId>,
    /// Quad relative to the pen position as `[x0, y0, x1, y1]`
    pub bounds: [i32; 4],
    /// Normalized texture coordinates as `[u0, v0, u1, v1]`
    pub uv: [f32; 4],
    pub advance: f32,
}

impl AtlasGlyph {
    fn empty(advance: f32) -> Self {
        Self {
            texture: None,
            bounds: [0; 4],
            uv: [0.0; 4],
            advance,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CachedGlyph {
    glyph: AtlasGlyph,
    line: Option<LineKey>,
}

#[derive(Debug)]
struct FaceSlot {
    height: i32,
    page: Option<usize>,
    line: Option<LineKey>,
    glyphs: FxHashMap<(char, u8), CachedGlyph>,
}

/// A line as seen from outside, for inspection
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasLine {
    pub y: i32,
    pub height: i32,
    pub owner: Option<Font>,
}

/// Line-allocated glyph cache spread over alpha textures
pub struct GlyphAtlas {
    size: i32,
    gc_frames: u64,
    soft_ceiling: f32,
    lines: SlotMap<LineKey, Line>,
    pages: Vec<Page>,
    faces: FxHashMap<Font, FaceSlot>,
    next_gc: usize,
    scratch: Vec<u8>,
}

impl GlyphAtlas {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            size: config.atlas_size.max(1) as i32,
            gc_frames: config.glyph_gc_frames,
            soft_ceiling: config.atlas_soft_ceiling,
            lines: SlotMap::with_key(),
            pages: Vec::new(),
            faces: FxHashMap::default(),
            next_gc: 0,
            scratch: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_texture(&self, page: usize) -> Option<TextureId> {
        self.pages.get(page).map(|p| p.texture)
    }

    /// Fraction of the page height owned by fonts
    pub fn page_usage(&self, page: usize) -> f32 {
        self.pages.get(page).map_or(0.0, |p| p.space)
    }

    /// Lines of a page from top to bottom
    pub fn page_lines(&self, page: usize) -> Vec<AtlasLine> {
        let Some(page) = self.pages.get(page) else {
            return Vec::new();
        };
        page.lines
            .iter()
            .filter_map(|&key| self.lines.get(key))
            .map(|l| AtlasLine {
                y: l.y,
                height: l.h,
                owner: l.owner.clone(),
            })
            .collect()
    }

    /// Number of cached glyphs, including empty ones
    pub fn cached_glyphs(&self) -> usize {
        self.faces.values().map(|f| f.glyphs.len()).sum()
    }

    /// Look up or rasterize `c` in `font` at sub-pixel `phase` of `phases`
    ///
    /// `font` must already be canonical (see `FontLookup::closest`). Every
    /// hit stamps the owning line with `frame`.
    #[allow(clippy::too_many_arguments)]
    pub fn glyph(
        &mut self,
        backend: &mut dyn RenderBackend,
        provider: &dyn GlyphProvider,
        font: &Font,
        c: char,
        phase: u8,
        phases: u32,
        frame: u64,
    ) -> AtlasGlyph {
        let slot = self.faces.entry(font.clone()).or_insert_with(|| {
            let m = provider.metrics(font);
            FaceSlot {
                height: m.ascent() + m.descent() + 1,
                page: None,
                line: None,
                glyphs: FxHashMap::default(),
            }
        });
        if let Some(cached) = slot.glyphs.get(&(c, phase)) {
            if let Some(line) = cached.line.and_then(|k| self.lines.get_mut(k)) {
                line.used = frame;
            }
            return cached.glyph;
        }
        let height = slot.height;

        let x_offset = phase as f32 / phases.max(1) as f32;
        let raster = provider.rasterize(font, c, x_offset);
        if raster.is_empty() {
            let glyph = AtlasGlyph::empty(raster.advance);
            self.cache(font, c, phase, glyph, None);
            return glyph;
        }

        let w = (raster.width as i32).min(2 * height).min(self.size);
        let h = (raster.height as i32).min(height);

        let Some((page, line)) = self.line_for(backend, font, height, w, frame) else {
            tracing::warn!("Glyph '{}' of {:?} does not fit in the atlas", c, font);
            return AtlasGlyph::empty(raster.advance);
        };

        let Some(l) = self.lines.get_mut(line) else {
            return AtlasGlyph::empty(raster.advance);
        };
        let region = Rect::xywh(l.x, l.y, w, h);
        l.x += w + 1;
        l.used = frame;

        let size = self.size as f32;
        let glyph = AtlasGlyph {
            texture: Some(self.pages[page].texture),
            bounds: [raster.left, -raster.top, raster.left + w, -raster.top + h],
            uv: [
                region.min.x as f32 / size,
                region.min.y as f32 / size,
                region.max.x as f32 / size,
                region.max.y as f32 / size,
            ],
            advance: raster.advance,
        };

        if w == raster.width as i32 && h == raster.height as i32 {
            backend.write_texture(self.pages[page].texture, region, &raster.bitmap);
        } else {
            self.scratch.clear();
            let stride = raster.width as usize;
            for row in raster.bitmap.chunks_exact(stride.max(1)).take(h as usize) {
                self.scratch.extend_from_slice(&row[..w as usize]);
            }
            backend.write_texture(self.pages[page].texture, region, &self.scratch);
        }

        self.cache(font, c, phase, glyph, Some(line));
        glyph
    }

    fn cache(&mut self, font: &Font, c: char, phase: u8, glyph: AtlasGlyph, line: Option<LineKey>) {
        if let Some(slot) = self.faces.get_mut(font) {
            slot.glyphs.insert((c, phase), CachedGlyph { glyph, line });
        }
    }

    /// The font's current line if `w` more pixels fit, otherwise a new line
    fn line_for(
        &mut self,
        backend: &mut dyn RenderBackend,
        font: &Font,
        height: i32,
        w: i32,
        frame: u64,
    ) -> Option<(usize, LineKey)> {
        let (page, line, fresh) = {
            let slot = self.faces.get(font)?;
            (slot.page, slot.line, slot.glyphs.is_empty())
        };
        if let (Some(page), Some(line)) = (page, line) {
            if let Some(l) = self.lines.get(line) {
                if l.x + w <= self.size {
                    return Some((page, line));
                }
            }
        }

        let page = match page {
            Some(page) if !fresh => page,
            _ => self.pick_page(backend, frame),
        };
        let (page, line) = match self.alloc(page, font, height, frame) {
            Some(line) => (page, line),
            None => {
                let page = self.add_page(backend);
                (page, self.alloc(page, font, height, frame)?)
            }
        };
        if let Some(l) = self.lines.get_mut(line) {
            l.x = 0;
        }
        if let Some(slot) = self.faces.get_mut(font) {
            slot.page = Some(page);
            slot.line = Some(line);
        }
        Some((page, line))
    }

    fn pick_page(&mut self, backend: &mut dyn RenderBackend, frame: u64) -> usize {
        if let Some(i) = self.pages.iter().position(|p| p.space < self.soft_ceiling) {
            return i;
        }
        if !self.pages.is_empty() {
            self.next_gc = (self.next_gc + 1) % self.pages.len();
            let start = self.next_gc;
            let mut i = start;
            loop {
                self.gc(i, frame);
                if self.pages[i].space < self.soft_ceiling {
                    return i;
                }
                i = (i + 1) % self.pages.len();
                if i == start {
                    break;
                }
            }
        }

        self.add_page(backend)
    }

    fn add_page(&mut self, backend: &mut dyn RenderBackend) -> usize {
        let texture = backend.create_texture(self.size as u32, self.size as u32, TextureFormat::Alpha);
        let free = self.lines.insert(Line {
            owner: None,
            y: 0,
            h: self.size,
            x: 0,
            used: 0,
        });
        self.pages.push(Page {
            texture,
            lines: vec![free],
            space: 0.0,
        });
        tracing::debug!("Glyph atlas page {} allocated", self.pages.len() - 1);
        self.pages.len() - 1
    }

    /// Claim a line of height `h` on `page`, evicting old lines as needed
    ///
    /// Lines drawn from during `frame` are never evicted, since their
    /// quads are already queued. `None` if the page has no room left.
    fn alloc(&mut self, page: usize, font: &Font, h: i32, frame: u64) -> Option<LineKey> {
        if h > self.size {
            return None;
        }
        loop {
            let found = self.pages[page].lines.iter().position(|&k| {
                self.lines
                    .get(k)
                    .is_some_and(|l| l.owner.is_none() && l.h >= h)
            });
            let Some(pos) = found else {
                if !self.free_oldest(page, frame) {
                    return None;
                }
                continue;
            };

            let key = self.pages[page].lines[pos];
            let l = self.lines.get_mut(key)?;
            if l.h > h {
                let rest = Line {
                    owner: None,
                    y: l.y + h,
                    h: l.h - h,
                    x: 0,
                    used: 0,
                };
                l.h = h;
                let rest = self.lines.insert(rest);
                self.pages[page].lines.insert(pos + 1, rest);
            }
            if let Some(l) = self.lines.get_mut(key) {
                l.owner = Some(font.clone());
                l.x = 0;
            }
            self.pages[page].space += h as f32 / self.size as f32;
            return Some(key);
        }
    }

    /// Evict lines of `page` unused since `frame - gc_frames`
    fn gc(&mut self, page: usize, frame: u64) {
        let threshold = frame.saturating_sub(self.gc_frames);
        let mut i = 0;
        while i < self.pages[page].lines.len() {
            let key = self.pages[page].lines[i];
            let stale = self
                .lines
                .get(key)
                .is_some_and(|l| l.owner.is_some() && l.used < threshold);
            if stale {
                i = self.remove(page, i);
            }
            i += 1;
        }
    }

    /// Evict the least recently used line of `page` not used in `frame`
    fn free_oldest(&mut self, page: usize, frame: u64) -> bool {
        let oldest = self.pages[page]
            .lines
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| {
                let l = self.lines.get(k)?;
                l.owner.as_ref().filter(|_| l.used < frame).map(|_| (i, l.used))
            })
            .min_by_key(|&(_, used)| used);
        match oldest {
            Some((i, _)) => {
                self.remove(page, i);
                true
            }
            None => false,
        }
    }

    /// Free the line at position `i`, merging it with free neighbours
    ///
    /// Returns the position of the resulting free line.
    fn remove(&mut self, page: usize, i: usize) -> usize {
        let key = self.pages[page].lines[i];
        let Some(line) = self.lines.get_mut(key) else {
            return i;
        };
        let Some(owner) = line.owner.take() else {
            return i;
        };
        let h = line.h;
        line.x = 0;

        if let Some(slot) = self.faces.get_mut(&owner) {
            if slot.line == Some(key) {
                slot.line = None;
            }
            slot.glyphs.retain(|_, g| g.line != Some(key));
        }
        self.pages[page].space -= h as f32 / self.size as f32;
        tracing::debug!("Evicted atlas line of {:?} on page {}", owner, page);

        let lines = &self.pages[page].lines;
        let is_free = |pos: usize| {
            lines
                .get(pos)
                .and_then(|&k| self.lines.get(k))
                .is_some_and(|l| l.owner.is_none())
        };
        let prev_free = i > 0 && is_free(i - 1);
        let next_free = is_free(i + 1);

        if prev_free {
            let mut grow = h;
            if next_free {
                let next = self.pages[page].lines.remove(i + 1);
                grow += self.lines.remove(next).map_or(0, |l| l.h);
            }
            self.pages[page].lines.remove(i);
            self.lines.remove(key);
            if let Some(prev) = self.lines.get_mut(self.pages[page].lines[i - 1]) {
                prev.h += grow;
            }
            i - 1
        } else if next_free {
            let y = self.lines.get(key).map_or(0, |l| l.y);
            self.pages[page].lines.remove(i);
            self.lines.remove(key);
            if let Some(next) = self.lines.get_mut(self.pages[page].lines[i]) {
                next.y = y;
                next.h += h;
            }
            i
        } else {
            i
        }
    }

    /// Release every page texture and forget all glyphs
    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        for page in self.pages.drain(..) {
            backend.destroy_texture(page.texture);
        }
        self.lines.clear();
        self.faces.clear();
        self.next_gc = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;
    use quill_paint::{FixedFontLookup, FixedMetrics, FontMetrics};
    use quill_text::RasterizedGlyph;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Solid boxes one advance wide; `\u{0}` is missing
    #[derive(Default)]
    struct BoxGlyphs {
        rasterized: Cell<usize>,
    }

    impl FontLookup for BoxGlyphs {
        fn closest(&self, font: &Font) -> Font {
            FixedFontLookup.closest(font)
        }

        fn metrics(&self, font: &Font) -> Rc<dyn FontMetrics> {
            FixedFontLookup.metrics(font)
        }
    }

    impl GlyphProvider for BoxGlyphs {
        fn face(&self, _font: &Font) -> Option<Rc<quill_text::FontFace>> {
            None
        }

        fn rasterize(&self, font: &Font, c: char, _x_offset: f32) -> RasterizedGlyph {
            self.rasterized.set(self.rasterized.get() + 1);
            if c == '\u{0}' {
                return RasterizedGlyph::empty(0.0);
            }
            let m = FixedMetrics::new(font.size);
            let w = m.char_advance() as u32;
            let h = (m.ascent() + m.descent()) as u32;
            RasterizedGlyph {
                bitmap: vec![255; (w * h) as usize],
                width: w,
                height: h,
                left: 0,
                top: m.ascent(),
                advance: m.char_advance(),
            }
        }

        fn kerning(&self, _font: &Font, _left: char, _right: char) -> f32 {
            0.0
        }
    }

    fn small_atlas(size: u32) -> GlyphAtlas {
        GlyphAtlas::new(&RendererConfig {
            atlas_size: size,
            ..RendererConfig::default()
        })
    }

    fn check_page(atlas: &GlyphAtlas, page: usize) {
        let lines = atlas.page_lines(page);
        let mut y = 0;
        for line in &lines {
            assert_eq!(line.y, y, "lines must tile the page: {lines:?}");
            assert!(line.height > 0, "empty line: {lines:?}");
            y += line.height;
        }
        assert_eq!(y, atlas.size, "line heights must sum to the page height");
        for pair in lines.windows(2) {
            assert!(
                pair[0].owner.is_some() || pair[1].owner.is_some(),
                "adjacent free lines must be merged: {lines:?}"
            );
        }
    }

    #[test]
    fn test_glyphs_are_cached() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(256);
        let font = Font::new("sans", 12.0);

        let a = atlas.glyph(&mut backend, &glyphs, &font, 'a', 0, 4, 1);
        let again = atlas.glyph(&mut backend, &glyphs, &font, 'a', 0, 4, 2);
        assert_eq!(a, again);
        assert_eq!(glyphs.rasterized.get(), 1);
        assert_eq!(backend.total_writes(), 1);

        // another phase is another glyph
        let shifted = atlas.glyph(&mut backend, &glyphs, &font, 'a', 1, 4, 2);
        assert_ne!(shifted.uv, a.uv);
        assert_eq!(glyphs.rasterized.get(), 2);
        assert_eq!(atlas.page_count(), 1);
    }

    #[test]
    fn test_glyph_placement() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(256);
        let font = Font::new("sans", 12.0);

        let a = atlas.glyph(&mut backend, &glyphs, &font, 'a', 0, 4, 0);
        let b = atlas.glyph(&mut backend, &glyphs, &font, 'b', 0, 4, 0);
        // 6×13 boxes with a one pixel gap
        assert_eq!(a.bounds, [0, -10, 6, 3]);
        assert_eq!(a.uv, [0.0, 0.0, 6.0 / 256.0, 13.0 / 256.0]);
        assert_eq!(b.uv[0], 7.0 / 256.0);
        assert_eq!(a.advance, 6.0);

        let lines = atlas.page_lines(0);
        assert_eq!(lines[0].height, 14);
        assert_eq!(lines[0].owner, Some(font));
        assert_eq!(lines[1].owner, None);
    }

    #[test]
    fn test_missing_glyph_is_cached_empty() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(256);
        let font = Font::new("sans", 12.0);

        for frame in 0..3 {
            let g = atlas.glyph(&mut backend, &glyphs, &font, '\u{0}', 0, 4, frame);
            assert_eq!(g.texture, None);
            assert_eq!(g.advance, 0.0);
        }
        assert_eq!(glyphs.rasterized.get(), 1);
        assert_eq!(atlas.page_count(), 0);
    }

    #[test]
    fn test_full_line_moves_to_next_line() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(64);
        let font = Font::new("sans", 12.0);

        // 7 pixels per glyph: 9 glyphs fill a 64 pixel line
        let mut rows = Vec::new();
        for (i, c) in ('a'..='k').enumerate() {
            let g = atlas.glyph(&mut backend, &glyphs, &font, c, 0, 1, i as u64);
            rows.push(g.uv[1]);
        }
        assert_eq!(rows[8], 0.0);
        assert_eq!(rows[9], 14.0 / 64.0);
        check_page(&atlas, 0);
    }

    #[test]
    fn test_stale_lines_are_reclaimed_before_new_pages() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(64);

        // four fonts of height 14 bring the page to 56/64 > 0.8
        for (i, size) in [12.0, 12.5, 13.0, 11.5].into_iter().enumerate() {
            let font = Font::new("sans", size);
            atlas.glyph(&mut backend, &glyphs, &font, 'x', 0, 1, i as u64);
        }
        assert!(atlas.page_usage(0) > 0.8);

        // long after, a new font reclaims the stale lines instead of a new page
        let font = Font::new("mono", 12.0);
        atlas.glyph(&mut backend, &glyphs, &font, 'x', 0, 1, 100);
        assert_eq!(atlas.page_count(), 1);
        let owners: Vec<_> = atlas.page_lines(0).into_iter().filter_map(|l| l.owner).collect();
        assert_eq!(owners, vec![font]);
        check_page(&atlas, 0);

        // evicted glyphs are rasterized again on next use
        let before = glyphs.rasterized.get();
        atlas.glyph(&mut backend, &glyphs, &Font::new("sans", 12.0), 'x', 0, 1, 101);
        assert_eq!(glyphs.rasterized.get(), before + 1);
    }

    #[test]
    fn test_busy_pages_grow_the_atlas() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(64);

        for size in [12.0, 12.5, 13.0, 11.5, 10.0] {
            let font = Font::new("sans", size);
            atlas.glyph(&mut backend, &glyphs, &font, 'x', 0, 1, 5);
        }
        assert_eq!(atlas.page_count(), 2);
        assert_eq!(backend.textures_created(), 2);
        check_page(&atlas, 0);
        check_page(&atlas, 1);
    }

    #[test]
    fn test_lines_never_overlap_under_churn() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(128);
        let sizes = [8.0, 9.5, 12.0, 14.0, 18.0, 21.0, 24.0, 30.0];

        for frame in 0..200u64 {
            // a rotating subset of fonts, with text long enough to spill lines
            for k in 0..3 {
                let size = sizes[((frame / 7 + k * 3) as usize) % sizes.len()];
                let font = Font::new("sans", size);
                for c in "quill atlas churn".chars() {
                    let phase = (frame % 2) as u8;
                    atlas.glyph(&mut backend, &glyphs, &font, c, phase, 2, frame);
                }
            }
            for page in 0..atlas.page_count() {
                check_page(&atlas, page);
                assert!(atlas.page_usage(page) <= 1.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_lines_in_use_this_frame_are_not_evicted() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(64);
        let font = Font::new("sans", 12.0);

        // 52 glyphs need six 14 pixel lines, more than one 64 pixel page holds
        let mut drawn: Vec<(char, AtlasGlyph)> = Vec::new();
        for c in ('a'..='z').chain('A'..='Z') {
            let g = atlas.glyph(&mut backend, &glyphs, &font, c, 0, 1, 7);
            for (prev, p) in &drawn {
                assert!(
                    !(p.texture == g.texture && p.uv == g.uv),
                    "glyph {c:?} overwrote {prev:?} within one frame"
                );
            }
            drawn.push((c, g));
        }
        assert_eq!(atlas.page_count(), 2);
        for (c, g) in &drawn {
            assert_eq!(atlas.glyph(&mut backend, &glyphs, &font, *c, 0, 1, 7), *g);
        }
        check_page(&atlas, 0);
        check_page(&atlas, 1);

        // a later frame may evict again instead of growing
        atlas.glyph(&mut backend, &glyphs, &Font::new("mono", 12.0), 'x', 0, 1, 8);
        assert_eq!(atlas.page_count(), 2);
    }

    #[test]
    fn test_clear_releases_pages() {
        let mut backend = RecordingBackend::new();
        let glyphs = BoxGlyphs::default();
        let mut atlas = small_atlas(64);
        atlas.glyph(&mut backend, &glyphs, &Font::new("sans", 12.0), 'a', 0, 1, 0);
        atlas.clear(&mut backend);
        assert_eq!(atlas.page_count(), 0);
        assert_eq!(atlas.cached_glyphs(), 0);
        assert_eq!(backend.texture_count(), 0);
    }
}
