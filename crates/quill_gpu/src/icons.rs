//! Icon sheets
//!
//! Icons are rasterized on first use into one alpha texture per supported
//! pixel size. A sheet is a grid of `columns`×`columns` cells filled in
//! first-use order.

use image::GrayImage;
use quill_paint::{IconLookup, Rect};
use rustc_hash::FxHashMap;

use crate::backend::{RenderBackend, TextureFormat, TextureId};

struct IconSheet {
    texture: TextureId,
    scratch: GrayImage,
    icons: FxHashMap<String, u32>,
}

/// Where an icon was placed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetIcon {
    pub texture: TextureId,
    /// Rendered side length in pixels
    pub size: i32,
    /// Normalized texture coordinates as `[u0, v0, u1, v1]`
    pub uv: [f32; 4],
}

/// Icon textures by pixel size
pub struct IconSheets {
    columns: u32,
    sheets: FxHashMap<i32, IconSheet>,
}

impl IconSheets {
    pub fn new(columns: u32) -> Self {
        Self {
            columns: columns.max(1),
            sheets: FxHashMap::default(),
        }
    }

    /// Number of sheets created so far
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// The icon `name` at the largest supported size not above `requested`
    pub fn icon(
        &mut self,
        backend: &mut dyn RenderBackend,
        lookup: &dyn IconLookup,
        requested: i32,
        name: &str,
    ) -> SheetIcon {
        let size = lookup.icon_size(requested).max(1);
        let columns = self.columns;
        let sheet = self.sheets.entry(size).or_insert_with(|| {
            tracing::debug!("Icon sheet for {}px allocated", size);
            IconSheet {
                texture: backend.create_texture(
                    size as u32 * columns,
                    size as u32 * columns,
                    TextureFormat::Alpha,
                ),
                scratch: GrayImage::new(size as u32, size as u32),
                icons: FxHashMap::default(),
            }
        });

        let n = match sheet.icons.get(name) {
            Some(&n) => n,
            None => {
                if sheet.icons.len() as u32 >= columns * columns {
                    tracing::debug!("Icon sheet for {}px is full, starting over", size);
                    sheet.icons.clear();
                }
                let n = sheet.icons.len() as u32;
                lookup.draw_icon(&mut sheet.scratch, name);
                let region = Rect::xywh(
                    (n % columns) as i32 * size,
                    (n / columns) as i32 * size,
                    size,
                    size,
                );
                backend.write_texture(sheet.texture, region, sheet.scratch.as_raw());
                sheet.icons.insert(name.to_owned(), n);
                n
            }
        };

        let (x, y, c) = ((n % columns) as f32, (n / columns) as f32, columns as f32);
        SheetIcon {
            texture: sheet.texture,
            size,
            uv: [x / c, y / c, (x + 1.0) / c, (y + 1.0) / c],
        }
    }

    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        for (_, sheet) in self.sheets.drain() {
            backend.destroy_texture(sheet.texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;

    struct Squares;

    impl IconLookup for Squares {
        fn icon_size(&self, requested: i32) -> i32 {
            if requested < 20 {
                16
            } else {
                20
            }
        }

        fn draw_icon(&self, target: &mut GrayImage, _name: &str) {
            for p in target.pixels_mut() {
                p.0 = [255];
            }
        }
    }

    #[test]
    fn test_icons_fill_cells_in_order() {
        let mut backend = RecordingBackend::new();
        let mut sheets = IconSheets::new(4);

        let a = sheets.icon(&mut backend, &Squares, 18, "a");
        let b = sheets.icon(&mut backend, &Squares, 18, "b");
        let a_again = sheets.icon(&mut backend, &Squares, 17, "a");
        assert_eq!(a, a_again);
        assert_eq!(a.size, 16);
        assert_eq!(a.uv, [0.0, 0.0, 0.25, 0.25]);
        assert_eq!(b.uv, [0.25, 0.0, 0.5, 0.25]);

        let tex = backend.texture(a.texture).cloned();
        assert_eq!(tex.as_ref().map(|t| (t.width, t.writes)), Some((64, 2)));
        assert_eq!(tex.map(|t| t.regions[1]), Some(Rect::xywh(16, 0, 16, 16)));
    }

    #[test]
    fn test_one_sheet_per_size() {
        let mut backend = RecordingBackend::new();
        let mut sheets = IconSheets::new(16);
        let small = sheets.icon(&mut backend, &Squares, 12, "x");
        let large = sheets.icon(&mut backend, &Squares, 40, "x");
        assert_ne!(small.texture, large.texture);
        assert_eq!(large.size, 20);
        assert_eq!(sheets.sheet_count(), 2);
    }

    #[test]
    fn test_full_sheet_starts_over() {
        let mut backend = RecordingBackend::new();
        let mut sheets = IconSheets::new(2);
        for name in ["a", "b", "c", "d"] {
            sheets.icon(&mut backend, &Squares, 16, name);
        }
        let e = sheets.icon(&mut backend, &Squares, 16, "e");
        assert_eq!(e.uv, [0.0, 0.0, 0.5, 0.5]);
        assert_eq!(backend.textures_created(), 1);
    }
}
