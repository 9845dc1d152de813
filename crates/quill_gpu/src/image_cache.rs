//! Image texture cache
//!
//! Textures are keyed by image identity. A static image is uploaded once.
//! A dynamic image is checksummed every time it is drawn and re-uploaded
//! only when the checksum changed.

use quill_paint::{ImageHandle, ImageId, Rect, WeakImage};
use rustc_hash::FxHashMap;

use crate::backend::{RenderBackend, TextureFormat, TextureId};

struct ImageEntry {
    texture: TextureId,
    image: WeakImage,
    size: (u32, u32),
    last_used: u64,
    checksum: u32,
}

/// Image textures by [`ImageId`]
#[derive(Default)]
pub struct ImageCache {
    entries: FxHashMap<ImageId, ImageEntry>,
    uploads: u64,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pixel uploads performed so far
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Texture for `image`, uploading it if it is new or, when `dynamic`, changed
    pub fn texture(
        &mut self,
        backend: &mut dyn RenderBackend,
        image: &ImageHandle,
        dynamic: bool,
        frame: u64,
    ) -> TextureId {
        let pixels = image.pixels();
        let size = pixels.dimensions();

        if let Some(entry) = self.entries.get_mut(&image.id()) {
            entry.last_used = frame;
            if !dynamic {
                return entry.texture;
            }
            let checksum = crc32fast::hash(pixels.as_raw());
            if checksum == entry.checksum && size == entry.size {
                return entry.texture;
            }
            if size != entry.size {
                backend.destroy_texture(entry.texture);
                entry.texture = backend.create_texture(size.0, size.1, TextureFormat::Rgba);
                entry.size = size;
            }
            backend.write_texture(entry.texture, Rect::wh(size.0 as i32, size.1 as i32), pixels.as_raw());
            entry.checksum = checksum;
            self.uploads += 1;
            tracing::debug!("Re-uploaded image {} after content change", image.id().raw());
            return entry.texture;
        }

        let texture = backend.create_texture(size.0, size.1, TextureFormat::Rgba);
        backend.write_texture(texture, Rect::wh(size.0 as i32, size.1 as i32), pixels.as_raw());
        self.uploads += 1;
        let checksum = if dynamic { crc32fast::hash(pixels.as_raw()) } else { 0 };
        self.entries.insert(
            image.id(),
            ImageEntry {
                texture,
                image: image.downgrade(),
                size,
                last_used: frame,
                checksum,
            },
        );
        texture
    }

    /// Release textures of dropped images and of images unused for `max_age` frames
    pub fn collect(&mut self, backend: &mut dyn RenderBackend, frame: u64, max_age: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            let keep = entry.image.is_alive() && frame.saturating_sub(entry.last_used) <= max_age;
            if !keep {
                backend.destroy_texture(entry.texture);
            }
            keep
        });
        let released = before - self.entries.len();
        if released > 0 {
            tracing::debug!("Released {} image textures", released);
        }
        released
    }

    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        for (_, entry) in self.entries.drain() {
            backend.destroy_texture(entry.texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_static_image_uploads_once() {
        let mut backend = RecordingBackend::new();
        let mut cache = ImageCache::new();
        let image = ImageHandle::new(RgbaImage::new(4, 4));

        let first = cache.texture(&mut backend, &image, false, 0);
        for frame in 1..10 {
            assert_eq!(cache.texture(&mut backend, &image, false, frame), first);
        }
        assert_eq!(cache.uploads(), 1);
        assert_eq!(backend.total_writes(), 1);
    }

    #[test]
    fn test_dynamic_image_uploads_per_content() {
        let mut backend = RecordingBackend::new();
        let mut cache = ImageCache::new();
        let image = ImageHandle::new(RgbaImage::new(4, 4));

        cache.texture(&mut backend, &image, true, 0);
        cache.texture(&mut backend, &image, true, 1);
        assert_eq!(cache.uploads(), 1);

        image.pixels_mut().put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        cache.texture(&mut backend, &image, true, 2);
        cache.texture(&mut backend, &image, true, 3);
        assert_eq!(cache.uploads(), 2);

        // a static draw of a changed image does not re-check it
        image.pixels_mut().put_pixel(2, 2, Rgba([0, 255, 0, 255]));
        cache.texture(&mut backend, &image, false, 4);
        assert_eq!(cache.uploads(), 2);
        assert_eq!(backend.textures_created(), 1);
    }

    #[test]
    fn test_resized_dynamic_image_gets_new_texture() {
        let mut backend = RecordingBackend::new();
        let mut cache = ImageCache::new();
        let image = ImageHandle::new(RgbaImage::new(4, 4));
        let first = cache.texture(&mut backend, &image, true, 0);
        *image.pixels_mut() = RgbaImage::new(8, 2);
        let second = cache.texture(&mut backend, &image, true, 1);
        assert_ne!(first, second);
        assert_eq!(backend.texture_count(), 1);
        assert_eq!(backend.texture(second).map(|t| (t.width, t.height)), Some((8, 2)));
    }

    #[test]
    fn test_collect_releases_dropped_and_stale_images() {
        let mut backend = RecordingBackend::new();
        let mut cache = ImageCache::new();
        let kept = ImageHandle::new(RgbaImage::new(1, 1));
        let stale = ImageHandle::new(RgbaImage::new(1, 1));
        let dropped = ImageHandle::new(RgbaImage::new(1, 1));
        cache.texture(&mut backend, &stale, false, 0);
        cache.texture(&mut backend, &dropped, false, 50);
        cache.texture(&mut backend, &kept, false, 50);
        drop(dropped);

        assert_eq!(cache.collect(&mut backend, 60, 20), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(backend.texture_count(), 1);
        assert_eq!(backend.textures_destroyed(), 2);
    }
}
