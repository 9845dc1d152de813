//! Shared image handles
//!
//! Commands reference images by handle; pixel data is never copied into the
//! command buffer. The renderer keys its texture cache by [`ImageId`].

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an image, stable for the lifetime of its handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Reference-counted RGBA image with premultiplied alpha
///
/// Cloning a handle shares the pixels. Contents may be edited in place
/// through [`ImageHandle::pixels_mut`]; draw such images with the `update`
/// flag so the renderer re-checks them.
#[derive(Clone)]
pub struct ImageHandle {
    id: ImageId,
    pixels: Rc<RefCell<RgbaImage>>,
}

impl ImageHandle {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)),
            pixels: Rc::new(RefCell::new(pixels)),
        }
    }

    /// Wrap raw premultiplied RGBA bytes; `None` if the length does not match
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.borrow().dimensions()
    }

    pub fn pixels(&self) -> Ref<'_, RgbaImage> {
        self.pixels.borrow()
    }

    pub fn pixels_mut(&self) -> RefMut<'_, RgbaImage> {
        self.pixels.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakImage {
        WeakImage {
            id: self.id,
            pixels: Rc::downgrade(&self.pixels),
        }
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageHandle {}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        f.debug_struct("ImageHandle")
            .field("id", &self.id.0)
            .field("size", &(w, h))
            .finish()
    }
}

/// Non-owning reference to an image, used by caches to notice dropped images
#[derive(Clone, Debug)]
pub struct WeakImage {
    id: ImageId,
    pixels: Weak<RefCell<RgbaImage>>,
}

impl WeakImage {
    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.pixels.strong_count() > 0
    }
}
