//! Icon lookup contract

use image::GrayImage;

/// Supplies icon bitmaps to the renderer
pub trait IconLookup {
    /// Largest supported icon size not exceeding `requested`
    ///
    /// Requests below the smallest size return the smallest size.
    fn icon_size(&self, requested: i32) -> i32;

    /// Rasterize the icon `name` into `target`
    ///
    /// `target` is square and its side is a value returned by [`IconLookup::icon_size`].
    /// Implementations overwrite every pixel.
    fn draw_icon(&self, target: &mut GrayImage, name: &str);
}
