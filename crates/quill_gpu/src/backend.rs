//! Backend contract
//!
//! The [`Renderer`](crate::Renderer) turns command lists into textured quads
//! and shadow quads. A [`RenderBackend`] owns the textures and executes the
//! batched draws. [`WgpuBackend`](crate::WgpuBackend) draws to a window;
//! [`RecordingBackend`](crate::RecordingBackend) records calls for tests.

use bytemuck::{Pod, Zeroable};
use quill_paint::Rect;

slotmap::new_key_type! {
    /// Handle to a texture owned by a backend
    pub struct TextureId;
}

/// Pixel layout of a texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// One coverage byte per pixel, sampled as white with that alpha
    Alpha,
    /// Premultiplied RGBA, four bytes per pixel
    Rgba,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Alpha => 1,
            TextureFormat::Rgba => 4,
        }
    }
}

/// Vertex of a textured, tinted quad
///
/// Positions are in window pixels, texture coordinates normalized.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Premultiplied tint
    pub color: [f32; 4],
}

/// Vertex of a shadow quad
///
/// The fragment stage integrates a Gaussian over `rect` with the error
/// function, so no blur pass is needed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ShadowVertex {
    pub position: [f32; 2],
    /// Standard deviation of the blur in pixels
    pub sigma: f32,
    pub _padding: f32,
    /// Premultiplied shadow color
    pub color: [f32; 4],
    /// Shadow casting rectangle as `[x0, y0, x1, y1]`
    pub rect: [f32; 4],
}

/// Executes draws for the renderer
///
/// Calls arrive in painter's order: every draw must appear on top of the
/// draws before it.
pub trait RenderBackend {
    /// Create a zero-filled texture
    fn create_texture(&mut self, width: u32, height: u32, format: TextureFormat) -> TextureId;

    /// Replace the pixels in `region` with tightly packed rows from `data`
    fn write_texture(&mut self, texture: TextureId, region: Rect, data: &[u8]);

    fn destroy_texture(&mut self, texture: TextureId);

    /// Start a frame of `width`×`height` pixels
    fn begin_frame(&mut self, width: u32, height: u32);

    /// Draw triangles sampling `texture`; `vertices.len()` is a multiple of six
    fn draw_quads(&mut self, texture: TextureId, vertices: &[QuadVertex]);

    /// Draw shadow triangles; `vertices.len()` is a multiple of six
    fn draw_shadows(&mut self, vertices: &[ShadowVertex]);

    /// Finish and present the frame
    fn end_frame(&mut self);
}
