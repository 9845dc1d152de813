//! Quill GPU Renderer
//!
//! Draws the command lists produced by `quill_paint::Buffer`. Text goes
//! through a shared glyph atlas, icons through per-size icon sheets and
//! images through a checksum-aware texture cache. The actual GPU work is
//! behind [`RenderBackend`], implemented for wgpu by [`WgpuBackend`] and
//! recorded in memory by [`RecordingBackend`].

pub mod atlas;
pub mod backend;
pub mod builtin_icons;
pub mod config;
pub mod error;
pub mod icons;
pub mod image_cache;
pub mod recording;
pub mod renderer;
pub mod shaders;
pub mod wgpu_backend;

pub use atlas::{AtlasGlyph, AtlasLine, GlyphAtlas};
pub use backend::{QuadVertex, RenderBackend, ShadowVertex, TextureFormat, TextureId};
pub use builtin_icons::{BuiltinIcons, ICON_SIZES};
pub use config::RendererConfig;
pub use error::{RendererError, Result};
pub use icons::{IconSheets, SheetIcon};
pub use image_cache::ImageCache;
pub use recording::{RecordedDraw, RecordedTexture, RecordingBackend};
pub use renderer::Renderer;
pub use wgpu_backend::WgpuBackend;
