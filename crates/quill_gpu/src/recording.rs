//! Backend that records calls instead of drawing

use quill_paint::Rect;
use slotmap::SlotMap;

use crate::backend::{QuadVertex, RenderBackend, ShadowVertex, TextureFormat, TextureId};

/// A texture created on a [`RecordingBackend`]
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedTexture {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Number of `write_texture` calls
    pub writes: usize,
    /// Every written region, in call order
    pub regions: Vec<Rect>,
}

/// A recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedDraw {
    Quads {
        texture: TextureId,
        vertices: Vec<QuadVertex>,
    },
    Shadows {
        vertices: Vec<ShadowVertex>,
    },
}

impl RecordedDraw {
    /// Number of quads in the call
    pub fn quads(&self) -> usize {
        match self {
            RecordedDraw::Quads { vertices, .. } => vertices.len() / 6,
            RecordedDraw::Shadows { vertices } => vertices.len() / 6,
        }
    }
}

/// Records texture operations and draws for inspection
#[derive(Debug, Default)]
pub struct RecordingBackend {
    textures: SlotMap<TextureId, RecordedTexture>,
    draws: Vec<RecordedDraw>,
    frame_size: (u32, u32),
    created: usize,
    destroyed: usize,
    frames: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(&self, id: TextureId) -> Option<&RecordedTexture> {
        self.textures.get(id)
    }

    /// Live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Textures ever created
    pub fn textures_created(&self) -> usize {
        self.created
    }

    pub fn textures_destroyed(&self) -> usize {
        self.destroyed
    }

    /// `write_texture` calls on live textures
    pub fn total_writes(&self) -> usize {
        self.textures.values().map(|t| t.writes).sum()
    }

    /// Draws of the current or last frame
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    /// Completed frames
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl RenderBackend for RecordingBackend {
    fn create_texture(&mut self, width: u32, height: u32, format: TextureFormat) -> TextureId {
        self.created += 1;
        self.textures.insert(RecordedTexture {
            width,
            height,
            format,
            writes: 0,
            regions: Vec::new(),
        })
    }

    fn write_texture(&mut self, texture: TextureId, region: Rect, data: &[u8]) {
        if let Some(t) = self.textures.get_mut(texture) {
            debug_assert_eq!(
                data.len(),
                (region.width() * region.height()) as usize * t.format.bytes_per_pixel()
            );
            t.writes += 1;
            t.regions.push(region);
        }
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if self.textures.remove(texture).is_some() {
            self.destroyed += 1;
        }
    }

    fn begin_frame(&mut self, width: u32, height: u32) {
        self.frame_size = (width, height);
        self.draws.clear();
    }

    fn draw_quads(&mut self, texture: TextureId, vertices: &[QuadVertex]) {
        self.draws.push(RecordedDraw::Quads {
            texture,
            vertices: vertices.to_vec(),
        });
    }

    fn draw_shadows(&mut self, vertices: &[ShadowVertex]) {
        self.draws.push(RecordedDraw::Shadows {
            vertices: vertices.to_vec(),
        });
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}
