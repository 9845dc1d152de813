//! Renderer configuration

use serde::{Deserialize, Serialize};

/// Configuration for creating a [`Renderer`](crate::Renderer)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Width and height of each glyph atlas page in pixels
    pub atlas_size: u32,
    /// Frames an atlas line may go unused before it can be reclaimed
    pub glyph_gc_frames: u64,
    /// Fraction of a page in use above which reclaiming is tried before a new page is allocated
    pub atlas_soft_ceiling: f32,
    /// Frames an image texture may go unused before it is released
    pub image_gc_frames: u64,
    /// Quads per draw call before the quad batch is flushed
    pub quad_batch_capacity: usize,
    /// Shadow quads per draw call before the shadow batch is flushed
    pub shadow_batch_capacity: usize,
    /// Icons per row and column of an icon sheet
    pub icon_sheet_columns: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            atlas_size: 1024,
            glyph_gc_frames: 10,
            atlas_soft_ceiling: 0.8,
            image_gc_frames: 600,
            quad_batch_capacity: 1024,
            shadow_batch_capacity: 512,
            icon_sheet_columns: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RendererConfig = toml::from_str("atlas_size = 512\nglyph_gc_frames = 4").unwrap();
        assert_eq!(config.atlas_size, 512);
        assert_eq!(config.glyph_gc_frames, 4);
        assert_eq!(config.quad_batch_capacity, 1024);
        assert_eq!(config.icon_sheet_columns, 16);
    }
}
