//! Command list renderer
//!
//! Walks command lists in order and turns every command into quads. Quads
//! sharing a texture are collected into one batch; a batch is handed to the
//! backend when the texture changes, when it is full, or when a shadow is
//! drawn in between. Clipping happens on the CPU by cutting quads and their
//! texture coordinates to the clip rectangle.

use std::rc::Rc;

use quill_paint::{
    Color, Command, CommandList, Font, FontLookup, IconLookup, ImageHandle, Point, Rect,
};
use quill_text::GlyphProvider;

use crate::atlas::GlyphAtlas;
use crate::backend::{QuadVertex, RenderBackend, ShadowVertex, TextureFormat, TextureId};
use crate::config::RendererConfig;
use crate::icons::IconSheets;
use crate::image_cache::ImageCache;

/// Shadow blur standard deviation per pixel of shadow radius
const SHADOW_SIGMA: f32 = 0.4;

/// Draws command lists through a [`RenderBackend`]
pub struct Renderer<B: RenderBackend> {
    backend: B,
    config: RendererConfig,
    glyphs: Rc<dyn GlyphProvider>,
    icons: Rc<dyn IconLookup>,
    atlas: GlyphAtlas,
    images: ImageCache,
    icon_sheets: IconSheets,
    /// 1×1 opaque alpha texture for untextured quads
    white: TextureId,
    current: Option<TextureId>,
    quads: Vec<QuadVertex>,
    shadows: Vec<ShadowVertex>,
    frame: u64,
}

impl<B: RenderBackend> Renderer<B> {
    pub fn new(
        mut backend: B,
        glyphs: Rc<dyn GlyphProvider>,
        icons: Rc<dyn IconLookup>,
        config: RendererConfig,
    ) -> Self {
        let white = backend.create_texture(1, 1, TextureFormat::Alpha);
        backend.write_texture(white, Rect::wh(1, 1), &[255]);
        let quads = Vec::with_capacity(config.quad_batch_capacity * 6);
        let shadows = Vec::with_capacity(config.shadow_batch_capacity * 6);
        tracing::info!(
            "Renderer ready (atlas {}px, {} quads per batch)",
            config.atlas_size,
            config.quad_batch_capacity
        );
        Self {
            atlas: GlyphAtlas::new(&config),
            images: ImageCache::new(),
            icon_sheets: IconSheets::new(config.icon_sheet_columns),
            backend,
            config,
            glyphs,
            icons,
            white,
            current: None,
            quads,
            shadows,
            frame: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Frames drawn so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Replace the icon set; cached icon sheets are dropped
    pub fn set_icons(&mut self, icons: Rc<dyn IconLookup>) {
        self.icon_sheets.clear(&mut self.backend);
        self.icons = icons;
    }

    /// Draw one frame
    ///
    /// Lists are drawn in order and commands in order within a list.
    pub fn draw(&mut self, width: u32, height: u32, lists: &[CommandList]) {
        self.backend.begin_frame(width, height);
        self.current = None;
        for list in lists {
            for command in &list.commands {
                self.draw_command(list.offset, list.clip, command);
            }
        }
        self.flush_quads();
        self.flush_shadows();
        self.backend.end_frame();

        self.images
            .collect(&mut self.backend, self.frame, self.config.image_gc_frames);
        self.frame += 1;
    }

    fn draw_command(&mut self, offset: Point, clip: Rect, command: &Command) {
        match command {
            Command::Fill { rect, color } => {
                self.prepare(self.white);
                let r = rect.translate(offset).intersect(clip);
                self.push_quad(r, [0.0, 0.0, 1.0, 1.0], *color);
            }
            Command::Outline { rect, color } => {
                self.prepare(self.white);
                let r = rect.translate(offset);
                let edges = [
                    Rect::xyxy(r.min.x, r.min.y, r.min.x + 1, r.max.y),
                    Rect::xyxy(r.max.x - 1, r.min.y, r.max.x, r.max.y),
                    Rect::xyxy(r.min.x, r.min.y, r.max.x, r.min.y + 1),
                    Rect::xyxy(r.min.x, r.max.y - 1, r.max.x, r.max.y),
                ];
                for edge in edges {
                    self.push_quad(edge.intersect(clip), [0.0, 0.0, 1.0, 1.0], *color);
                }
            }
            Command::Text {
                position,
                text,
                font,
                color,
            } => self.draw_text(*position + offset, text, font, clip, *color),
            Command::Shadow {
                rect,
                color,
                radius,
            } => self.draw_shadow(rect.translate(offset), clip, *radius, *color),
            Command::Icon { rect, name, color } => {
                self.draw_icon(rect.translate(offset), clip, name, *color)
            }
            Command::Image {
                rect,
                image,
                color,
                update,
            } => {
                let texture = self.images.texture(&mut self.backend, image, *update, self.frame);
                self.prepare(texture);
                self.clipped_quad(rect.translate(offset), clip, [0.0, 0.0, 1.0, 1.0], *color);
            }
            Command::SubImage {
                rect,
                image,
                source,
                color,
                update,
            } => self.draw_sub_image(rect.translate(offset), clip, image, *source, *color, *update),
        }
    }

    fn draw_text(&mut self, origin: Point, text: &str, font: &Font, clip: Rect, color: Color) {
        let font = self.glyphs.closest(font);
        let phases = self.glyphs.subpixel_phases(&font).max(1);
        let baseline = origin.y;
        let mut x = origin.x as f32;
        let mut last = None;
        for c in text.chars() {
            if let Some(prev) = last {
                x += self.glyphs.kerning(&font, prev, c);
            }
            let xint = x.floor();
            let phase = (((x - xint) * phases as f32) as u32).min(phases - 1) as u8;
            let glyph = self.atlas.glyph(
                &mut self.backend,
                self.glyphs.as_ref(),
                &font,
                c,
                phase,
                phases,
                self.frame,
            );
            if let Some(texture) = glyph.texture {
                self.prepare(texture);
                let pen = Point::new(xint as i32, baseline);
                let [x0, y0, x1, y1] = glyph.bounds;
                let r = Rect::xyxy(pen.x + x0, pen.y + y0, pen.x + x1, pen.y + y1);
                self.clipped_quad(r, clip, glyph.uv, color);
            }
            x += glyph.advance;
            last = Some(c);
        }
    }

    fn draw_shadow(&mut self, rect: Rect, clip: Rect, radius: i32, color: Color) {
        self.flush_quads();
        let area = rect.inset(-radius).intersect(clip);
        if area.is_empty() {
            return;
        }
        if self.shadows.len() + 6 > self.config.shadow_batch_capacity.max(1) * 6 {
            self.flush_shadows();
        }
        let vertex = |x: i32, y: i32| ShadowVertex {
            position: [x as f32, y as f32],
            sigma: (radius as f32 * SHADOW_SIGMA).max(0.01),
            _padding: 0.0,
            color: color.to_f32_array(),
            rect: [
                rect.min.x as f32,
                rect.min.y as f32,
                rect.max.x as f32,
                rect.max.y as f32,
            ],
        };
        let (a, b, c, d) = (
            vertex(area.min.x, area.min.y),
            vertex(area.min.x, area.max.y),
            vertex(area.max.x, area.min.y),
            vertex(area.max.x, area.max.y),
        );
        self.shadows.extend_from_slice(&[a, b, c, c, d, b]);
    }

    fn draw_icon(&mut self, rect: Rect, clip: Rect, name: &str, color: Color) {
        if name.is_empty() {
            return;
        }
        let side = rect.width().min(rect.height());
        let icon = self
            .icon_sheets
            .icon(&mut self.backend, self.icons.as_ref(), side, name);
        let dx = (rect.width() - icon.size) / 2;
        let dy = (rect.height() - icon.size) / 2;
        let r = Rect::xywh(rect.min.x + dx, rect.min.y + dy, icon.size, icon.size);
        self.prepare(icon.texture);
        self.clipped_quad(r, clip, icon.uv, color);
    }

    fn draw_sub_image(
        &mut self,
        rect: Rect,
        clip: Rect,
        image: &ImageHandle,
        source: Rect,
        color: Color,
        update: bool,
    ) {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let texture = self.images.texture(&mut self.backend, image, update, self.frame);
        self.prepare(texture);
        let (w, h) = (w as f32, h as f32);
        let uv = [
            source.min.x as f32 / w,
            source.min.y as f32 / h,
            source.max.x as f32 / w,
            source.max.y as f32 / h,
        ];
        self.clipped_quad(rect, clip, uv, color);
    }

    /// Switch the quad batch to `texture`, flushing pending shadows first
    fn prepare(&mut self, texture: TextureId) {
        self.flush_shadows();
        if self.current != Some(texture) {
            self.flush_quads();
            self.current = Some(texture);
        }
    }

    /// Cut `r` to `clip`, shrinking the texture coordinates with it
    fn clipped_quad(&mut self, mut r: Rect, clip: Rect, mut uv: [f32; 4], color: Color) {
        if r.is_empty()
            || clip.min.x >= r.max.x
            || clip.min.y >= r.max.y
            || clip.max.x <= r.min.x
            || clip.max.y <= r.min.y
        {
            return;
        }
        let (w, h) = (r.width() as f32, r.height() as f32);
        if clip.min.x > r.min.x {
            uv[0] += (uv[2] - uv[0]) * (clip.min.x - r.min.x) as f32 / w;
            r.min.x = clip.min.x;
        }
        if clip.min.y > r.min.y {
            uv[1] += (uv[3] - uv[1]) * (clip.min.y - r.min.y) as f32 / h;
            r.min.y = clip.min.y;
        }
        if clip.max.x < r.max.x {
            uv[2] -= (uv[2] - uv[0]) * (r.max.x - clip.max.x) as f32 / r.width() as f32;
            r.max.x = clip.max.x;
        }
        if clip.max.y < r.max.y {
            uv[3] -= (uv[3] - uv[1]) * (r.max.y - clip.max.y) as f32 / r.height() as f32;
            r.max.y = clip.max.y;
        }
        self.push_quad(r, uv, color);
    }

    fn push_quad(&mut self, r: Rect, uv: [f32; 4], color: Color) {
        if r.is_empty() {
            return;
        }
        if self.quads.len() + 6 > self.config.quad_batch_capacity.max(1) * 6 {
            self.flush_quads();
        }
        let color = color.to_f32_array();
        let vertex = |x: i32, y: i32, u: f32, v: f32| QuadVertex {
            position: [x as f32, y as f32],
            uv: [u, v],
            color,
        };
        let a = vertex(r.min.x, r.min.y, uv[0], uv[1]);
        let b = vertex(r.min.x, r.max.y, uv[0], uv[3]);
        let c = vertex(r.max.x, r.min.y, uv[2], uv[1]);
        let d = vertex(r.max.x, r.max.y, uv[2], uv[3]);
        self.quads.extend_from_slice(&[a, b, c, c, d, b]);
    }

    fn flush_quads(&mut self) {
        if self.quads.is_empty() {
            return;
        }
        if let Some(texture) = self.current {
            self.backend.draw_quads(texture, &self.quads);
        }
        self.quads.clear();
    }

    fn flush_shadows(&mut self) {
        if self.shadows.is_empty() {
            return;
        }
        self.backend.draw_shadows(&self.shadows);
        self.shadows.clear();
    }
}

impl<B: RenderBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.atlas.clear(&mut self.backend);
        self.images.clear(&mut self.backend);
        self.icon_sheets.clear(&mut self.backend);
        self.backend.destroy_texture(self.white);
    }
}
