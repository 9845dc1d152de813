//! Renderer tests against the recording backend

use std::rc::Rc;

use image::{Rgba, RgbaImage};
use quill_gpu::{BuiltinIcons, RecordedDraw, RecordingBackend, Renderer, RendererConfig};
use quill_paint::{
    Buffer, Color, FixedFontLookup, FixedMetrics, Font, FontLookup, FontMetrics, ImageHandle,
    Point, Rect,
};
use quill_text::{FontFace, GlyphProvider, RasterizedGlyph};

/// Solid glyph boxes; `\u{0}` has no pixels
struct BoxGlyphs;

impl FontLookup for BoxGlyphs {
    fn closest(&self, font: &Font) -> Font {
        FixedFontLookup.closest(font)
    }

    fn metrics(&self, font: &Font) -> Rc<dyn FontMetrics> {
        FixedFontLookup.metrics(font)
    }
}

impl GlyphProvider for BoxGlyphs {
    fn face(&self, _font: &Font) -> Option<Rc<FontFace>> {
        None
    }

    fn rasterize(&self, font: &Font, c: char, _x_offset: f32) -> RasterizedGlyph {
        let m = FixedMetrics::new(font.size);
        if c == '\u{0}' {
            return RasterizedGlyph::empty(m.char_advance());
        }
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

fn setup() -> (Renderer<RecordingBackend>, Buffer) {
    let renderer = Renderer::new(
        RecordingBackend::new(),
        Rc::new(BoxGlyphs),
        Rc::new(BuiltinIcons::new()),
        RendererConfig::default(),
    );
    let mut buffer = Buffer::new(Rc::new(FixedFontLookup));
    buffer.reset(100, 100);
    (renderer, buffer)
}

fn frame(renderer: &mut Renderer<RecordingBackend>, buffer: &mut Buffer) {
    renderer.draw(100, 100, buffer.finish());
}

fn quad_vertices(draw: &RecordedDraw) -> &[quill_gpu::QuadVertex] {
    match draw {
        RecordedDraw::Quads { vertices, .. } => vertices,
        RecordedDraw::Shadows { .. } => panic!("expected quads, got shadows"),
    }
}

#[test]
fn test_quads_are_batched_by_texture() {
    let (mut renderer, mut buffer) = setup();
    let red = Color::rgb(1.0, 0.0, 0.0);
    buffer.fill(Rect::wh(10, 10), red);
    buffer.fill(Rect::xywh(20, 0, 10, 10), red);
    buffer.text(Point::new(0, 40), "ab", &Font::new("sans", 12.0), Color::BLACK);
    buffer.fill(Rect::xywh(40, 0, 10, 10), red);
    frame(&mut renderer, &mut buffer);

    let draws = renderer.backend().draws();
    let counts: Vec<usize> = draws.iter().map(|d| d.quads()).collect();
    assert_eq!(counts, vec![2, 2, 1]);

    let textures: Vec<_> = draws
        .iter()
        .map(|d| match d {
            RecordedDraw::Quads { texture, .. } => Some(*texture),
            RecordedDraw::Shadows { .. } => None,
        })
        .collect();
    assert_eq!(textures[0], textures[2]);
    assert_ne!(textures[0], textures[1]);
    assert_eq!(renderer.backend().frames(), 1);
}

#[test]
fn test_text_quads_follow_the_pen() {
    let (mut renderer, mut buffer) = setup();
    buffer.text(Point::new(0, 40), "ab", &Font::new("sans", 12.0), Color::BLACK);
    frame(&mut renderer, &mut buffer);

    let draws = renderer.backend().draws();
    assert_eq!(draws.len(), 1);
    let v = quad_vertices(&draws[0]);
    // ascent 10, descent 3, advance 6
    assert_eq!(v[0].position, [0.0, 30.0]);
    assert_eq!(v[4].position, [6.0, 43.0]);
    assert_eq!(v[6].position, [6.0, 30.0]);
    assert_eq!(renderer.atlas().cached_glyphs(), 2);
}

#[test]
fn test_empty_glyph_draws_nothing() {
    let (mut renderer, mut buffer) = setup();
    buffer.text(Point::new(0, 40), "\u{0}", &Font::default(), Color::BLACK);
    frame(&mut renderer, &mut buffer);
    assert!(renderer.backend().draws().is_empty());
}

#[test]
fn test_clipping_shrinks_texture_coordinates() {
    let (mut renderer, mut buffer) = setup();
    let image = ImageHandle::new(RgbaImage::new(4, 4));
    buffer.push(Rect::xywh(10, 10, 20, 20));
    buffer.image(Rect::xywh(-10, 0, 40, 20), &image, Color::WHITE, false);
    buffer.pop();
    frame(&mut renderer, &mut buffer);

    let draws = renderer.backend().draws();
    assert_eq!(draws.len(), 1);
    let v = quad_vertices(&draws[0]);
    assert_eq!(v[0].position, [10.0, 10.0]);
    assert_eq!(v[0].uv, [0.25, 0.0]);
    assert_eq!(v[4].position, [30.0, 30.0]);
    assert_eq!(v[4].uv, [0.75, 1.0]);
}

#[test]
fn test_fully_clipped_commands_are_dropped() {
    let (mut renderer, mut buffer) = setup();
    buffer.push(Rect::xywh(0, 0, 10, 10));
    buffer.fill(Rect::xywh(20, 20, 5, 5), Color::BLACK);
    buffer.pop();
    frame(&mut renderer, &mut buffer);
    assert!(renderer.backend().draws().is_empty());
}

#[test]
fn test_outline_is_four_edges() {
    let (mut renderer, mut buffer) = setup();
    buffer.outline(Rect::xywh(10, 10, 20, 10), Color::BLACK);
    frame(&mut renderer, &mut buffer);

    let draws = renderer.backend().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].quads(), 4);
    let v = quad_vertices(&draws[0]);
    // left edge is one pixel wide
    assert_eq!(v[0].position, [10.0, 10.0]);
    assert_eq!(v[4].position, [11.0, 20.0]);
}

#[test]
fn test_static_image_uploads_once() {
    let (mut renderer, mut buffer) = setup();
    let image = ImageHandle::new(RgbaImage::new(8, 8));
    for _ in 0..5 {
        buffer.reset(100, 100);
        buffer.image(Rect::wh(8, 8), &image, Color::WHITE, false);
        frame(&mut renderer, &mut buffer);
    }
    assert_eq!(renderer.images().uploads(), 1);
    assert_eq!(renderer.backend().frames(), 5);
}

#[test]
fn test_dynamic_image_reuploads_on_change() {
    let (mut renderer, mut buffer) = setup();
    let image = ImageHandle::new(RgbaImage::new(8, 8));
    let mut draw = |renderer: &mut Renderer<RecordingBackend>| {
        buffer.reset(100, 100);
        buffer.image(Rect::wh(8, 8), &image, Color::WHITE, true);
        frame(renderer, &mut buffer);
    };

    draw(&mut renderer);
    draw(&mut renderer);
    assert_eq!(renderer.images().uploads(), 1);

    image.pixels_mut().put_pixel(3, 3, Rgba([0, 0, 255, 255]));
    draw(&mut renderer);
    draw(&mut renderer);
    assert_eq!(renderer.images().uploads(), 2);
}

#[test]
fn test_dropped_images_are_released() {
    let (mut renderer, mut buffer) = setup();
    let image = ImageHandle::new(RgbaImage::new(2, 2));
    buffer.image(Rect::wh(2, 2), &image, Color::WHITE, false);
    frame(&mut renderer, &mut buffer);
    assert_eq!(renderer.images().len(), 1);

    drop(image);
    buffer.reset(100, 100);
    frame(&mut renderer, &mut buffer);
    assert!(renderer.images().is_empty());
}

#[test]
fn test_sub_image_samples_the_source_rect() {
    let (mut renderer, mut buffer) = setup();
    let image = ImageHandle::new(RgbaImage::new(16, 8));
    buffer.sub_image(
        Rect::wh(8, 8),
        &image,
        Rect::xywh(8, 0, 8, 4),
        Color::WHITE,
        false,
    );
    frame(&mut renderer, &mut buffer);

    let v = quad_vertices(&renderer.backend().draws()[0]);
    assert_eq!(v[0].uv, [0.5, 0.0]);
    assert_eq!(v[4].uv, [1.0, 0.5]);
}

#[test]
fn test_shadow_extends_past_its_rect() {
    let (mut renderer, mut buffer) = setup();
    buffer.fill(Rect::wh(5, 5), Color::WHITE);
    buffer.shadow(Rect::xywh(20, 20, 10, 10), Color::BLACK, 5);
    buffer.fill(Rect::wh(5, 5), Color::WHITE);
    frame(&mut renderer, &mut buffer);

    let draws = renderer.backend().draws();
    assert_eq!(draws.len(), 3);
    let RecordedDraw::Shadows { vertices } = &draws[1] else {
        panic!("expected the shadow between the fills");
    };
    assert_eq!(vertices.len(), 6);
    assert_eq!(vertices[0].position, [15.0, 15.0]);
    assert_eq!(vertices[4].position, [35.0, 35.0]);
    assert_eq!(vertices[0].rect, [20.0, 20.0, 30.0, 30.0]);
    assert_eq!(vertices[0].sigma, 2.0);
}

#[test]
fn test_icon_is_centered_at_its_sheet_size() {
    let (mut renderer, mut buffer) = setup();
    buffer.icon(Rect::xywh(0, 0, 30, 40), "check", Color::BLACK);
    frame(&mut renderer, &mut buffer);

    let v = quad_vertices(&renderer.backend().draws()[0]);
    // 30 pixels request the 24 pixel sheet
    assert_eq!(v[0].position, [3.0, 8.0]);
    assert_eq!(v[4].position, [27.0, 32.0]);
}
