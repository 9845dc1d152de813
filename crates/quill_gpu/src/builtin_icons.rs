//! Built-in icon set
//!
//! Icons are drawn from stroke outlines on a 24×24 grid with a stroke width
//! of 2 and round caps, and rasterized with analytic coverage. Names with a
//! dotted suffix fall back to their base name (`up.arrow` → `up`), and
//! unknown names draw the `help` icon.

use image::GrayImage;
use quill_paint::IconLookup;

const GRID: f32 = 24.0;
const STROKE: f32 = 2.0;

/// Supported icon sizes in pixels
pub const ICON_SIZES: [i32; 4] = [18, 24, 36, 48];

#[derive(Clone, Copy, Debug)]
enum Shape {
    /// Open polyline through the points
    Path(&'static [(f32, f32)]),
    Circle(f32, f32, f32),
    /// Rectangle outline `x, y, w, h` with rounded corners
    Rect(f32, f32, f32, f32, f32),
    /// Filled dot
    Dot(f32, f32, f32),
}

const CHECK: Shape = Shape::Path(&[(7.0, 12.5), (10.5, 16.0), (17.0, 8.5)]);
const BOX: Shape = Shape::Rect(3.0, 3.0, 18.0, 18.0, 2.0);
const RING: Shape = Shape::Circle(12.0, 12.0, 10.0);
const QUESTION_MARK: Shape = Shape::Path(&[
    (9.1, 9.0),
    (9.6, 7.6),
    (10.8, 6.7),
    (12.3, 6.5),
    (13.8, 6.9),
    (14.8, 8.0),
    (15.0, 9.3),
    (14.3, 10.6),
    (12.0, 12.0),
    (12.0, 13.5),
]);
const QUESTION_DOT: Shape = Shape::Dot(12.0, 17.0, 1.2);

fn shapes(name: &str) -> Option<&'static [Shape]> {
    Some(match name {
        "help" | "question" => &[RING, QUESTION_MARK, QUESTION_DOT],
        "info" => &[
            RING,
            Shape::Path(&[(12.0, 16.0), (12.0, 11.0)]),
            Shape::Dot(12.0, 8.0, 1.2),
        ],
        "warning" => &[
            Shape::Path(&[(12.0, 3.0), (22.0, 20.5), (2.0, 20.5), (12.0, 3.0)]),
            Shape::Path(&[(12.0, 9.0), (12.0, 13.5)]),
            Shape::Dot(12.0, 17.0, 1.2),
        ],
        "error" => &[
            RING,
            Shape::Path(&[(12.0, 7.0), (12.0, 12.5)]),
            Shape::Dot(12.0, 16.5, 1.2),
        ],
        "checkbox" => &[BOX],
        "checkboxChecked" => &[BOX, CHECK],
        "check" => &[CHECK],
        "close" => &[
            Shape::Path(&[(6.0, 6.0), (18.0, 18.0)]),
            Shape::Path(&[(18.0, 6.0), (6.0, 18.0)]),
        ],
        "add" => &[
            Shape::Path(&[(12.0, 5.0), (12.0, 19.0)]),
            Shape::Path(&[(5.0, 12.0), (19.0, 12.0)]),
        ],
        "remove" => &[Shape::Path(&[(5.0, 12.0), (19.0, 12.0)])],
        "up" => &[Shape::Path(&[(6.0, 15.0), (12.0, 9.0), (18.0, 15.0)])],
        "down" => &[Shape::Path(&[(6.0, 9.0), (12.0, 15.0), (18.0, 9.0)])],
        "left" => &[Shape::Path(&[(15.0, 6.0), (9.0, 12.0), (15.0, 18.0)])],
        "right" => &[Shape::Path(&[(9.0, 6.0), (15.0, 12.0), (9.0, 18.0)])],
        "up.arrow" => &[
            Shape::Path(&[(12.0, 19.0), (12.0, 5.0)]),
            Shape::Path(&[(5.0, 12.0), (12.0, 5.0), (19.0, 12.0)]),
        ],
        "down.arrow" => &[
            Shape::Path(&[(12.0, 5.0), (12.0, 19.0)]),
            Shape::Path(&[(5.0, 12.0), (12.0, 19.0), (19.0, 12.0)]),
        ],
        "left.arrow" => &[
            Shape::Path(&[(19.0, 12.0), (5.0, 12.0)]),
            Shape::Path(&[(12.0, 5.0), (5.0, 12.0), (12.0, 19.0)]),
        ],
        "right.arrow" => &[
            Shape::Path(&[(5.0, 12.0), (19.0, 12.0)]),
            Shape::Path(&[(12.0, 5.0), (19.0, 12.0), (12.0, 19.0)]),
        ],
        "menu" => &[
            Shape::Path(&[(4.0, 6.0), (20.0, 6.0)]),
            Shape::Path(&[(4.0, 12.0), (20.0, 12.0)]),
            Shape::Path(&[(4.0, 18.0), (20.0, 18.0)]),
        ],
        "radiobutton" => &[RING],
        "radiobuttonSelected" => &[RING, Shape::Dot(12.0, 12.0, 5.0)],
        _ => return None,
    })
}

/// Resolve `name` to a drawable icon, stripping dotted suffixes first
fn find(name: &str) -> &'static [Shape] {
    let mut name = name;
    loop {
        if let Some(shapes) = shapes(name) {
            return shapes;
        }
        match name.rfind('.') {
            Some(i) => name = &name[..i],
            None => return shapes("help").unwrap_or(&[]),
        }
    }
}

fn segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx - p.0, a.1 + t * dy - p.1);
    (cx * cx + cy * cy).sqrt()
}

/// Signed distance to the inked area of a shape, in grid units
fn distance(shape: &Shape, p: (f32, f32)) -> f32 {
    let half = STROKE / 2.0;
    match *shape {
        Shape::Path(points) => {
            let d = points
                .windows(2)
                .map(|w| segment_distance(p, w[0], w[1]))
                .fold(f32::INFINITY, f32::min);
            d - half
        }
        Shape::Circle(cx, cy, r) => {
            let d = ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt();
            (d - r).abs() - half
        }
        Shape::Rect(x, y, w, h, r) => {
            // rounded box outline
            let (hx, hy) = (w / 2.0 - r, h / 2.0 - r);
            let qx = (p.0 - (x + w / 2.0)).abs() - hx;
            let qy = (p.1 - (y + h / 2.0)).abs() - hy;
            let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
            let sd = outside + qx.max(qy).min(0.0) - r;
            sd.abs() - half
        }
        Shape::Dot(cx, cy, r) => ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt() - r,
    }
}

/// The built-in [`IconLookup`]
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinIcons;

impl BuiltinIcons {
    pub fn new() -> Self {
        Self
    }

    /// Check whether `name` has its own drawing, without falling back
    pub fn has_icon(name: &str) -> bool {
        shapes(name).is_some()
    }
}

impl IconLookup for BuiltinIcons {
    fn icon_size(&self, requested: i32) -> i32 {
        match requested {
            s if s < 24 => 18,
            s if s < 36 => 24,
            s if s < 48 => 36,
            _ => 48,
        }
    }

    fn draw_icon(&self, target: &mut GrayImage, name: &str) {
        let shapes = find(name);
        let side = target.width().max(1) as f32;
        let scale = GRID / side;
        for (x, y, px) in target.enumerate_pixels_mut() {
            let p = ((x as f32 + 0.5) * scale, (y as f32 + 0.5) * scale);
            let d = shapes
                .iter()
                .map(|s| distance(s, p))
                .fold(f32::INFINITY, f32::min);
            // one pixel wide anti-aliased edge
            let coverage = (0.5 - d / scale).clamp(0.0, 1.0);
            px.0 = [(coverage * 255.0).round() as u8];
        }
    }
}
