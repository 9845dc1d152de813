//! Premultiplied RGBA colors

/// 32-bit RGBA color with premultiplied alpha
///
/// The layout matches what the renderer uploads per vertex, so a `Color`
/// can be copied into GPU buffers unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn channel(v: f32) -> u8 {
    if v >= 1.0 {
        255
    } else if v > 0.0 {
        (v * 255.0) as u8
    } else {
        0
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color::premultiplied(0, 0, 0, 0);
    pub const BLACK: Color = Color::premultiplied(0, 0, 0, 255);
    pub const WHITE: Color = Color::premultiplied(255, 255, 255, 255);

    /// Create from components that are already multiplied by alpha
    pub const fn premultiplied(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create from straight float components in `[0, 1]`
    ///
    /// The color channels are multiplied with `a`.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: channel(r * a),
            g: channel(g * a),
            b: channel(b * a),
            a: channel(a),
        }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Opaque gray, 0 is black and 1 is white
    pub fn gray(intensity: f32) -> Self {
        let v = channel(intensity);
        Self::premultiplied(v, v, v, 255)
    }

    /// Create from straight (non-premultiplied) u8 components
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Self::premultiplied(mul(r), mul(g), mul(b), a)
    }

    /// Create from hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgba8(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
            255,
        )
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (straight alpha)
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !digits.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn r(&self) -> f32 {
        self.r as f32 / 255.0
    }

    pub fn g(&self) -> f32 {
        self.g as f32 / 255.0
    }

    pub fn b(&self) -> f32 {
        self.b as f32 / 255.0
    }

    pub fn a(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Linear mix of two colors, `f` in `[0, 1]`
    ///
    /// Premultiplied components interpolate correctly without unpremultiplying.
    pub fn blend(self, other: Color, f: f32) -> Color {
        let f = f.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
        Color::premultiplied(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Scale every component (fades the color towards transparent)
    pub fn fade(self, f: f32) -> Color {
        Color::TRANSPARENT.blend(self, f)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_f32_array(self) -> [f32; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    /// Format as `#rrggbbaa` with straight alpha
    pub fn to_hex_string(self) -> String {
        let un = |c: u8| {
            if self.a == 0 {
                0
            } else {
                ((c as u16 * 255 + self.a as u16 / 2) / self.a as u16).min(255) as u8
            }
        };
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            un(self.r),
            un(self.g),
            un(self.b),
            self.a
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_premultiplies() {
        let c = Color::rgba(1.0, 1.0, 1.0, 0.5);
        assert_eq!(c.a, 127);
        assert_eq!(c.r, 127);
        assert_eq!(Color::rgba(0.0, 0.0, 0.0, 0.0), Color::TRANSPARENT);
    }

    #[test]
    fn test_rgba_clamps() {
        assert_eq!(Color::rgba(2.0, -1.0, 0.0, 1.0), Color::premultiplied(255, 0, 0, 255));
        assert_eq!(Color::gray(1.5), Color::WHITE);
        assert_eq!(Color::gray(-0.5), Color::BLACK);
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Color::BLACK;
        let b = Color::WHITE;
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
        assert_eq!(a.blend(b, 0.5).r, 128);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse_hex("#ffffff"), Some(Color::WHITE));
        assert_eq!(Color::parse_hex("000000ff"), Some(Color::BLACK));
        assert_eq!(Color::parse_hex("#00000000"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse_hex("#fff"), None);
        assert_eq!(Color::parse_hex("#gggggg"), None);
    }

    #[test]
    fn test_hex_string_round_trip() {
        let c = Color::from_rgba8(200, 100, 50, 255);
        assert_eq!(Color::parse_hex(&c.to_hex_string()), Some(c));
    }
}
