//! Measured, aligned single-line text
//!
//! Widgets keep a [`TextLabel`] per text they draw. It caches the measured
//! size until the text or font changes, and places the baseline so that the
//! text is vertically centered in the target rectangle.

use quill_paint::{Buffer, Color, Font, FontLookup, Point, Rect};

/// Cached measurement of one line of text
#[derive(Clone, Debug, Default)]
pub struct TextLabel {
    text: String,
    font: Option<Font>,
    w: i32,
    h: i32,
    /// Baseline offset from the vertical center
    b: i32,
}

impl TextLabel {
    pub fn new() -> Self {
        Self::default()
    }

    fn measure(&mut self, text: &str, font: &Font, fonts: &dyn FontLookup) {
        if self.text != text || self.font.as_ref() != Some(font) {
            let m = fonts.metrics(font);
            self.text = text.to_owned();
            self.font = Some(font.clone());
            self.w = m.advance(text) as i32;
            self.h = m.line_height();
            self.b = (m.ascent() - m.descent()) / 2;
        }
    }

    /// `(width, line height)` of `text`
    pub fn size(&mut self, text: &str, font: &Font, fonts: &dyn FontLookup) -> (i32, i32) {
        self.measure(text, font, fonts);
        (self.w, self.h)
    }

    /// Size including an icon square of line height and a `gap`
    pub fn size_icon(
        &mut self,
        text: &str,
        font: &Font,
        icon: &str,
        gap: i32,
        fonts: &dyn FontLookup,
    ) -> (i32, i32) {
        self.measure(text, font, fonts);
        match (icon.is_empty(), text.is_empty()) {
            (true, _) => (self.w, self.h),
            (false, true) => (self.w + self.h, self.h),
            (false, false) => (self.w + self.h + gap, self.h),
        }
    }

    fn baseline(&self, r: Rect) -> i32 {
        (r.min.y + r.max.y) / 2 + self.b
    }

    pub fn draw_left(&mut self, buf: &mut Buffer, r: Rect, text: &str, font: &Font, color: Color) {
        self.measure(text, font, buf.fonts());
        buf.text(Point::new(r.min.x, self.baseline(r)), text, font, color);
    }

    pub fn draw_centered(&mut self, buf: &mut Buffer, r: Rect, text: &str, font: &Font, color: Color) {
        self.measure(text, font, buf.fonts());
        let x = r.min.x + (r.width() - self.w) / 2;
        buf.text(Point::new(x, self.baseline(r)), text, font, color);
    }

    pub fn draw_right(&mut self, buf: &mut Buffer, r: Rect, text: &str, font: &Font, color: Color) {
        self.measure(text, font, buf.fonts());
        buf.text(Point::new(r.max.x - self.w, self.baseline(r)), text, font, color);
    }

    /// Icon square at the left edge, then the text after `gap` pixels
    #[allow(clippy::too_many_arguments)]
    pub fn draw_left_icon(
        &mut self,
        buf: &mut Buffer,
        mut r: Rect,
        text: &str,
        font: &Font,
        color: Color,
        icon: &str,
        gap: i32,
    ) {
        self.measure(text, font, buf.fonts());
        if !icon.is_empty() {
            buf.icon(Rect::xywh(r.min.x, r.min.y, self.h, r.height()), icon, color);
            r.min.x += gap + self.h;
        }
        buf.text(Point::new(r.min.x, self.baseline(r)), text, font, color);
    }

    /// Icon and text centered together
    #[allow(clippy::too_many_arguments)]
    pub fn draw_centered_icon(
        &mut self,
        buf: &mut Buffer,
        mut r: Rect,
        text: &str,
        font: &Font,
        color: Color,
        icon: &str,
        mut gap: i32,
    ) {
        self.measure(text, font, buf.fonts());
        let (w, h) = (self.w, self.h);
        if !icon.is_empty() {
            if text.is_empty() {
                gap = 0;
            }
            let x = r.min.x + (r.width() - w - gap - h) / 2;
            buf.icon(Rect::xywh(x, r.min.y, h, r.height()), icon, color);
            r.min.x += gap + h;
        }
        let x = r.min.x + (r.width() - w) / 2;
        buf.text(Point::new(x, self.baseline(r)), text, font, color);
    }

    /// Icon and text aligned to the right edge
    #[allow(clippy::too_many_arguments)]
    pub fn draw_right_icon(
        &mut self,
        buf: &mut Buffer,
        mut r: Rect,
        text: &str,
        font: &Font,
        color: Color,
        icon: &str,
        gap: i32,
    ) {
        self.measure(text, font, buf.fonts());
        let (w, h) = (self.w, self.h);
        if !icon.is_empty() {
            let x = r.min.x + r.width() - w - gap - h;
            buf.icon(Rect::xywh(x, r.min.y, h, r.height()), icon, color);
            r.min.x += gap + h;
        }
        buf.text(Point::new(r.max.x - w, self.baseline(r)), text, font, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_paint::{Command, FixedFontLookup};
    use std::rc::Rc;

    fn buffer() -> Buffer {
        let mut b = Buffer::new(Rc::new(FixedFontLookup));
        b.reset(200, 100);
        b
    }

    fn text_positions(buf: &mut Buffer) -> Vec<Point> {
        buf.finish()
            .iter()
            .flat_map(|l| &l.commands)
            .filter_map(|c| match c {
                Command::Text { position, .. } => Some(*position),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_size() {
        let mut label = TextLabel::new();
        let font = Font::default();
        // 12px fixed font: 6px per char, 15px line, ascent 10, descent 3
        assert_eq!(label.size("hello", &font, &FixedFontLookup), (30, 15));
        assert_eq!(label.size_icon("hello", &font, "info", 5, &FixedFontLookup), (50, 15));
        assert_eq!(label.size_icon("", &font, "info", 5, &FixedFontLookup), (15, 15));
        assert_eq!(label.size_icon("hi", &font, "", 5, &FixedFontLookup), (12, 15));
    }

    #[test]
    fn test_alignment() {
        let mut buf = buffer();
        let mut label = TextLabel::new();
        let font = Font::default();
        let r = Rect::xywh(10, 0, 100, 20);
        label.draw_left(&mut buf, r, "abcd", &font, Color::BLACK);
        label.draw_centered(&mut buf, r, "abcd", &font, Color::BLACK);
        label.draw_right(&mut buf, r, "abcd", &font, Color::BLACK);
        // baseline: center 10 + (10 - 3) / 2
        assert_eq!(
            text_positions(&mut buf),
            vec![Point::new(10, 13), Point::new(48, 13), Point::new(86, 13)]
        );
    }

    #[test]
    fn test_left_icon_shifts_text() {
        let mut buf = buffer();
        let mut label = TextLabel::new();
        label.draw_left_icon(
            &mut buf,
            Rect::wh(100, 20),
            "ok",
            &Font::default(),
            Color::BLACK,
            "info",
            5,
        );
        let lists = buf.finish();
        assert!(matches!(
            lists[0].commands[0],
            Command::Icon { rect, .. } if rect == Rect::wh(15, 20)
        ));
        assert!(matches!(
            lists[0].commands[1],
            Command::Text { position, .. } if position == Point::new(20, 13)
        ));
    }
}
