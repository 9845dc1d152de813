//! Scrolling viewport

use std::sync::Arc;

use quill_core::{Component, MouseButtons, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Point, Rect};
use quill_theme::{default_theme, ColorToken, Theme};

/// Thickness of a scroll bar
const BAR: i32 = 15;
/// Smallest thumb length
const MIN_THUMB: i32 = 30;
/// Pixels per scroll wheel step
const SCROLL_STEP: f32 = 45.0;

struct ScrollBar {
    id: WidgetId,
    theme: Arc<Theme>,
    vertical: bool,
    /// Largest value, content length minus visible length
    max: f32,
    /// Visible length
    size: f32,
    value: f32,
    /// Grab offset inside the thumb while dragging
    grab: Option<i32>,
}

impl ScrollBar {
    fn new(vertical: bool) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            vertical,
            max: 1.0,
            size: 0.0,
            value: 0.0,
            grab: None,
        }
    }

    fn set_value(&mut self, v: f32) {
        self.value = v.clamp(0.0, self.max.max(0.0));
    }

    /// Thumb `(offset, length)` along a bar of length `l`
    fn thumb(&self, l: i32) -> (i32, i32) {
        let b = ((self.size / (self.max + self.size)) * l as f32) as i32;
        let b = b.max(MIN_THUMB).min(l);
        let o = if self.max > 0.0 {
            (self.value / self.max * (l - b) as f32) as i32
        } else {
            0
        };
        (o, b)
    }
}

impl Component for ScrollBar {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, _fonts: &dyn FontLookup) -> (i32, i32) {
        if self.vertical {
            (BAR, 0)
        } else {
            (0, BAR)
        }
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let l = if self.vertical { h } else { w };
        let (o, b) = self.thumb(l);
        if state.mouse_button_down(MouseButtons::LEFT) {
            let p = state.mouse_pos();
            let m = if self.vertical { p.y } else { p.x };
            let grab = *self
                .grab
                .get_or_insert(if m >= o && m < o + b { m - o } else { b / 2 });
            if l > b {
                let c = (m - grab) as f32 / (l - b) as f32;
                self.value = c.clamp(0.0, 1.0) * self.max;
            }
        } else {
            self.grab = None;
        }

        let (o, b) = self.thumb(l);
        buf.outline(Rect::wh(w, h), self.theme.color(ColorToken::Border));
        let thumb = if self.vertical {
            Rect::xywh(1, o, w - 2, b)
        } else {
            Rect::xywh(o, 1, b, h - 2)
        };
        buf.fill(thumb, self.theme.color(ColorToken::ScrollBar));
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
    }
}

/// The scrolled content, positioned at the scroll offset
struct Viewport {
    id: WidgetId,
    content: Box<dyn Component>,
    offset: Point,
    /// Content size, grown to the viewport size
    size: (i32, i32),
}

impl Component for Viewport {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, _fonts: &dyn FontLookup) -> (i32, i32) {
        (0, 0)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let (mut x, mut y) = (-self.offset.x, -self.offset.y);
        if w >= self.size.0 {
            x = 0;
            self.size.0 = w;
        }
        if h >= self.size.1 {
            y = 0;
            self.size.1 = h;
        }
        let r = Rect::xywh(x, y, self.size.0, self.size.1);
        state.update_child(buf, r, self.content.as_mut());
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.content.set_theme(theme);
    }
}

/// Shows a part of a larger child, with scroll bars as needed
///
/// Scrolls with the mouse wheel, by dragging the bars, and to bring areas
/// into view that descendants ask for with [`State::request_visible`].
pub struct ScrollView {
    id: WidgetId,
    horizontal: ScrollBar,
    vertical: ScrollBar,
    viewport: Viewport,
}

impl ScrollView {
    pub fn new(content: impl Component + 'static) -> Self {
        Self {
            id: WidgetId::new(),
            horizontal: ScrollBar::new(false),
            vertical: ScrollBar::new(true),
            viewport: Viewport {
                id: WidgetId::new(),
                content: Box::new(content),
                offset: Point::ZERO,
                size: (0, 0),
            },
        }
    }

    /// Current scroll offset
    pub fn offset(&self) -> Point {
        Point::new(self.horizontal.value as i32, self.vertical.value as i32)
    }

    pub fn content_mut(&mut self) -> &mut dyn Component {
        self.viewport.content.as_mut()
    }
}

impl Component for ScrollView {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let (w, h) = self.viewport.content.preferred_size(fonts);
        (w + BAR, h)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (mut w, mut h) = buf.size();
        let (cw, ch) = self.viewport.content.preferred_size(buf.fonts());
        self.viewport.size = (cw, ch);

        let mut show_h = cw > w;
        if show_h {
            h -= BAR;
        }
        let show_v = ch > h;
        if show_v {
            w -= BAR;
        }
        if !show_h && cw > w {
            show_h = true;
            h -= BAR;
        }

        let before = (self.horizontal.value, self.vertical.value);
        if show_h {
            self.horizontal.max = (cw - w) as f32;
            self.horizontal.size = w as f32;
            self.horizontal.set_value(self.horizontal.value);
            state.update_child(buf, Rect::xywh(0, h, w, BAR), &mut self.horizontal);
        }
        if show_v {
            self.vertical.max = (ch - h) as f32;
            self.vertical.size = h as f32;
            self.vertical.set_value(self.vertical.value);
            state.update_child(buf, Rect::xywh(w, 0, BAR, h), &mut self.vertical);
        }
        self.viewport.offset = self.offset();
        state.update_child(buf, Rect::wh(w, h), &mut self.viewport);

        if let Some(r) = state.visibility_request() {
            if r.width() <= w {
                if r.min.x < 0 {
                    self.horizontal.set_value(self.horizontal.value + r.min.x as f32);
                } else if r.max.x > w {
                    self.horizontal.set_value(self.horizontal.value + (r.max.x - w) as f32);
                }
            }
            if r.height() <= h {
                if r.min.y < 0 {
                    self.vertical.set_value(self.vertical.value + r.min.y as f32);
                } else if r.max.y > h {
                    self.vertical.set_value(self.vertical.value + (r.max.y - h) as f32);
                }
            }
            state.clear_visibility_request();
        }

        let scroll = state.scroll();
        if scroll != Point::ZERO {
            let (hv, vv) = (self.horizontal.value, self.vertical.value);
            let can_h = show_h
                && ((scroll.x > 0 && hv > 0.0) || (scroll.x < 0 && hv < self.horizontal.max));
            let can_v = show_v
                && ((scroll.y > 0 && vv > 0.0) || (scroll.y < 0 && vv < self.vertical.max));
            if can_h || can_v {
                state.consume_scroll();
            }
            self.horizontal.set_value(hv - scroll.x as f32 * SCROLL_STEP);
            self.vertical.set_value(vv - scroll.y as f32 * SCROLL_STEP);
        }

        if (self.horizontal.value, self.vertical.value) != before {
            state.request_update();
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.horizontal.set_theme(theme);
        self.vertical.set_theme(theme);
        self.viewport.set_theme(theme);
    }
}
