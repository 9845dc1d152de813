//! Check box

use std::sync::Arc;

use quill_core::{Component, Key, MouseButtons, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Point, Rect};
use quill_text::TextLabel;
use quill_theme::{default_theme, ColorToken, FontToken, Theme};

use crate::anim::animate;

pub type CheckBoxAction = Box<dyn FnMut(&mut State, bool)>;

/// A labelled toggle
///
/// The checked and unchecked icons share one square; an animated split
/// line reveals the checked icon from the left.
pub struct CheckBox {
    id: WidgetId,
    theme: Arc<Theme>,
    text: String,
    checked: bool,
    changed: Option<CheckBoxAction>,
    label: TextLabel,
    anim: f32,
}

impl CheckBox {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            text: text.into(),
            checked: false,
            changed: None,
            label: TextLabel::new(),
            anim: 0.0,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.set_checked(checked);
        self
    }

    /// Set the callback run with the new value after each toggle
    pub fn on_change(mut self, changed: impl FnMut(&mut State, bool) + 'static) -> Self {
        self.changed = Some(Box::new(changed));
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Change the value without running the callback; the icon snaps over
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
        self.anim = if checked { 1.0 } else { 0.0 };
    }
}

impl Component for CheckBox {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let (w, h) =
            TextLabel::new().size(&self.text, &self.theme.font(FontToken::ButtonText), fonts);
        (w + h + 30, h + 20)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let font = self.theme.font(FontToken::ButtonText);
        let (_, s) = self.label.size(&self.text, &font, buf.fonts());

        let mut toggled = state.mouse_click(MouseButtons::LEFT);
        toggled |= state
            .key_presses()
            .iter()
            .any(|&k| k == Key::SPACE || k == Key::ENTER);
        if toggled {
            self.checked = !self.checked;
            if let Some(changed) = self.changed.as_mut() {
                changed(state, self.checked);
                state.request_update();
            }
        }

        animate(state, &mut self.anim, 8.0, self.checked);
        let split = (self.anim * (s + 10) as f32) as i32;
        let color = self.theme.color(ColorToken::ButtonText);
        let icon = Rect::xyxy(0, 0, s + 10, h - 10);

        buf.push(Rect::xyxy(5, 5, 5 + split, h - 5));
        buf.icon(icon, "checkboxChecked", color);
        buf.pop();
        buf.push(Rect::xyxy(5 + split, 5, s + 15, h - 5));
        buf.icon(icon.translate(Point::new(-split, 0)), "checkbox", color);
        buf.pop();

        let color = if state.has_keyboard_focus() {
            self.theme.color(ColorToken::ButtonFocused)
        } else {
            color
        };
        self.label
            .draw_left(buf, Rect::xyxy(s + 20, 0, w, h), &self.text, &font, color);
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
    }
}
