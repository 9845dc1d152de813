//! Push button

use std::sync::Arc;

use quill_core::{Component, Key, MouseButtons, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Rect};
use quill_text::TextLabel;
use quill_theme::{default_theme, ColorToken, FontToken, Theme};

use crate::anim::animate;

/// Gap between icon and text
const ICON_GAP: i32 = 5;

/// Callback run when a button is activated
pub type ButtonAction = Box<dyn FnMut(&mut State)>;

/// A button with optional icon
///
/// Activated by a left click, or by Space or Enter while it has keyboard
/// focus. The background fades to the hover color while the mouse is over it.
pub struct Button {
    id: WidgetId,
    theme: Arc<Theme>,
    text: String,
    icon: String,
    action: Option<ButtonAction>,
    label: TextLabel,
    anim: f32,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            text: text.into(),
            icon: String::new(),
            action: None,
            label: TextLabel::new(),
            anim: 0.0,
        }
    }

    /// Set the icon drawn left of the text
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the activation callback
    pub fn on_click(mut self, action: impl FnMut(&mut State) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Component for Button {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let font = self.theme.font(FontToken::ButtonText);
        let (w, h) = TextLabel::new().size_icon(&self.text, &font, &self.icon, ICON_GAP, fonts);
        (w + 20, h + 20)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let hovered = state.is_hovered();
        animate(state, &mut self.anim, 8.0, hovered);
        let background = self.theme.color(ColorToken::ButtonBackground).blend(
            self.theme.color(ColorToken::ButtonHovered),
            self.anim,
        );
        buf.fill(Rect::wh(w, h), background);

        let color = if state.has_keyboard_focus() {
            self.theme.color(ColorToken::ButtonFocused)
        } else {
            self.theme.color(ColorToken::ButtonText)
        };
        self.label.draw_centered_icon(
            buf,
            Rect::wh(w, h),
            &self.text,
            &self.theme.font(FontToken::ButtonText),
            color,
            &self.icon,
            ICON_GAP,
        );

        let mut activated = state.mouse_click(MouseButtons::LEFT);
        activated |= state
            .key_presses()
            .iter()
            .any(|&k| k == Key::SPACE || k == Key::ENTER);
        if activated {
            if let Some(action) = self.action.as_mut() {
                action(state);
                state.request_update();
            }
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
    }
}
