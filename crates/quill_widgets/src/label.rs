//! Static text

use std::sync::Arc;

use quill_core::{Component, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Rect};
use quill_text::TextLabel;
use quill_theme::{default_theme, ColorToken, FontToken, Theme};

/// One line of left aligned text
pub struct Label {
    id: WidgetId,
    theme: Arc<Theme>,
    text: String,
    label: TextLabel,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            text: text.into(),
            label: TextLabel::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Component for Label {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        TextLabel::new().size(&self.text, &self.theme.font(FontToken::Text), fonts)
    }

    fn update(&mut self, buf: &mut Buffer, _state: &mut State) {
        let (w, h) = buf.size();
        self.label.draw_left(
            buf,
            Rect::wh(w, h),
            &self.text,
            &self.theme.font(FontToken::Text),
            self.theme.color(ColorToken::Text),
        );
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
    }
}
