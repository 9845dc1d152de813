//! Fixed size filler

use std::sync::Arc;

use quill_core::{Component, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Rect};
use quill_theme::{default_theme, ColorToken, Theme};

/// Fills its area with the veil color
pub struct Separator {
    id: WidgetId,
    theme: Arc<Theme>,
    width: i32,
    height: i32,
}

impl Separator {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            width,
            height,
        }
    }
}

impl Component for Separator {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, _fonts: &dyn FontLookup) -> (i32, i32) {
        (self.width, self.height)
    }

    fn update(&mut self, buf: &mut Buffer, _state: &mut State) {
        let (w, h) = buf.size();
        buf.fill(Rect::wh(w, h), self.theme.color(ColorToken::Veil));
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
    }
}
