//! Titled panel

use std::sync::Arc;

use quill_core::{Component, State, WidgetId};
use quill_paint::{Buffer, Color, FontLookup, Rect};
use quill_text::TextLabel;
use quill_theme::{default_theme, ColorToken, FontToken, Theme};

/// A content panel under a colored title strip, casting a shadow
///
/// Dialogs are frames. The frame keeps a 10 pixel margin for its shadow.
pub struct Frame {
    id: WidgetId,
    theme: Arc<Theme>,
    title: String,
    icon: String,
    /// Title strip color; `None` uses the theme's title background
    color: Option<ColorToken>,
    content: Box<dyn Component>,
    label: TextLabel,
}

impl Frame {
    pub fn new(title: impl Into<String>, content: impl Component + 'static) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            title: title.into(),
            icon: String::new(),
            color: None,
            content: Box::new(content),
            label: TextLabel::new(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Color the title strip with `token` instead of the title background
    pub fn title_color(mut self, token: ColorToken) -> Self {
        self.color = Some(token);
        self
    }

    pub fn content_mut(&mut self) -> &mut dyn Component {
        self.content.as_mut()
    }

    fn title_background(&self) -> Color {
        self.theme.color(self.color.unwrap_or(ColorToken::TitleBackground))
    }
}

impl Component for Frame {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let (w, h) = self.content.preferred_size(fonts);
        let (tw, th) = TextLabel::new().size_icon(
            &self.title,
            &self.theme.font(FontToken::Title),
            &self.icon,
            5,
            fonts,
        );
        (w.max(tw) + 20, h + th + 30)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let font = self.theme.font(FontToken::Title);
        let (_, th) = self.label.size(&self.title, &font, buf.fonts());

        buf.shadow(
            Rect::xyxy(12, 12, w - 8, h - 8),
            self.theme.color(ColorToken::Shadow),
            10,
        );
        buf.fill(Rect::xyxy(10, 10, w - 10, th + 20), self.title_background());
        self.label.draw_centered_icon(
            buf,
            Rect::xyxy(15, 10, w - 15, th + 20),
            &self.title,
            &font,
            self.theme.color(ColorToken::Title),
            &self.icon,
            5,
        );
        let body = Rect::xyxy(10, th + 20, w - 10, h - 10);
        buf.fill(body, self.theme.color(ColorToken::Background));
        state.update_child(buf, body, self.content.as_mut());
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
        self.content.set_theme(theme);
    }
}
