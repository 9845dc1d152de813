//! Themes with parent fallback

use std::sync::Arc;

use quill_paint::{Color, Font};
use rustc_hash::FxHashMap;

use crate::tokens::{ColorToken, FontToken};

/// A set of colors and fonts
///
/// Tokens missing from a theme are looked up in its parent. Without a parent
/// the fallback is [`Color::TRANSPARENT`] for colors and 12px `"default"` for fonts.
///
/// Themes are shared as `Arc<Theme>` and treated as immutable once shared;
/// customizing starts from [`Theme::derive`].
#[derive(Clone, Debug, Default)]
pub struct Theme {
    colors: FxHashMap<ColorToken, Color>,
    fonts: FxHashMap<FontToken, Font>,
    parent: Option<Arc<Theme>>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty theme that falls back to `parent`
    pub fn derive(parent: &Arc<Theme>) -> Self {
        Self {
            parent: Some(Arc::clone(parent)),
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<&Arc<Theme>> {
        self.parent.as_ref()
    }

    pub fn color(&self, token: ColorToken) -> Color {
        match self.colors.get(&token) {
            Some(c) => *c,
            None => self
                .parent
                .as_ref()
                .map_or(Color::TRANSPARENT, |p| p.color(token)),
        }
    }

    pub fn font(&self, token: FontToken) -> Font {
        match self.fonts.get(&token) {
            Some(f) => f.clone(),
            None => self.parent.as_ref().map_or_else(Font::default, |p| p.font(token)),
        }
    }

    pub fn set_color(&mut self, token: ColorToken, color: Color) {
        self.colors.insert(token, color);
    }

    pub fn set_font(&mut self, token: FontToken, font: Font) {
        self.fonts.insert(token, font);
    }

    /// Builder form of [`Theme::set_color`]
    pub fn with_color(mut self, token: ColorToken, color: Color) -> Self {
        self.set_color(token, color);
        self
    }

    /// Builder form of [`Theme::set_font`]
    pub fn with_font(mut self, token: FontToken, font: Font) -> Self {
        self.set_font(token, font);
        self
    }

    /// Whether this theme (not its parents) defines `token`
    pub fn defines_color(&self, token: ColorToken) -> bool {
        self.colors.contains_key(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_without_parent() {
        let theme = Theme::new();
        assert_eq!(theme.color(ColorToken::Background), Color::TRANSPARENT);
        assert_eq!(theme.font(FontToken::Title), Font::new("default", 12.0));
    }

    #[test]
    fn test_derived_theme_overrides_and_inherits() {
        let parent = Arc::new(
            Theme::new()
                .with_color(ColorToken::Text, Color::BLACK)
                .with_color(ColorToken::Background, Color::WHITE),
        );
        let child = Theme::derive(&parent).with_color(ColorToken::Text, Color::WHITE);
        assert_eq!(child.color(ColorToken::Text), Color::WHITE);
        assert_eq!(child.color(ColorToken::Background), Color::WHITE);
        assert_eq!(parent.color(ColorToken::Text), Color::BLACK);
        assert!(!child.defines_color(ColorToken::Background));
    }
}
