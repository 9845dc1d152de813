//! Built-in light and dark themes

use std::sync::{Arc, OnceLock};

use quill_paint::{Color, Font};

use crate::theme::Theme;
use crate::tokens::{ColorToken, FontToken};

/// Built-in theme selector
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum ThemePreset {
    #[default]
    Light,
    Dark,
}

impl ThemePreset {
    pub fn all() -> &'static [ThemePreset] {
        &[ThemePreset::Light, ThemePreset::Dark]
    }

    pub fn id(self) -> &'static str {
        match self {
            ThemePreset::Light => "light",
            ThemePreset::Dark => "dark",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.id() == id)
    }

    /// The shared instance of this preset
    pub fn theme(self) -> Arc<Theme> {
        match self {
            ThemePreset::Light => light(),
            ThemePreset::Dark => dark(),
        }
    }
}

fn with_fonts(theme: Theme) -> Theme {
    theme
        .with_font(FontToken::Text, Font::new("default", 12.0))
        .with_font(FontToken::Title, Font::new("bold", 12.0))
        .with_font(FontToken::ButtonText, Font::new("bold", 12.0))
        .with_font(FontToken::InputText, Font::new("default", 12.0))
}

fn build_light() -> Theme {
    use ColorToken::*;
    with_fonts(Theme::new())
        .with_color(Background, Color::WHITE)
        .with_color(Border, Color::BLACK)
        .with_color(Shadow, Color::rgba(0.0, 0.0, 0.0, 0.5))
        .with_color(Veil, Color::rgba(0.0, 0.0, 0.0, 0.2))
        .with_color(AltBackground, Color::gray(0.9))
        .with_color(Text, Color::BLACK)
        .with_color(Title, Color::BLACK)
        .with_color(TitleBackground, Color::rgba(0.7, 0.75, 1.0, 1.0))
        .with_color(TitleBackgroundError, Color::rgba(1.0, 0.75, 0.7, 1.0))
        .with_color(ButtonBackground, Color::TRANSPARENT)
        .with_color(ButtonHovered, Color::rgba(0.0, 0.0, 0.0, 0.2))
        .with_color(ButtonText, Color::BLACK)
        .with_color(ButtonFocused, Color::gray(0.3))
        .with_color(InputBackground, Color::WHITE)
        .with_color(InputText, Color::BLACK)
        .with_color(Selection, Color::rgba(0.8, 0.85, 1.0, 1.0))
        .with_color(SelectionInactive, Color::gray(0.8))
        .with_color(ScrollBar, Color::rgba(0.0, 0.0, 0.0, 0.3))
}

fn build_dark() -> Theme {
    use ColorToken::*;
    with_fonts(Theme::new())
        .with_color(Background, Color::gray(0.3))
        .with_color(Border, Color::BLACK)
        .with_color(Shadow, Color::BLACK)
        .with_color(Veil, Color::rgba(1.0, 1.0, 1.0, 0.2))
        .with_color(AltBackground, Color::gray(0.4))
        .with_color(Text, Color::WHITE)
        .with_color(Title, Color::WHITE)
        .with_color(TitleBackground, Color::rgba(0.2, 0.25, 0.4, 1.0))
        .with_color(TitleBackgroundError, Color::rgba(0.5, 0.05, 0.0, 1.0))
        .with_color(ButtonBackground, Color::TRANSPARENT)
        .with_color(ButtonHovered, Color::rgba(1.0, 1.0, 1.0, 0.1))
        .with_color(ButtonText, Color::WHITE)
        .with_color(ButtonFocused, Color::gray(0.8))
        .with_color(InputBackground, Color::gray(0.3))
        .with_color(InputText, Color::WHITE)
        .with_color(Selection, Color::rgba(0.35, 0.4, 0.6, 1.0))
        .with_color(SelectionInactive, Color::gray(0.5))
        .with_color(ScrollBar, Color::rgba(1.0, 1.0, 1.0, 0.3))
}

/// Shared light theme
pub fn light() -> Arc<Theme> {
    static LIGHT: OnceLock<Arc<Theme>> = OnceLock::new();
    Arc::clone(LIGHT.get_or_init(|| Arc::new(build_light())))
}

/// Shared dark theme
pub fn dark() -> Arc<Theme> {
    static DARK: OnceLock<Arc<Theme>> = OnceLock::new();
    Arc::clone(DARK.get_or_init(|| Arc::new(build_dark())))
}

/// Process-wide default theme used by widget constructors
pub fn default_theme() -> Arc<Theme> {
    light()
}
