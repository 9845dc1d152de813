//! TOML theme files
//!
//! ```toml
//! parent = "dark"
//!
//! [colors]
//! background = "#202020"
//! veil = "#ffffff33"
//!
//! [fonts]
//! title = { name = "sans-bold", size = 14.0 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use quill_paint::{Color, Font};
use serde::Deserialize;

use crate::error::{Result, ThemeError};
use crate::presets::ThemePreset;
use crate::theme::Theme;
use crate::tokens::{ColorToken, FontToken};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThemeFile {
    parent: Option<String>,
    colors: BTreeMap<String, String>,
    fonts: BTreeMap<String, FontSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FontSpec {
    name: String,
    size: f32,
}

impl Theme {
    /// Parse a theme from TOML source
    ///
    /// Without a `parent` key the theme derives from the light preset.
    pub fn from_toml_str(source: &str) -> Result<Theme> {
        let file: ThemeFile = toml::from_str(source)?;
        let parent = match file.parent.as_deref() {
            None => ThemePreset::Light,
            Some(id) => ThemePreset::from_id(id)
                .ok_or_else(|| ThemeError::UnknownToken(format!("parent = {id}")))?,
        };
        let mut theme = Theme::derive(&parent.theme());
        let (color_count, font_count) = (file.colors.len(), file.fonts.len());
        for (key, value) in &file.colors {
            let token = ColorToken::from_key(key)
                .ok_or_else(|| ThemeError::UnknownToken(format!("colors.{key}")))?;
            let color = Color::parse_hex(value).ok_or_else(|| ThemeError::InvalidColor {
                token: key.clone(),
                value: value.clone(),
            })?;
            theme.set_color(token, color);
        }
        for (key, spec) in file.fonts {
            let token = FontToken::from_key(&key)
                .ok_or_else(|| ThemeError::UnknownToken(format!("fonts.{key}")))?;
            theme.set_font(token, Font::new(spec.name, spec.size));
        }
        tracing::debug!(
            "Parsed theme: parent={}, {} colors, {} fonts",
            parent.id(),
            color_count,
            font_count
        );
        Ok(theme)
    }

    /// Load a theme file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<Theme>> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let theme = Theme::from_toml_str(&source)?;
        tracing::info!("Loaded theme from {}", path.display());
        Ok(Arc::new(theme))
    }
}

/// Resolve a theme name: a preset id, or a path to a theme file
pub fn resolve_theme(name: &str) -> Result<Arc<Theme>> {
    match ThemePreset::from_id(name) {
        Some(preset) => Ok(preset.theme()),
        None => Theme::load(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_matches_light() {
        let theme = Theme::from_toml_str("").unwrap();
        assert_eq!(
            theme.color(ColorToken::Background),
            crate::presets::light().color(ColorToken::Background)
        );
    }

    #[test]
    fn test_overrides_and_parent() {
        let theme = Theme::from_toml_str(
            r##"
            parent = "dark"
            [colors]
            background = "#000000"
            [fonts]
            title = { name = "sans-bold", size = 14.0 }
            "##,
        )
        .unwrap();
        assert_eq!(theme.color(ColorToken::Background), Color::BLACK);
        assert_eq!(theme.color(ColorToken::Text), Color::WHITE);
        assert_eq!(theme.font(FontToken::Title), Font::new("sans-bold", 14.0));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Theme::from_toml_str("[colors]\nprimary = \"#ffffff\""),
            Err(ThemeError::UnknownToken(_))
        ));
        assert!(matches!(
            Theme::from_toml_str("[colors]\ntext = \"white\""),
            Err(ThemeError::InvalidColor { .. })
        ));
        assert!(matches!(
            Theme::from_toml_str("parent = \"sepia\""),
            Err(ThemeError::UnknownToken(_))
        ));
        assert!(matches!(
            Theme::from_toml_str("colors = 3"),
            Err(ThemeError::Parse(_))
        ));
    }
}
