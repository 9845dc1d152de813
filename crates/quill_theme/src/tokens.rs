//! Theme token keys

/// Semantic color token keys
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum ColorToken {
    // Surfaces
    Background,
    AltBackground,
    Border,
    Shadow,
    /// Translucent layer over content behind a dialog
    Veil,

    // Text
    Text,
    Title,
    TitleBackground,
    TitleBackgroundError,

    // Buttons
    ButtonBackground,
    ButtonHovered,
    ButtonText,
    ButtonFocused,

    // Inputs
    InputBackground,
    InputText,
    Selection,
    SelectionInactive,

    ScrollBar,
}

impl ColorToken {
    pub const ALL: [ColorToken; 18] = [
        ColorToken::Background,
        ColorToken::AltBackground,
        ColorToken::Border,
        ColorToken::Shadow,
        ColorToken::Veil,
        ColorToken::Text,
        ColorToken::Title,
        ColorToken::TitleBackground,
        ColorToken::TitleBackgroundError,
        ColorToken::ButtonBackground,
        ColorToken::ButtonHovered,
        ColorToken::ButtonText,
        ColorToken::ButtonFocused,
        ColorToken::InputBackground,
        ColorToken::InputText,
        ColorToken::Selection,
        ColorToken::SelectionInactive,
        ColorToken::ScrollBar,
    ];

    /// Key used in theme files
    pub fn key(self) -> &'static str {
        match self {
            ColorToken::Background => "background",
            ColorToken::AltBackground => "alt_background",
            ColorToken::Border => "border",
            ColorToken::Shadow => "shadow",
            ColorToken::Veil => "veil",
            ColorToken::Text => "text",
            ColorToken::Title => "title",
            ColorToken::TitleBackground => "title_background",
            ColorToken::TitleBackgroundError => "title_background_error",
            ColorToken::ButtonBackground => "button_background",
            ColorToken::ButtonHovered => "button_hovered",
            ColorToken::ButtonText => "button_text",
            ColorToken::ButtonFocused => "button_focused",
            ColorToken::InputBackground => "input_background",
            ColorToken::InputText => "input_text",
            ColorToken::Selection => "selection",
            ColorToken::SelectionInactive => "selection_inactive",
            ColorToken::ScrollBar => "scroll_bar",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

/// Font token keys
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum FontToken {
    Text,
    Title,
    ButtonText,
    InputText,
}

impl FontToken {
    pub const ALL: [FontToken; 4] = [
        FontToken::Text,
        FontToken::Title,
        FontToken::ButtonText,
        FontToken::InputText,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FontToken::Text => "text",
            FontToken::Title => "title",
            FontToken::ButtonText => "button_text",
            FontToken::InputText => "input_text",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for token in ColorToken::ALL {
            assert_eq!(ColorToken::from_key(token.key()), Some(token));
        }
        for token in FontToken::ALL {
            assert_eq!(FontToken::from_key(token.key()), Some(token));
        }
        assert_eq!(ColorToken::from_key("primary"), None);
    }
}
