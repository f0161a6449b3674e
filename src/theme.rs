use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Color scheme for the whole interface. Dark is the default and matches
/// what most terminals ship with; light inverts the surfaces for bright
/// terminal setups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                surface: Color::Black,
                panel: Color::DarkGray,
                text: Color::White,
                dim: Color::DarkGray,
                border: Color::DarkGray,
                border_active: Color::Cyan,
                accent: Color::Cyan,
                user: Color::Yellow,
                assistant: Color::Cyan,
                highlight_bg: Color::DarkGray,
                highlight_fg: Color::White,
            },
            Theme::Light => Palette {
                surface: Color::White,
                panel: Color::Gray,
                text: Color::Black,
                dim: Color::Gray,
                border: Color::Gray,
                border_active: Color::Blue,
                accent: Color::Blue,
                user: Color::Magenta,
                assistant: Color::Blue,
                highlight_bg: Color::Blue,
                highlight_fg: Color::White,
            },
        }
    }
}

/// Resolved colors for one theme. Every widget pulls from here so a theme
/// switch repaints the whole frame on the next draw.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub surface: Color,
    pub panel: Color,
    pub text: Color,
    pub dim: Color,
    pub border: Color,
    pub border_active: Color,
    pub accent: Color,
    pub user: Color,
    pub assistant: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_is_involutive() {
        assert_eq!(Theme::Dark.flipped(), Theme::Light);
        assert_eq!(Theme::Light.flipped(), Theme::Dark);
        assert_eq!(Theme::Dark.flipped().flipped(), Theme::Dark);
    }

    #[test]
    fn test_serde_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"light\"").unwrap(),
            Theme::Light
        );
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }
}
