//! Theme and styling configuration.
//!
//! Two named themes exist, `dark` and `light`. The selected name is persisted
//! in the preferences file and toggled at runtime.

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// The persisted theme name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeName::Dark),
            "light" => Ok(ThemeName::Light),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Color theme for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    /// Primary foreground color.
    pub fg: Color,
    /// Primary background color.
    pub bg: Color,
    /// Secondary text (hints, placeholders).
    pub muted: Color,
    /// Titles and the focused border.
    pub accent: Color,
    /// Foreground of highlighted rows.
    pub highlight_fg: Color,
    /// Background of highlighted rows.
    pub highlight_bg: Color,
    /// Unfocused borders.
    pub border: Color,
}

impl Theme {
    /// Palette for a theme name.
    pub fn for_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self {
                name,
                fg: Color::White,
                bg: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Yellow,
                highlight_fg: Color::Black,
                highlight_bg: Color::Cyan,
                border: Color::Gray,
            },
            ThemeName::Light => Self {
                name,
                fg: Color::Black,
                bg: Color::White,
                muted: Color::Gray,
                accent: Color::Blue,
                highlight_fg: Color::White,
                highlight_bg: Color::Blue,
                border: Color::DarkGray,
            },
        }
    }

    /// Base style for text on the background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of a highlighted row.
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style depending on focus.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.border)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_name(ThemeName::default())
    }
}

/// Badge color for a Pokémon type identifier.
pub fn type_color(identifier: &str) -> Color {
    match identifier {
        "normal" => Color::Rgb(168, 167, 122),
        "fire" => Color::Rgb(238, 129, 48),
        "water" => Color::Rgb(99, 144, 240),
        "electric" => Color::Rgb(247, 208, 44),
        "grass" => Color::Rgb(122, 199, 76),
        "ice" => Color::Rgb(150, 217, 214),
        "fighting" => Color::Rgb(194, 46, 40),
        "poison" => Color::Rgb(163, 62, 161),
        "ground" => Color::Rgb(226, 191, 101),
        "flying" => Color::Rgb(169, 143, 243),
        "psychic" => Color::Rgb(249, 85, 135),
        "bug" => Color::Rgb(166, 185, 26),
        "rock" => Color::Rgb(182, 161, 54),
        "ghost" => Color::Rgb(115, 87, 151),
        "dragon" => Color::Rgb(111, 53, 252),
        "dark" => Color::Rgb(112, 87, 70),
        "steel" => Color::Rgb(183, 183, 206),
        "fairy" => Color::Rgb(214, 133, 173),
        _ => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(ThemeName::Dark.toggled(), ThemeName::Light);
        assert_eq!(ThemeName::Light.toggled(), ThemeName::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Light".parse::<ThemeName>(), Ok(ThemeName::Light));
        assert_eq!(" dark ".parse::<ThemeName>(), Ok(ThemeName::Dark));
        assert!("sepia".parse::<ThemeName>().is_err());
    }

    #[test]
    fn test_palettes_differ() {
        let dark = Theme::for_name(ThemeName::Dark);
        let light = Theme::for_name(ThemeName::Light);
        assert_ne!(dark.bg, light.bg);
        assert_eq!(Theme::default().name, ThemeName::Dark);
    }

    #[test]
    fn test_type_color_fallback() {
        assert_eq!(type_color("shadow"), Color::Gray);
        assert_ne!(type_color("fire"), Color::Gray);
    }
}
