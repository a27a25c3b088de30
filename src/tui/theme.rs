//! Colour palettes and the styles derived from them.
//!
//! A `Theme` is a plain value built from a `Palette`; the navigator owns one
//! and passes it into every `render` call. There is no global style state.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub accent: Color,
}

pub const DEFAULT_CYAN: Palette = Palette {
    name: "default",
    primary: Color::Rgb(0x00, 0xff, 0xff),
    secondary: Color::Rgb(0x00, 0x87, 0xff),
    muted: Color::Rgb(0x6c, 0x6c, 0x6c),
    success: Color::Rgb(0x5f, 0xff, 0x00),
    warning: Color::Rgb(0xff, 0xaf, 0x00),
    error: Color::Rgb(0xff, 0x00, 0x00),
    accent: Color::Rgb(0xaf, 0x87, 0xff),
};

pub const CATPPUCCIN_MOCHA: Palette = Palette {
    name: "catppuccin",
    primary: Color::Rgb(0x89, 0xb4, 0xfa),
    secondary: Color::Rgb(0x74, 0xc7, 0xec),
    muted: Color::Rgb(0x6c, 0x70, 0x86),
    success: Color::Rgb(0xa6, 0xe3, 0xa1),
    warning: Color::Rgb(0xfa, 0xb3, 0x87),
    error: Color::Rgb(0xf3, 0x8b, 0xa8),
    accent: Color::Rgb(0xcb, 0xa6, 0xf7),
};

pub const TOKYO_NIGHT: Palette = Palette {
    name: "tokyo-night",
    primary: Color::Rgb(0x7a, 0xa2, 0xf7),
    secondary: Color::Rgb(0x7d, 0xcf, 0xff),
    muted: Color::Rgb(0x56, 0x5f, 0x89),
    success: Color::Rgb(0x9e, 0xce, 0x6a),
    warning: Color::Rgb(0xff, 0x9e, 0x64),
    error: Color::Rgb(0xf7, 0x76, 0x8e),
    accent: Color::Rgb(0xbb, 0x9a, 0xf7),
};

pub const PRESETS: [Palette; 3] = [DEFAULT_CYAN, CATPPUCCIN_MOCHA, TOKYO_NIGHT];

impl Palette {
    /// Unknown names fall back to the default palette.
    pub fn by_name(name: &str) -> Palette {
        PRESETS
            .iter()
            .copied()
            .find(|p| p.name == name.trim())
            .unwrap_or(DEFAULT_CYAN)
    }

    pub fn title(&self) -> &'static str {
        match self.name {
            "catppuccin" => "Catppuccin Mocha",
            "tokyo-night" => "Tokyo Night",
            _ => "Default (Cyan)",
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        DEFAULT_CYAN
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub palette: Palette,
    pub text: Style,
    pub primary: Style,
    pub secondary: Style,
    pub muted: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub accent: Style,
    pub title: Style,
    pub selected: Style,
    pub cursor: Style,
    pub border: Style,
}

impl Theme {
    pub fn from_palette(palette: Palette) -> Self {
        let fg = |c: Color| Style::default().fg(c);
        Self {
            palette,
            text: Style::default().fg(Color::White),
            primary: fg(palette.primary),
            secondary: fg(palette.secondary),
            muted: fg(palette.muted),
            success: fg(palette.success),
            warning: fg(palette.warning),
            error: fg(palette.error),
            accent: fg(palette.accent),
            title: fg(palette.primary).add_modifier(Modifier::BOLD),
            selected: fg(palette.primary).add_modifier(Modifier::BOLD),
            cursor: fg(palette.primary),
            border: fg(palette.secondary),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_palette(DEFAULT_CYAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_palette_name_is_default() {
        assert_eq!(Palette::by_name("tokyo-night"), TOKYO_NIGHT);
        assert_eq!(Palette::by_name(" catppuccin\n"), CATPPUCCIN_MOCHA);
        assert_eq!(Palette::by_name("solarized"), DEFAULT_CYAN);
    }

    #[test]
    fn theme_is_derived_from_palette() {
        let theme = Theme::from_palette(CATPPUCCIN_MOCHA);
        assert_eq!(theme.error.fg, Some(CATPPUCCIN_MOCHA.error));
        assert_eq!(theme.palette, CATPPUCCIN_MOCHA);
    }
}
