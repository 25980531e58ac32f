//! Light and dark palettes
//!
//! The active palette is always derived from the session's theme flag; there
//! is no global theme state.

use ratatui::style::Color;

/// Colors for the UI chrome plus the tint endpoints handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    /// Terminal background
    pub bg: Color,
    /// Default foreground
    pub fg: Color,
    /// De-emphasized text (help line, stale info)
    pub muted: Color,
    /// Accents (gauge fill, titles)
    pub accent: Color,
    /// Error notices
    pub error: Color,
    /// Tint endpoint for black page content (RGB)
    pub page_black: i32,
    /// Tint endpoint for the white page background (RGB)
    pub page_white: i32,
}

// Catppuccin Latte
pub static LIGHT: Palette = Palette {
    bg: Color::Rgb(0xEF, 0xF1, 0xF5),
    fg: Color::Rgb(0x4C, 0x4F, 0x69),
    muted: Color::Rgb(0x8C, 0x8F, 0xA1),
    accent: Color::Rgb(0x1E, 0x66, 0xF5),
    error: Color::Rgb(0xD2, 0x0F, 0x39),
    page_black: 0x000000,
    page_white: 0xFFFFFF,
};

// Catppuccin Mocha
pub static DARK: Palette = Palette {
    bg: Color::Rgb(0x1E, 0x1E, 0x2E),
    fg: Color::Rgb(0xCD, 0xD6, 0xF4),
    muted: Color::Rgb(0x6C, 0x70, 0x86),
    accent: Color::Rgb(0x89, 0xB4, 0xFA),
    error: Color::Rgb(0xF3, 0x8B, 0xA8),
    // Dark theme re-tints the page: ink becomes light text, paper the dark base.
    page_black: 0xCDD6F4,
    page_white: 0x1E1E2E,
};

/// Palette for the given theme flag
#[must_use]
pub fn palette(is_dark: bool) -> &'static Palette {
    if is_dark { &DARK } else { &LIGHT }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_flag_selects_dark_palette() {
        assert_eq!(palette(true).page_white, DARK.page_white);
        assert_eq!(palette(false).page_white, 0xFFFFFF);
    }
}
