//! Theme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Brand Colors
    pub primary: Color,
    pub accent: Color,

    // Semantic Colors
    pub success: Color,
    pub warning: Color,

    // Background Colors
    pub bg: Color,
    pub bg_card: Color,
    pub bg_highlight: Color,

    // Text Colors
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    // Rating Colors
    pub rating_again: Color,
    pub rating_good: Color,
}

/// Available theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            ThemeName::Dark
        } else {
            ThemeName::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == ThemeName::Dark
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Light => "Light",
            ThemeName::Dark => "Dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        }
    }
}

/// Theme struct that holds colors and provides style methods.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        let colors = match name {
            ThemeName::Light => Self::light_colors(),
            ThemeName::Dark => Self::dark_colors(),
        };
        Self { name, colors }
    }

    pub fn from_dark_mode(dark_mode: bool) -> Self {
        Self::new(ThemeName::from_dark_mode(dark_mode))
    }

    /// Green study palette on a pale background.
    fn light_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(21, 128, 61),        // Green 700
            accent: Color::Rgb(37, 99, 235),         // Blue 600

            success: Color::Rgb(22, 163, 74),        // Green 600
            warning: Color::Rgb(202, 138, 4),        // Yellow 600

            bg: Color::Rgb(220, 252, 231),           // Green 100
            bg_card: Color::Rgb(255, 255, 255),      // White
            bg_highlight: Color::Rgb(187, 247, 208), // Green 200

            text: Color::Rgb(31, 41, 55),            // Gray 800
            text_muted: Color::Rgb(75, 85, 99),      // Gray 600
            text_dim: Color::Rgb(156, 163, 175),     // Gray 400

            rating_again: Color::Rgb(234, 179, 8),   // Yellow 500
            rating_good: Color::Rgb(34, 197, 94),    // Green 500
        }
    }

    fn dark_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(134, 239, 172),      // Green 300
            accent: Color::Rgb(96, 165, 250),        // Blue 400

            success: Color::Rgb(74, 222, 128),       // Green 400
            warning: Color::Rgb(250, 204, 21),       // Yellow 400

            bg: Color::Rgb(17, 24, 39),              // Gray 900
            bg_card: Color::Rgb(31, 41, 55),         // Gray 800
            bg_highlight: Color::Rgb(55, 65, 81),    // Gray 700

            text: Color::Rgb(243, 244, 246),         // Gray 100
            text_muted: Color::Rgb(156, 163, 175),   // Gray 400
            text_dim: Color::Rgb(107, 114, 128),     // Gray 500

            rating_again: Color::Rgb(234, 179, 8),   // Yellow 500
            rating_good: Color::Rgb(34, 197, 94),    // Green 500
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Styles
    // ══════════════════════════════════════════════════════════════════════

    pub fn base(&self) -> Style {
        Style::default()
            .bg(self.colors.bg)
            .fg(self.colors.text)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subtitle(&self) -> Style {
        Style::default()
            .fg(self.colors.text_muted)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.colors.bg_highlight)
            .fg(self.colors.text)
    }

    pub fn card_front(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_back(&self) -> Style {
        Style::default()
            .fg(self.colors.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn stats_due(&self) -> Style {
        Style::default()
            .fg(self.colors.warning)
            .add_modifier(Modifier::BOLD)
    }

    pub fn stats_reviewed(&self) -> Style {
        Style::default()
            .fg(self.colors.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.colors.text_dim)
    }

    pub fn key_highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn field(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.colors.accent)
        } else {
            Style::default().fg(self.colors.text_muted)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeName::Light)
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Icons
// ══════════════════════════════════════════════════════════════════════════

pub mod icons {
    pub const MOON: &str = "☾";
    pub const SUN: &str = "☀";
    pub const CLOCK: &str = "⏱";
    pub const CHECK: &str = "✓";
}
