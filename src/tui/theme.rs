// Theme system for the TUI
//
// Each theme defines colors for all UI elements. The theme is picked from
// config (`theme = "dark" | "light" | "nord"`); unknown names fall back to
// dark.

use ratatui::style::{Color, Modifier, Style};

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    Nord,
}

impl ThemeKind {
    /// Resolve a theme from its config name
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            "nord" => ThemeKind::Nord,
            _ => ThemeKind::Dark,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
            ThemeKind::Nord => "Nord",
        }
    }

    /// Get the theme configuration
    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
            ThemeKind::Nord => Theme::nord(),
        }
    }
}

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,

    // Title and status
    pub title: Color,
    pub status_bar: Color,

    // Buttons
    pub button_fg: Color,
    pub button_focused_bg: Color,

    // Session output
    pub result: Color,
    pub error: Color,
    pub busy: Color,

    // Log levels
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
    pub log_trace: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_focused: Color::Cyan,

            title: Color::Cyan,
            status_bar: Color::Green,

            button_fg: Color::White,
            button_focused_bg: Color::DarkGray,

            result: Color::Green,
            error: Color::Red,
            busy: Color::Yellow,

            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
            log_trace: Color::DarkGray,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            muted: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Blue,

            title: Color::Blue,
            status_bar: Color::Rgb(0, 128, 0),

            button_fg: Color::Black,
            button_focused_bg: Color::Rgb(220, 220, 220),

            result: Color::Rgb(0, 128, 0),
            error: Color::Rgb(200, 0, 0),
            busy: Color::Rgb(180, 120, 0),

            log_error: Color::Rgb(200, 0, 0),
            log_warn: Color::Rgb(180, 120, 0),
            log_info: Color::Blue,
            log_debug: Color::DarkGray,
            log_trace: Color::Gray,
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(236, 239, 244),
            muted: Color::Rgb(76, 86, 106),
            border: Color::Rgb(76, 86, 106),
            border_focused: Color::Rgb(136, 192, 208), // Frost

            title: Color::Rgb(136, 192, 208),      // Frost
            status_bar: Color::Rgb(163, 190, 140), // Green

            button_fg: Color::Rgb(236, 239, 244),
            button_focused_bg: Color::Rgb(67, 76, 94),

            result: Color::Rgb(163, 190, 140),
            error: Color::Rgb(191, 97, 106),
            busy: Color::Rgb(235, 203, 139), // Yellow

            log_error: Color::Rgb(191, 97, 106),
            log_warn: Color::Rgb(235, 203, 139),
            log_info: Color::Rgb(129, 161, 193),
            log_debug: Color::Rgb(76, 86, 106),
            log_trace: Color::Rgb(59, 66, 82),
        }
    }

    // Helper methods for creating styles

    /// Base style with theme foreground
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Border style, focused or not
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Title style
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    /// Status bar style
    pub fn status_style(&self) -> Style {
        Style::default().fg(self.status_bar)
    }

    /// Error style
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}
