//! Theme system for TUI colors and styles
//!
//! Cell colours match the CLI table output (`display::paint`).

use iocraft::prelude::Color;

use crate::list::table::CellStyle;
use crate::mutation::NotificationLevel;

const GREY: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Cell styles (consistent with the CLI tables)
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,
    pub muted: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub selected_row: Color,
    /// Behind the confirmation dialog
    pub backdrop: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            info: Color::Cyan,
            muted: GREY,

            border: GREY,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: GREY,
            highlight: Color::Blue,
            selected_row: Color::Rgb {
                r: 40,
                g: 44,
                b: 68,
            },
            backdrop: Color::Rgb {
                r: 30,
                g: 30,
                b: 30,
            },
        }
    }
}

impl Theme {
    /// Get the color for a table cell
    pub fn cell_color(&self, style: CellStyle) -> Color {
        match style {
            CellStyle::Plain => self.text,
            CellStyle::Muted => self.muted,
            CellStyle::Success => self.success,
            CellStyle::Warning => self.warning,
            CellStyle::Danger => self.danger,
            CellStyle::Info => self.info,
        }
    }

    /// Get the color for a notification
    pub fn notification_color(&self, level: NotificationLevel) -> Color {
        match level {
            NotificationLevel::Success => self.success,
            NotificationLevel::Info => self.info,
            NotificationLevel::Warning => self.warning,
            NotificationLevel::Error => self.danger,
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
