use owo_colors::{OwoColorize, Stream};

use crate::list::table::CellStyle;
use crate::mutation::{Notification, NotificationLevel};

pub mod data_formatting;
pub mod table;

pub use data_formatting::*;
pub use table::{render_indicators, render_table, table_footer};

/// Colour `text` for stdout according to its cell style. Colour is dropped
/// when stdout is not a terminal or `NO_COLOR` is set.
pub fn paint(text: &str, style: CellStyle) -> String {
    match style {
        CellStyle::Plain => text.to_string(),
        CellStyle::Muted => text
            .if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string(),
        CellStyle::Success => text
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        CellStyle::Warning => text
            .if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string(),
        CellStyle::Danger => text
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string(),
        CellStyle::Info => text
            .if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string(),
    }
}

/// Notification as a single status line, e.g. `✓ Organization approved`.
pub fn format_notification(notification: &Notification) -> String {
    let (marker, style) = match notification.level {
        NotificationLevel::Success => ("✓", CellStyle::Success),
        NotificationLevel::Info => ("•", CellStyle::Info),
        NotificationLevel::Warning => ("!", CellStyle::Warning),
        NotificationLevel::Error => ("✗", CellStyle::Danger),
    };
    format!("{} {}", paint(marker, style), notification.message)
}
