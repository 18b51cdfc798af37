//! Toast notification bar
//!
//! Shows the latest mutation or fetch notification; the model expires it.

use iocraft::prelude::*;

use crate::mutation::Notification;
use crate::tui::theme::theme;

/// Render a toast notification as an optional element
pub fn render_toast(toast: &Option<Notification>) -> Option<AnyElement<'static>> {
    toast.as_ref().map(|notification| {
        let color = theme().notification_color(notification.level);
        element! {
            View(
                width: 100pct,
                height: 3,
                flex_shrink: 0.0,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                background_color: Color::Black,
                border_edges: Edges::Top,
                border_style: BorderStyle::Single,
                border_color: color,
            ) {
                Text(content: notification.message.clone(), color: color)
            }
        }
        .into_any()
    })
}
