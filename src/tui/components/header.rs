//! App header bar component
//!
//! Displays the screen title and the total row count.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the Header component
#[derive(Default, Props)]
pub struct HeaderProps {
    pub title: String,

    /// Right-hand text, e.g. the page summary
    pub summary: Option<String>,

    /// Shown after the title while a read is in flight
    pub loading: bool,
}

/// App header bar showing title and summary
#[component]
pub fn Header(props: &HeaderProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let title = if props.loading {
        format!("catalog · {} (loading...)", props.title)
    } else {
        format!("catalog · {}", props.title)
    };

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            justify_content: JustifyContent::SpaceBetween,
            padding_left: 1,
            padding_right: 1,
            background_color: theme.highlight,
        ) {
            Text(
                content: title,
                color: theme.text,
                weight: Weight::Bold,
            )
            #(props.summary.clone().map(|summary| element! {
                Text(content: summary, color: theme.text)
            }))
        }
    }
}
