//! Search box component
//!
//! Display-only: keystrokes go through the browser model, which owns the
//! text and the debounce.

use iocraft::prelude::*;

use crate::tui::model::SearchView;
use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct SearchBoxProps {
    pub search: SearchView,
}

/// Search input with a "/" prefix and a cursor while focused
#[component]
pub fn SearchBox(props: &SearchBoxProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let search = &props.search;
    let border_color = if search.focused {
        theme.border_focused
    } else {
        theme.border
    };

    let (content, color) = if search.text.is_empty() && !search.focused {
        (search.placeholder.clone(), theme.text_dimmed)
    } else if search.focused {
        (format!("{}_", search.text), theme.text)
    } else {
        (search.text.clone(), theme.text)
    };

    element! {
        View(
            flex_direction: FlexDirection::Row,
            flex_grow: 1.0,
            border_style: BorderStyle::Round,
            border_color: border_color,
            padding_left: 1,
            padding_right: 1,
            height: 3,
        ) {
            View(margin_right: 1) {
                Text(content: "/", color: theme.text_dimmed)
            }
            View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                Text(content: content, color: color)
            }
            #(search.pending.then(|| element! {
                Text(content: "…", color: theme.text_dimmed)
            }))
        }
    }
}
