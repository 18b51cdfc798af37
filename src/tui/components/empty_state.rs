//! Empty state component
//!
//! Shown in place of the table when the current page has no rows.

use iocraft::prelude::*;

use crate::list::table::{EMPTY_ILLUSTRATION, EMPTY_TEXT};
use crate::tui::theme::theme;

/// Type of empty state to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyStateKind {
    /// The list has no records at all
    #[default]
    NoData,
    /// No records match the search or filters
    NoMatches,
    /// The first read is in flight
    Loading,
}

/// Props for the EmptyState component
#[derive(Default, Props)]
pub struct EmptyStateProps {
    pub kind: EmptyStateKind,
    /// Search text, shown for NoMatches
    pub search_query: Option<String>,
}

#[component]
pub fn EmptyState(props: &EmptyStateProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let (art, title, hint) = match props.kind {
        EmptyStateKind::NoData => (EMPTY_ILLUSTRATION.trim_matches('\n'), EMPTY_TEXT, ""),
        EmptyStateKind::NoMatches => (
            "",
            "No results",
            "Try a different search, or press c to clear filters.",
        ),
        EmptyStateKind::Loading => ("", "Loading...", ""),
    };

    element! {
        View(
            width: 100pct,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            padding: 2,
        ) {
            #((!art.is_empty()).then(|| element! {
                View(margin_bottom: 1) {
                    Text(content: art, color: theme.text_dimmed)
                }
            }))

            Text(
                content: title,
                color: theme.text,
                weight: Weight::Bold,
            )

            #(props.search_query.clone().filter(|q| {
                props.kind == EmptyStateKind::NoMatches && !q.is_empty()
            }).map(|query| element! {
                View(margin_top: 1) {
                    Text(
                        content: format!("Search: \"{}\"", query),
                        color: theme.info,
                    )
                }
            }))

            #((!hint.is_empty()).then(|| element! {
                View(margin_top: 2) {
                    Text(content: hint, color: theme.text_dimmed)
                }
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_kind_default() {
        assert_eq!(EmptyStateKind::default(), EmptyStateKind::NoData);
    }
}
