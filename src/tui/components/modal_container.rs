//! Modal container component
//!
//! A bordered box with an optional title and footer line, used by the row
//! menu and the confirmation dialog.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Predefined modal border colors
#[derive(Clone, Copy, Default)]
pub enum ModalBorderColor {
    #[default]
    Focused,
    Warning,
    Danger,
}

impl ModalBorderColor {
    pub fn to_color(&self) -> Color {
        let theme = theme();
        match self {
            Self::Focused => theme.border_focused,
            Self::Warning => theme.warning,
            Self::Danger => theme.danger,
        }
    }
}

/// Props for the ModalContainer component
#[derive(Default, Props)]
pub struct ModalContainerProps<'a> {
    /// Width in columns (default 60)
    pub width: Option<u32>,
    pub border_color: Option<ModalBorderColor>,
    pub title: Option<String>,
    pub footer_text: Option<String>,
    pub children: Vec<AnyElement<'a>>,
}

#[component]
pub fn ModalContainer<'a>(props: &mut ModalContainerProps<'a>) -> impl Into<AnyElement<'a>> {
    let theme = theme();
    let border_color = props.border_color.unwrap_or_default().to_color();
    let width = props.width.unwrap_or(60);

    element! {
        View(
            width: width,
            background_color: theme.background,
            border_style: BorderStyle::Double,
            border_color: border_color,
            padding: 1,
            flex_direction: FlexDirection::Column,
        ) {
            #(props.title.clone().map(|title| element! {
                View(
                    width: 100pct,
                    padding_bottom: 1,
                    border_edges: Edges::Bottom,
                    border_style: BorderStyle::Single,
                    border_color: theme.border,
                ) {
                    Text(content: title, color: theme.info, weight: Weight::Bold)
                }
            }))

            View(
                width: 100pct,
                flex_direction: FlexDirection::Column,
                overflow: Overflow::Hidden,
            ) {
                #(std::mem::take(&mut props.children))
            }

            #(props.footer_text.clone().map(|footer| element! {
                View(
                    width: 100pct,
                    padding_top: 1,
                    border_edges: Edges::Top,
                    border_style: BorderStyle::Single,
                    border_color: theme.border,
                ) {
                    Text(content: footer, color: theme.text_dimmed)
                }
            }))
        }
    }
}
