//! Full-screen layer for the row menu and the confirmation dialog.

use iocraft::prelude::*;

use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct ModalOverlayProps<'a> {
    /// Cover the table while a confirmation is pending
    pub backdrop: bool,
    pub children: Vec<AnyElement<'a>>,
}

/// Background of the layer. The row menu leaves the table visible around it.
pub fn overlay_background(backdrop: bool) -> Option<Color> {
    backdrop.then_some(theme().backdrop)
}

#[component]
pub fn ModalOverlay<'a>(props: &mut ModalOverlayProps<'a>) -> impl Into<AnyElement<'a>> {
    element! {
        View(
            width: 100pct,
            height: 100pct,
            position: Position::Absolute,
            top: 0,
            left: 0,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            background_color: overlay_background(props.backdrop),
        ) {
            #(std::mem::take(&mut props.children))
        }
    }
}
