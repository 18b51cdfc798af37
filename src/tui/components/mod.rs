//! Shared TUI components
//!
//! Building blocks of the resource browser. All of them render from plain
//! props; state lives in [`crate::tui::model`].

pub mod data_table;
pub mod empty_state;
pub mod footer;
pub mod header;
pub mod modal_container;
pub mod modal_overlay;
pub mod search_box;
pub mod shortcuts;
pub mod toast;

pub use data_table::{DataTable, DataTableProps, column_widths};
pub use empty_state::{EmptyState, EmptyStateKind, EmptyStateProps};
pub use footer::{Footer, FooterProps, Shortcut};
pub use header::{Header, HeaderProps};
pub use modal_container::{ModalBorderColor, ModalContainer, ModalContainerProps};
pub use modal_overlay::{ModalOverlay, ModalOverlayProps, overlay_background};
pub use search_box::{SearchBox, SearchBoxProps};
pub use shortcuts::ShortcutsBuilder;
pub use toast::render_toast;
