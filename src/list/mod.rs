//! Building blocks of a paginated, filterable, server-driven list view.

pub mod controller;
pub mod debounce;
pub mod dialog;
pub mod filter_state;
pub mod pagination;
pub mod table;

pub use controller::{ConfirmResult, ListController, MenuOutcome};
pub use debounce::Debounced;
pub use dialog::{DialogControls, DialogPhase, DialogState, RowMenu};
pub use filter_state::{FilterKey, FilterState};
pub use pagination::{ChangeReason, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, PaginationModel};
pub use table::{
    Align, Cell, CellStyle, Column, EMPTY_ILLUSTRATION, EMPTY_TEXT, ResourceTable, Row,
    SortDirection, SortState, TableEvent,
};
