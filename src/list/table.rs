//! Table model shared by the CLI and TUI renderers.

use std::cmp::Ordering;

use super::pagination::{ChangeReason, PaginationModel};

/// Shown in place of the table body when a page has no rows.
pub const EMPTY_ILLUSTRATION: &str = r"
      .-----------.
     /           /|
    +-----------+ |
    |  .     .  | |
    |     ~     | +
    |           |/
    +-----------+
";

pub const EMPTY_TEXT: &str = "No data";

/// Rows are identified by a stable backend id, never by position.
pub trait Row {
    fn row_id(&self) -> &str;
}

/// Colour role of a rendered cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellStyle {
    #[default]
    Plain,
    Muted,
    Success,
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Plain,
        }
    }

    pub fn styled(text: impl Into<String>, style: CellStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// `True` in green or `False` in amber.
    pub fn flag(value: bool) -> Self {
        if value {
            Self::styled("True", CellStyle::Success)
        } else {
            Self::styled("False", CellStyle::Warning)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// One column: which field it shows, its header, how a row renders into it,
/// and optionally how rows compare when sorting by it.
pub struct Column<T> {
    pub field: &'static str,
    pub header: &'static str,
    pub format: fn(&T) -> Cell,
    pub compare: Option<fn(&T, &T) -> Ordering>,
    pub align: Align,
}

impl<T> Column<T> {
    pub fn new(field: &'static str, header: &'static str, format: fn(&T) -> Cell) -> Self {
        Self {
            field,
            header,
            format,
            compare: None,
            align: Align::Left,
        }
    }

    pub fn sortable(mut self, compare: fn(&T, &T) -> Ordering) -> Self {
        self.compare = Some(compare);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            header: self.header,
            format: self.format,
            compare: self.compare,
            align: self.align,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// Events a table reports to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    PaginationChanged(PaginationModel),
    RowActivated(String),
}

/// Rows of the current page plus everything needed to render and page them.
pub struct ResourceTable<T> {
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    loading: bool,
    /// Server-side total across all pages
    row_count: u64,
    pagination: PaginationModel,
    sort: Option<SortState>,
}

impl<T: Row> ResourceTable<T> {
    pub fn new(columns: Vec<Column<T>>, pagination: PaginationModel) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            loading: false,
            row_count: 0,
            pagination,
            sort: None,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header).collect()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn pagination(&self) -> PaginationModel {
        self.pagination
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replace the page contents. `row_count` is the server total.
    pub fn set_rows(&mut self, rows: Vec<T>, row_count: u64) {
        self.rows = rows;
        self.row_count = row_count;
        self.apply_sort();
    }

    /// Pages available, from the server total rather than the rows held.
    pub fn page_count(&self) -> u32 {
        self.pagination.page_count(self.row_count)
    }

    /// One-based row number across pages.
    pub fn row_number(&self, index: usize) -> u64 {
        index as u64 + 1 + self.pagination.offset()
    }

    pub fn is_empty_state(&self) -> bool {
        self.rows.is_empty() && !self.loading
    }

    pub fn find(&self, row_id: &str) -> Option<&T> {
        self.rows.iter().find(|row| row.row_id() == row_id)
    }

    pub fn row_id(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(Row::row_id)
    }

    /// Render one row into cells, in column order.
    pub fn cells(&self, row: &T) -> Vec<Cell> {
        self.columns.iter().map(|c| (c.format)(row)).collect()
    }

    /// Accept a pagination change. Changes without a reason are programmatic
    /// and produce no event.
    pub fn handle_pagination_change(
        &mut self,
        model: PaginationModel,
        reason: Option<ChangeReason>,
    ) -> Option<TableEvent> {
        let reason = reason?;
        if model == self.pagination {
            return None;
        }
        tracing::trace!(?reason, page = model.page, size = model.page_size, "page change");
        self.pagination = model;
        Some(TableEvent::PaginationChanged(model))
    }

    /// Programmatic reset, e.g. back to the first page after a filter change.
    pub fn reset_pagination(&mut self, model: PaginationModel) {
        self.pagination = model;
    }

    /// Sort the current page by `field`, toggling direction when it is
    /// already the sort field. Columns without a comparator are ignored.
    pub fn sort_by(&mut self, field: &str) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.field == field && c.compare.is_some())
        else {
            return false;
        };
        let direction = match self.sort {
            Some(SortState {
                field: current,
                direction: SortDirection::Ascending,
            }) if current == column.field => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState {
            field: column.field,
            direction,
        });
        self.apply_sort();
        true
    }

    fn apply_sort(&mut self) {
        let Some(sort) = self.sort else {
            return;
        };
        let Some(compare) = self
            .columns
            .iter()
            .find(|c| c.field == sort.field)
            .and_then(|c| c.compare)
        else {
            return;
        };
        self.rows.sort_by(|a, b| match sort.direction {
            SortDirection::Ascending => compare(a, b),
            SortDirection::Descending => compare(b, a),
        });
    }
}
