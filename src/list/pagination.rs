use serde::Serialize;

/// Page sizes offered by every list view.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [5, 10, 100];

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Current page of a list. Pages are zero-based and the request offset is
/// always `page * page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PaginationModel {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationModel {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationModel {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Number of pages needed for `row_count` rows.
    pub fn page_count(&self, row_count: u64) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        let pages = row_count.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn first(self) -> Self {
        Self { page: 0, ..self }
    }

    pub fn next(self, row_count: u64) -> Self {
        let last = self.page_count(row_count).saturating_sub(1);
        Self {
            page: (self.page + 1).min(last),
            ..self
        }
    }

    pub fn previous(self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self
        }
    }

    /// Switch page size, returning to the first page.
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self { page: 0, page_size }
    }

    /// Next entry of [`PAGE_SIZE_OPTIONS`], wrapping around.
    pub fn cycle_page_size(self) -> Self {
        let index = PAGE_SIZE_OPTIONS
            .iter()
            .position(|size| *size == self.page_size)
            .map(|i| (i + 1) % PAGE_SIZE_OPTIONS.len())
            .unwrap_or(0);
        self.with_page_size(PAGE_SIZE_OPTIONS[index])
    }

    /// Range of one-based row numbers shown, e.g. `11-20`.
    pub fn row_range(&self, rows_on_page: usize, row_count: u64) -> (u64, u64) {
        if rows_on_page == 0 {
            return (0, 0);
        }
        let start = self.offset() + 1;
        let end = (self.offset() + rows_on_page as u64).min(row_count.max(start));
        (start, end)
    }
}

/// Why the pagination changed. Only user interactions carry a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// Next/previous page control
    PageControl,
    /// Page size selector
    PageSizeSelect,
    /// Typed page number
    Jump,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PaginationModel::new(0, 10).offset(), 0);
        assert_eq!(PaginationModel::new(2, 10).offset(), 20);
        assert_eq!(PaginationModel::new(1, 100).offset(), 100);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let model = PaginationModel::new(0, 10);
        assert_eq!(model.page_count(0), 0);
        assert_eq!(model.page_count(10), 1);
        assert_eq!(model.page_count(11), 2);
        assert_eq!(model.page_count(205), 21);
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let model = PaginationModel::new(0, 5);
        assert_eq!(model.next(12).page, 1);
        assert_eq!(model.next(12).next(12).next(12).page, 2);
        assert_eq!(model.previous().page, 0);
    }

    #[test]
    fn test_cycle_page_size_resets_page() {
        let model = PaginationModel::new(3, 10).cycle_page_size();
        assert_eq!(model, PaginationModel::new(0, 100));
        assert_eq!(model.cycle_page_size().page_size, 5);
    }

    #[test]
    fn test_row_range() {
        assert_eq!(PaginationModel::new(1, 10).row_range(10, 25), (11, 20));
        assert_eq!(PaginationModel::new(2, 10).row_range(5, 25), (21, 25));
        assert_eq!(PaginationModel::new(0, 10).row_range(0, 0), (0, 0));
    }
}
