//! Terminal rendering of a [`ResourceTable`].

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use catalog_schema::OrganizationIndicators;

use crate::list::table::{Align, CellStyle, EMPTY_ILLUSTRATION, EMPTY_TEXT, ResourceTable, Row};

use super::paint;

const NUMBER_HEADER: &str = "NO.";

/// Render the current page. A page with no rows renders the empty-state
/// illustration instead of an empty grid.
pub fn render_table<T: Row>(table: &ResourceTable<T>) -> String {
    if table.rows().is_empty() {
        if table.is_loading() {
            return "Loading...".to_string();
        }
        return format!("{}\n{:>15}\n", EMPTY_ILLUSTRATION.trim_end(), EMPTY_TEXT);
    }

    let mut builder = Builder::default();
    builder.push_record(std::iter::once(NUMBER_HEADER).chain(table.headers()));
    for (index, row) in table.rows().iter().enumerate() {
        let cells = table
            .cells(row)
            .into_iter()
            .map(|cell| paint(&cell.text, cell.style));
        builder.push_record(std::iter::once(table.row_number(index).to_string()).chain(cells));
    }

    let mut rendered = builder.build();
    rendered.with(Style::rounded());
    for (index, column) in table.columns().iter().enumerate() {
        let alignment = match column.align {
            Align::Left => continue,
            Align::Right => Alignment::right(),
            Align::Center => Alignment::center(),
        };
        // Column 0 holds the row number.
        rendered.modify(Columns::new(index + 1..index + 2), alignment);
    }
    rendered.to_string()
}

/// `Showing 11-20 of 45 · page 2/5 · page size 10`
pub fn table_footer<T: Row>(table: &ResourceTable<T>) -> String {
    let pagination = table.pagination();
    let (start, end) = pagination.row_range(table.rows().len(), table.row_count());
    format!(
        "Showing {start}-{end} of {} · page {}/{} · page size {}",
        table.row_count(),
        pagination.page + 1,
        table.page_count().max(1),
        pagination.page_size
    )
}

/// Organization counts by status as coloured badges.
pub fn render_indicators(indicators: &OrganizationIndicators) -> String {
    [
        ("Pending", indicators.pending, CellStyle::Warning),
        ("Approved", indicators.approved, CellStyle::Info),
        ("Rejected", indicators.rejected, CellStyle::Danger),
    ]
    .into_iter()
    .map(|(label, count, style)| paint(&format!("[{label} {count}]"), style))
    .collect::<Vec<_>>()
    .join(" ")
}
