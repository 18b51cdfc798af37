//! Resource table component
//!
//! Renders the current page as fixed-width columns: a row number column,
//! then one column per resource column, with the selected row highlighted.

use iocraft::prelude::*;

use crate::list::table::Align;
use crate::tui::model::RowView;
use crate::tui::theme::theme;

/// Widest a column grows before its text is cut
const MAX_COLUMN_WIDTH: usize = 32;

const NUMBER_HEADER: &str = "NO.";

/// Width of every column, the row number column first.
pub fn column_widths(headers: &[String], rows: &[RowView]) -> Vec<usize> {
    let number = rows
        .iter()
        .map(|row| row.number.to_string().len())
        .chain([NUMBER_HEADER.len()])
        .max()
        .unwrap_or(NUMBER_HEADER.len());

    let mut widths = vec![number];
    for (index, header) in headers.iter().enumerate() {
        let widest = rows
            .iter()
            .filter_map(|row| row.cells.get(index))
            .map(|cell| cell.text.chars().count())
            .chain([header.chars().count()])
            .max()
            .unwrap_or(0);
        widths.push(widest.min(MAX_COLUMN_WIDTH));
    }
    widths
}

/// Pad or cut `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    if len > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        return cut;
    }
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
        Align::Center => format!("{text:^width$}"),
    }
}

#[derive(Default, Props)]
pub struct DataTableProps {
    pub headers: Vec<String>,
    pub aligns: Vec<Align>,
    pub rows: Vec<RowView>,
    /// Dim the rows while a re-read is in flight
    pub loading: bool,
}

#[component]
pub fn DataTable(props: &DataTableProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let widths = column_widths(&props.headers, &props.rows);
    let align_of = |index: usize| props.aligns.get(index).copied().unwrap_or_default();

    let header_cells: Vec<(String, usize)> = std::iter::once(NUMBER_HEADER.to_string())
        .chain(props.headers.iter().cloned())
        .zip(widths.iter().copied())
        .collect();

    element! {
        View(
            width: 100pct,
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border,
            overflow: Overflow::Hidden,
        ) {
            View(
                height: 1,
                flex_direction: FlexDirection::Row,
                flex_shrink: 0.0,
                padding_left: 1,
                column_gap: 2,
            ) {
                #(header_cells.into_iter().map(|(header, width)| element! {
                    View(width: width as u32, flex_shrink: 0.0) {
                        Text(
                            content: fit(&header, width, Align::Left),
                            color: theme.text_dimmed,
                            weight: Weight::Bold,
                        )
                    }
                }))
            }

            #(props.rows.iter().map(|row| {
                let background = row.selected.then_some(theme.selected_row);
                let number_width = widths[0];
                element! {
                    View(
                        height: 1,
                        flex_direction: FlexDirection::Row,
                        flex_shrink: 0.0,
                        padding_left: 1,
                        column_gap: 2,
                        background_color: background,
                    ) {
                        View(width: number_width as u32, flex_shrink: 0.0) {
                            Text(
                                content: fit(&row.number.to_string(), number_width, Align::Right),
                                color: theme.text_dimmed,
                            )
                        }
                        #(row.cells.iter().enumerate().map(|(index, cell)| {
                            let width = widths.get(index + 1).copied().unwrap_or(0);
                            let color = if props.loading {
                                theme.text_dimmed
                            } else {
                                theme.cell_color(cell.style)
                            };
                            element! {
                                View(width: width as u32, flex_shrink: 0.0) {
                                    Text(
                                        content: fit(&cell.text, width, align_of(index)),
                                        color: color,
                                        weight: if row.selected { Weight::Bold } else { Weight::Normal },
                                    )
                                }
                            }
                        }))
                    }
                }
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::table::Cell;

    fn row(number: u64, cells: &[&str]) -> RowView {
        RowView {
            number,
            cells: cells.iter().map(|text| Cell::plain(*text)).collect(),
            selected: false,
        }
    }

    #[test]
    fn test_column_widths() {
        let headers = vec!["NAME".to_string(), "STATUS".to_string()];
        let rows = vec![row(9, &["Acme Corporation", "Pending"]), row(1000, &["A", "B"])];
        assert_eq!(column_widths(&headers, &rows), vec![4, 16, 7]);
    }

    #[test]
    fn test_long_text_is_capped_and_cut() {
        let long = "x".repeat(40);
        let headers = vec!["TITLE".to_string()];
        let widths = column_widths(&headers, &[row(1, &[&long])]);
        assert_eq!(widths, vec![3, MAX_COLUMN_WIDTH]);

        let cut = fit(&long, MAX_COLUMN_WIDTH, Align::Left);
        assert_eq!(cut.chars().count(), MAX_COLUMN_WIDTH);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_fit_alignment() {
        assert_eq!(fit("ab", 4, Align::Left), "ab  ");
        assert_eq!(fit("ab", 4, Align::Right), "  ab");
        assert_eq!(fit("ab", 4, Align::Center), " ab ");
    }
}
