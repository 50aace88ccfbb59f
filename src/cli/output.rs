//! Plain-text rendering of a loaded page.

use std::io::{self, Write};

use alarmdesk::{ApiError, Column, TableView};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";

/// Writes the page held by `view` to stdout.
pub fn write_view(columns: &[Column], view: &TableView<Value>) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    write_view_to(&mut stdout, columns, view)
}

/// Writes the page held by `view` to the given writer.
pub fn write_view_to<W: Write>(
    writer: &mut W,
    columns: &[Column],
    view: &TableView<Value>,
) -> Result<(), ApiError> {
    if let Some(message) = &view.error {
        writeln!(writer, "Error: {message}").map_err(|e| io_error(&e))?;
    }
    write_rows(writer, columns, &view.visible_rows())?;
    writeln!(
        writer,
        "{}",
        footer_line(
            view.entry_range(),
            view.total_count,
            view.current_page(),
            view.total_pages
        )
    )
    .map_err(|e| io_error(&e))?;
    if view.total_pages > 1 {
        writeln!(
            writer,
            "{}",
            pager_line(&view.page_links(), view.current_page())
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes `rows` as an aligned table with a header and a rule.
pub fn write_rows<W: Write>(
    writer: &mut W,
    columns: &[Column],
    rows: &[Value],
) -> Result<(), ApiError> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|column| column.cell(row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.width())
                .fold(column.title.width(), usize::max)
        })
        .collect();

    let header: Vec<String> = columns.iter().map(|column| column.title.to_owned()).collect();
    write_line(writer, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_line(writer, &rule, &widths)?;
    for row in &cells {
        write_line(writer, row, &widths)?;
    }
    Ok(())
}

/// "Showing X to Y of Z entries" with the page position.
#[must_use]
pub fn footer_line(
    range: Option<(u64, u64)>,
    total_count: u64,
    current_page: u32,
    total_pages: u32,
) -> String {
    range.map_or_else(
        || "No entries found".to_owned(),
        |(first, last)| {
            format!(
                "Showing {first} to {last} of {total_count} entries (page {current_page} of {total_pages})"
            )
        },
    )
}

/// Page links with the current page in brackets and `…` for skipped pages.
#[must_use]
pub fn pager_line(links: &[Option<u32>], current_page: u32) -> String {
    let labels: Vec<String> = links
        .iter()
        .map(|link| match link {
            Some(page) if *page == current_page => format!("[{page}]"),
            Some(page) => page.to_string(),
            None => "…".to_owned(),
        })
        .collect();
    format!("Pages: {}", labels.join(" "))
}

fn write_line<W: Write>(writer: &mut W, cells: &[String], widths: &[usize]) -> Result<(), ApiError> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    writeln!(writer, "{}", padded.join(COLUMN_GAP).trim_end()).map_err(|e| io_error(&e))
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn io_error(error: &io::Error) -> ApiError {
    ApiError::Io {
        message: error.to_string(),
    }
}
