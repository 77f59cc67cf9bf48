//! Plain-text tables for terminal listings (profiles, suggestions).
//!
//! Columns whose every non-empty cell parses as a number are right-aligned.

use std::borrow::Cow;
use std::fmt::Write as _;

use itertools::Itertools;

use crate::data::parse_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let aligns = (0..column_count)
        .map(|idx| column_alignment(rows, idx))
        .collect::<Vec<_>>();

    let mut output = String::new();

    let header_line = format_row(headers, &widths, &aligns);
    let _ = writeln!(output, "{header_line}");

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let separator_line = format_row(
        &separator_cells,
        &separator_widths,
        &vec![Align::Left; column_count],
    );
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths, &aligns);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    let rendered = render_table(headers, rows);
    print!("{rendered}");
}

fn column_alignment(rows: &[Vec<String>], idx: usize) -> Align {
    let mut cells = rows
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|cell| !cell.is_empty())
        .peekable();
    if cells.peek().is_some() && cells.all(|cell| parse_number(cell).is_some()) {
        Align::Right
    } else {
        Align::Left
    }
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (value, width))| {
            let sanitized = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(sanitized.as_ref())));
            match aligns.get(idx).copied().unwrap_or(Align::Left) {
                Align::Left => format!("{sanitized}{padding}"),
                Align::Right => format!("{padding}{sanitized}"),
            }
        })
        .join("  ");
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape, e.g. \x1b[31m
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn numeric_columns_are_right_aligned() {
        let headers = strings(&["column", "missing"]);
        let rows = vec![strings(&["Region", "0.3"]), strings(&["Sales", "12.25"])];
        let rendered = render_table(&headers, &rows);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "column  missing");
        assert_eq!(lines[1], "------  -------");
        assert_eq!(lines[2], "Region      0.3");
        assert_eq!(lines[3], "Sales     12.25");
    }

    #[test]
    fn control_characters_are_flattened() {
        let headers = strings(&["reason"]);
        let rows = vec![strings(&["a\tb\nc"])];
        let rendered = render_table(&headers, &rows);
        assert!(rendered.contains("a b c"));
    }
}
