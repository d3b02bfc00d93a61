// src/services/table.rs

//! Flattening of HTML tables into header + string-cell rows.
//!
//! The statistics site renders every dataset as a `<table>` with a stable
//! DOM id, a multi-row `<thead>` whose last row carries the real column
//! labels, and spanned cells for separator rows. Cells are expanded by
//! their `colspan` so each flattened row has one string per column.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// A table flattened to its final header row and body rows of cell text.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the column with the given header label.
    pub fn column(&self, name: &str, context: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AppError::parse(context, format!("missing column '{name}'")))
    }

    /// Index of the column with the given header label, if present.
    pub fn column_opt(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Extract the table with the given DOM id, or fail for the page.
pub fn extract_table(document: &Html, id: &str, page: &str) -> Result<Table> {
    let selector = parse_selector(&format!("table#{id}"))?;
    let table = document
        .select(&selector)
        .next()
        .ok_or_else(|| AppError::missing_table(id, page))?;

    let row_selector = parse_selector("tr")?;
    let thead_selector = parse_selector("thead")?;
    let tbody_selector = parse_selector("tbody")?;

    let headers = table
        .select(&thead_selector)
        .next()
        .and_then(|thead| thead.select(&row_selector).last())
        .map(|tr| flatten_row(&tr))
        .unwrap_or_default();

    let rows = table
        .select(&tbody_selector)
        .flat_map(|tbody| tbody.select(&row_selector).map(|tr| flatten_row(&tr)))
        .collect();

    Ok(Table { headers, rows })
}

/// Flatten one `<tr>` into cell text, repeating spanned cells.
fn flatten_row(tr: &ElementRef) -> Vec<String> {
    let mut cells = Vec::new();
    for child in tr.children().filter_map(ElementRef::wrap) {
        let name = child.value().name();
        if name != "td" && name != "th" {
            continue;
        }
        let span: usize = child
            .value()
            .attr("colspan")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let text = cell_text(&child);
        for _ in 0..span.max(1) {
            cells.push(text.clone());
        }
    }
    cells
}

/// Visible text of a cell with whitespace collapsed.
pub fn cell_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a cell as an optional float; empty cells are `None`.
pub fn parse_opt_f64(cell: &str, context: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse()
        .map(Some)
        .map_err(|_| AppError::parse(context, format!("expected a number, got '{cell}'")))
}

/// Parse a cell as an optional integer; empty cells are `None`.
pub fn parse_opt_i64(cell: &str, context: &str) -> Result<Option<i64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse()
        .map(Some)
        .map_err(|_| AppError::parse(context, format!("expected an integer, got '{cell}'")))
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <table id="demo">
          <thead>
            <tr><th colspan="3">Group</th></tr>
            <tr><th>Name</th><th>A</th><th>B</th></tr>
          </thead>
          <tbody>
            <tr><th>first</th><td>1</td><td>2</td></tr>
            <tr><td colspan="3">separator</td></tr>
          </tbody>
        </table>
    "#;

    #[test]
    fn takes_last_header_row() {
        let document = Html::parse_document(SAMPLE);
        let table = extract_table(&document, "demo", "test").unwrap();
        assert_eq!(table.headers, vec!["Name", "A", "B"]);
    }

    #[test]
    fn expands_colspan_in_body() {
        let document = Html::parse_document(SAMPLE);
        let table = extract_table(&document, "demo", "test").unwrap();
        assert_eq!(table.rows[0], vec!["first", "1", "2"]);
        assert_eq!(table.rows[1], vec!["separator"; 3]);
    }

    #[test]
    fn missing_table_is_an_error() {
        let document = Html::parse_document(SAMPLE);
        let err = extract_table(&document, "absent", "test").unwrap_err();
        assert!(matches!(err, AppError::MissingTable { .. }));
    }

    #[test]
    fn column_lookup() {
        let document = Html::parse_document(SAMPLE);
        let table = extract_table(&document, "demo", "test").unwrap();
        assert_eq!(table.column("B", "test").unwrap(), 2);
        assert!(table.column("C", "test").is_err());
        assert_eq!(table.column_opt("C"), None);
    }

    #[test]
    fn numeric_cells() {
        assert_eq!(parse_opt_f64("1.5", "t").unwrap(), Some(1.5));
        assert_eq!(parse_opt_f64("", "t").unwrap(), None);
        assert!(parse_opt_f64("x", "t").is_err());
        assert_eq!(parse_opt_i64("-3", "t").unwrap(), Some(-3));
        assert_eq!(parse_opt_i64(" ", "t").unwrap(), None);
    }
}
