//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Column width: the configured minimum, widened to fit content.
    fn effective_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|cell| UnicodeWidthStr::width(cell.as_str()))
                    .chain([col.width, UnicodeWidthStr::width(col.header.as_str())])
                    .max()
                    .unwrap_or(col.width)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.effective_widths();
        let mut out = String::new();

        // Header
        for (col, w) in self.columns.iter().zip(&widths) {
            out.push_str(&format!("{:<width$} ", col.header, width = w));
        }
        out.push('\n');
        let total: usize = widths.iter().map(|w| w + 1).sum();
        out.push_str(&"-".repeat(total.saturating_sub(1)));
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&format!("{:<width$} ", cell, width = w));
            }
            out.push('\n');
        }

        out
    }
}
