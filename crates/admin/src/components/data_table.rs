//! Data table component.
//!
//! Pages build a [`DataTable`] from whatever rows they loaded; an empty
//! row set renders a single empty-state row instead of an error.

use std::fmt::Write as _;

use serde::Serialize;

/// Text of the row shown when a table has no data.
pub const EMPTY_MESSAGE: &str = "No records found";

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    /// Stable key, used by JSON output.
    pub key: String,
    /// Header label.
    pub label: String,
    pub align: Align,
}

impl TableColumn {
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            align: Align::Left,
        }
    }

    /// A right-aligned numeric column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            align: Align::Right,
            ..Self::new(key, label)
        }
    }
}

/// A table of pre-formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTable {
    pub title: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub empty_message: String,
}

impl DataTable {
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
            empty_message: EMPTY_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Append one row. Short rows are padded, long rows truncated, to the
    /// column count.
    #[must_use]
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
        self
    }

    /// Override the empty-state text.
    #[must_use]
    pub fn empty_state(mut self, message: &str) -> Self {
        self.empty_message = message.to_string();
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows to display: the data, or a single empty-state row.
    #[must_use]
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        if self.rows.is_empty() {
            let mut row = vec![String::new(); self.columns.len().max(1)];
            if let Some(first) = row.first_mut() {
                first.clone_from(&self.empty_message);
            }
            return vec![row];
        }
        self.rows.clone()
    }

    /// Render as aligned plain text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.title.is_empty() {
            let _ = writeln!(out, "{}", self.title);
        }

        if self.rows.is_empty() {
            let header = self
                .columns
                .iter()
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>()
                .join("  ");
            let _ = writeln!(out, "{header}");
            let _ = writeln!(out, "{}", self.empty_message);
            return out;
        }

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.label.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: Vec<&str>| -> String {
            cells
                .into_iter()
                .zip(self.columns.iter().zip(&widths))
                .map(|(cell, (column, &width))| match column.align {
                    Align::Left => format!("{cell:<width$}"),
                    Align::Right => format!("{cell:>width$}"),
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let _ = writeln!(out, "{}", line(self.columns.iter().map(|c| c.label.as_str()).collect()));
        for row in &self.rows {
            let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
        }
        out
    }
}

/// Format an optional value, showing `-` when absent.
#[must_use]
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
