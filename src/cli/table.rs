//! Plain-text tables for the shell.

use crate::cli::output::current_preferences;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            alignment: Alignment::Right,
        }
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    /// Rows after this index are separated from the body by a rule.
    pub footer_from: Option<usize>,
    pub padding: usize,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            footer_from: None,
            padding: 1,
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Appends a row set off from the body, such as a total.
    pub fn push_footer(&mut self, row: Vec<String>) {
        if self.footer_from.is_none() {
            self.footer_from = Some(self.rows.len());
        }
        self.rows.push(row);
    }

    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| visible_width(cell))
                    .fold(visible_width(&column.header), usize::max)
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect();
        cells.join("│").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let rule = horizontal_rule(&widths, self.padding);

        let mut lines = vec![self.render_row(&header, &widths), rule.clone()];
        for (idx, row) in self.rows.iter().enumerate() {
            if self.footer_from == Some(idx) {
                lines.push(rule.clone());
            }
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }
}

/// Counts characters, not bytes; Cyrillic names and `₽` are one column each.
fn visible_width(text: &str) -> usize {
    text.chars().count()
}

fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let remaining = width.saturating_sub(visible_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };
    let mut cell = String::new();
    cell.push_str(&" ".repeat(padding + left));
    cell.push_str(text);
    cell.push_str(&" ".repeat(right + padding));
    cell
}

fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let prefs = current_preferences();
    let (line, cross) = if prefs.plain_mode { ('-', '+') } else { ('─', '┼') };
    widths
        .iter()
        .map(|width| line.to_string().repeat(width + padding * 2))
        .collect::<Vec<_>>()
        .join(&cross.to_string())
}
