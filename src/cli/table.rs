//! Bordered text tables for report output.

use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Missing cells render blank; extra cells are dropped.
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut cells: Vec<String> = row.into_iter().map(|c| c.to_string()).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn separator(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    for width in widths {
        write!(f, "+{}", "-".repeat(width + 2))?;
    }
    writeln!(f, "+")
}

fn line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        write!(f, "| {}{} ", cell, " ".repeat(pad))?;
    }
    writeln!(f, "|")
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        separator(f, &widths)?;
        line(f, &self.headers, &widths)?;
        separator(f, &widths)?;
        for row in &self.rows {
            line(f, row, &widths)?;
        }
        separator(f, &widths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pads_to_widest_cell() {
        let mut table = Table::new(["ID", "Title"]);
        table.add_row([1.to_string(), "Clean Code".to_string()]);
        table.add_row(["12", "SICP"]);

        let expected = "\
+----+------------+
| ID | Title      |
+----+------------+
| 1  | Clean Code |
| 12 | SICP       |
+----+------------+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B"]);
        table.add_row(["x"]);
        assert!(!table.is_empty());
        assert!(table.to_string().contains("| x |   |"));
    }
}
