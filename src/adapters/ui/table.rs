//! Plain-text tables for list and report screens.

fn width(text: &str) -> usize {
    text.chars().count()
}

/// Column-aligned table. Numeric columns can be right-aligned.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    right: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let right = vec![false; headers.len()];
        Self {
            headers,
            right,
            rows: Vec::new(),
        }
    }

    /// Right-align the given column indexes.
    pub fn right_align(mut self, columns: &[usize]) -> Self {
        for &c in columns {
            if let Some(flag) = self.right.get_mut(c) {
                *flag = true;
            }
        }
        self
    }

    /// Missing cells render empty; extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| width(h)).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(width(cell));
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let pad = " ".repeat(widths[i].saturating_sub(width(cell)));
                    if self.right[i] {
                        format!("{}{}", pad, cell)
                    } else {
                        format!("{}{}", cell, pad)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(&self.headers));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn hours(value: f64) -> String {
    format!("{:.2}h", value)
}

/// Shortens `text` to at most `max` characters, marking the cut with "...".
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(["ID", "Name", "Hours"]).right_align(&[2]);
        table.row(["1", "Acme", "2.50h"]);
        table.row(["12", "Globex Corporation", "10.00h"]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  Name                 Hours");
        assert_eq!(lines[1], "--  ------------------  ------");
        assert_eq!(lines[2], "1   Acme                 2.50h");
        assert_eq!(lines[3], "12  Globex Corporation  10.00h");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B"]);
        table.row(["x"]);
        assert_eq!(table.render().lines().nth(2), Some("x"));
    }

    #[test]
    fn test_formatters() {
        assert_eq!(money(125.0), "$125.00");
        assert_eq!(hours(2.5), "2.50h");
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a long description", 9), "a long...");
    }
}
