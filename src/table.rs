use crate::util::display_width;

const MIN_COL_WIDTH: usize = 3;
const MAX_COL_WIDTH: usize = 30;

/// An immutable grid of cell text with named columns.
///
/// Rows are rectangular: every row holds exactly `columns.len()` cells.
/// Display widths are computed once at construction since cells never
/// change in place; sorting builds a fresh table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl DataTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let col_widths = compute_col_widths(&columns, &rows);
        DataTable {
            columns,
            rows,
            col_widths,
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell text at (row, col), or None when either index is out of range.
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&String> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_name(&self, col: usize) -> Option<&String> {
        self.columns.get(col)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Display width of each column, clamped to [3, 30] cells.
    pub fn col_widths(&self) -> &[usize] {
        &self.col_widths
    }
}

fn compute_col_widths(columns: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = columns.iter().map(|name| display_width(name)).collect();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            if col >= widths.len() {
                break;
            }
            let w = display_width(cell);
            if w > widths[col] {
                widths[col] = w;
            }
        }
    }
    widths
        .into_iter()
        .map(|w| w.clamp(MIN_COL_WIDTH, MAX_COL_WIDTH))
        .collect()
}
