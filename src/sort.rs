use std::cmp::Ordering;

use crate::table::DataTable;

/// How many leading non-empty cells to inspect when typing a column.
const PROBE_SAMPLE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Which column the grid is currently ordered by, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<usize>,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: the same column toggles direction, a different
    /// column starts over ascending.
    pub fn click(&mut self, col: usize) -> SortDirection {
        self.direction = if self.column == Some(col) {
            self.direction.toggled()
        } else {
            SortDirection::Ascending
        };
        self.column = Some(col);
        self.direction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

/// Parse a cell as a number, tolerating thousands separators.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Some(v);
    }
    let stripped: String = trimmed.chars().filter(|&c| c != ',').collect();
    if stripped.len() == trimmed.len() {
        return None;
    }
    stripped.parse::<f64>().ok()
}

/// Decide how a column should compare by sampling its leading values.
/// A column is numeric when at least half the sampled cells parse.
pub fn probe_column_type(table: &DataTable, col: usize) -> ColumnType {
    let mut sampled = 0;
    let mut numeric = 0;
    for row in table.rows() {
        let cell = match row.get(col) {
            Some(c) => c,
            None => continue,
        };
        if cell.trim().is_empty() {
            continue;
        }
        sampled += 1;
        if parse_numeric(cell).is_some() {
            numeric += 1;
        }
        if sampled == PROBE_SAMPLE {
            break;
        }
    }
    if sampled > 0 && numeric * 2 >= sampled {
        ColumnType::Numeric
    } else {
        ColumnType::Text
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    /// Text keys are lowercased so text columns order case-insensitively.
    fn for_cell(cell: Option<&String>, col_type: ColumnType) -> SortKey {
        let text = cell.map(String::as_str).unwrap_or("");
        if col_type == ColumnType::Numeric {
            if let Some(v) = parse_numeric(text) {
                return SortKey::Number(v);
            }
        }
        SortKey::Text(text.to_lowercase())
    }

    /// Numbers order among themselves and before text, so unparseable
    /// cells in a numeric column land at the bottom of an ascending sort.
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

/// Build a new table holding the same rows reordered by `col`.
///
/// The sort is stable in both directions: rows that compare equal keep
/// their current relative order thanks to the index tie-break.
pub fn sorted_by_column(table: &DataTable, col: usize, direction: SortDirection) -> DataTable {
    let col_type = probe_column_type(table, col);
    let mut keyed: Vec<(usize, SortKey)> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx, SortKey::for_cell(row.get(col), col_type)))
        .collect();
    keyed.sort_unstable_by(|(ia, ka), (ib, kb)| {
        let base = ka.compare(kb);
        let base = match direction {
            SortDirection::Ascending => base,
            SortDirection::Descending => base.reverse(),
        };
        base.then(ia.cmp(ib))
    });
    let rows: Vec<Vec<String>> = keyed
        .into_iter()
        .map(|(idx, _)| table.rows()[idx].clone())
        .collect();
    DataTable::new(table.columns().to_vec(), rows)
}
