use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::sort::{self, SortState};
use crate::style::{CellStyle, FontStyle, Theme, ThemeColor};
use crate::table::DataTable;

/// The grid model: current table, sort state, hover state, and the
/// per-cell style overrides layered on top of the theme.
///
/// Style overrides are keyed by (row, col) position, not by row
/// identity. Sorting reorders rows underneath them, so an override
/// stays glued to its screen position rather than following the row it
/// was set on. Callers that want row-identity styling must re-apply
/// overrides after a sort.
pub struct Grid {
    table: Option<DataTable>,
    cell_fonts: HashMap<(usize, usize), FontStyle>,
    cell_colors: HashMap<(usize, usize), ThemeColor>,
    hovered_row: Option<usize>,
    sort: SortState,
    pub theme: Theme,
}

impl Grid {
    pub fn new() -> Self {
        Grid::with_theme(Theme::default())
    }

    pub fn with_theme(theme: Theme) -> Self {
        Grid {
            table: None,
            cell_fonts: HashMap::new(),
            cell_colors: HashMap::new(),
            hovered_row: None,
            sort: SortState::default(),
            theme,
        }
    }

    /// Replace the displayed table. Sort state, hover state, and style
    /// overrides all survive the swap untouched.
    pub fn set_table(&mut self, table: DataTable) {
        self.table = Some(table);
    }

    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    /// Override the font attributes of the cell at (row, col).
    pub fn set_cell_font(&mut self, row: usize, col: usize, font: FontStyle) {
        self.cell_fonts.insert((row, col), font);
    }

    /// Override the text color of the cell at (row, col).
    pub fn set_cell_fg(&mut self, row: usize, col: usize, color: ThemeColor) {
        self.cell_colors.insert((row, col), color);
    }

    /// Cell text at (row, col), or None when there is no table or the
    /// position is out of range.
    pub fn cell_value(&self, row: usize, col: usize) -> Option<&str> {
        self.table
            .as_ref()
            .and_then(|t| t.get_cell(row, col))
            .map(String::as_str)
    }

    /// Layer this cell's overrides onto `style`: font attributes first,
    /// then text color, then the hover background. Hover repaints only
    /// the background, so overridden fonts and colors stay visible on
    /// the hovered row.
    pub fn format_cell(&self, row: usize, col: usize, style: &mut CellStyle) {
        if let Some(font) = self.cell_fonts.get(&(row, col)) {
            style.apply_font(*font);
        }
        if let Some(color) = self.cell_colors.get(&(row, col)) {
            style.fg = Some(*color);
        }
        if self.hovered_row == Some(row) {
            style.bg = Some(self.theme.hover);
        }
    }

    /// Re-sort by `col` and replace the table with the reordered copy.
    /// Clicking the sorted column again flips the direction; clicking a
    /// different column starts ascending. No table means no state change.
    pub fn header_clicked(&mut self, col: usize) {
        let table = match &self.table {
            Some(t) => t,
            None => return,
        };
        if col >= table.col_count() {
            return;
        }
        let direction = self.sort.click(col);
        self.table = Some(sort::sorted_by_column(table, col, direction));
        info!("sorted by column {} {:?}", col, direction);
    }

    pub fn mouse_entered_cell(&mut self, row: usize, _col: usize) {
        self.hovered_row = Some(row);
    }

    pub fn mouse_left_cell(&mut self) {
        self.hovered_row = None;
    }

    pub fn hovered_row(&self) -> Option<usize> {
        self.hovered_row
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Label for the row-number gutter: 1-based, unlike every index in
    /// the API.
    pub fn row_label(&self, row: usize) -> String {
        (row + 1).to_string()
    }

    /// Write the current rows to `path` as raw comma-joined lines, in
    /// display order, without a header row. Cell text is not quoted or
    /// escaped. With no table loaded this is a no-op and no file is
    /// created.
    pub fn export_csv(&self, path: &Path) -> io::Result<()> {
        let table = match &self.table {
            Some(t) => t,
            None => return Ok(()),
        };
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        for row in table.rows() {
            writeln!(writer, "{}", row.join(","))?;
        }
        writer.flush()?;
        info!("exported {} rows to {:?}", table.row_count(), path);
        Ok(())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;
    use crate::style::NamedColor;

    fn make_table() -> DataTable {
        DataTable::new(
            vec!["name".to_string(), "score".to_string()],
            vec![
                vec!["alice".to_string(), "31".to_string()],
                vec!["bob".to_string(), "7".to_string()],
                vec!["carol".to_string(), "19".to_string()],
            ],
        )
    }

    fn make_grid() -> Grid {
        let mut grid = Grid::new();
        grid.set_table(make_table());
        grid
    }

    fn column(grid: &Grid, col: usize) -> Vec<String> {
        let table = grid.table().unwrap();
        (0..table.row_count())
            .map(|r| grid.cell_value(r, col).unwrap().to_string())
            .collect()
    }

    // === Cell access ===

    #[test]
    fn test_cell_value() {
        let grid = make_grid();
        assert_eq!(grid.cell_value(0, 0), Some("alice"));
        assert_eq!(grid.cell_value(2, 1), Some("19"));
    }

    #[test]
    fn test_cell_value_out_of_range_is_none() {
        let grid = make_grid();
        assert_eq!(grid.cell_value(3, 0), None);
        assert_eq!(grid.cell_value(0, 5), None);
    }

    #[test]
    fn test_cell_value_without_table_is_none() {
        let grid = Grid::new();
        assert_eq!(grid.cell_value(0, 0), None);
    }

    // === Sorting via header clicks ===

    #[test]
    fn test_header_click_sorts_ascending() {
        let mut grid = make_grid();
        grid.header_clicked(1);
        assert_eq!(column(&grid, 1), vec!["7", "19", "31"]);
        assert_eq!(grid.sort_state().column, Some(1));
        assert_eq!(grid.sort_state().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_second_header_click_reverses() {
        let mut grid = make_grid();
        grid.header_clicked(1);
        grid.header_clicked(1);
        assert_eq!(column(&grid, 1), vec!["31", "19", "7"]);
        assert_eq!(grid.sort_state().direction, SortDirection::Descending);
    }

    #[test]
    fn test_third_click_restores_ascending_order() {
        let mut grid = make_grid();
        grid.header_clicked(1);
        let ascending = column(&grid, 1);
        grid.header_clicked(1);
        grid.header_clicked(1);
        assert_eq!(column(&grid, 1), ascending);
        assert_eq!(grid.sort_state().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_click_on_other_column_starts_ascending() {
        let mut grid = make_grid();
        grid.header_clicked(1);
        grid.header_clicked(1);
        grid.header_clicked(0);
        assert_eq!(column(&grid, 0), vec!["alice", "bob", "carol"]);
        assert_eq!(grid.sort_state().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_header_click_without_table_changes_nothing() {
        let mut grid = Grid::new();
        grid.header_clicked(0);
        assert_eq!(grid.sort_state().column, None);
    }

    #[test]
    fn test_header_click_out_of_range_changes_nothing() {
        let mut grid = make_grid();
        grid.header_clicked(7);
        assert_eq!(grid.sort_state().column, None);
        assert_eq!(column(&grid, 0), vec!["alice", "bob", "carol"]);
    }

    // === Style overrides ===

    #[test]
    fn test_color_override_applies_to_cell() {
        let mut grid = make_grid();
        grid.set_cell_fg(1, 0, ThemeColor::Named(NamedColor::Red));
        let mut style = CellStyle::default();
        grid.format_cell(1, 0, &mut style);
        assert_eq!(style.fg, Some(ThemeColor::Named(NamedColor::Red)));

        let mut other = CellStyle::default();
        grid.format_cell(1, 1, &mut other);
        assert_eq!(other.fg, None);
    }

    #[test]
    fn test_font_override_applies_to_cell() {
        let mut grid = make_grid();
        grid.set_cell_font(
            0,
            1,
            FontStyle {
                bold: true,
                italic: true,
                ..FontStyle::default()
            },
        );
        let mut style = CellStyle::default();
        grid.format_cell(0, 1, &mut style);
        assert!(style.bold);
        assert!(style.italic);
    }

    #[test]
    fn test_later_override_wins() {
        let mut grid = make_grid();
        grid.set_cell_fg(0, 0, ThemeColor::Named(NamedColor::Red));
        grid.set_cell_fg(0, 0, ThemeColor::Named(NamedColor::Green));
        let mut style = CellStyle::default();
        grid.format_cell(0, 0, &mut style);
        assert_eq!(style.fg, Some(ThemeColor::Named(NamedColor::Green)));
    }

    #[test]
    fn test_overrides_stay_at_position_across_sort() {
        let mut grid = Grid::new();
        grid.set_table(DataTable::new(
            vec!["v".to_string()],
            vec![
                vec!["A".to_string()],
                vec!["B".to_string()],
                vec!["C".to_string()],
            ],
        ));
        // painted while "A" sat on row 0
        grid.set_cell_fg(0, 0, ThemeColor::Named(NamedColor::Red));
        grid.header_clicked(0);
        grid.header_clicked(0);
        // descending order put "C" on row 0, and the paint went with the position
        assert_eq!(grid.cell_value(0, 0), Some("C"));
        let mut style = CellStyle::default();
        grid.format_cell(0, 0, &mut style);
        assert_eq!(style.fg, Some(ThemeColor::Named(NamedColor::Red)));
        // "A" moved to the bottom and carries nothing
        assert_eq!(grid.cell_value(2, 0), Some("A"));
        let mut moved = CellStyle::default();
        grid.format_cell(2, 0, &mut moved);
        assert_eq!(moved.fg, None);
    }

    // === Hover ===

    #[test]
    fn test_hover_paints_row_background() {
        let mut grid = make_grid();
        grid.mouse_entered_cell(1, 0);
        assert_eq!(grid.hovered_row(), Some(1));
        let mut style = CellStyle::default();
        grid.format_cell(1, 1, &mut style);
        assert_eq!(style.bg, Some(grid.theme.hover));

        let mut other = CellStyle::default();
        grid.format_cell(0, 1, &mut other);
        assert_eq!(other.bg, None);
    }

    #[test]
    fn test_hover_keeps_overridden_font_and_color() {
        let mut grid = make_grid();
        grid.set_cell_fg(1, 0, ThemeColor::Named(NamedColor::Red));
        grid.set_cell_font(1, 0, FontStyle {
            bold: true,
            ..FontStyle::default()
        });
        grid.mouse_entered_cell(1, 0);
        let mut style = CellStyle::default();
        grid.format_cell(1, 0, &mut style);
        assert_eq!(style.fg, Some(ThemeColor::Named(NamedColor::Red)));
        assert!(style.bold);
        assert_eq!(style.bg, Some(grid.theme.hover));
    }

    #[test]
    fn test_mouse_leave_clears_hover() {
        let mut grid = make_grid();
        grid.mouse_entered_cell(2, 0);
        grid.mouse_left_cell();
        assert_eq!(grid.hovered_row(), None);
        let mut style = CellStyle::default();
        grid.format_cell(2, 0, &mut style);
        assert_eq!(style.bg, None);
    }

    // === Table replacement ===

    #[test]
    fn test_set_table_keeps_overrides_and_sort_state() {
        let mut grid = make_grid();
        grid.set_cell_fg(0, 0, ThemeColor::Named(NamedColor::Red));
        grid.header_clicked(1);
        grid.set_table(DataTable::new(
            vec!["x".to_string()],
            vec![vec!["1".to_string()]],
        ));
        assert_eq!(grid.sort_state().column, Some(1));
        let mut style = CellStyle::default();
        grid.format_cell(0, 0, &mut style);
        assert_eq!(style.fg, Some(ThemeColor::Named(NamedColor::Red)));
    }

    // === Row labels ===

    #[test]
    fn test_row_labels_are_one_based() {
        let grid = make_grid();
        assert_eq!(grid.row_label(0), "1");
        assert_eq!(grid.row_label(41), "42");
    }

    // === Export ===

    #[test]
    fn test_export_csv_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let grid = make_grid();
        grid.export_csv(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "alice,31\nbob,7\ncarol,19\n");
    }

    #[test]
    fn test_export_csv_does_not_escape_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut grid = Grid::new();
        grid.set_table(DataTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["x,y".to_string(), "z".to_string()]],
        ));
        grid.export_csv(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        // raw join: the embedded comma is written as-is, no quoting
        assert_eq!(written, "x,y,z\n");
    }

    #[test]
    fn test_export_csv_uses_display_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut grid = make_grid();
        grid.header_clicked(1);
        grid.export_csv(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "bob,7\ncarol,19\nalice,31\n");
    }

    #[test]
    fn test_export_csv_without_table_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let grid = Grid::new();
        assert!(grid.export_csv(&path).is_ok());
        assert!(!path.exists());
    }
}
