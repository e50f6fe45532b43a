use crate::table::DataTable;

/// Cursor position and scroll offsets for the visible window onto the
/// table. `viewport_height` is whatever the last rendered frame had
/// room for; the event loop uses it for paging.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridView {
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub viewport_row: usize,
    pub viewport_col: usize,
    pub viewport_height: usize,
}

impl GridView {
    pub fn new() -> Self {
        GridView::default()
    }

    pub fn move_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
    }

    pub fn move_down(&mut self, table: &DataTable) {
        if self.cursor_row + 1 < table.row_count() {
            self.cursor_row += 1;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn move_right(&mut self, table: &DataTable) {
        if self.cursor_col + 1 < table.col_count() {
            self.cursor_col += 1;
        }
    }

    pub fn half_page_up(&mut self) {
        let step = (self.viewport_height / 2).max(1);
        self.cursor_row = self.cursor_row.saturating_sub(step);
    }

    pub fn half_page_down(&mut self, table: &DataTable) {
        let step = (self.viewport_height / 2).max(1);
        self.cursor_row = (self.cursor_row + step).min(table.row_count().saturating_sub(1));
    }

    pub fn page_up(&mut self) {
        let step = self.viewport_height.max(1);
        self.cursor_row = self.cursor_row.saturating_sub(step);
    }

    pub fn page_down(&mut self, table: &DataTable) {
        let step = self.viewport_height.max(1);
        self.cursor_row = (self.cursor_row + step).min(table.row_count().saturating_sub(1));
    }

    pub fn move_to_top(&mut self) {
        self.cursor_row = 0;
    }

    pub fn move_to_bottom(&mut self, table: &DataTable) {
        self.cursor_row = table.row_count().saturating_sub(1);
    }

    /// Put the cursor on (row, col), clamped to the table bounds.
    pub fn select_cell(&mut self, row: usize, col: usize, table: &DataTable) {
        self.cursor_row = row.min(table.row_count().saturating_sub(1));
        self.cursor_col = col.min(table.col_count().saturating_sub(1));
    }

    /// Pull the cursor back in range after the table changed shape.
    pub fn clamp_cursor(&mut self, table: &DataTable) {
        self.cursor_row = self.cursor_row.min(table.row_count().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(table.col_count().saturating_sub(1));
    }

    /// Slide the vertical offset so the cursor row is on screen.
    pub fn scroll_to_cursor(&mut self, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + visible_rows {
            self.viewport_row = self.cursor_row + 1 - visible_rows;
        }
    }

    /// Slide the horizontal offset until the cursor column fits within
    /// `avail` cells. Each column costs its width plus one separator.
    pub fn scroll_to_cursor_horizontal(&mut self, col_widths: &[usize], avail: usize) {
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
            return;
        }
        while self.viewport_col < self.cursor_col && !self.cursor_col_fits(col_widths, avail) {
            self.viewport_col += 1;
        }
    }

    fn cursor_col_fits(&self, col_widths: &[usize], avail: usize) -> bool {
        let mut used = 0;
        for col in self.viewport_col..=self.cursor_col {
            used += col_widths.get(col).copied().unwrap_or(0) + 1;
            if used > avail {
                return false;
            }
        }
        true
    }
}
