use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Mode};
use crate::sort::SortDirection;
use crate::style::CellStyle;
use crate::util::{center_to_width, display_width, pad_to_width};

/// What a screen coordinate landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Header(usize),
    Cell(usize, usize),
    RowNumber(usize),
}

/// Geometry of the last rendered frame. Column spans record the
/// absolute x offset and width (content plus trailing separator) of
/// each visible column, so mouse events can be mapped back to cells.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    pub area: Rect,
    pub gutter_width: u16,
    pub col_spans: Vec<(u16, u16, usize)>,
    pub first_row: usize,
    pub data_rows: u16,
}

impl GridLayout {
    pub fn hit_test(&self, x: u16, y: u16) -> Option<HitTarget> {
        if x < self.area.x
            || x >= self.area.x + self.area.width
            || y < self.area.y
            || y >= self.area.y + self.area.height
        {
            return None;
        }
        let line = y - self.area.y;
        if line == 0 {
            // header row; the gutter corner is not clickable
            return self.col_at(x).map(HitTarget::Header);
        }
        let data_line = line - 1;
        if data_line >= self.data_rows {
            return None;
        }
        let row = self.first_row + data_line as usize;
        if x < self.area.x + self.gutter_width {
            return Some(HitTarget::RowNumber(row));
        }
        self.col_at(x).map(|col| HitTarget::Cell(row, col))
    }

    fn col_at(&self, x: u16) -> Option<usize> {
        self.col_spans
            .iter()
            .find(|&&(start, width, _)| x >= start && x < start + width)
            .map(|&(_, _, col)| col)
    }
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_grid(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
    render_command_line(frame, app, chunks[2]);
}

fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.grid.theme.clone();
    let visible_rows = area.height.saturating_sub(1) as usize;
    app.view.viewport_height = visible_rows;

    let table = match app.grid.table() {
        Some(t) => t,
        None => {
            app.layout = GridLayout {
                area,
                ..GridLayout::default()
            };
            let paragraph = Paragraph::new("no data loaded").style(theme.cell.to_ratatui());
            frame.render_widget(paragraph, area);
            return;
        }
    };

    app.view.clamp_cursor(table);
    app.view.scroll_to_cursor(visible_rows);
    let gutter_width = gutter_width_for(table.row_count());
    let avail = area.width.saturating_sub(gutter_width) as usize;
    app.view
        .scroll_to_cursor_horizontal(table.col_widths(), avail);

    let col_spans = visible_col_spans(
        table.col_widths(),
        app.view.viewport_col,
        area.x + gutter_width,
        area.x + area.width,
    );

    let mut lines: Vec<Line> = Vec::with_capacity(visible_rows + 1);

    // header bar
    let sort = app.grid.sort_state();
    let header_style = theme.header.to_ratatui();
    let mut header_spans = vec![Span::styled(
        " ".repeat(gutter_width as usize),
        header_style,
    )];
    for &(_, w, col) in &col_spans {
        let content_w = w.saturating_sub(1) as usize;
        let name = table.column_name(col).map(String::as_str).unwrap_or("");
        let sorted = (sort.column == Some(col)).then_some(sort.direction);
        let mut label = header_label(name, content_w, sorted);
        label.push(' ');
        header_spans.push(Span::styled(label, header_style));
    }
    let used = gutter_width + col_spans.iter().map(|&(_, w, _)| w).sum::<u16>();
    if used < area.width {
        header_spans.push(Span::styled(
            " ".repeat((area.width - used) as usize),
            header_style,
        ));
    }
    lines.push(Line::from(header_spans));

    // data rows
    let first_row = app.view.viewport_row;
    let shown = visible_rows.min(table.row_count().saturating_sub(first_row));
    for row in first_row..first_row + shown {
        let mut spans = Vec::with_capacity(col_spans.len() * 2 + 1);
        let label = center_to_width(&app.grid.row_label(row), gutter_width as usize);
        spans.push(Span::styled(label, theme.row_number.to_ratatui()));
        let hovered = app.grid.hovered_row() == Some(row);
        for &(_, w, col) in &col_spans {
            let content_w = w.saturating_sub(1) as usize;
            let mut style = theme.cell;
            app.grid.format_cell(row, col, &mut style);
            if row == app.view.cursor_row && col == app.view.cursor_col {
                apply_selection(&mut style, &theme.selection);
            }
            let value = app.grid.cell_value(row, col).unwrap_or("");
            spans.push(Span::styled(
                pad_to_width(value, content_w),
                style.to_ratatui(),
            ));
            let mut sep = theme.cell;
            if hovered {
                sep.bg = Some(theme.hover);
            }
            spans.push(Span::styled(" ".to_string(), sep.to_ratatui()));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(theme.cell.to_ratatui());
    frame.render_widget(paragraph, area);

    app.layout = GridLayout {
        area,
        gutter_width,
        col_spans,
        first_row,
        data_rows: shown as u16,
    };
}

/// Columns visible from `viewport_col`, packed left to right between
/// `x` and `right`. A column that does not fully fit is dropped, except
/// that the first column is clipped rather than showing nothing.
fn visible_col_spans(
    col_widths: &[usize],
    viewport_col: usize,
    x: u16,
    right: u16,
) -> Vec<(u16, u16, usize)> {
    let mut spans = Vec::new();
    let mut x = x;
    for (col, &width) in col_widths.iter().enumerate().skip(viewport_col) {
        let w = width as u16 + 1;
        if x + w > right {
            if spans.is_empty() && right > x + 1 {
                spans.push((x, right - x, col));
            }
            break;
        }
        spans.push((x, w, col));
        x += w;
    }
    spans
}

fn gutter_width_for(row_count: usize) -> u16 {
    let digits = row_count.max(1).to_string().len() as u16;
    (digits + 2).max(4)
}

fn header_label(name: &str, width: usize, sorted: Option<SortDirection>) -> String {
    match sorted {
        Some(direction) => {
            let arrow = match direction {
                SortDirection::Ascending => "▲",
                SortDirection::Descending => "▼",
            };
            let mut label = pad_to_width(name, width.saturating_sub(2));
            label.push(' ');
            label.push_str(arrow);
            label
        }
        None => pad_to_width(name, width),
    }
}

/// Selection recolors the cursor cell but keeps whatever font the cell
/// already has.
fn apply_selection(style: &mut CellStyle, selection: &CellStyle) {
    if let Some(fg) = selection.fg {
        style.fg = Some(fg);
    }
    if let Some(bg) = selection.bg {
        style.bg = Some(bg);
    }
    style.bold |= selection.bold;
    style.italic |= selection.italic;
    style.underline |= selection.underline;
    style.dim |= selection.dim;
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.grid.theme;
    let left = match app.file_io.file_path() {
        Some(path) => format!(" {} [{}]", path.display(), app.file_io.delimiter_name()),
        None => " [no file]".to_string(),
    };
    let right = match app.grid.table() {
        Some(table) => {
            let sort = app.grid.sort_state();
            let sort_part = match sort.column {
                Some(col) => {
                    let arrow = match sort.direction {
                        SortDirection::Ascending => "▲",
                        SortDirection::Descending => "▼",
                    };
                    let name = table.column_name(col).map(String::as_str).unwrap_or("?");
                    format!("{} {} | ", name, arrow)
                }
                None => String::new(),
            };
            format!(
                "{}{}:{} of {}x{} ",
                sort_part,
                app.view.cursor_row + 1,
                app.view.cursor_col + 1,
                table.row_count(),
                table.col_count()
            )
        }
        None => String::new(),
    };
    let pad = (area.width as usize).saturating_sub(display_width(&left) + display_width(&right));
    let style = theme.status_bar.to_ratatui();
    let line = Line::from(vec![
        Span::styled(left, style),
        Span::styled(" ".repeat(pad), style),
        Span::styled(right, style),
    ]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}

fn render_command_line(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.grid.theme;
    let content = if app.mode == Mode::Command {
        format!(":{}", app.command.buffer())
    } else if let Some(message) = &app.message {
        message.clone()
    } else {
        String::new()
    };
    if app.mode == Mode::Command {
        let cursor_x = area.x + 1 + display_width(app.command.buffer()) as u16;
        frame.set_cursor(cursor_x.min(area.x + area.width.saturating_sub(1)), area.y);
    }
    frame.render_widget(
        Paragraph::new(content).style(theme.command_line.to_ratatui()),
        area,
    );
}
