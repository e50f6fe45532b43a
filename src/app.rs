use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{backend::Backend, Terminal};
use tracing::warn;

use crate::fileio::FileIO;
use crate::grid::Grid;
use crate::input::{self, Command, CommandHandler};
use crate::style::Theme;
use crate::ui::{self, GridLayout, HitTarget};
use crate::view::GridView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
}

pub struct App {
    pub grid: Grid,
    pub view: GridView,
    pub file_io: FileIO,
    pub mode: Mode,
    pub command: CommandHandler,
    pub layout: GridLayout,
    pub message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(grid: Grid, file_io: FileIO) -> Self {
        App {
            grid,
            view: GridView::new(),
            file_io,
            mode: Mode::Normal,
            command: CommandHandler::new(),
            layout: GridLayout::default(),
            message: None,
            should_quit: false,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Command => self.handle_command_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        self.message = None;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command.clear();
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(table) = self.grid.table() {
                    self.view.half_page_down(table);
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.view.half_page_up();
            }
            KeyCode::Up | KeyCode::Char('k') => self.view.move_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(table) = self.grid.table() {
                    self.view.move_down(table);
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.view.move_left(),
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(table) = self.grid.table() {
                    self.view.move_right(table);
                }
            }
            KeyCode::PageUp => self.view.page_up(),
            KeyCode::PageDown => {
                if let Some(table) = self.grid.table() {
                    self.view.page_down(table);
                }
            }
            KeyCode::Char('g') => self.view.move_to_top(),
            KeyCode::Char('G') => {
                if let Some(table) = self.grid.table() {
                    self.view.move_to_bottom(table);
                }
            }
            KeyCode::Char('s') => self.grid.header_clicked(self.view.cursor_col),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        if input::is_escape(&key) {
            self.mode = Mode::Normal;
            self.command.clear();
            return;
        }
        match key.code {
            KeyCode::Enter => {
                let line = self.command.take();
                self.mode = Mode::Normal;
                self.execute(Command::parse(&line));
            }
            KeyCode::Backspace => {
                if !self.command.backspace() {
                    self.mode = Mode::Normal;
                }
            }
            KeyCode::Char(c) => self.command.push(c),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let target = self.layout.hit_test(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => match target {
                Some(HitTarget::Cell(row, col)) => self.grid.mouse_entered_cell(row, col),
                Some(HitTarget::RowNumber(row)) => self.grid.mouse_entered_cell(row, 0),
                _ => self.grid.mouse_left_cell(),
            },
            MouseEventKind::Down(MouseButton::Left) => match target {
                Some(HitTarget::Header(col)) => self.grid.header_clicked(col),
                Some(HitTarget::Cell(row, col)) => {
                    if let Some(table) = self.grid.table() {
                        self.view.select_cell(row, col, table);
                    }
                }
                Some(HitTarget::RowNumber(_)) | None => {}
            },
            MouseEventKind::ScrollDown => {
                if let Some(table) = self.grid.table() {
                    self.view.move_down(table);
                }
            }
            MouseEventKind::ScrollUp => self.view.move_up(),
            _ => {}
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Quit => self.should_quit = true,
            Command::Export(path) => match self.grid.export_csv(&path) {
                Ok(()) => {
                    self.message = if self.grid.table().is_some() {
                        Some(format!("exported to {}", path.display()))
                    } else {
                        Some("nothing to export".to_string())
                    };
                }
                Err(e) => {
                    warn!("export to {:?} failed: {}", path, e);
                    self.message = Some(format!("export failed: {}", e));
                }
            },
            Command::Color { row, col, color } => self.grid.set_cell_fg(row, col, color),
            Command::Font { row, col, font } => self.grid.set_cell_font(row, col, font),
            Command::Theme(name) => self.apply_theme(&name),
            Command::Unknown(line) => {
                self.message = Some(format!("unknown command: {}", line));
            }
        }
    }

    fn apply_theme(&mut self, name: &str) {
        if let Some(theme) = Theme::by_name(name) {
            self.grid.theme = theme;
            return;
        }
        if name.ends_with(".toml") {
            match Theme::from_file(Path::new(name)) {
                Ok(theme) => self.grid.theme = theme,
                Err(e) => self.message = Some(e),
            }
            return;
        }
        self.message = Some(format!(
            "unknown theme: {} (built in: {})",
            name,
            Theme::builtin_names().join(", ")
        ));
    }
}
