mod app;
mod fileio;
mod grid;
mod input;
mod sort;
mod style;
mod table;
mod ui;
mod util;
mod view;

use std::io::{self, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info};
use tracing_subscriber::fmt::writer::MakeWriter;

use crossterm::{
    cursor::MoveToColumn,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use fileio::FileIO;
use grid::Grid;
use style::Theme;

static ALT_SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);

struct Args {
    file: Option<PathBuf>,
    delimiter: Option<u8>,
    theme: Option<String>,
    help: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut iter: I) -> Result<Args, String> {
    let mut args = Args {
        file: None,
        delimiter: None,
        theme: None,
        help: false,
    };
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "-d" | "--delimiter" => {
                let word = iter
                    .next()
                    .ok_or_else(|| "--delimiter requires an argument".to_string())?;
                args.delimiter = Some(fileio::parse_delimiter(&word).ok_or_else(|| {
                    format!(
                        "Invalid delimiter: '{}'. Use comma, tab, semicolon, pipe, or a single character.",
                        word
                    )
                })?);
            }
            "--theme" => {
                args.theme = Some(
                    iter.next()
                        .ok_or_else(|| "--theme requires an argument".to_string())?,
                );
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {}", other));
            }
            other => {
                if args.file.is_some() {
                    return Err("Only one file can be opened".to_string());
                }
                args.file = Some(PathBuf::from(other));
            }
        }
    }
    Ok(args)
}

fn resolve_theme(arg: Option<&str>) -> Result<Theme, String> {
    let name = match arg {
        Some(n) => n,
        None => return Ok(Theme::default()),
    };
    if let Some(theme) = Theme::by_name(name) {
        return Ok(theme);
    }
    if name.ends_with(".toml") {
        return Theme::from_file(Path::new(name));
    }
    Err(format!(
        "Unknown theme: '{}'. Built-in themes: {}.",
        name,
        Theme::builtin_names().join(", ")
    ))
}

/// A `MakeWriter` for `tracing` that prints to the main screen, leaving
/// the alternate screen for the duration of the write when it is active.
pub struct MainScreenWriter;

impl<'a> MakeWriter<'a> for MainScreenWriter {
    type Writer = MainScreenWriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        MainScreenWriterHandle
    }
}

pub struct MainScreenWriterHandle;

impl Write for MainScreenWriterHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut stdout = io::stdout();
        let alt = ALT_SCREEN_ACTIVE.load(Ordering::Relaxed);
        if alt {
            // MoveToColumn because raw mode does not return the carriage
            execute!(stdout, LeaveAlternateScreen, MoveToColumn(0))?;
        }
        let written = stdout.write(buf);
        stdout.flush()?;
        if alt {
            execute!(stdout, EnterAlternateScreen)?;
        }
        written
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Log the panic and put the terminal back before the default hook runs.
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        if ALT_SCREEN_ACTIVE.swap(false, Ordering::Relaxed) {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        }

        if let Some(location) = info.location() {
            error!(file = location.file(), line = location.line(), "panic");
        } else {
            error!("panic");
        }
        if let Some(payload) = info.payload().downcast_ref::<&str>() {
            error!(message = %payload);
        } else if let Some(payload) = info.payload().downcast_ref::<String>() {
            error!(message = %payload);
        }

        default_hook(info);
    }));
}

fn print_help() {
    eprintln!("gridview - a terminal grid viewer for CSV data");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    gridview [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -d, --delimiter <DELIM>  Set the field delimiter (comma, tab, semicolon, pipe, or char)");
    eprintln!("    --theme <NAME>           Color theme: light, dark, or a .toml theme file");
    eprintln!("    -h, --help               Print this help message");
    eprintln!();
    eprintln!("KEYS:");
    eprintln!("    arrows / hjkl            Move the selection");
    eprintln!("    PageUp/PageDown, ^u/^d   Page / half-page through rows");
    eprintln!("    g / G                    Jump to the first / last row");
    eprintln!("    s                        Sort by the selected column (again to reverse)");
    eprintln!("    q                        Quit");
    eprintln!();
    eprintln!("MOUSE:");
    eprintln!("    Click a column header to sort by it (click again to reverse).");
    eprintln!("    Click a cell to select it; the row under the pointer is highlighted.");
    eprintln!();
    eprintln!("COMMANDS (press ':'):");
    eprintln!("    :export <path>           Write the rows as raw comma-joined lines");
    eprintln!("    :color <row> <col> <c>   Set a cell's text color (name, #rrggbb, or 0-255)");
    eprintln!("    :font <row> <col> <a..>  Set a cell's font: bold italic underline dim plain");
    eprintln!("    :theme <name|file.toml>  Switch theme");
    eprintln!("    :q                       Quit");
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt().with_writer(MainScreenWriter).init();
    info!("gridview started");

    install_panic_hook();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };
    if args.help {
        print_help();
        return Ok(());
    }
    let theme = match resolve_theme(args.theme.as_deref()) {
        Ok(theme) => theme,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };

    let file_io = FileIO::new(args.file, args.delimiter);
    let load_result = file_io.load_table().map_err(|e| {
        error!(error = %e, "failed to load table");
        e
    })?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    ALT_SCREEN_ACTIVE.store(true, Ordering::Relaxed);

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut grid = Grid::with_theme(theme);
    if let Some(table) = load_result.table {
        grid.set_table(table);
    }
    let mut app = App::new(grid, file_io);

    let mut messages = load_result.warnings;
    if args.delimiter.is_none() && app.file_io.file_path().is_some() {
        messages.push(format!("delimiter: {}", app.file_io.delimiter_name()));
    }
    if !messages.is_empty() {
        app.message = Some(messages.join("; "));
    }

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    ALT_SCREEN_ACTIVE.store(false, Ordering::Relaxed);
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    result
}
