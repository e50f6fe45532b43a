use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::style::{FontStyle, NamedColor, ThemeColor};

/// A parsed `:` command. Row and column arguments are typed 1-based to
/// match the gutter labels and converted here.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Export(PathBuf),
    Color {
        row: usize,
        col: usize,
        color: ThemeColor,
    },
    Font {
        row: usize,
        col: usize,
        font: FontStyle,
    },
    Theme(String),
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Command {
        let input = input.trim();
        let mut words = input.split_whitespace();
        let head = match words.next() {
            Some(h) => h,
            None => return Command::Unknown(String::new()),
        };
        let rest: Vec<&str> = words.collect();
        match head {
            "q" | "quit" => Command::Quit,
            "export" => match rest.first() {
                Some(path) if rest.len() == 1 => Command::Export(PathBuf::from(path)),
                _ => Command::Unknown(input.to_string()),
            },
            "color" => {
                parse_color_command(&rest).unwrap_or_else(|| Command::Unknown(input.to_string()))
            }
            "font" => {
                parse_font_command(&rest).unwrap_or_else(|| Command::Unknown(input.to_string()))
            }
            "theme" => match rest.first() {
                Some(name) if rest.len() == 1 => Command::Theme(name.to_string()),
                _ => Command::Unknown(input.to_string()),
            },
            _ => Command::Unknown(input.to_string()),
        }
    }
}

/// 1-based index word to 0-based, rejecting zero.
fn parse_index(word: &str) -> Option<usize> {
    let v: usize = word.parse().ok()?;
    v.checked_sub(1)
}

fn parse_color_command(rest: &[&str]) -> Option<Command> {
    if rest.len() != 3 {
        return None;
    }
    let row = parse_index(rest[0])?;
    let col = parse_index(rest[1])?;
    let color = parse_color(rest[2])?;
    Some(Command::Color { row, col, color })
}

fn parse_font_command(rest: &[&str]) -> Option<Command> {
    if rest.len() < 3 {
        return None;
    }
    let row = parse_index(rest[0])?;
    let col = parse_index(rest[1])?;
    let mut font = FontStyle::default();
    for word in &rest[2..] {
        match *word {
            "bold" => font.bold = true,
            "italic" => font.italic = true,
            "underline" => font.underline = true,
            "dim" => font.dim = true,
            "plain" => font = FontStyle::default(),
            _ => return None,
        }
    }
    Some(Command::Font { row, col, font })
}

/// A color word: a name, `#rrggbb`, or a 256-color index.
pub fn parse_color(word: &str) -> Option<ThemeColor> {
    if let Some(hex) = word.strip_prefix('#') {
        // byte length and slicing below assume ASCII hex digits
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(ThemeColor::Rgb([r, g, b]));
    }
    if let Ok(idx) = word.parse::<u8>() {
        return Some(ThemeColor::Indexed(idx));
    }
    NamedColor::from_name(&word.to_lowercase()).map(ThemeColor::Named)
}

/// Line editor state for `:` command entry.
#[derive(Debug, Default)]
pub struct CommandHandler {
    buffer: String,
}

impl CommandHandler {
    pub fn new() -> Self {
        CommandHandler::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    /// Delete the last character. Returns false when the buffer was
    /// already empty, which exits command mode.
    pub fn backspace(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Escape key or its Ctrl+[ alias.
pub fn is_escape(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('[') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Command parsing ===

    #[test]
    fn test_parse_quit() {
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("quit"), Command::Quit);
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(
            Command::parse("export /tmp/out.csv"),
            Command::Export(PathBuf::from("/tmp/out.csv"))
        );
    }

    #[test]
    fn test_parse_export_without_path_is_unknown() {
        assert_eq!(
            Command::parse("export"),
            Command::Unknown("export".to_string())
        );
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(Command::parse("theme dark"), Command::Theme("dark".to_string()));
    }

    #[test]
    fn test_parse_color_is_one_based() {
        assert_eq!(
            Command::parse("color 1 2 red"),
            Command::Color {
                row: 0,
                col: 1,
                color: ThemeColor::Named(NamedColor::Red),
            }
        );
    }

    #[test]
    fn test_parse_color_rejects_zero_index() {
        assert_eq!(
            Command::parse("color 0 1 red"),
            Command::Unknown("color 0 1 red".to_string())
        );
    }

    #[test]
    fn test_parse_font_attrs() {
        assert_eq!(
            Command::parse("font 3 1 bold italic"),
            Command::Font {
                row: 2,
                col: 0,
                font: FontStyle {
                    bold: true,
                    italic: true,
                    ..FontStyle::default()
                },
            }
        );
    }

    #[test]
    fn test_parse_font_plain_clears() {
        assert_eq!(
            Command::parse("font 1 1 bold plain"),
            Command::Font {
                row: 0,
                col: 0,
                font: FontStyle::default(),
            }
        );
    }

    #[test]
    fn test_parse_font_unknown_attr_is_unknown() {
        assert_eq!(
            Command::parse("font 1 1 blink"),
            Command::Unknown("font 1 1 blink".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_keeps_input() {
        assert_eq!(
            Command::parse("frobnicate 3"),
            Command::Unknown("frobnicate 3".to_string())
        );
    }

    // === Color words ===

    #[test]
    fn test_parse_color_named() {
        assert_eq!(
            parse_color("lightblue"),
            Some(ThemeColor::Named(NamedColor::LightBlue))
        );
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#1e90ff"), Some(ThemeColor::Rgb([30, 144, 255])));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gggggg"), None);
        assert_eq!(parse_color("#aé9ff"), None);
    }

    #[test]
    fn test_parse_color_indexed() {
        assert_eq!(parse_color("208"), Some(ThemeColor::Indexed(208)));
        assert_eq!(parse_color("300"), None);
    }

    // === Command buffer ===

    #[test]
    fn test_command_buffer_editing() {
        let mut handler = CommandHandler::new();
        handler.push('q');
        handler.push('x');
        assert!(handler.backspace());
        assert_eq!(handler.buffer(), "q");
        assert_eq!(handler.take(), "q");
        assert_eq!(handler.buffer(), "");
        assert!(!handler.backspace());
    }

    #[test]
    fn test_is_escape() {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let ctrl_bracket = KeyEvent::new(KeyCode::Char('['), KeyModifiers::CONTROL);
        let plain_bracket = KeyEvent::new(KeyCode::Char('['), KeyModifiers::NONE);
        assert!(is_escape(&esc));
        assert!(is_escape(&ctrl_bracket));
        assert!(!is_escape(&plain_bracket));
    }
}
