use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use std::path::Path;

/// A color as it appears in theme files: a name, an RGB triple, or a
/// 256-color palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    Named(NamedColor),
    Rgb([u8; 3]),
    Indexed(u8),
}

impl ThemeColor {
    pub fn to_ratatui(self) -> Color {
        match self {
            ThemeColor::Named(name) => name.to_ratatui(),
            ThemeColor::Rgb([r, g, b]) => Color::Rgb(r, g, b),
            ThemeColor::Indexed(i) => Color::Indexed(i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
    Reset,
}

impl NamedColor {
    /// Lowercase color word to variant; mirrors the theme-file names.
    pub fn from_name(name: &str) -> Option<NamedColor> {
        let color = match name {
            "black" => NamedColor::Black,
            "red" => NamedColor::Red,
            "green" => NamedColor::Green,
            "yellow" => NamedColor::Yellow,
            "blue" => NamedColor::Blue,
            "magenta" => NamedColor::Magenta,
            "cyan" => NamedColor::Cyan,
            "gray" => NamedColor::Gray,
            "darkgray" => NamedColor::DarkGray,
            "lightred" => NamedColor::LightRed,
            "lightgreen" => NamedColor::LightGreen,
            "lightyellow" => NamedColor::LightYellow,
            "lightblue" => NamedColor::LightBlue,
            "lightmagenta" => NamedColor::LightMagenta,
            "lightcyan" => NamedColor::LightCyan,
            "white" => NamedColor::White,
            "reset" => NamedColor::Reset,
            _ => return None,
        };
        Some(color)
    }

    pub fn to_ratatui(self) -> Color {
        match self {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::Gray => Color::Gray,
            NamedColor::DarkGray => Color::DarkGray,
            NamedColor::LightRed => Color::LightRed,
            NamedColor::LightGreen => Color::LightGreen,
            NamedColor::LightYellow => Color::LightYellow,
            NamedColor::LightBlue => Color::LightBlue,
            NamedColor::LightMagenta => Color::LightMagenta,
            NamedColor::LightCyan => Color::LightCyan,
            NamedColor::White => Color::White,
            NamedColor::Reset => Color::Reset,
        }
    }
}

/// Font attributes that can be set on a single cell. Applying a font
/// replaces all four flags at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub dim: bool,
}

/// The resolved style a cell or chrome element is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct CellStyle {
    pub fg: Option<ThemeColor>,
    pub bg: Option<ThemeColor>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub dim: bool,
}

impl CellStyle {
    pub fn fg(mut self, color: ThemeColor) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: ThemeColor) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Overwrite the attribute flags with `font`, leaving colors alone.
    pub fn apply_font(&mut self, font: FontStyle) {
        self.bold = font.bold;
        self.italic = font.italic;
        self.underline = font.underline;
        self.dim = font.dim;
    }

    pub fn to_ratatui(self) -> Style {
        let mut style = Style::default();
        if let Some(fg) = self.fg {
            style = style.fg(fg.to_ratatui());
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg.to_ratatui());
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underline {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}

fn default_hover() -> ThemeColor {
    ThemeColor::Named(NamedColor::LightBlue)
}

/// A full set of element styles. Theme files may omit any field and
/// get the default for it.
#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cell: CellStyle,
    #[serde(default)]
    pub header: CellStyle,
    #[serde(default)]
    pub row_number: CellStyle,
    /// Background painted over the hovered row's cells.
    #[serde(default = "default_hover")]
    pub hover: ThemeColor,
    #[serde(default)]
    pub selection: CellStyle,
    #[serde(default)]
    pub status_bar: CellStyle,
    #[serde(default)]
    pub command_line: CellStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Theme {
            name: "light".to_string(),
            cell: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::Black))
                .bg(ThemeColor::Named(NamedColor::White)),
            header: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::White))
                .bg(ThemeColor::Rgb([60, 60, 60]))
                .bold(),
            row_number: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::DarkGray))
                .bg(ThemeColor::Named(NamedColor::White)),
            hover: ThemeColor::Named(NamedColor::LightBlue),
            selection: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::White))
                .bg(ThemeColor::Rgb([30, 144, 255]))
                .bold(),
            status_bar: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::Black))
                .bg(ThemeColor::Named(NamedColor::Gray)),
            command_line: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::Black))
                .bg(ThemeColor::Named(NamedColor::White)),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark".to_string(),
            cell: CellStyle::default().fg(ThemeColor::Named(NamedColor::Gray)),
            header: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::White))
                .bg(ThemeColor::Named(NamedColor::DarkGray))
                .bold(),
            row_number: CellStyle::default().fg(ThemeColor::Named(NamedColor::DarkGray)),
            hover: ThemeColor::Rgb([35, 70, 105]),
            selection: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::White))
                .bg(ThemeColor::Rgb([30, 144, 255]))
                .bold(),
            status_bar: CellStyle::default()
                .fg(ThemeColor::Named(NamedColor::Gray))
                .bg(ThemeColor::Named(NamedColor::DarkGray)),
            command_line: CellStyle::default().fg(ThemeColor::Named(NamedColor::Gray)),
        }
    }

    /// Look up a built-in theme by name.
    pub fn by_name(name: &str) -> Option<Theme> {
        match name {
            "light" => Some(Theme::light()),
            "dark" => Some(Theme::dark()),
            _ => None,
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["light", "dark"]
    }

    /// Load a theme from a TOML file. Missing fields fall back to their
    /// defaults rather than the light theme's values.
    pub fn from_file(path: &Path) -> Result<Theme, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read theme file {}: {}", path.display(), e))?;
        let mut theme: Theme = toml::from_str(&text)
            .map_err(|e| format!("invalid theme file {}: {}", path.display(), e))?;
        if theme.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                theme.name = stem.to_string_lossy().to_string();
            }
        }
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_color_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            color: ThemeColor,
        }
        let h: Holder = toml::from_str(r#"color = "lightblue""#).unwrap();
        assert_eq!(h.color, ThemeColor::Named(NamedColor::LightBlue));
    }

    #[test]
    fn test_rgb_color_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            color: ThemeColor,
        }
        let h: Holder = toml::from_str("color = [60, 60, 60]").unwrap();
        assert_eq!(h.color, ThemeColor::Rgb([60, 60, 60]));
    }

    #[test]
    fn test_indexed_color_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            color: ThemeColor,
        }
        let h: Holder = toml::from_str("color = 208").unwrap();
        assert_eq!(h.color, ThemeColor::Indexed(208));
    }

    #[test]
    fn test_partial_theme_gets_defaults() {
        let theme: Theme = toml::from_str(
            r#"
            name = "custom"

            [header]
            fg = "white"
            bg = [10, 20, 30]
            bold = true
            "#,
        )
        .unwrap();
        assert_eq!(theme.name, "custom");
        assert_eq!(theme.header.bg, Some(ThemeColor::Rgb([10, 20, 30])));
        assert!(theme.header.bold);
        assert_eq!(theme.cell, CellStyle::default());
        assert_eq!(theme.hover, ThemeColor::Named(NamedColor::LightBlue));
    }

    #[test]
    fn test_from_name_matches_serde_names() {
        assert_eq!(NamedColor::from_name("darkgray"), Some(NamedColor::DarkGray));
        assert_eq!(NamedColor::from_name("reset"), Some(NamedColor::Reset));
        assert_eq!(NamedColor::from_name("mauve"), None);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("light").unwrap().name, "light");
        assert_eq!(Theme::by_name("dark").unwrap().name, "dark");
        assert!(Theme::by_name("sepia").is_none());
    }

    #[test]
    fn test_apply_font_replaces_all_flags() {
        let mut style = CellStyle::default().bold();
        style.underline = true;
        style.apply_font(FontStyle {
            italic: true,
            ..FontStyle::default()
        });
        assert!(!style.bold);
        assert!(style.italic);
        assert!(!style.underline);
        assert!(!style.dim);
    }

    #[test]
    fn test_to_ratatui_modifiers() {
        let style = CellStyle::default()
            .fg(ThemeColor::Named(NamedColor::Red))
            .bold()
            .to_ratatui();
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
