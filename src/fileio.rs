use std::io;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::info;

use crate::table::DataTable;

/// File format inferred from the extension; anything unknown reads as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
}

impl FileFormat {
    pub fn from_extension(path: &Path) -> FileFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") | Some("tab") => FileFormat::Tsv,
            _ => FileFormat::Csv,
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            FileFormat::Csv => b',',
            FileFormat::Tsv => b'\t',
        }
    }
}

/// Delimiter word from the command line: a name or a single ASCII char.
pub fn parse_delimiter(word: &str) -> Option<u8> {
    match word {
        "comma" => Some(b','),
        "tab" | "\\t" => Some(b'\t'),
        "semicolon" => Some(b';'),
        "pipe" => Some(b'|'),
        _ => {
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Some(c as u8),
                _ => None,
            }
        }
    }
}

#[derive(Debug)]
pub struct LoadResult {
    pub table: Option<DataTable>,
    pub warnings: Vec<String>,
}

/// Where the data comes from and how it is delimited.
pub struct FileIO {
    file_path: Option<PathBuf>,
    delimiter: u8,
}

impl FileIO {
    /// An explicit delimiter wins; otherwise it follows the extension.
    pub fn new(file_path: Option<PathBuf>, delimiter: Option<u8>) -> Self {
        let delimiter = delimiter.unwrap_or_else(|| {
            file_path
                .as_deref()
                .map(FileFormat::from_extension)
                .map(FileFormat::delimiter)
                .unwrap_or(b',')
        });
        FileIO {
            file_path,
            delimiter,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn delimiter_name(&self) -> &'static str {
        match self.delimiter {
            b',' => "csv",
            b'\t' => "tsv",
            b';' => "semicolon",
            b'|' => "pipe",
            _ => "custom",
        }
    }

    /// Read the file into a table. The first record names the columns;
    /// every later record is a data row. Ragged rows are squared off to
    /// the column count with a warning.
    pub fn load_table(&self) -> io::Result<LoadResult> {
        let path = match &self.file_path {
            Some(p) => p,
            None => {
                return Ok(LoadResult {
                    table: None,
                    warnings: Vec::new(),
                })
            }
        };
        let mut warnings = Vec::new();
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(csv_to_io)?;

        let mut records = reader.records();
        let mut columns: Vec<String> = match records.next() {
            Some(first) => first
                .map_err(csv_to_io)?
                .iter()
                .map(|s| s.to_string())
                .collect(),
            None => {
                warnings.push(format!("{}: file is empty", path.display()));
                return Ok(LoadResult {
                    table: Some(DataTable::new(Vec::new(), Vec::new())),
                    warnings,
                });
            }
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut widest = columns.len();
        for record in records {
            let record = record.map_err(csv_to_io)?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            widest = widest.max(row.len());
            rows.push(row);
        }
        if widest > columns.len() {
            warnings.push(format!(
                "{} unnamed columns added for rows wider than the header",
                widest - columns.len()
            ));
            columns.resize(widest, String::new());
        }
        let mut padded = 0usize;
        for row in &mut rows {
            if row.len() < widest {
                padded += 1;
                row.resize(widest, String::new());
            }
        }
        if padded > 0 {
            warnings.push(format!("{} short rows padded with empty cells", padded));
        }

        info!("loaded {} rows x {} cols from {:?}", rows.len(), widest, path);
        Ok(LoadResult {
            table: Some(DataTable::new(columns, rows)),
            warnings,
        })
    }
}

fn csv_to_io(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io_err) => io_err,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", other)),
    }
}
