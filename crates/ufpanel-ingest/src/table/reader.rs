//! Raw CSV reading with metadata-line skipping and explicit encoding.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::error::{IngestError, Result};

use super::header::{normalize_cell, normalize_header};

/// How a source file is laid out on disk.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Metadata lines above the header row.
    pub skip_lines: usize,
    /// Field separator.
    pub separator: u8,
    /// Text encoding of the file bytes.
    pub encoding: &'static Encoding,
}

impl ReadOptions {
    /// DATASUS TabNet exports: `;`-separated Latin-1 with a metadata preamble.
    ///
    /// Latin-1 is decoded as windows-1252, its superset.
    pub fn latin1(skip_lines: usize) -> Self {
        Self {
            skip_lines,
            separator: b';',
            encoding: WINDOWS_1252,
        }
    }

    /// `;`-separated UTF-8 with the header on the first line.
    pub fn utf8() -> Self {
        Self {
            skip_lines: 0,
            separator: b';',
            encoding: UTF_8,
        }
    }
}

/// A source table as text cells, before any cleaning.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell at `row`/`column`, empty if out of range.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }
}

/// Reads a delimited file into a [`RawTable`].
pub fn read_raw_table(path: &Path, options: &ReadOptions) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::open(path, e))?;
    let (text, actual, had_errors) = options.encoding.decode(&bytes);
    if had_errors {
        return Err(IngestError::Decoding {
            path: path.to_path_buf(),
            encoding: actual.name(),
        });
    }
    parse_raw_table(path, &text, options)
}

/// Parses already-decoded text into a [`RawTable`].
pub fn parse_raw_table(path: &Path, text: &str, options: &ReadOptions) -> Result<RawTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let body = skip_lines(text, options.skip_lines).ok_or_else(|| IngestError::TooFewLines {
        path: path.to_path_buf(),
        expected: options.skip_lines,
        found: text.lines().count(),
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(options.separator)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, &e))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        // Trailing empty fields (a dangling separator) are tolerated.
        let width = record
            .iter()
            .collect::<Vec<_>>()
            .iter()
            .rposition(|value| !value.trim().is_empty())
            .map_or(0, |last| last + 1);
        if width > headers.len() {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(IngestError::RaggedRow {
                path: path.to_path_buf(),
                line: line + options.skip_lines as u64,
                expected: headers.len(),
                found: width,
            });
        }
        let row: Vec<String> = (0..headers.len())
            .map(|idx| record.get(idx).map(normalize_cell).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read raw table"
    );

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Returns the text after the first `count` lines, or `None` if the text has
/// no line left to serve as a header.
fn skip_lines(text: &str, count: usize) -> Option<&str> {
    let mut rest = text;
    for _ in 0..count {
        let newline = rest.find('\n')?;
        rest = &rest[newline + 1..];
    }
    if rest.trim().is_empty() { None } else { Some(rest) }
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
