//! Wide IPEA series: one row per UF, one column per year.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use ufpanel_model::CodedRecord;

use crate::error::{IngestError, Result};
use crate::table::{ReadOptions, is_digit_label, read_raw_table};
use crate::values::parse_measure;

/// Default header of the UF code column in IPEA exports.
pub const DEFAULT_CODE_COLUMN: &str = "Código";

/// Options for reading a wide series.
#[derive(Debug, Clone)]
pub struct WideTableOptions {
    pub read: ReadOptions,
    pub code_column: String,
}

impl Default for WideTableOptions {
    fn default() -> Self {
        Self {
            read: ReadOptions::utf8(),
            code_column: DEFAULT_CODE_COLUMN.to_string(),
        }
    }
}

/// A wide series reduced to its UF codes and year columns.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub path: PathBuf,
    pub years: Vec<String>,
    pub codes: Vec<u32>,
    /// Row-major, aligned with `codes` and `years`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    pub fn year_index(&self, year: &str) -> Option<usize> {
        self.years.iter().position(|y| y == year)
    }

    /// Adds (or replaces) the `year` column with the values `supplement`
    /// holds for the same UF codes. Codes missing from the supplement get no
    /// value. Leaves the table unchanged if the supplement has no such year.
    #[must_use]
    pub fn with_year_from(mut self, supplement: &WideTable, year: &str) -> Self {
        let Some(source_idx) = supplement.year_index(year) else {
            debug!(
                path = %supplement.path.display(),
                year,
                "supplement has no such year column"
            );
            return self;
        };
        let mut by_code: BTreeMap<u32, Option<f64>> = BTreeMap::new();
        for (code, row) in supplement.codes.iter().zip(&supplement.values) {
            by_code
                .entry(*code)
                .or_insert_with(|| row.get(source_idx).copied().flatten());
        }

        let target_idx = match self.year_index(year) {
            Some(idx) => idx,
            None => {
                self.years.push(year.to_string());
                for row in &mut self.values {
                    row.push(None);
                }
                self.years.len() - 1
            }
        };
        for (code, row) in self.codes.iter().zip(self.values.iter_mut()) {
            row[target_idx] = by_code.get(code).copied().flatten();
        }
        self
    }

    /// Reshapes to one record per (code, year) cell.
    pub fn into_records(self) -> Vec<CodedRecord> {
        let years: Vec<Option<i32>> = self.years.iter().map(|y| y.parse().ok()).collect();
        let mut records = Vec::with_capacity(self.codes.len() * years.len());
        for (cod_uf, row) in self.codes.into_iter().zip(self.values) {
            for (year, value) in years.iter().zip(row) {
                if let Some(ano) = *year {
                    records.push(CodedRecord { cod_uf, ano, value });
                }
            }
        }
        records
    }
}

/// Reads a wide series, keeping the code column and digit-labelled columns.
pub fn read_wide_table(path: &Path, options: &WideTableOptions) -> Result<WideTable> {
    let raw = read_raw_table(path, &options.read)?;
    let code_idx = raw.column_index(&options.code_column).ok_or_else(|| {
        IngestError::MissingColumn {
            column: options.code_column.clone(),
            path: path.to_path_buf(),
        }
    })?;
    let year_cols: Vec<usize> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| *idx != code_idx && is_digit_label(header))
        .map(|(idx, _)| idx)
        .collect();

    let mut codes = Vec::with_capacity(raw.rows.len());
    let mut values = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let code_text = row[code_idx].as_str();
        let Ok(code) = code_text.parse::<u32>() else {
            warn!(
                path = %path.display(),
                code = code_text,
                "skipping row with non-numeric code"
            );
            continue;
        };
        codes.push(code);
        values.push(
            year_cols
                .iter()
                .map(|&idx| parse_measure(&row[idx]))
                .collect(),
        );
    }

    Ok(WideTable {
        path: path.to_path_buf(),
        years: year_cols
            .iter()
            .map(|&idx| raw.headers[idx].trim().to_string())
            .collect(),
        codes,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_keeps_code_and_year_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "pop.csv",
            "Sigla;Código;Estado;2009;2011;\nAC;12;Acre;691132;;\nRO;11;Rondônia;1503928;1576455;\n",
        );
        let table = read_wide_table(&path, &WideTableOptions::default()).unwrap();
        assert_eq!(table.years, vec!["2009", "2011"]);
        assert_eq!(table.codes, vec![12, 11]);
        assert_eq!(table.values[0], vec![Some(691_132.0), None]);
    }

    #[test]
    fn test_missing_code_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pib.csv", "Sigla;Estado;2010\nAC;Acre;1\n");
        let result = read_wide_table(&path, &WideTableOptions::default());
        assert!(matches!(result, Err(IngestError::MissingColumn { .. })));
    }

    #[test]
    fn test_non_numeric_code_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pib.csv", "Código;2010\n12;1.5\nBR;9\n");
        let table = read_wide_table(&path, &WideTableOptions::default()).unwrap();
        assert_eq!(table.codes, vec![12]);
        assert_eq!(table.values, vec![vec![Some(1.5)]]);
    }

    #[test]
    fn test_with_year_from_adds_column_by_code() {
        let main = WideTable {
            path: PathBuf::from("main.csv"),
            years: vec!["2009".into(), "2011".into()],
            codes: vec![11, 12],
            values: vec![vec![Some(1.0), Some(2.0)], vec![Some(3.0), Some(4.0)]],
        };
        let census = WideTable {
            path: PathBuf::from("census.csv"),
            years: vec!["2010".into()],
            codes: vec![12],
            values: vec![vec![Some(733_559.0)]],
        };
        let merged = main.with_year_from(&census, "2010");
        assert_eq!(merged.years, vec!["2009", "2011", "2010"]);
        assert_eq!(merged.values[0], vec![Some(1.0), Some(2.0), None]);
        assert_eq!(merged.values[1], vec![Some(3.0), Some(4.0), Some(733_559.0)]);
    }

    #[test]
    fn test_with_year_from_without_year_is_noop() {
        let main = WideTable {
            path: PathBuf::from("main.csv"),
            years: vec!["2009".into()],
            codes: vec![12],
            values: vec![vec![Some(1.0)]],
        };
        let other = WideTable {
            path: PathBuf::from("other.csv"),
            years: vec!["2000".into()],
            codes: vec![12],
            values: vec![vec![Some(5.0)]],
        };
        assert_eq!(main.clone().with_year_from(&other, "2010"), main);
    }

    #[test]
    fn test_into_records() {
        let table = WideTable {
            path: PathBuf::from("pop.csv"),
            years: vec!["2010".into(), "2011".into()],
            codes: vec![12],
            values: vec![vec![Some(733_559.0), None]],
        };
        let records = table.into_records();
        assert_eq!(
            records,
            vec![
                CodedRecord {
                    cod_uf: 12,
                    ano: 2010,
                    value: Some(733_559.0)
                },
                CodedRecord {
                    cod_uf: 12,
                    ano: 2011,
                    value: None
                },
            ]
        );
    }
}
