//! Table normalization: from a raw DATASUS export to long records.
//!
//! Both variants share the same cleaning steps:
//!
//! 1. Cut the table at the first region cell starting with `Total`
//!    (subtotals and footnotes follow it)
//! 2. Ignore the `Total` column and any excluded year columns
//! 3. Keep only value columns whose header is a four-digit year
//! 4. Coerce every value cell to a whole number (`"-"` counts as zero)
//!
//! They differ in how the region cell is decomposed: the coded variant needs
//! a leading UF code, the named variant drops non-state label rows instead.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;
use ufpanel_model::{LongRecord, NamedRecord};

use crate::error::Result;
use crate::table::{RawTable, ReadOptions, is_year_label, read_raw_table};
use crate::values::{coerce_count, leading_code, strip_code};

/// Header of the per-row total column.
pub const TOTAL_COLUMN: &str = "Total";

/// Prefix of the region cell that starts the footer.
const FOOTER_PREFIX: &str = "Total";

/// Region labels that are not states (lowercase, matched as substrings).
const NON_STATE_LABELS: [&str; 7] = [
    "região",
    "total",
    "fonte",
    "notas",
    "sistema",
    "utilizados",
    "em ",
];

/// Options for normalizing one source file.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub read: ReadOptions,
    /// Year columns to ignore, as header text.
    pub excluded_years: BTreeSet<String>,
}

impl NormalizeOptions {
    pub fn new(read: ReadOptions) -> Self {
        Self {
            read,
            excluded_years: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn excluding_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.excluded_years
            .extend(years.into_iter().map(|year| year.to_string()));
        self
    }
}

/// Reads and normalizes a file whose region cells carry a UF code.
pub fn load_coded_file(path: &Path, options: &NormalizeOptions) -> Result<Vec<LongRecord>> {
    let table = read_raw_table(path, &options.read)?;
    Ok(normalize_coded_table(&table, &options.excluded_years))
}

/// Reads and normalizes a file whose region cells carry state names only.
pub fn load_named_file(path: &Path, options: &NormalizeOptions) -> Result<Vec<NamedRecord>> {
    let table = read_raw_table(path, &options.read)?;
    Ok(normalize_named_table(&table, &options.excluded_years))
}

/// Normalizes a table whose first column reads like `"12 Acre"`.
///
/// Rows without a leading UF code are excluded.
pub fn normalize_coded_table(
    table: &RawTable,
    excluded_years: &BTreeSet<String>,
) -> Vec<LongRecord> {
    let years = year_columns(table, excluded_years);
    let rows = body_rows(table);
    let mut records = Vec::with_capacity(rows.len() * years.len());
    let mut uncoded = 0usize;

    for row in rows {
        let region = region_cell(row);
        let Some(cod_uf) = leading_code(region) else {
            uncoded += 1;
            continue;
        };
        let estado = strip_code(region);
        for &(idx, ano) in &years {
            let value = coerce_count(row.get(idx).map_or("", String::as_str));
            records.push(LongRecord::new(estado, cod_uf, ano, value));
        }
    }

    if uncoded > 0 {
        debug!(
            path = %table.path.display(),
            rows = uncoded,
            "excluded rows without a UF code"
        );
    }
    records
}

/// Normalizes a table whose first column holds state names, possibly
/// prefixed with `..` or a code, mixed with region and footnote rows.
pub fn normalize_named_table(
    table: &RawTable,
    excluded_years: &BTreeSet<String>,
) -> Vec<NamedRecord> {
    let years = year_columns(table, excluded_years);
    let rows = body_rows(table);
    let mut records = Vec::with_capacity(rows.len() * years.len());
    let mut dropped = 0usize;

    for row in rows {
        let region = region_cell(row);
        let estado = state_name(region);
        if is_non_state_label(region) || estado.is_empty() {
            dropped += 1;
            continue;
        }
        for &(idx, ano) in &years {
            let value = coerce_count(row.get(idx).map_or("", String::as_str));
            records.push(NamedRecord::new(estado, ano, value));
        }
    }

    if dropped > 0 {
        debug!(
            path = %table.path.display(),
            rows = dropped,
            "excluded non-state rows"
        );
    }
    records
}

/// Rows above the footer.
fn body_rows(table: &RawTable) -> &[Vec<String>] {
    let footer = table
        .rows
        .iter()
        .position(|row| region_cell(row).starts_with(FOOTER_PREFIX));
    match footer {
        Some(idx) => &table.rows[..idx],
        None => &table.rows,
    }
}

/// Value columns to reshape, as `(column index, year)`.
fn year_columns(table: &RawTable, excluded_years: &BTreeSet<String>) -> Vec<(usize, i32)> {
    table
        .headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, header)| header.as_str() != TOTAL_COLUMN)
        .filter(|(_, header)| !excluded_years.contains(header.as_str()))
        .filter(|(_, header)| is_year_label(header))
        .filter_map(|(idx, header)| header.parse::<i32>().ok().map(|year| (idx, year)))
        .collect()
}

fn region_cell(row: &[String]) -> &str {
    row.first().map_or("", String::as_str)
}

fn is_non_state_label(region: &str) -> bool {
    let lower = region.to_lowercase();
    NON_STATE_LABELS.iter().any(|label| lower.contains(label))
}

/// State name from a region cell: drops a leading `..` marker, then a
/// leading code.
fn state_name(region: &str) -> &str {
    let trimmed = region.trim_start();
    let unmarked = trimmed.strip_prefix("..").unwrap_or(trimmed);
    strip_code(unmarked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            path: PathBuf::from("fixture.csv"),
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn coded_table_reshapes_and_coerces() {
        let raw = table(
            &["UF", "2010", "2011", "Total"],
            &[&["12 Acre", "-", "7", "7"], &["11 Rondônia", "3", "x", "3"]],
        );
        let records = normalize_coded_table(&raw, &BTreeSet::new());
        assert_eq!(
            records,
            vec![
                LongRecord::new("Acre", 12, 2010, 0),
                LongRecord::new("Acre", 12, 2011, 7),
                LongRecord::new("Rondônia", 11, 2010, 3),
                LongRecord::new("Rondônia", 11, 2011, 0),
            ]
        );
    }

    #[test]
    fn footer_rows_are_excluded() {
        let raw = table(
            &["UF", "2010"],
            &[
                &["12 Acre", "5"],
                &["Total 999", "999"],
                &["13 Amazonas", "1"],
                &["Fonte: SINAN", ""],
            ],
        );
        let records = normalize_coded_table(&raw, &BTreeSet::new());
        assert_eq!(records, vec![LongRecord::new("Acre", 12, 2010, 5)]);
    }

    #[test]
    fn table_without_footer_keeps_all_rows() {
        let raw = table(&["UF", "2010"], &[&["12 Acre", "5"], &["13 Amazonas", "1"]]);
        assert_eq!(normalize_coded_table(&raw, &BTreeSet::new()).len(), 2);
    }

    #[test]
    fn rows_without_code_are_excluded() {
        let raw = table(&["UF", "2010"], &[&["Região Norte", "9"], &["12 Acre", "5"]]);
        let records = normalize_coded_table(&raw, &BTreeSet::new());
        assert_eq!(records, vec![LongRecord::new("Acre", 12, 2010, 5)]);
    }

    #[test]
    fn excluded_and_non_year_columns_are_ignored() {
        let raw = table(
            &["UF", "2021", "2022", "2023", "Ign/Branco", "Total"],
            &[&["12 Acre", "1", "2", "3", "4", "10"]],
        );
        let options = NormalizeOptions::new(ReadOptions::latin1(4)).excluding_years(2022..=2024);
        let records = normalize_coded_table(&raw, &options.excluded_years);
        assert_eq!(records, vec![LongRecord::new("Acre", 12, 2021, 1)]);
    }

    #[test]
    fn normalizing_clean_output_is_stable() {
        let raw = table(
            &["UF", "2010", "2011"],
            &[&["12 Acre", "-", "7"], &["Total", "0", "7"]],
        );
        let first = normalize_coded_table(&raw, &BTreeSet::new());
        let v2010 = first[0].value.to_string();
        let v2011 = first[1].value.to_string();
        let clean = table(
            &["UF", "2010", "2011"],
            &[&["12 Acre", v2010.as_str(), v2011.as_str()]],
        );
        assert_eq!(normalize_coded_table(&clean, &BTreeSet::new()), first);
    }

    #[test]
    fn named_table_filters_labels_and_prefixes() {
        let raw = table(
            &["Região/Unidade da Federação", "2010", "2022"],
            &[
                &["Região Norte", "100", "1"],
                &[".. Rondônia", "20", "1"],
                &["12 Acre", "31", "1"],
                &["Amazonas", "-", "1"],
                &["Em 2010 houve revisão", "", ""],
                &["Total", "151", "3"],
                &["Fonte: SIM", "", ""],
            ],
        );
        let excluded = BTreeSet::from(["2022".to_string(), "2023".to_string()]);
        let records = normalize_named_table(&raw, &excluded);
        assert_eq!(
            records,
            vec![
                NamedRecord::new("Rondônia", 2010, 20),
                NamedRecord::new("Acre", 2010, 31),
                NamedRecord::new("Amazonas", 2010, 0),
            ]
        );
    }

    #[test]
    fn named_labels_match_case_insensitively() {
        assert!(is_non_state_label("REGIÃO SUL"));
        assert!(is_non_state_label("Notas:"));
        assert!(is_non_state_label("Dados utilizados"));
        assert!(!is_non_state_label("Pernambuco"));
        assert!(!is_non_state_label("Roraima"));
    }

    #[test]
    fn state_name_strips_marker_and_code() {
        assert_eq!(state_name(".. Rondônia"), "Rondônia");
        assert_eq!(state_name("..Acre"), "Acre");
        assert_eq!(state_name("35 São Paulo"), "São Paulo");
        assert_eq!(state_name(".."), "");
    }
}
