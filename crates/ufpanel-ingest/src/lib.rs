//! Source ingestion for state-year indicator consolidation.
//!
//! This crate turns heterogeneous CSV exports into typed long records.
//!
//! # Features
//!
//! - **Discovery**: recursive CSV listing and extra-indicator column naming
//! - **CSV Loading**: explicit encoding (Latin-1 for DATASUS), metadata-line
//!   skipping, ragged-row detection
//! - **Normalization**: footer trimming, `"-"` coercion, UF code extraction,
//!   wide-to-long reshaping
//! - **Wide series**: IPEA tables keyed by UF code, with year supplements
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ufpanel_ingest::{NormalizeOptions, ReadOptions, list_csv_files, load_coded_file};
//!
//! let options = NormalizeOptions::new(ReadOptions::latin1(5));
//! for path in list_csv_files(Path::new("domestica"))? {
//!     let records = load_coded_file(&path, &options)?;
//! }
//! ```

mod discovery;
mod error;
mod normalize;
mod table;
mod values;
mod wide;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{
    RawTable, ReadOptions, is_digit_label, is_year_label, normalize_cell, normalize_header,
    parse_raw_table, read_raw_table,
};

// === File Discovery ===
pub use discovery::{discover_indicator_sources, list_csv_files, slugify};

// === Normalization ===
pub use normalize::{
    NormalizeOptions, TOTAL_COLUMN, load_coded_file, load_named_file, normalize_coded_table,
    normalize_named_table,
};
pub use values::{NO_DATA_TOKEN, coerce_count, leading_code, parse_measure, strip_code};

// === Wide Series ===
pub use wide::{DEFAULT_CODE_COLUMN, WideTable, WideTableOptions, read_wide_table};
