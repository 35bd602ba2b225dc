//! Raw table reading.

mod header;
mod reader;

pub use header::{is_digit_label, is_year_label, normalize_cell, normalize_header};
pub use reader::{RawTable, ReadOptions, parse_raw_table, read_raw_table};
