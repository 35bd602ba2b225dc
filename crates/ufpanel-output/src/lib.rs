//! Output generation for the consolidated state-year panel.
//!
//! The final panel goes through polars so every indicator column keeps its
//! type; the small intermediate tables are serialized row by row with `csv`.

mod error;
mod frame;
mod writer;

pub use error::{OutputError, Result};
pub use frame::{CODE_COLUMN, STATE_COLUMN, YEAR_COLUMN, column_order, panel_to_frame, sort_panel};
pub use writer::{
    DOMESTIC_FILE, PANEL_FILE, PANEL_SEPARATOR, SUICIDE_FILE, ensure_output_dir, write_domestic,
    write_panel, write_suicide,
};
