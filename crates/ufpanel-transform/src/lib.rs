//! Panel construction for state-year indicators.
//!
//! - [`aggregate_long`] sums records reported for the same state-year
//! - [`outer_join`] is the single join primitive
//! - [`MergePlan`] folds indicator tables into a [`Panel`](ufpanel_model::Panel)
//!
//! Every operation here is infallible: malformed input is rejected during
//! ingestion, and a missing source is represented by an empty table.

mod aggregate;
mod join;
mod merge;

pub use aggregate::aggregate_long;
pub use join::{JoinKey, KeyValue, outer_join};
pub use merge::{MergePlan, MergeStep, drop_year, join_step, merge_panel};
