//! Data model for state-year indicator consolidation.
//!
//! Source tables are normalized into one of three record shapes depending on
//! how the source identifies a federative unit (UF):
//!
//! - [`LongRecord`]: state name and numeric UF code (DATASUS tables)
//! - [`NamedRecord`]: state name only (the suicide table)
//! - [`CodedRecord`]: UF code only (IPEA wide series)
//!
//! Every shape is lifted into an [`IndicatorTable`] before it is folded into
//! the consolidated [`Panel`].

pub mod indicator;
pub mod panel;
pub mod record;
pub mod source;

pub use indicator::{Identity, IndicatorColumn, IndicatorTable, Observation, ValueKind};
pub use panel::{Panel, PanelRow};
pub use record::{CodedRecord, LongRecord, NamedRecord};
pub use source::IndicatorSource;
