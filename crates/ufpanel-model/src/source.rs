use std::path::PathBuf;

/// An extra indicator file and the output column it feeds.
///
/// The list of sources is built once from a directory scan so the output
/// schema is known before any file is read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndicatorSource {
    pub path: PathBuf,
    pub field: String,
}

impl IndicatorSource {
    pub fn new(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
        }
    }
}
