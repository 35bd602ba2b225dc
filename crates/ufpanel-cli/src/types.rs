use std::path::PathBuf;

use ufpanel_model::{Panel, ValueKind};
use ufpanel_output::column_order;

/// Outcome of one indicator source.
#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub column: String,
    pub path: PathBuf,
    /// Long rows contributed to the merge.
    pub rows: usize,
    /// Files that loaded, out of `files`.
    pub loaded: usize,
    pub files: usize,
}

impl SourceSummary {
    pub fn new(column: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            column: column.into(),
            path: path.into(),
            rows: 0,
            loaded: 0,
            files: 0,
        }
    }
}

/// First rows of the written panel, formatted as in the output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PanelPreview {
    /// Takes the first `limit` rows of an already sorted panel.
    pub fn from_panel(panel: &Panel, limit: usize) -> Self {
        let rows = panel
            .rows()
            .iter()
            .take(limit)
            .map(|row| {
                let mut cells = vec![
                    row.identity.estado.clone().unwrap_or_default(),
                    row.identity.ano.to_string(),
                ];
                for (idx, column) in panel.columns().iter().enumerate() {
                    cells.push(format_value(row.value(idx), column.kind));
                    if idx == 0 {
                        cells.push(
                            row.identity
                                .cod_uf
                                .map(|code| code.to_string())
                                .unwrap_or_default(),
                        );
                    }
                }
                cells
            })
            .collect();
        Self {
            headers: column_order(panel),
            rows,
        }
    }
}

fn format_value(value: Option<f64>, kind: ValueKind) -> String {
    match (value, kind) {
        (None, _) => String::new(),
        (Some(value), ValueKind::Count) => format!("{value:.0}"),
        (Some(value), ValueKind::Measure) => value.to_string(),
    }
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub panel_file: PathBuf,
    /// Intermediate tables that were written.
    pub intermediate_files: Vec<PathBuf>,
    pub sources: Vec<SourceSummary>,
    pub panel_rows: usize,
    pub panel_columns: usize,
    pub preview: PanelPreview,
    /// Recoverable failures, one line each.
    pub errors: Vec<String>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
