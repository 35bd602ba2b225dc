//! Consolidation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read every source into long records or indicator tables,
//!    writing the domestic-violence and suicide tables as they are ready
//! 2. **Merge**: fold all indicators into one panel, then drop the excluded
//!    year
//! 3. **Output**: sort and write the panel
//!
//! A source that fails to load is logged, recorded in the run's error list
//! and merged as an empty table. Only a missing domestic-violence root or an
//! output failure stops the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use ufpanel_ingest::{
    IngestError, NormalizeOptions, WideTableOptions, discover_indicator_sources, list_csv_files,
    load_coded_file, load_named_file, read_wide_table,
};
use ufpanel_model::{IndicatorColumn, IndicatorTable, LongRecord, NamedRecord, Panel};
use ufpanel_output::{
    DOMESTIC_FILE, PANEL_FILE, SUICIDE_FILE, ensure_output_dir, sort_panel, write_domestic,
    write_panel, write_suicide,
};
use ufpanel_transform::{MergePlan, MergeStep, aggregate_long, drop_year};

use crate::config::{
    CENSUS_YEAR, DOMESTIC_COLUMN, DROPPED_YEAR, GDP_COLUMN, POPULATION_COLUMN, PipelineConfig,
    SUICIDE_COLUMN, WELFARE_COLUMN,
};
use crate::types::{PanelPreview, RunResult, SourceSummary};

/// Rows kept for the terminal preview.
pub const PREVIEW_ROWS: usize = 5;

/// Runs every stage.
///
/// # Errors
///
/// Fails if the domestic-violence root is missing or an output cannot be
/// written.
pub fn run(config: &PipelineConfig) -> Result<RunResult> {
    let domestic_files = list_csv_files(&config.domestic_root)?;
    ensure_output_dir(&config.output_dir).context("create output directory")?;

    let ingested = ingest(config, &domestic_files);
    let IngestResult {
        tables,
        sources,
        mut errors,
    } = ingested;

    let mut intermediate_files = Vec::new();
    intermediate_files.push(
        write_domestic(&config.output_dir.join(DOMESTIC_FILE), &tables.domestic)
            .context("write domestic violence table")?,
    );
    match &tables.suicide {
        Some(records) => intermediate_files.push(
            write_suicide(&config.output_dir.join(SUICIDE_FILE), records)
                .context("write suicide table")?,
        ),
        None => errors.push(format!(
            "{SUICIDE_FILE}: not written, {} could not be loaded",
            config.suicide_file.display()
        )),
    }

    let panel = merge(tables);
    let written = output(&config.output_dir, panel)?;

    Ok(RunResult {
        output_dir: config.output_dir.clone(),
        panel_file: written.path,
        intermediate_files,
        sources,
        panel_rows: written.rows,
        panel_columns: written.columns,
        preview: written.preview,
        errors,
    })
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Everything the merge needs, one entry per source.
#[derive(Debug)]
pub struct SourceTables {
    /// Aggregated domestic-violence records.
    pub domestic: Vec<LongRecord>,
    /// `None` when the suicide file could not be loaded.
    pub suicide: Option<Vec<NamedRecord>>,
    pub population: IndicatorTable,
    pub gdp: IndicatorTable,
    pub welfare: IndicatorTable,
    /// Extra violence indicators in discovery order.
    pub extras: Vec<IndicatorTable>,
}

#[derive(Debug)]
pub struct IngestResult {
    pub tables: SourceTables,
    pub sources: Vec<SourceSummary>,
    pub errors: Vec<String>,
}

/// Loads every source. Never fails: broken sources become empty tables.
pub fn ingest(config: &PipelineConfig, domestic_files: &[PathBuf]) -> IngestResult {
    let _span = info_span!("ingest").entered();
    let mut errors = Vec::new();
    let mut sources = Vec::new();

    let (domestic, summary) = ingest_domestic(
        &config.domestic_root,
        domestic_files,
        &config.domestic_options(),
        &mut errors,
    );
    sources.push(summary);

    let (suicide, summary) =
        ingest_suicide(&config.suicide_file, &config.suicide_options(), &mut errors);
    sources.push(summary);

    let wide_options = config.wide_options();
    let (population, summary) = ingest_population(config, &wide_options, &mut errors);
    sources.push(summary);

    let (gdp, summary) = ingest_wide(
        &config.gdp_file,
        IndicatorColumn::measure(GDP_COLUMN),
        &wide_options,
        &mut errors,
    );
    sources.push(summary);

    let (welfare, summary) = ingest_wide(
        &config.welfare_file,
        IndicatorColumn::count(WELFARE_COLUMN),
        &wide_options,
        &mut errors,
    );
    sources.push(summary);

    let mut extras = Vec::new();
    for (table, summary) in ingest_extras(&config.violence_root, &config.extra_options(), &mut errors)
    {
        extras.push(table);
        sources.push(summary);
    }

    info!(
        sources = sources.len(),
        failures = errors.len(),
        "ingest complete"
    );
    IngestResult {
        tables: SourceTables {
            domestic,
            suicide,
            population,
            gdp,
            welfare,
            extras,
        },
        sources,
        errors,
    }
}

fn record_failure(errors: &mut Vec<String>, path: &Path, error: &IngestError) {
    warn!(path = %path.display(), %error, "skipping source file");
    errors.push(format!("{}: {error}", path.display()));
}

/// Loads every domestic-violence file and sums records shared across files.
fn ingest_domestic(
    root: &Path,
    files: &[PathBuf],
    options: &NormalizeOptions,
    errors: &mut Vec<String>,
) -> (Vec<LongRecord>, SourceSummary) {
    let mut summary = SourceSummary::new(DOMESTIC_COLUMN, root);
    summary.files = files.len();
    let mut records = Vec::new();
    for path in files {
        match load_coded_file(path, options) {
            Ok(loaded) => {
                info!(path = %path.display(), rows = loaded.len(), "loaded domestic violence file");
                summary.loaded += 1;
                records.extend(loaded);
            }
            Err(error) => record_failure(errors, path, &error),
        }
    }
    if files.is_empty() {
        warn!(path = %root.display(), "no domestic violence files found");
    }
    let aggregated = aggregate_long(records);
    summary.rows = aggregated.len();
    (aggregated, summary)
}

fn ingest_suicide(
    path: &Path,
    options: &NormalizeOptions,
    errors: &mut Vec<String>,
) -> (Option<Vec<NamedRecord>>, SourceSummary) {
    let mut summary = SourceSummary::new(SUICIDE_COLUMN, path);
    summary.files = 1;
    match load_named_file(path, options) {
        Ok(records) => {
            info!(path = %path.display(), rows = records.len(), "loaded suicide file");
            summary.loaded = 1;
            summary.rows = records.len();
            (Some(records), summary)
        }
        Err(error) => {
            record_failure(errors, path, &error);
            (None, summary)
        }
    }
}

/// Population estimates with the census year filled from the supplement.
fn ingest_population(
    config: &PipelineConfig,
    options: &WideTableOptions,
    errors: &mut Vec<String>,
) -> (IndicatorTable, SourceSummary) {
    let column = IndicatorColumn::count(POPULATION_COLUMN);
    let mut summary = SourceSummary::new(POPULATION_COLUMN, &config.population_file);
    summary.files = 2;

    let main = match read_wide_table(&config.population_file, options) {
        Ok(table) => table,
        Err(error) => {
            record_failure(errors, &config.population_file, &error);
            return (IndicatorTable::empty(column), summary);
        }
    };
    summary.loaded = 1;

    let table = match read_wide_table(&config.population_2010_file, options) {
        Ok(census) => {
            summary.loaded += 1;
            main.with_year_from(&census, CENSUS_YEAR)
        }
        Err(error) => {
            record_failure(errors, &config.population_2010_file, &error);
            main
        }
    };

    let table = IndicatorTable::from_coded(column, &table.into_records());
    info!(rows = table.len(), "loaded population series");
    summary.rows = table.len();
    (table, summary)
}

fn ingest_wide(
    path: &Path,
    column: IndicatorColumn,
    options: &WideTableOptions,
    errors: &mut Vec<String>,
) -> (IndicatorTable, SourceSummary) {
    let mut summary = SourceSummary::new(column.name.clone(), path);
    summary.files = 1;
    match read_wide_table(path, options) {
        Ok(wide) => {
            let table = IndicatorTable::from_coded(column, &wide.into_records());
            info!(path = %path.display(), column = %table.column.name, rows = table.len(), "loaded series");
            summary.loaded = 1;
            summary.rows = table.len();
            (table, summary)
        }
        Err(error) => {
            record_failure(errors, path, &error);
            (IndicatorTable::empty(column), summary)
        }
    }
}

/// One table per file under the extra indicator root, keyed by code only.
fn ingest_extras(
    root: &Path,
    options: &NormalizeOptions,
    errors: &mut Vec<String>,
) -> Vec<(IndicatorTable, SourceSummary)> {
    let sources = match discover_indicator_sources(root) {
        Ok(sources) => sources,
        Err(IngestError::DirectoryNotFound { path }) => {
            warn!(path = %path.display(), "extra indicator directory not found");
            return Vec::new();
        }
        Err(error) => {
            record_failure(errors, root, &error);
            return Vec::new();
        }
    };

    sources
        .into_iter()
        .map(|source| {
            let column = IndicatorColumn::count(source.field.clone());
            let mut summary = SourceSummary::new(source.field.clone(), source.path.clone());
            summary.files = 1;
            let table = match load_coded_file(&source.path, options) {
                Ok(records) => {
                    info!(
                        path = %source.path.display(),
                        column = %source.field,
                        rows = records.len(),
                        "loaded indicator file"
                    );
                    summary.loaded = 1;
                    summary.rows = records.len();
                    IndicatorTable::from_long(column, &records).without_state_names()
                }
                Err(error) => {
                    record_failure(errors, &source.path, &error);
                    IndicatorTable::empty(column)
                }
            };
            (table, summary)
        })
        .collect()
}

// ============================================================================
// Stage 2: Merge
// ============================================================================

/// The fold order: suicide seed, domestic violence by name, then every
/// code-keyed series.
pub fn merge_plan(tables: SourceTables) -> MergePlan {
    let SourceTables {
        domestic,
        suicide,
        population,
        gdp,
        welfare,
        extras,
    } = tables;

    let seed = IndicatorTable::from_named(
        IndicatorColumn::count(SUICIDE_COLUMN),
        suicide.as_deref().unwrap_or_default(),
    );
    let plan = MergePlan::new(seed)
        .then(MergeStep::by_name(IndicatorTable::from_long(
            IndicatorColumn::count(DOMESTIC_COLUMN),
            &domestic,
        )))
        .then(MergeStep::by_code(population))
        .then(MergeStep::by_code(gdp))
        .then(MergeStep::by_code(welfare));
    extras
        .into_iter()
        .fold(plan, |plan, table| plan.then(MergeStep::by_code(table)))
}

pub fn merge(tables: SourceTables) -> Panel {
    let _span = info_span!("merge").entered();
    let plan = merge_plan(tables);
    info!(columns = ?plan.column_names(), "merging indicators");
    let panel = drop_year(plan.run(), DROPPED_YEAR);
    info!(
        rows = panel.len(),
        columns = panel.columns().len(),
        "merge complete"
    );
    panel
}

// ============================================================================
// Stage 3: Output
// ============================================================================

#[derive(Debug)]
pub struct OutputResult {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub preview: PanelPreview,
}

pub fn output(output_dir: &Path, panel: Panel) -> Result<OutputResult> {
    let _span = info_span!("output").entered();
    let panel = sort_panel(panel);
    let preview = PanelPreview::from_panel(&panel, PREVIEW_ROWS);
    let rows = panel.len();
    let columns = preview.headers.len();
    let path = write_panel(&output_dir.join(PANEL_FILE), panel).context("write final panel")?;
    Ok(OutputResult {
        path,
        rows,
        columns,
        preview,
    })
}
