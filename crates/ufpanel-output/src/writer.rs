//! CSV writers for the consolidated panel and the intermediate tables.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, SerWriter};
use serde::Serialize;
use tracing::info;
use ufpanel_model::{LongRecord, NamedRecord, Panel};

use crate::error::{OutputError, Result};
use crate::frame::{panel_to_frame, sort_panel};

/// File name of the consolidated panel.
pub const PANEL_FILE: &str = "dados_final.csv";
/// File name of the aggregated domestic-violence table.
pub const DOMESTIC_FILE: &str = "violencia_domestica_consolidada.csv";
/// File name of the cleaned suicide table.
pub const SUICIDE_FILE: &str = "suicidios_tratado.csv";

/// Separator of the consolidated panel.
pub const PANEL_SEPARATOR: u8 = b';';

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Create `dir` and its parents if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_output_dir(parent)?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    ensure_parent_dir(path)?;
    File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the panel sorted by state and year, `;`-separated, UTF-8 with BOM,
/// missing values as empty cells.
pub fn write_panel(path: &Path, panel: Panel) -> Result<PathBuf> {
    let panel = sort_panel(panel);
    let frame_error = |source| OutputError::Frame {
        path: path.to_path_buf(),
        source,
    };
    let mut frame = panel_to_frame(&panel).map_err(frame_error)?;
    let file = create(path)?;
    CsvWriter::new(BufWriter::new(file))
        .include_bom(true)
        .include_header(true)
        .with_separator(PANEL_SEPARATOR)
        .with_null_value(String::new())
        .finish(&mut frame)
        .map_err(frame_error)?;
    info!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "wrote consolidated panel"
    );
    Ok(path.to_path_buf())
}

#[derive(Serialize)]
struct DomesticRow<'a> {
    estado: &'a str,
    cod_uf: u32,
    ano: i32,
    casos: i64,
}

#[derive(Serialize)]
struct SuicideRow<'a> {
    estado: &'a str,
    ano: i32,
    suicidios: i64,
}

/// Writes the aggregated domestic-violence records in the order given.
pub fn write_domestic(path: &Path, records: &[LongRecord]) -> Result<PathBuf> {
    let rows = records.iter().map(|record| DomesticRow {
        estado: &record.estado,
        cod_uf: record.cod_uf,
        ano: record.ano,
        casos: record.value,
    });
    write_records(path, &["estado", "cod_uf", "ano", "casos"], rows)?;
    info!(path = %path.display(), rows = records.len(), "wrote domestic violence table");
    Ok(path.to_path_buf())
}

/// Writes the suicide records sorted by state and year.
pub fn write_suicide(path: &Path, records: &[NamedRecord]) -> Result<PathBuf> {
    let mut sorted: Vec<&NamedRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.estado.cmp(&b.estado).then(a.ano.cmp(&b.ano)));
    let rows = sorted.into_iter().map(|record| SuicideRow {
        estado: &record.estado,
        ano: record.ano,
        suicidios: record.value,
    });
    write_records(path, &["estado", "ano", "suicidios"], rows)?;
    info!(path = %path.display(), rows = records.len(), "wrote suicide table");
    Ok(path.to_path_buf())
}

/// Comma-separated, UTF-8 with BOM. The header is written even when there
/// are no rows.
fn write_records<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<()> {
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut file = BufWriter::new(create(path)?);
    file.write_all(UTF8_BOM).map_err(io_error)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(header).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(io_error)?;
    Ok(())
}
