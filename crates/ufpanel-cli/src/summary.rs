use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ufpanel_cli::types::{RunResult, SourceSummary};

pub fn print_summary(result: &RunResult) {
    println!("Output: {}", result.output_dir.display());
    println!("Panel: {}", result.panel_file.display());
    for path in &result.intermediate_files {
        println!("Intermediate: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Source"),
        header_cell("Files"),
        header_cell("Rows"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for source in &result.sources {
        table.add_row(vec![
            Cell::new(&source.column),
            dim_cell(source.path.display()),
            files_cell(source),
            Cell::new(source.rows),
        ]);
    }
    table.add_row(vec![
        Cell::new("PANEL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} columns", result.panel_columns))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(result.panel_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_preview(result);

    if result.has_errors() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_preview(result: &RunResult) {
    if result.preview.rows.is_empty() {
        println!("Panel is empty.");
        return;
    }
    let mut table = Table::new();
    table.set_header(
        result
            .preview
            .headers
            .iter()
            .map(|header| header_cell(header))
            .collect::<Vec<_>>(),
    );
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for idx in 1..result.preview.headers.len() {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    for row in &result.preview.rows {
        table.add_row(row.iter().map(|value| preview_cell(value)).collect::<Vec<_>>());
    }
    println!("First {} rows:", result.preview.rows.len());
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn files_cell(source: &SourceSummary) -> Cell {
    let cell = Cell::new(format!("{}/{}", source.loaded, source.files));
    if source.loaded < source.files {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}

fn preview_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
