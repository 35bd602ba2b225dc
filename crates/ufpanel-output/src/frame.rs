//! Conversion of the panel into a typed polars frame.

use std::cmp::Ordering;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use ufpanel_model::{IndicatorColumn, Panel, PanelRow, ValueKind};

/// Name of the state-name column.
pub const STATE_COLUMN: &str = "estado";
/// Name of the year column.
pub const YEAR_COLUMN: &str = "ano";
/// Name of the UF code column.
pub const CODE_COLUMN: &str = "cod_uf";

/// Output column order: `estado, ano, <first indicator>, cod_uf, <others>`.
pub fn column_order(panel: &Panel) -> Vec<String> {
    let mut names = vec![STATE_COLUMN.to_string(), YEAR_COLUMN.to_string()];
    let mut indicators = panel.columns().iter().map(|column| column.name.clone());
    names.extend(indicators.next());
    names.push(CODE_COLUMN.to_string());
    names.extend(indicators);
    names
}

/// Sorts rows by state name then year. Rows without a name go last; ties keep
/// their merge order.
pub fn sort_panel(panel: Panel) -> Panel {
    let (columns, mut rows) = panel.into_parts();
    rows.sort_by(compare_rows);
    Panel::new(columns, rows)
}

fn compare_rows(a: &PanelRow, b: &PanelRow) -> Ordering {
    let by_state = match (&a.identity.estado, &b.identity.estado) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_state.then(a.identity.ano.cmp(&b.identity.ano))
}

/// Builds the output frame. Count indicators become `Int64`, measures
/// `Float64`; missing values are null.
pub fn panel_to_frame(panel: &Panel) -> PolarsResult<DataFrame> {
    let rows = panel.rows();
    let estado: Vec<Option<String>> = rows.iter().map(|row| row.identity.estado.clone()).collect();
    let ano: Vec<i32> = rows.iter().map(|row| row.identity.ano).collect();
    let cod_uf: Vec<Option<u32>> = rows.iter().map(|row| row.identity.cod_uf).collect();

    let mut columns: Vec<Column> = vec![
        Series::new(STATE_COLUMN.into(), estado).into_column(),
        Series::new(YEAR_COLUMN.into(), ano).into_column(),
    ];
    for (idx, indicator) in panel.columns().iter().enumerate() {
        columns.push(indicator_column(indicator, rows, idx));
        if idx == 0 {
            columns.push(Series::new(CODE_COLUMN.into(), cod_uf.clone()).into_column());
        }
    }
    if panel.columns().is_empty() {
        columns.push(Series::new(CODE_COLUMN.into(), cod_uf).into_column());
    }
    DataFrame::new(columns)
}

fn indicator_column(indicator: &IndicatorColumn, rows: &[PanelRow], idx: usize) -> Column {
    let name = indicator.name.as_str().into();
    match indicator.kind {
        ValueKind::Count => {
            let values: Vec<Option<i64>> = rows
                .iter()
                .map(|row| row.value(idx).map(|value| value.round() as i64))
                .collect();
            Series::new(name, values).into_column()
        }
        ValueKind::Measure => {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row.value(idx)).collect();
            Series::new(name, values).into_column()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;
    use ufpanel_model::Identity;

    fn panel() -> Panel {
        Panel::new(
            vec![
                IndicatorColumn::count("suicidios"),
                IndicatorColumn::measure("pib_estado"),
            ],
            vec![
                PanelRow {
                    identity: Identity::coded(13, 2010),
                    values: vec![None, Some(59_779.3)],
                },
                PanelRow {
                    identity: Identity::full("Acre", 12, 2011),
                    values: vec![Some(40.0), None],
                },
                PanelRow {
                    identity: Identity::full("Acre", 12, 2010),
                    values: vec![Some(31.0), Some(8_342.5)],
                },
            ],
        )
    }

    #[test]
    fn columns_follow_output_order() {
        assert_eq!(
            column_order(&panel()),
            vec!["estado", "ano", "suicidios", "cod_uf", "pib_estado"]
        );
        let frame = panel_to_frame(&panel()).unwrap();
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, column_order(&panel()));
    }

    #[test]
    fn kinds_map_to_dtypes() {
        let frame = panel_to_frame(&panel()).unwrap();
        assert_eq!(frame.column("suicidios").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("pib_estado").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("suicidios").unwrap().null_count(), 1);
    }

    #[test]
    fn sort_puts_unnamed_rows_last() {
        let sorted = sort_panel(panel());
        let keys: Vec<(Option<&str>, i32)> = sorted
            .rows()
            .iter()
            .map(|row| (row.identity.estado.as_deref(), row.identity.ano))
            .collect();
        assert_eq!(
            keys,
            vec![(Some("Acre"), 2010), (Some("Acre"), 2011), (None, 2010)]
        );
    }
}
