use crate::indicator::{Identity, IndicatorColumn, IndicatorTable};

/// One state-year of the consolidated panel.
///
/// `values` is aligned with [`Panel::columns`]; `None` means the indicator
/// has no figure for this state-year.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub identity: Identity,
    pub values: Vec<Option<f64>>,
}

impl PanelRow {
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// The consolidated state-year table built by folding indicator tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    columns: Vec<IndicatorColumn>,
    rows: Vec<PanelRow>,
}

impl Panel {
    /// Builds a panel from parts.
    ///
    /// # Panics
    ///
    /// Panics if a row's value count differs from the column count.
    pub fn new(columns: Vec<IndicatorColumn>, rows: Vec<PanelRow>) -> Self {
        for row in &rows {
            assert_eq!(
                row.values.len(),
                columns.len(),
                "panel row is not aligned with its columns"
            );
        }
        Self { columns, rows }
    }

    /// Starts a panel from a single indicator table.
    pub fn from_table(table: IndicatorTable) -> Self {
        let rows = table
            .rows
            .into_iter()
            .map(|observation| PanelRow {
                identity: observation.identity,
                values: vec![observation.value],
            })
            .collect();
        Self {
            columns: vec![table.column],
            rows,
        }
    }

    pub fn columns(&self) -> &[IndicatorColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn into_parts(self) -> (Vec<IndicatorColumn>, Vec<PanelRow>) {
        (self.columns, self.rows)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Value of the named indicator on row `row`.
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        let index = self.column_index(name)?;
        self.rows.get(row)?.value(index)
    }

    /// First row matching `estado` and `ano`.
    pub fn find(&self, estado: &str, ano: i32) -> Option<&PanelRow> {
        self.rows
            .iter()
            .find(|row| row.identity.ano == ano && row.identity.estado.as_deref() == Some(estado))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NamedRecord, ValueKind};

    #[test]
    fn seed_panel_has_one_column() {
        let table = IndicatorTable::from_named(
            IndicatorColumn::count("suicidios"),
            &[NamedRecord::new("Acre", 2010, 31)],
        );
        let panel = Panel::from_table(table);
        assert_eq!(panel.columns().len(), 1);
        assert_eq!(panel.columns()[0].kind, ValueKind::Count);
        assert_eq!(panel.value(0, "suicidios"), Some(31.0));
        assert_eq!(panel.value(0, "populacao"), None);
        assert!(panel.find("Acre", 2010).is_some());
    }

    #[test]
    #[should_panic(expected = "not aligned")]
    fn misaligned_rows_are_rejected() {
        let _ = Panel::new(
            vec![IndicatorColumn::count("a"), IndicatorColumn::count("b")],
            vec![PanelRow {
                identity: Identity::coded(12, 2010),
                values: vec![Some(1.0)],
            }],
        );
    }
}
