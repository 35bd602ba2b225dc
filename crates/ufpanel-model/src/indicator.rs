use crate::record::{CodedRecord, LongRecord, NamedRecord};

/// How an indicator's values are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Whole-number counts (cases, residents, beneficiaries).
    Count,
    /// Decimal measures (GDP).
    Measure,
}

/// Name and kind of one indicator column in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndicatorColumn {
    pub name: String,
    pub kind: ValueKind,
}

impl IndicatorColumn {
    pub fn count(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ValueKind::Count,
        }
    }

    pub fn measure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ValueKind::Measure,
        }
    }
}

/// Whatever is known about the state-year a value belongs to.
///
/// Sources identify states differently, so both the name and the code are
/// optional; only the year is always present.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity {
    pub estado: Option<String>,
    pub cod_uf: Option<u32>,
    pub ano: i32,
}

impl Identity {
    pub fn named(estado: impl Into<String>, ano: i32) -> Self {
        Self {
            estado: Some(estado.into()),
            cod_uf: None,
            ano,
        }
    }

    pub fn coded(cod_uf: u32, ano: i32) -> Self {
        Self {
            estado: None,
            cod_uf: Some(cod_uf),
            ano,
        }
    }

    pub fn full(estado: impl Into<String>, cod_uf: u32, ano: i32) -> Self {
        Self {
            estado: Some(estado.into()),
            cod_uf: Some(cod_uf),
            ano,
        }
    }

    /// Fills fields missing on `self` from `other`. Present fields win.
    #[must_use]
    pub fn coalesce(mut self, other: &Identity) -> Self {
        if self.estado.is_none() {
            self.estado.clone_from(&other.estado);
        }
        if self.cod_uf.is_none() {
            self.cod_uf = other.cod_uf;
        }
        self
    }
}

/// A single indicator value attached to a state-year.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub identity: Identity,
    pub value: Option<f64>,
}

/// One normalized source, ready to be joined into the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub column: IndicatorColumn,
    pub rows: Vec<Observation>,
}

impl IndicatorTable {
    /// A table with no rows. Used for sources that failed to load so the
    /// column still shows up in the output.
    pub fn empty(column: IndicatorColumn) -> Self {
        Self {
            column,
            rows: Vec::new(),
        }
    }

    pub fn from_long(column: IndicatorColumn, records: &[LongRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| Observation {
                identity: Identity::full(record.estado.clone(), record.cod_uf, record.ano),
                value: Some(record.value as f64),
            })
            .collect();
        Self { column, rows }
    }

    pub fn from_named(column: IndicatorColumn, records: &[NamedRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| Observation {
                identity: Identity::named(record.estado.clone(), record.ano),
                value: Some(record.value as f64),
            })
            .collect();
        Self { column, rows }
    }

    pub fn from_coded(column: IndicatorColumn, records: &[CodedRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| Observation {
                identity: Identity::coded(record.cod_uf, record.ano),
                value: record.value,
            })
            .collect();
        Self { column, rows }
    }

    /// Drops state names so only the UF code and year identify each row.
    #[must_use]
    pub fn without_state_names(mut self) -> Self {
        for row in &mut self.rows {
            row.identity.estado = None;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
