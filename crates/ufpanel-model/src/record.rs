/// One year of a coded indicator for one state.
///
/// Produced by the DATASUS-style normalizer, where the region cell carries
/// both the UF code and the state name (`"12 Acre"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LongRecord {
    pub estado: String,
    pub cod_uf: u32,
    pub ano: i32,
    pub value: i64,
}

impl LongRecord {
    pub fn new(estado: impl Into<String>, cod_uf: u32, ano: i32, value: i64) -> Self {
        Self {
            estado: estado.into(),
            cod_uf,
            ano,
            value,
        }
    }
}

/// One year of an indicator keyed by state name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedRecord {
    pub estado: String,
    pub ano: i32,
    pub value: i64,
}

impl NamedRecord {
    pub fn new(estado: impl Into<String>, ano: i32, value: i64) -> Self {
        Self {
            estado: estado.into(),
            ano,
            value,
        }
    }
}

/// One year of a wide-series indicator keyed by UF code only.
///
/// `value` is `None` when the source cell was empty: unlike DATASUS counts,
/// a missing IPEA figure is unknown rather than zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CodedRecord {
    pub cod_uf: u32,
    pub ano: i32,
    pub value: Option<f64>,
}
