//! Full outer join of an indicator table into the panel.

use std::collections::BTreeMap;

use ufpanel_model::{Identity, IndicatorTable, Panel, PanelRow};

/// Which identity fields pair rows across tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKey {
    /// `(estado, ano)`, for sources that only carry state names.
    StateName,
    /// `(cod_uf, ano)`, once a UF code is available.
    StateCode,
}

/// Extracted key value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyValue {
    Name(String, i32),
    Code(u32, i32),
}

impl JoinKey {
    /// Key of `identity`, or `None` if the field this key needs is absent.
    pub fn key_of(self, identity: &Identity) -> Option<KeyValue> {
        match self {
            Self::StateName => identity
                .estado
                .clone()
                .map(|estado| KeyValue::Name(estado, identity.ano)),
            Self::StateCode => identity
                .cod_uf
                .map(|cod_uf| KeyValue::Code(cod_uf, identity.ano)),
        }
    }
}

/// Joins `table` into `panel` as a new rightmost column.
///
/// Every row of either side survives. A panel row without a match gets an
/// empty cell for the new column; a table row without a match becomes a new
/// row with empty cells for every earlier column. Rows whose key is `None`
/// never match. Matched identities are coalesced, the panel side winning.
/// A key repeated in `table` yields one output row per repetition.
pub fn outer_join<K, F>(panel: Panel, table: IndicatorTable, key_fn: F) -> Panel
where
    K: Ord,
    F: Fn(&Identity) -> Option<K>,
{
    let (mut columns, left_rows) = panel.into_parts();
    let width = columns.len();

    let mut index: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (idx, observation) in table.rows.iter().enumerate() {
        if let Some(key) = key_fn(&observation.identity) {
            index.entry(key).or_default().push(idx);
        }
    }

    let mut matched = vec![false; table.rows.len()];
    let mut rows = Vec::with_capacity(left_rows.len() + table.rows.len());

    for row in left_rows {
        let hits = key_fn(&row.identity).and_then(|key| index.get(&key));
        match hits {
            Some(hits) => {
                for &idx in hits {
                    matched[idx] = true;
                    let observation = &table.rows[idx];
                    let mut values = row.values.clone();
                    values.push(observation.value);
                    rows.push(PanelRow {
                        identity: row.identity.clone().coalesce(&observation.identity),
                        values,
                    });
                }
            }
            None => {
                let PanelRow {
                    identity,
                    mut values,
                } = row;
                values.push(None);
                rows.push(PanelRow { identity, values });
            }
        }
    }

    for (observation, was_matched) in table.rows.into_iter().zip(matched) {
        if was_matched {
            continue;
        }
        let mut values = vec![None; width];
        values.push(observation.value);
        rows.push(PanelRow {
            identity: observation.identity,
            values,
        });
    }

    columns.push(table.column);
    Panel::new(columns, rows)
}
