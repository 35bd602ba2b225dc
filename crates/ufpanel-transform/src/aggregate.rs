//! Deduplication of long records reported across several files.

use std::collections::BTreeMap;

use ufpanel_model::LongRecord;

/// Sums values per `(estado, cod_uf, ano)`.
///
/// The result holds one record per key, sorted by `(cod_uf, ano)` and then
/// `estado`.
pub fn aggregate_long(records: impl IntoIterator<Item = LongRecord>) -> Vec<LongRecord> {
    let mut totals: BTreeMap<(u32, i32, String), i64> = BTreeMap::new();
    for record in records {
        *totals
            .entry((record.cod_uf, record.ano, record.estado))
            .or_insert(0) += record.value;
    }
    totals
        .into_iter()
        .map(|((cod_uf, ano, estado), value)| LongRecord {
            estado,
            cod_uf,
            ano,
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_repeated_state_years() {
        let records = vec![
            LongRecord::new("Acre", 12, 2010, 5),
            LongRecord::new("Acre", 12, 2010, 3),
        ];
        assert_eq!(
            aggregate_long(records),
            vec![LongRecord::new("Acre", 12, 2010, 8)]
        );
    }

    #[test]
    fn sorts_by_code_then_year() {
        let records = vec![
            LongRecord::new("Amazonas", 13, 2010, 1),
            LongRecord::new("Acre", 12, 2011, 2),
            LongRecord::new("Acre", 12, 2010, 3),
            LongRecord::new("Rondônia", 11, 2011, 4),
        ];
        let keys: Vec<(u32, i32)> = aggregate_long(records)
            .iter()
            .map(|r| (r.cod_uf, r.ano))
            .collect();
        assert_eq!(keys, vec![(11, 2011), (12, 2010), (12, 2011), (13, 2010)]);
    }

    #[test]
    fn different_names_for_same_code_stay_apart() {
        let records = vec![
            LongRecord::new("Acre", 12, 2010, 1),
            LongRecord::new("ACRE", 12, 2010, 1),
        ];
        assert_eq!(aggregate_long(records).len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(aggregate_long(Vec::new()).is_empty());
    }
}
