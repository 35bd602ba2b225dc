//! The cross-indicator merge fold.
//!
//! A [`MergePlan`] starts from a seed table and joins one indicator table per
//! step, each step producing a new [`Panel`]. Column order in the result is the
//! fold order.

use tracing::{debug, info};
use ufpanel_model::{IndicatorTable, Panel};

use crate::join::{JoinKey, outer_join};

/// One fold step: the table to join and the key that pairs its rows.
#[derive(Debug, Clone)]
pub struct MergeStep {
    pub table: IndicatorTable,
    pub key: JoinKey,
}

impl MergeStep {
    pub fn by_name(table: IndicatorTable) -> Self {
        Self {
            table,
            key: JoinKey::StateName,
        }
    }

    pub fn by_code(table: IndicatorTable) -> Self {
        Self {
            table,
            key: JoinKey::StateCode,
        }
    }
}

/// Ordered list of merge steps applied to a seed table.
#[derive(Debug, Clone)]
pub struct MergePlan {
    seed: IndicatorTable,
    steps: Vec<MergeStep>,
}

impl MergePlan {
    pub fn new(seed: IndicatorTable) -> Self {
        Self {
            seed,
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn then(mut self, step: MergeStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Column names in output order.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(self.seed.column.name.as_str())
            .chain(self.steps.iter().map(|step| step.table.column.name.as_str()))
            .collect()
    }

    pub fn run(self) -> Panel {
        merge_panel(self.seed, self.steps)
    }
}

/// Folds `steps` into a panel seeded with `seed`.
pub fn merge_panel(seed: IndicatorTable, steps: impl IntoIterator<Item = MergeStep>) -> Panel {
    let panel = Panel::from_table(seed);
    steps.into_iter().fold(panel, join_step)
}

/// Applies a single step.
///
/// A column whose name is already in the panel is renamed with a numeric
/// suffix, so names stay unique.
pub fn join_step(panel: Panel, step: MergeStep) -> Panel {
    let MergeStep { mut table, key } = step;
    let name = unique_column_name(&panel, &table.column.name);
    if name != table.column.name {
        debug!(from = %table.column.name, to = %name, "renamed clashing column");
        table.column.name.clone_from(&name);
    }
    let incoming = table.len();
    let before = panel.len();

    let joined = outer_join(panel, table, |identity| key.key_of(identity));

    info!(
        column = %name,
        key = ?key,
        incoming,
        before,
        after = joined.len(),
        "merged indicator"
    );
    joined
}

/// Removes every row of `year`.
pub fn drop_year(panel: Panel, year: i32) -> Panel {
    let (columns, rows) = panel.into_parts();
    let before = rows.len();
    let rows: Vec<_> = rows
        .into_iter()
        .filter(|row| row.identity.ano != year)
        .collect();
    debug!(year, dropped = before - rows.len(), "dropped year from panel");
    Panel::new(columns, rows)
}

fn unique_column_name(panel: &Panel, name: &str) -> String {
    if panel.column_index(name).is_none() {
        return name.to_string();
    }
    (2..)
        .map(|n| format!("{name}-{n}"))
        .find(|candidate| panel.column_index(candidate).is_none())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ufpanel_model::{IndicatorColumn, LongRecord, NamedRecord};

    fn seed() -> IndicatorTable {
        IndicatorTable::from_named(
            IndicatorColumn::count("suicidios"),
            &[
                NamedRecord::new("Acre", 2010, 31),
                NamedRecord::new("Acre", 2015, 33),
            ],
        )
    }

    #[test]
    fn plan_lists_columns_in_fold_order() {
        let plan = MergePlan::new(seed())
            .then(MergeStep::by_name(IndicatorTable::empty(
                IndicatorColumn::count("violencia_domestica"),
            )))
            .then(MergeStep::by_code(IndicatorTable::empty(
                IndicatorColumn::count("populacao"),
            )));
        assert_eq!(
            plan.column_names(),
            vec!["suicidios", "violencia_domestica", "populacao"]
        );
        let panel = plan.run();
        assert_eq!(panel.columns().len(), 3);
        assert_eq!(panel.len(), 2);
    }

    #[test]
    fn clashing_column_gets_suffix() {
        let panel = merge_panel(
            seed(),
            [MergeStep::by_code(IndicatorTable::empty(
                IndicatorColumn::count("suicidios"),
            ))],
        );
        let names: Vec<_> = panel.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["suicidios", "suicidios-2"]);
    }

    #[test]
    fn drop_year_removes_only_that_year() {
        let panel = merge_panel(
            seed(),
            [MergeStep::by_name(IndicatorTable::from_long(
                IndicatorColumn::count("violencia_domestica"),
                &[LongRecord::new("Acre", 12, 2015, 4)],
            ))],
        );
        assert_eq!(panel.len(), 2);
        let panel = drop_year(panel, 2015);
        assert_eq!(panel.len(), 1);
        assert_eq!(panel.rows()[0].identity.ano, 2010);
    }
}
