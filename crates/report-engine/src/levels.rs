//! Enforcement of the dependency-level scheduler contract.
//!
//! Expressions declare an integer dependency level; correctness requires
//! the driver to evaluate strictly in descending-level order across all
//! expressions and functions of a report, so a function at level N reads
//! already-updated values of every function above it through the data row.
//! [`LevelledExpressionList`] is that driver's inner loop: the report
//! processor hands it each lifecycle event once, and it dispatches events
//! and refreshes values level by level.

use crate::collection::{ExpressionCollection, ExpressionEntry};
use crate::error::EngineError;
use crate::event::ReportEvent;
use crate::runtime::{ExpressionRuntime, ProcessingContext};
use ahash::AHashMap;
use report_model::{DataRow, ReportConfiguration, Value};

/// Data row view layered over the processor's row: expression results shadow
/// base fields of the same name.
///
/// While an event is delivered to an entry, `own` holds that entry's index
/// and its published name resolves to the base row instead. A function may
/// then carry the same name as the field it accumulates without reading its
/// own stale value back.
struct LevelRow<'a> {
    base: &'a dyn DataRow,
    by_name: &'a AHashMap<String, usize>,
    values: &'a [Value],
    own: Option<usize>,
}

impl DataRow for LevelRow<'_> {
    fn get(&self, name: &str) -> Value {
        match self.by_name.get(name) {
            Some(&idx) if self.own != Some(idx) => self.values[idx].clone(),
            _ => self.base.get(name),
        }
    }

    fn is_changed(&self, name: &str) -> bool {
        self.base.is_changed(name)
    }
}

/// Evaluation-ordered view over a (duplicated) expression collection.
pub struct LevelledExpressionList {
    entries: Vec<ExpressionEntry>,
    by_name: AHashMap<String, usize>,
    /// Entry indices grouped by dependency level, levels strictly
    /// descending, declaration order preserved within a level.
    level_groups: Vec<Vec<usize>>,
    values: Vec<Value>,
}

impl LevelledExpressionList {
    /// Consume a collection (usually a fresh [`ExpressionCollection::duplicate`])
    /// and index it by dependency level.
    #[must_use]
    pub fn new(collection: ExpressionCollection) -> Self {
        let entries = collection.into_entries();

        let mut by_name = AHashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            if let Some(name) = entry.as_expression().name() {
                by_name.insert(name.to_string(), idx);
            }
        }

        let mut levels: Vec<i32> = entries
            .iter()
            .map(|e| e.as_expression().dependency_level())
            .collect();
        levels.sort_unstable_by(|a, b| b.cmp(a));
        levels.dedup();

        let level_groups = levels
            .iter()
            .map(|&level| {
                entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.as_expression().dependency_level() == level)
                    .map(|(idx, _)| idx)
                    .collect()
            })
            .collect();

        let values = vec![Value::Null; entries.len()];
        Self {
            entries,
            by_name,
            level_groups,
            values,
        }
    }

    /// The distinct dependency levels, descending.
    #[must_use]
    pub fn levels(&self) -> Vec<i32> {
        self.level_groups
            .iter()
            .filter_map(|group| group.first())
            .map(|&idx| self.entries[idx].as_expression().dependency_level())
            .collect()
    }

    /// Dispatch one lifecycle event and refresh all values.
    ///
    /// Per level (descending): deliver the event to every function of the
    /// level, then re-evaluate every entry of the level, committing each
    /// value before the next entry runs. Deep-traversing events are only
    /// delivered to functions that opted in.
    pub fn fire(
        &mut self,
        event: &ReportEvent<'_>,
        base_row: &dyn DataRow,
        configuration: &ReportConfiguration,
        context: &ProcessingContext,
    ) -> Result<(), EngineError> {
        for group_no in 0..self.level_groups.len() {
            for slot in 0..self.level_groups[group_no].len() {
                let idx = self.level_groups[group_no][slot];

                {
                    let row = LevelRow {
                        base: base_row,
                        by_name: &self.by_name,
                        values: &self.values,
                        own: Some(idx),
                    };
                    let runtime = ExpressionRuntime::new(&row, configuration, context);
                    if let Some(function) = self.entries[idx].as_function_mut() {
                        if !event.is_deep_traversing() || function.is_deep_traversing() {
                            function.report_event(event, &runtime)?;
                        }
                    }
                }
            }

            for slot in 0..self.level_groups[group_no].len() {
                let idx = self.level_groups[group_no][slot];
                let value = {
                    let row = LevelRow {
                        base: base_row,
                        by_name: &self.by_name,
                        values: &self.values,
                        own: None,
                    };
                    let runtime = ExpressionRuntime::new(&row, configuration, context);
                    self.entries[idx].as_expression().evaluate(&runtime)?
                };
                self.values[idx] = value;
            }
        }
        Ok(())
    }

    /// Current value of the named expression, as the data row publishes it.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Value {
        match self.by_name.get(name) {
            Some(&idx) => self.values[idx].clone(),
            None => Value::Null,
        }
    }

    /// A [`DataRow`] view over the processor row plus current expression
    /// values, for evaluating loose expressions against this list's state.
    #[must_use]
    pub fn data_row<'a>(&'a self, base: &'a dyn DataRow) -> impl DataRow + 'a {
        LevelRow {
            base,
            by_name: &self.by_name,
            values: &self.values,
            own: None,
        }
    }
}
