//! Shared test harness: an in-memory data row and a scriptable report
//! state, standing in for the (external) report processor.
#![allow(dead_code)]

use report_model::{DataRow, ReportState, ReportStateKey, Value};
use std::collections::HashMap;

pub struct TestRow {
    values: HashMap<String, Value>,
}

impl TestRow {
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn of(entries: &[(&str, Value)]) -> Self {
        Self {
            values: entries
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }
}

impl DataRow for TestRow {
    fn get(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::Null)
    }

    fn is_changed(&self, _name: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct SimState {
    pub prepare: bool,
    pub level: i32,
    pub group_index: usize,
    pub crosstab_seq: usize,
    pub key: ReportStateKey,
    pub page: usize,
}

impl SimState {
    pub fn prepare(level: i32) -> Self {
        Self {
            prepare: true,
            level,
            group_index: 0,
            crosstab_seq: 0,
            key: ReportStateKey::new(0, 0),
            page: 0,
        }
    }

    pub fn output(level: i32) -> Self {
        Self {
            prepare: false,
            ..Self::prepare(level)
        }
    }

    pub fn at(mut self, position: u64) -> Self {
        self.key = ReportStateKey::new(position, 0);
        self
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

impl ReportState for SimState {
    fn is_prepare_run(&self) -> bool {
        self.prepare
    }

    fn level(&self) -> i32 {
        self.level
    }

    fn current_group_index(&self) -> usize {
        self.group_index
    }

    fn crosstab_column_sequence(&self, _group_index: usize) -> usize {
        self.crosstab_seq
    }

    fn process_key(&self) -> ReportStateKey {
        self.key
    }

    fn page_index(&self) -> usize {
        self.page
    }
}
