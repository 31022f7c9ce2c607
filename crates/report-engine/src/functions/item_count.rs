use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::function::Function;
use crate::policy::{CrosstabSlot, GroupScope};
use crate::runtime::ExpressionRuntime;
use crate::sequence::Sequence;
use report_model::Value;

/// Counts the rows seen since the scope last reset.
#[derive(Debug, Clone)]
pub struct ItemCountFunction {
    name: Option<String>,
    dependency_level: i32,
    scope: GroupScope,
    crosstab: CrosstabSlot,
    deep_traversing: bool,
    count: Sequence<i64>,
    slot: usize,
}

impl ItemCountFunction {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            scope: GroupScope::whole_report(),
            crosstab: CrosstabSlot::none(),
            deep_traversing: false,
            count: Sequence::new(),
            slot: 0,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.scope = GroupScope::group(group);
        self
    }

    #[must_use]
    pub fn with_crosstab_filter_group(mut self, group: impl Into<String>) -> Self {
        self.crosstab = CrosstabSlot::filter_group(group);
        self
    }

    /// Also count rows reported by sub-reports.
    #[must_use]
    pub fn with_deep_traversing(mut self, deep: bool) -> Self {
        self.deep_traversing = deep;
        self
    }
}

impl Expression for ItemCountFunction {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn is_deep_traversing(&self) -> bool {
        self.deep_traversing
    }

    fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        Ok(Value::Integer(
            self.count.get(self.slot).copied().unwrap_or(0),
        ))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for ItemCountFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        _runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        if let Some(slot) = self.crosstab.slot_for(event) {
            self.slot = slot;
        }
        if self.scope.resets_on(event) {
            match event.kind() {
                ReportEventKind::ReportInitialized => {
                    self.count.clear();
                    self.slot = 0;
                }
                _ => self.count.reset(self.slot),
            }
        }
        if event.kind() == ReportEventKind::ItemsAdvanced {
            let next = self.count.get(self.slot).copied().unwrap_or(0) + 1;
            self.count.set(self.slot, next);
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}
