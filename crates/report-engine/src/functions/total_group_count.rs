use crate::error::EngineError;
use crate::event::ReportEvent;
use crate::expression::Expression;
use crate::function::Function;
use crate::functions::total_support::TotalState;
use crate::policy::{CrosstabSlot, GroupScope};
use crate::runtime::ExpressionRuntime;
use report_model::Value;

/// Precomputed row count per scope instance, recalled in the output run.
#[derive(Debug, Clone)]
pub struct TotalGroupCountFunction {
    name: Option<String>,
    dependency_level: i32,
    state: TotalState<i64>,
}

impl TotalGroupCountFunction {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            state: TotalState::new(GroupScope::whole_report(), CrosstabSlot::none()),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.state = TotalState::new(GroupScope::group(group), CrosstabSlot::none());
        self
    }

    #[must_use]
    pub fn with_crosstab_filter_group(mut self, group: impl Into<String>) -> Self {
        let scope = self.state.scope().clone();
        self.state = TotalState::new(scope, CrosstabSlot::filter_group(group));
        self
    }
}

impl Expression for TotalGroupCountFunction {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        Ok(Value::Integer(
            self.state.current_value().copied().unwrap_or(0),
        ))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for TotalGroupCountFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        _runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        self.state.observe(event, self.dependency_level)?;
        if self.state.should_accumulate(event, self.dependency_level) {
            let count = self.state.current_value().copied().unwrap_or(0);
            self.state.update(count + 1);
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}
