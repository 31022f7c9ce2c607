use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::function::Function;
use crate::policy::GroupScope;
use crate::runtime::ExpressionRuntime;
use report_model::Value;

/// Counts started instances of a group.
///
/// With a `counted_group` set only that group's starts are counted; without
/// one, every group start counts. The outer scope decides when the counter
/// resets, so "instances of G inside each H" is `with_group("H")` plus
/// `counting("G")`.
#[derive(Debug, Clone)]
pub struct GroupCountFunction {
    name: Option<String>,
    dependency_level: i32,
    scope: GroupScope,
    counted_group: Option<String>,
    count: i64,
}

impl GroupCountFunction {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            scope: GroupScope::whole_report(),
            counted_group: None,
            count: 0,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.scope = GroupScope::group(group);
        self
    }

    #[must_use]
    pub fn counting(mut self, group: impl Into<String>) -> Self {
        self.counted_group = Some(group.into());
        self
    }
}

impl Expression for GroupCountFunction {
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
        Ok(Value::Integer(self.count))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for GroupCountFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        _runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        if self.scope.resets_on(event) {
            self.count = 0;
        }
        if event.kind() == ReportEventKind::GroupStarted {
            let counts = match &self.counted_group {
                Some(group) => event.group() == Some(group.as_str()),
                None => true,
            };
            if counts {
                self.count += 1;
            }
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}
