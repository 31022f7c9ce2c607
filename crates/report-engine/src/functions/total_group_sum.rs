use crate::error::EngineError;
use crate::event::ReportEvent;
use crate::expression::Expression;
use crate::function::Function;
use crate::functions::total_support::TotalState;
use crate::policy::{CrosstabSlot, GroupScope};
use crate::runtime::ExpressionRuntime;
use report_model::Value;
use rust_decimal::Decimal;

/// Precomputed group/report total of a numeric field.
///
/// During the prepare run this accumulates exactly like
/// [`crate::functions::ItemSumFunction`] while recording each scope
/// instance's final sequence per process key; the output run recalls those
/// results, so the total is already available in the group header and is
/// identical in the footer.
#[derive(Debug, Clone)]
pub struct TotalGroupSumFunction {
    name: Option<String>,
    dependency_level: i32,
    field: String,
    state: TotalState<Decimal>,
}

impl TotalGroupSumFunction {
    #[must_use]
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            field: field.into(),
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

impl Expression for TotalGroupSumFunction {
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
        let total = self.state.current_value().copied().unwrap_or(Decimal::ZERO);
        Ok(Value::Decimal(total))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for TotalGroupSumFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        self.state.observe(event, self.dependency_level)?;
        if self.state.should_accumulate(event, self.dependency_level) {
            let value = runtime.data_row().get(&self.field);
            if value.is_numeric() {
                match value.as_decimal() {
                    Some(d) => {
                        let total = self.state.current_value().copied().unwrap_or(Decimal::ZERO);
                        self.state.update(total + d);
                    }
                    None => {
                        log::error!(
                            "total group sum '{}': field '{}' is numeric but not representable, \
                             row skipped",
                            self.name.as_deref().unwrap_or("<unnamed>"),
                            self.field
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}
