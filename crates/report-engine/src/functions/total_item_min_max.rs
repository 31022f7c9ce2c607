use crate::error::EngineError;
use crate::event::ReportEvent;
use crate::expression::Expression;
use crate::function::Function;
use crate::functions::total_support::TotalState;
use crate::policy::{CrosstabSlot, GroupScope};
use crate::runtime::ExpressionRuntime;
use report_model::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Min,
    Max,
}

/// Precomputed extremum per scope instance, recalled during the output run
/// so group headers can show their group's minimum/maximum up front.
#[derive(Debug, Clone)]
struct TotalExtremum {
    name: Option<String>,
    dependency_level: i32,
    field: String,
    kind: Extremum,
    state: TotalState<Value>,
}

impl TotalExtremum {
    fn handle(
        &mut self,
        event: &ReportEvent<'_>,
        runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        self.state.observe(event, self.dependency_level)?;
        if !self.state.should_accumulate(event, self.dependency_level) {
            return Ok(());
        }
        let candidate = runtime.data_row().get(&self.field);
        if candidate.is_null() || candidate.is_error() {
            return Ok(());
        }
        let keep = match self.state.current_value() {
            None => true,
            Some(current) => match candidate.report_cmp(current) {
                Some(Ordering::Less) => self.kind == Extremum::Min,
                Some(Ordering::Greater) => self.kind == Extremum::Max,
                Some(Ordering::Equal) => false,
                None => {
                    log::error!(
                        "total extremum '{}': field '{}' produced a value not comparable \
                         to the running result, row skipped",
                        self.name.as_deref().unwrap_or("<unnamed>"),
                        self.field
                    );
                    false
                }
            },
        };
        if keep {
            self.state.update(candidate);
        }
        Ok(())
    }
}

macro_rules! total_extremum_function {
    ($name:ident, $kind:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name {
            inner: TotalExtremum,
        }

        impl $name {
            #[must_use]
            pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
                Self {
                    inner: TotalExtremum {
                        name: Some(name.into()),
                        dependency_level: 0,
                        field: field.into(),
                        kind: $kind,
                        state: TotalState::new(GroupScope::whole_report(), CrosstabSlot::none()),
                    },
                }
            }

            #[must_use]
            pub fn with_group(mut self, group: impl Into<String>) -> Self {
                self.inner.state =
                    TotalState::new(GroupScope::group(group), CrosstabSlot::none());
                self
            }

            #[must_use]
            pub fn with_crosstab_filter_group(mut self, group: impl Into<String>) -> Self {
                let scope = self.inner.state.scope().clone();
                self.inner.state = TotalState::new(scope, CrosstabSlot::filter_group(group));
                self
            }
        }

        impl Expression for $name {
            fn name(&self) -> Option<&str> {
                self.inner.name.as_deref()
            }

            fn dependency_level(&self) -> i32 {
                self.inner.dependency_level
            }

            fn set_dependency_level(&mut self, level: i32) {
                self.inner.dependency_level = level;
            }

            fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
                Ok(self
                    .inner
                    .state
                    .current_value()
                    .cloned()
                    .unwrap_or(Value::Null))
            }

            fn duplicate(&self) -> Box<dyn Expression> {
                Box::new(self.clone())
            }
        }

        impl Function for $name {
            fn report_event(
                &mut self,
                event: &ReportEvent<'_>,
                runtime: &ExpressionRuntime<'_>,
            ) -> Result<(), EngineError> {
                self.inner.handle(event, runtime)
            }

            fn duplicate_function(&self) -> Box<dyn Function> {
                Box::new(self.clone())
            }
        }
    };
}

total_extremum_function!(
    TotalItemMinFunction,
    Extremum::Min,
    "Precomputed smallest comparable field value per scope instance."
);
total_extremum_function!(
    TotalItemMaxFunction,
    Extremum::Max,
    "Precomputed largest comparable field value per scope instance."
);
