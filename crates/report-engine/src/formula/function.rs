use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::formula::backend::FormulaBackend;
use crate::formula::expression::FormulaExpression;
use crate::function::Function;
use crate::runtime::ExpressionRuntime;
use report_model::Value;
use std::cell::Cell;
use std::sync::Arc;

/// A formula with an optional one-time "initial" formula.
///
/// The initial formula is evaluated exactly once: on the first value request
/// after `ReportInitialized` cleared the flag. Every later request (until
/// the next report initialization) evaluates the main formula. Both share
/// the caching and fail-on-error behavior of [`FormulaExpression`].
pub struct FormulaFunction {
    main: FormulaExpression,
    initial: Option<FormulaExpression>,
    initialized: Cell<bool>,
}

impl FormulaFunction {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        backend: Arc<dyn FormulaBackend>,
    ) -> Self {
        Self {
            main: FormulaExpression::new(name, formula, backend),
            initial: None,
            initialized: Cell::new(false),
        }
    }

    #[must_use]
    pub fn with_initial(mut self, formula: impl Into<String>, backend: Arc<dyn FormulaBackend>) -> Self {
        // The initial formula publishes no value of its own; reuse the main
        // name so failures are attributed to this function.
        let name = self.main.name().unwrap_or("<unnamed>").to_string();
        self.initial = Some(FormulaExpression::new(name, formula, backend));
        self
    }

    #[must_use]
    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.main = self.main.with_fail_on_error(fail_on_error);
        if let Some(initial) = self.initial.take() {
            self.initial = Some(initial.with_fail_on_error(fail_on_error));
        }
        self
    }

    /// Keep the last value readable after the declaring scope closes.
    #[must_use]
    pub fn with_preserve(mut self, preserve: bool) -> Self {
        self.main = self.main.with_preserve(preserve);
        self
    }

    /// Also receive and evaluate events from sub-reports.
    #[must_use]
    pub fn with_deep_traversing(mut self, deep: bool) -> Self {
        self.main = self.main.with_deep_traversing(deep);
        self
    }
}

impl Expression for FormulaFunction {
    fn name(&self) -> Option<&str> {
        self.main.name()
    }

    fn dependency_level(&self) -> i32 {
        self.main.dependency_level()
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.main.set_dependency_level(level);
    }

    fn is_preserve(&self) -> bool {
        self.main.is_preserve()
    }

    fn is_deep_traversing(&self) -> bool {
        self.main.is_deep_traversing()
    }

    fn evaluate(&self, runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        if !self.initialized.get() {
            self.initialized.set(true);
            if let Some(initial) = &self.initial {
                return initial.evaluate(runtime);
            }
        }
        self.main.evaluate(runtime)
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for FormulaFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        _runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        if event.kind() == ReportEventKind::ReportInitialized {
            self.initialized.set(false);
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}

impl Clone for FormulaFunction {
    fn clone(&self) -> Self {
        Self {
            main: self.main.clone(),
            initial: self.initial.clone(),
            initialized: Cell::new(false),
        }
    }
}
