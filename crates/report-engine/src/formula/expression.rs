use crate::error::{EngineError, FormulaFailure};
use crate::expression::Expression;
use crate::formula::backend::{CompiledFormula, FormulaBackend};
use crate::formula::context::ReportFormulaContext;
use crate::formula::head::FormulaHead;
use crate::runtime::ExpressionRuntime;
use report_model::config::{LOG_FORMULA_FAILURES, STRICT_ERROR_HANDLING};
use report_model::{Value, ValueError};
use std::cell::RefCell;
use std::sync::Arc;

enum CompileState {
    Pending,
    Ready(Box<dyn CompiledFormula>),
    Failed(ValueError),
}

/// Evaluates an external formula against the current data row.
///
/// The formula compiles once and the compilation is cached; the first
/// failure (compile or evaluate) is cached too, so repeated calls
/// short-circuit to the error sentinel instead of re-attempting a known-bad
/// formula. Under the fail-on-error policy — per-expression override,
/// falling back to the global `report.engine.strict-error-handling` flag —
/// a failure is fatal instead and aborts the report run.
pub struct FormulaExpression {
    name: Option<String>,
    dependency_level: i32,
    formula: String,
    fail_on_error: Option<bool>,
    preserve: bool,
    deep_traversing: bool,
    backend: Arc<dyn FormulaBackend>,
    state: RefCell<CompileState>,
}

impl FormulaExpression {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        backend: Arc<dyn FormulaBackend>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            formula: formula.into(),
            fail_on_error: None,
            preserve: false,
            deep_traversing: false,
            backend,
            state: RefCell::new(CompileState::Pending),
        }
    }

    /// Per-expression fail-on-error override. Unset falls back to the
    /// global configuration flag.
    #[must_use]
    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = Some(fail_on_error);
        self
    }

    /// Keep the last value readable after the declaring scope closes.
    #[must_use]
    pub fn with_preserve(mut self, preserve: bool) -> Self {
        self.preserve = preserve;
        self
    }

    /// Also evaluate against rows reported by sub-reports.
    #[must_use]
    pub fn with_deep_traversing(mut self, deep: bool) -> Self {
        self.deep_traversing = deep;
        self
    }

    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    fn is_strict(&self, runtime: &ExpressionRuntime<'_>) -> bool {
        self.fail_on_error
            .unwrap_or_else(|| runtime.configuration().get_bool(STRICT_ERROR_HANDLING, false))
    }

    fn failed(
        &self,
        runtime: &ExpressionRuntime<'_>,
        failure: FormulaFailure,
        sentinel: ValueError,
    ) -> Result<Value, EngineError> {
        if self.is_strict(runtime) {
            return Err(EngineError::FormulaFailed {
                formula: self.formula.clone(),
                source: failure,
            });
        }
        if runtime
            .configuration()
            .get_bool(LOG_FORMULA_FAILURES, true)
        {
            log::warn!("formula '{}' failed: {failure}", self.formula);
        }
        Ok(Value::Error(sentinel))
    }
}

impl Expression for FormulaExpression {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn is_preserve(&self) -> bool {
        self.preserve
    }

    fn is_deep_traversing(&self) -> bool {
        self.deep_traversing
    }

    fn evaluate(&self, runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        let mut state = self.state.borrow_mut();

        if let CompileState::Pending = &*state {
            let head = FormulaHead::parse(&self.formula);
            match self.backend.compile(head.namespace(), head.body()) {
                Ok(compiled) => *state = CompileState::Ready(compiled),
                Err(failure) => {
                    *state = CompileState::Failed(ValueError::Invalid);
                    drop(state);
                    return self.failed(runtime, failure, ValueError::Invalid);
                }
            }
        }

        let outcome = match &*state {
            CompileState::Ready(compiled) => {
                let context = ReportFormulaContext::new(runtime);
                compiled.evaluate(&context)
            }
            // A cached failure: short-circuit without touching the backend.
            CompileState::Failed(sentinel) => return Ok(Value::Error(*sentinel)),
            CompileState::Pending => return Ok(Value::Error(ValueError::Invalid)),
        };
        drop(state);

        match outcome {
            Ok(value) => Ok(value),
            Err(failure) => {
                *self.state.borrow_mut() = CompileState::Failed(ValueError::Unexpected);
                self.failed(runtime, failure, ValueError::Unexpected)
            }
        }
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Clone for FormulaExpression {
    /// The copy starts with a cold compile cache; the shared backend is
    /// stateless by contract, so sharing it does not couple the copies.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            dependency_level: self.dependency_level,
            formula: self.formula.clone(),
            fail_on_error: self.fail_on_error,
            preserve: self.preserve,
            deep_traversing: self.deep_traversing,
            backend: Arc::clone(&self.backend),
            state: RefCell::new(CompileState::Pending),
        }
    }
}
