use crate::formula::backend::FormulaContext;
use crate::runtime::ExpressionRuntime;
use report_model::Value;

/// [`FormulaContext`] bound to the current runtime for exactly one
/// evaluation.
///
/// Constructed in the evaluation scope and dropped on every exit path with
/// it — the borrow makes it impossible for a formula context to outlive the
/// runtime it resolves against.
pub struct ReportFormulaContext<'a, 'r> {
    runtime: &'a ExpressionRuntime<'r>,
}

impl<'a, 'r> ReportFormulaContext<'a, 'r> {
    #[must_use]
    pub fn new(runtime: &'a ExpressionRuntime<'r>) -> Self {
        Self { runtime }
    }
}

impl FormulaContext for ReportFormulaContext<'_, '_> {
    fn resolve(&self, name: &str) -> Value {
        self.runtime.data_row().get(name)
    }

    fn export_descriptor(&self) -> &str {
        self.runtime.context().export_descriptor()
    }
}
