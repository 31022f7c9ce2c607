use crate::error::FormulaFailure;
use report_model::Value;

/// What a formula sees while it evaluates: name resolution against the
/// current data row plus a little environment metadata.
pub trait FormulaContext {
    /// Resolve a field/expression reference. Unknown names read as
    /// [`Value::Null`].
    fn resolve(&self, name: &str) -> Value;

    /// Identifier of the output target, e.g. `table/plain`.
    fn export_descriptor(&self) -> &str;
}

/// A formula compiled once and evaluated many times.
pub trait CompiledFormula: Send {
    fn evaluate(&self, context: &dyn FormulaContext) -> Result<Value, FormulaFailure>;
}

/// The external formula evaluator seam.
///
/// Backends are stateless and shared between duplicated expressions; all
/// per-run state (compile caches, failure caches) lives on the expression
/// side of the bridge.
pub trait FormulaBackend: Send + Sync {
    fn compile(
        &self,
        namespace: &str,
        body: &str,
    ) -> Result<Box<dyn CompiledFormula>, FormulaFailure>;
}
