use crate::error::EngineError;
use crate::runtime::ExpressionRuntime;
use report_model::Value;

/// A stateless, duplicable unit of computation.
///
/// Expressions read the current data row through the runtime and produce a
/// value on demand. Expected failures (type mismatch, null field, value not
/// comparable) are converted into neutral sentinel values — `Ok` with
/// `Value::Bool(false)`, `Value::Null`, or zero, depending on the
/// expression's semantics. An `Err` is reserved for fatal conditions (see
/// the formula bridge's strict mode) and aborts the report run.
///
/// The runtime is an explicit parameter of every evaluation rather than a
/// bound slot, so an expression can never retain the processor's object
/// graph between passes.
pub trait Expression {
    /// The name under which results are published to the data row. May be
    /// `None` for sub-scoped uses.
    fn name(&self) -> Option<&str>;

    /// Evaluation priority. Higher levels evaluate first; non-negative for
    /// user expressions, negative levels are reserved for system and layout
    /// functions.
    fn dependency_level(&self) -> i32;

    fn set_dependency_level(&mut self, level: i32);

    /// Whether the last value is kept after the expression goes out of
    /// scope. The evaluation driver ignores this flag; the hosting report
    /// processor reads it when a band scope closes and decides whether the
    /// published value survives into enclosing scopes.
    fn is_preserve(&self) -> bool {
        false
    }

    /// Whether this expression receives events raised by sub-reports.
    /// [`LevelledExpressionList::fire`](crate::LevelledExpressionList::fire)
    /// drops deep-traversing events for everyone who did not opt in.
    fn is_deep_traversing(&self) -> bool {
        false
    }

    /// Compute the current value.
    fn evaluate(&self, runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError>;

    /// State-severing copy used once per report execution.
    ///
    /// The copy must share no mutable state with the original: accumulators,
    /// caches, and instance tokens are rebuilt, never aliased. Two report
    /// runs (or a report and its sub-report) each operate on their own
    /// duplicate.
    fn duplicate(&self) -> Box<dyn Expression>;
}
