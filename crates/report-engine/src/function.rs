use crate::error::EngineError;
use crate::event::ReportEvent;
use crate::expression::Expression;
use crate::runtime::ExpressionRuntime;

/// A stateful expression that reacts to report lifecycle events.
///
/// All lifecycle callbacks funnel through a single entry point dispatching
/// on [`crate::event::ReportEventKind`]; shared accumulation behavior lives
/// in the composable policies of [`crate::policy`] rather than in a base
/// type. Event delivery is strictly ordered and single-threaded; a function
/// never sees two events concurrently.
pub trait Function: Expression {
    /// React to one lifecycle event. The runtime carries the data row the
    /// event was raised against.
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError>;

    /// State-severing copy, like [`Expression::duplicate`] but preserving
    /// the function vtable.
    fn duplicate_function(&self) -> Box<dyn Function>;
}
