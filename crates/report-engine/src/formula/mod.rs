//! Bridge to an external formula evaluator.
//!
//! The formula language itself is an opaque collaborator behind
//! [`FormulaBackend`]; this module owns everything around it: formula-head
//! parsing, compile-once caching, failure caching, the per-evaluation
//! [`ReportFormulaContext`], and the fail-fast/fail-soft policy.

mod backend;
mod context;
mod expression;
mod function;
mod head;

pub use backend::{CompiledFormula, FormulaBackend, FormulaContext};
pub use context::ReportFormulaContext;
pub use expression::FormulaExpression;
pub use function::FormulaFunction;
pub use head::FormulaHead;
