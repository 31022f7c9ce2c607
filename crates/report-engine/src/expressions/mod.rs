//! Stateless leaf expressions: best-effort computations whose expected
//! failures collapse into neutral values instead of errors.

mod compare;
mod is_empty;
mod percentage;

pub use compare::{CompareOp, FieldCompareExpression};
pub use is_empty::FieldIsEmptyExpression;
pub use percentage::PercentageExpression;
