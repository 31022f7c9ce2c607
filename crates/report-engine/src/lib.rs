#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Dependency-ordered expression and function evaluation for banded reports.
//!
//! A report processor drives a strictly ordered stream of lifecycle events
//! ([`event::ReportEvent`]) through a collection of stateless
//! [`Expression`]s and stateful [`Function`]s. Functions accumulate values
//! (sums, counts, extrema, page counters) across events; expressions compute
//! on demand from the current [`report_model::DataRow`].
//!
//! Three contracts make the results correct:
//!
//! - **Dependency ordering** — every expression carries an integer
//!   dependency level, and [`levels::LevelledExpressionList`] evaluates
//!   levels strictly descending, so a function at level N always observes
//!   same-row values of everything above it.
//! - **Two-pass totals** — the `Total*` function families accumulate during
//!   the prepare run and record results per [`report_model::ReportStateKey`]
//!   in a [`sequence::StateSequence`], so the output run can present a
//!   group's total in its header, before any of its rows exist.
//! - **Duplication severs state** — [`Expression::duplicate`] produces an
//!   object graph sharing no mutable state with the original, which is what
//!   isolates concurrent report runs and sub-reports from each other.

pub mod collection;
pub mod error;
pub mod event;
pub mod expression;
pub mod expressions;
pub mod format;
pub mod formula;
pub mod function;
pub mod functions;
pub mod levels;
pub mod policy;
pub mod runtime;
pub mod sequence;

pub use collection::ExpressionCollection;
pub use error::EngineError;
pub use event::{ReportEvent, ReportEventKind};
pub use expression::Expression;
pub use function::Function;
pub use levels::LevelledExpressionList;
pub use runtime::{ExpressionRuntime, ProcessingContext};
