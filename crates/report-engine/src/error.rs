use thiserror::Error;

/// Failures surfaced by the external formula evaluator seam.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormulaFailure {
    #[error("formula failed to compile: {0}")]
    Compile(String),

    #[error("formula evaluation failed: {0}")]
    Evaluate(String),

    #[error("formula produced an error value: {0}")]
    ErrorValue(String),
}

/// Fatal evaluation errors.
///
/// Expected data variation (type mismatches, null fields, incomparable
/// values) never reaches this type; it is absorbed into neutral sentinel
/// values. An `Err` from the engine means the current report run must be
/// aborted.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The report run reached a state it cannot recover from, e.g. an
    /// output run recalling totals that no prepare run recorded.
    #[error("invalid report state: {0}")]
    InvalidReportState(String),

    /// A strict-mode formula failure, carrying the backend's diagnosis.
    #[error("formula '{formula}' failed fatally")]
    FormulaFailed {
        formula: String,
        #[source]
        source: FormulaFailure,
    },

    /// Two named entries in one collection share a name.
    #[error("duplicate expression name: {0}")]
    DuplicateName(String),
}
