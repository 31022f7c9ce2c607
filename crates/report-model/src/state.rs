use serde::{Deserialize, Serialize};

/// Processing level of the pagination pass.
///
/// Page boundaries only exist while the output is being paginated, so
/// page-scoped functions gate their accumulation to exactly this level.
pub const LEVEL_PAGINATE: i32 = -2;

/// Processing level reserved for structural/layout functions.
pub const LEVEL_STRUCTURAL: i32 = -1;

/// Opaque identifier of a position in report processing.
///
/// The engine never derives meaning from the two halves; it only compares
/// and hashes keys when recalling values recorded during an earlier pass.
/// Hosts construct keys however suits their state machine, as long as the
/// same processing position yields the same key on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportStateKey {
    position: u64,
    sub_position: u64,
}

impl ReportStateKey {
    #[must_use]
    pub const fn new(position: u64, sub_position: u64) -> Self {
        Self {
            position,
            sub_position,
        }
    }
}

/// Read-only view of the report processor's current position.
///
/// Carried on every lifecycle event; the engine reads it and never
/// constructs it.
pub trait ReportState {
    /// Whether values are currently being computed (prepare run) as opposed
    /// to recalled for emission (output run).
    fn is_prepare_run(&self) -> bool;

    /// The processing level currently being executed. Non-negative levels
    /// are user dependency levels; see [`LEVEL_PAGINATE`].
    fn level(&self) -> i32;

    /// Index of the innermost group currently open.
    fn current_group_index(&self) -> usize;

    /// Sequence counter selecting among concurrently open crosstab column
    /// slots for the given group.
    fn crosstab_column_sequence(&self, group_index: usize) -> usize;

    /// Key identifying this position for pass-to-pass value recall.
    fn process_key(&self) -> ReportStateKey;

    /// Zero-based index of the page being generated, meaningful only during
    /// pagination and output.
    fn page_index(&self) -> usize;
}
