//! Append-mostly indexed storage for accumulated values.
//!
//! [`Sequence`] maps a small slot index (crosstab column sequence numbers;
//! 0 outside crosstabs) to an accumulated value. [`StateSequence`] pairs
//! sequences with [`ReportStateKey`]s so a total computed during the prepare
//! run can be recalled unmodified at the matching position of the output
//! run.

use ahash::AHashMap;
use report_model::ReportStateKey;

/// Index-addressed, growable container; absent entries read as `None`.
#[derive(Debug, Clone, Default)]
pub struct Sequence<T> {
    entries: Vec<Option<T>>,
}

impl<T> Sequence<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Store `value` at `index`, growing the sequence as needed.
    pub fn set(&mut self, index: usize, value: T) {
        if index >= self.entries.len() {
            self.entries.resize_with(index + 1, || None);
        }
        self.entries[index] = Some(value);
    }

    /// Drop the entry at `index`, keeping the sequence's length.
    pub fn reset(&mut self, index: usize) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = None;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identifier of one sequence inside a [`StateSequence`] pool.
///
/// Two keys bound to the same slot observe the same running computation;
/// that aliasing is what lets a whole-report total and the currently open
/// group's total share one accumulation without double-counting.
pub type SlotId = usize;

/// Keyed recall storage for two-pass totals.
///
/// Sequences live in a pool addressed by [`SlotId`]; report-state keys bind
/// to slots. Cloning a `StateSequence` deep-copies the pool while the
/// key-to-slot bindings keep pointing at the copied slots, so the aliasing
/// structure survives duplication without any shared mutable state.
#[derive(Debug, Clone, Default)]
pub struct StateSequence<T> {
    bindings: AHashMap<ReportStateKey, SlotId>,
    pool: Vec<Sequence<T>>,
}

impl<T> StateSequence<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: AHashMap::new(),
            pool: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.pool.clear();
    }

    /// Add a fresh, empty sequence to the pool.
    pub fn add_sequence(&mut self) -> SlotId {
        self.pool.push(Sequence::new());
        self.pool.len() - 1
    }

    /// Bind `key` to `slot`, replacing any previous binding for the key.
    pub fn bind(&mut self, key: ReportStateKey, slot: SlotId) {
        self.bindings.insert(key, slot);
    }

    #[must_use]
    pub fn slot_for(&self, key: &ReportStateKey) -> Option<SlotId> {
        self.bindings.get(key).copied()
    }

    #[must_use]
    pub fn sequence(&self, slot: SlotId) -> &Sequence<T> {
        &self.pool[slot]
    }

    pub fn sequence_mut(&mut self, slot: SlotId) -> &mut Sequence<T> {
        &mut self.pool[slot]
    }
}

/// Nested storage for page-scoped totals: page index to per-group-key value.
#[derive(Debug, Clone, Default)]
pub struct PageGroupValues<T> {
    pages: AHashMap<usize, AHashMap<ReportStateKey, T>>,
}

impl<T> PageGroupValues<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pages: AHashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    #[must_use]
    pub fn get(&self, page: usize, key: &ReportStateKey) -> Option<&T> {
        self.pages.get(&page).and_then(|groups| groups.get(key))
    }

    pub fn put(&mut self, page: usize, key: ReportStateKey, value: T) {
        self.pages.entry(page).or_default().insert(key, value);
    }
}
