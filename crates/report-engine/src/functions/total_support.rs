//! Key bookkeeping shared by the two-pass `Total*` function family.
//!
//! During the prepare run a total function accumulates exactly like its
//! running sibling, but it also records where in the processing tree each
//! accumulation lives: the global position on `ReportInitialized` and every
//! scope-group instance's opening position on `GroupStarted`. The output
//! run performs no accumulation at all; it re-selects the recorded sequence
//! by process key, which is what lets a group header print a total computed
//! from rows the output pass has not reached yet.

use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::policy::{CrosstabSlot, GroupScope};
use crate::sequence::{SlotId, StateSequence};

#[derive(Debug, Clone)]
pub(crate) struct TotalState<T> {
    scope: GroupScope,
    crosstab: CrosstabSlot,
    store: StateSequence<T>,
    current: SlotId,
    index: usize,
}

impl<T: Clone> TotalState<T> {
    pub(crate) fn new(scope: GroupScope, crosstab: CrosstabSlot) -> Self {
        let mut store = StateSequence::new();
        let current = store.add_sequence();
        Self {
            scope,
            crosstab,
            store,
            current,
            index: 0,
        }
    }

    pub(crate) fn scope(&self) -> &GroupScope {
        &self.scope
    }

    /// Track position bookkeeping for one event. Call this for every event
    /// before deciding whether to accumulate.
    ///
    /// Recording happens only while the prepare run processes the level this
    /// function is registered at. Prepare replays at any other level, the
    /// pagination pass included, select recorded sequences without touching
    /// them. An output-run lookup that finds no recorded sequence means the
    /// two passes disagree about the processing tree, which is fatal.
    pub(crate) fn observe(
        &mut self,
        event: &ReportEvent<'_>,
        dependency_level: i32,
    ) -> Result<(), EngineError> {
        if let Some(index) = self.crosstab.slot_for(event) {
            self.index = index;
        }

        let state = event.state();
        let recording = state.is_prepare_run() && state.level() == dependency_level;
        match event.kind() {
            ReportEventKind::ReportInitialized => {
                self.index = 0;
                if recording {
                    self.store.clear();
                    self.current = self.store.add_sequence();
                    self.store.bind(state.process_key(), self.current);
                } else if let Some(slot) = self.store.slot_for(&state.process_key()) {
                    self.current = slot;
                } else if !state.is_prepare_run() {
                    return Err(EngineError::InvalidReportState(
                        "output run started without a recorded prepare run".to_string(),
                    ));
                }
            }
            ReportEventKind::GroupStarted => {
                if recording {
                    if self.scope.resets_on(event) {
                        self.current = self.store.add_sequence();
                    }
                    // Either way the group's opening position resolves to the
                    // sequence that is live for the rest of this group, so
                    // header and footer lookups agree during the output run.
                    self.store.bind(state.process_key(), self.current);
                } else if let Some(slot) = self.store.slot_for(&state.process_key()) {
                    self.current = slot;
                } else if !state.is_prepare_run() {
                    return Err(EngineError::InvalidReportState(format!(
                        "output run reached position {:?} with no recorded total",
                        state.process_key()
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether this event's row should be folded into the accumulator.
    ///
    /// Accumulation happens once: in the prepare run, and only while the
    /// processor executes the level this function is registered at (other
    /// levels replay the same rows and must not double-count).
    pub(crate) fn should_accumulate(
        &self,
        event: &ReportEvent<'_>,
        dependency_level: i32,
    ) -> bool {
        event.kind() == ReportEventKind::ItemsAdvanced
            && event.state().is_prepare_run()
            && event.state().level() == dependency_level
    }

    pub(crate) fn current_value(&self) -> Option<&T> {
        self.store.sequence(self.current).get(self.index)
    }

    pub(crate) fn update(&mut self, value: T) {
        let index = self.index;
        self.store.sequence_mut(self.current).set(index, value);
    }
}
