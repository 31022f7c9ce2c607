//! Composable accumulation policies shared by the function families.

use crate::event::{ReportEvent, ReportEventKind};

/// Decides when a function's accumulator resets.
///
/// A configured group name scopes the accumulation to instances of that
/// group; `group: None` means whole-report scope, which resets only when the
/// report itself (re-)initializes.
#[derive(Debug, Clone, Default)]
pub struct GroupScope {
    group: Option<String>,
}

impl GroupScope {
    #[must_use]
    pub fn whole_report() -> Self {
        Self { group: None }
    }

    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            group: Some(name.into()),
        }
    }

    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Whether the given event starts a fresh accumulation scope.
    #[must_use]
    pub fn resets_on(&self, event: &ReportEvent<'_>) -> bool {
        match event.kind() {
            ReportEventKind::ReportInitialized => true,
            ReportEventKind::GroupStarted => match &self.group {
                Some(group) => event.group() == Some(group.as_str()),
                None => false,
            },
            _ => false,
        }
    }

    /// Whether the event concerns exactly the configured group.
    #[must_use]
    pub fn matches_group(&self, event: &ReportEvent<'_>) -> bool {
        match &self.group {
            Some(group) => event.group() == Some(group.as_str()),
            None => false,
        }
    }
}

/// Selects the active sequence slot when a crosstab iterates its column
/// combinations.
///
/// A crosstab row visits many column combinations whose accumulations are
/// concurrently open; the filter group's column sequence counter tells the
/// function which slot the current events belong to. Without a filter group
/// the slot is always 0.
#[derive(Debug, Clone, Default)]
pub struct CrosstabSlot {
    filter_group: Option<String>,
}

impl CrosstabSlot {
    #[must_use]
    pub fn none() -> Self {
        Self { filter_group: None }
    }

    #[must_use]
    pub fn filter_group(name: impl Into<String>) -> Self {
        Self {
            filter_group: Some(name.into()),
        }
    }

    /// The slot the current event selects, if it re-selects one at all.
    ///
    /// Only group-start and summary-row events of the configured filter
    /// group move the slot.
    #[must_use]
    pub fn slot_for(&self, event: &ReportEvent<'_>) -> Option<usize> {
        let filter = self.filter_group.as_deref()?;
        if !matches!(
            event.kind(),
            ReportEventKind::GroupStarted | ReportEventKind::SummaryRowSelection
        ) {
            return None;
        }
        if event.group() != Some(filter) {
            return None;
        }
        let state = event.state();
        Some(state.crosstab_column_sequence(state.current_group_index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_model::{ReportState, ReportStateKey};

    struct StubState;

    impl ReportState for StubState {
        fn is_prepare_run(&self) -> bool {
            true
        }
        fn level(&self) -> i32 {
            0
        }
        fn current_group_index(&self) -> usize {
            1
        }
        fn crosstab_column_sequence(&self, group_index: usize) -> usize {
            group_index + 3
        }
        fn process_key(&self) -> ReportStateKey {
            ReportStateKey::new(0, 0)
        }
        fn page_index(&self) -> usize {
            0
        }
    }

    #[test]
    fn whole_report_scope_never_group_resets() {
        let scope = GroupScope::whole_report();
        let state = StubState;
        let started = ReportEvent::new(ReportEventKind::GroupStarted, &state).with_group("G");
        assert!(!scope.resets_on(&started));
        let init = ReportEvent::new(ReportEventKind::ReportInitialized, &state);
        assert!(scope.resets_on(&init));
    }

    #[test]
    fn group_scope_resets_only_on_its_group() {
        let scope = GroupScope::group("G");
        let state = StubState;
        let same = ReportEvent::new(ReportEventKind::GroupStarted, &state).with_group("G");
        let other = ReportEvent::new(ReportEventKind::GroupStarted, &state).with_group("H");
        assert!(scope.resets_on(&same));
        assert!(!scope.resets_on(&other));
    }

    #[test]
    fn crosstab_slot_reads_the_column_sequence_counter() {
        let slot = CrosstabSlot::filter_group("cols");
        let state = StubState;
        let started = ReportEvent::new(ReportEventKind::GroupStarted, &state).with_group("cols");
        assert_eq!(slot.slot_for(&started), Some(4));
        let advanced = ReportEvent::new(ReportEventKind::ItemsAdvanced, &state);
        assert_eq!(slot.slot_for(&advanced), None);
        assert_eq!(CrosstabSlot::none().slot_for(&started), None);
    }
}
