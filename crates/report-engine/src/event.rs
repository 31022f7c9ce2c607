use report_model::ReportState;

/// The lifecycle moments a report processor announces, in the order the
/// state machine permits them:
///
/// `ReportInitialized → [ReportStarted → (GroupStarted → (ItemsStarted →
/// ItemsAdvanced* → ItemsFinished) → GroupFinished)* → ReportFinished]* →
/// ReportDone`, interleaved with `PageStarted`/`PageFinished` during
/// pagination and `SummaryRowSelection` for crosstab summary rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportEventKind {
    ReportInitialized,
    ReportStarted,
    ReportFinished,
    ReportDone,
    GroupStarted,
    GroupFinished,
    ItemsStarted,
    ItemsAdvanced,
    ItemsFinished,
    PageStarted,
    PageFinished,
    SummaryRowSelection,
}

/// One lifecycle event, borrowed from the report processor for the duration
/// of a single dispatch. The engine reads it and never stores it.
pub struct ReportEvent<'a> {
    kind: ReportEventKind,
    state: &'a dyn ReportState,
    group: Option<&'a str>,
    deep_traversing: bool,
    crosstab_active: bool,
}

impl<'a> ReportEvent<'a> {
    #[must_use]
    pub fn new(kind: ReportEventKind, state: &'a dyn ReportState) -> Self {
        Self {
            kind,
            state,
            group: None,
            deep_traversing: false,
            crosstab_active: false,
        }
    }

    /// Attach the name of the group this event concerns (group and summary
    /// events only).
    #[must_use]
    pub fn with_group(mut self, group: &'a str) -> Self {
        self.group = Some(group);
        self
    }

    /// Mark the event as originating inside a sub-report. Only functions
    /// with the deep-traversing flag receive such events.
    #[must_use]
    pub fn deep_traversing(mut self, deep: bool) -> Self {
        self.deep_traversing = deep;
        self
    }

    #[must_use]
    pub fn crosstab_active(mut self, active: bool) -> Self {
        self.crosstab_active = active;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ReportEventKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> &dyn ReportState {
        self.state
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group
    }

    #[must_use]
    pub fn is_deep_traversing(&self) -> bool {
        self.deep_traversing
    }

    #[must_use]
    pub fn is_crosstab_active(&self) -> bool {
        self.crosstab_active
    }
}
