//! Page-scoped totals.
//!
//! Page boundaries only exist while output is being paginated, so unlike
//! the group totals these gate their accumulation to the pagination
//! processing level rather than the function's own dependency level.
//! Results are keyed by `(page index, scope instance key)`; both passes
//! track the keys, only the pagination pass writes.

use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::function::Function;
use crate::policy::GroupScope;
use crate::runtime::ExpressionRuntime;
use crate::sequence::PageGroupValues;
use report_model::{ReportStateKey, Value, LEVEL_PAGINATE};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct PageScope<T> {
    scope: GroupScope,
    values: PageGroupValues<T>,
    current_key: ReportStateKey,
    page: usize,
}

impl<T: Clone> PageScope<T> {
    fn new(scope: GroupScope) -> Self {
        Self {
            scope,
            values: PageGroupValues::new(),
            current_key: ReportStateKey::new(0, 0),
            page: 0,
        }
    }

    /// Track page/key bookkeeping; returns `true` when the event's row
    /// should be accumulated (pagination level only).
    fn observe(&mut self, event: &ReportEvent<'_>) -> bool {
        let state = event.state();
        match event.kind() {
            ReportEventKind::ReportInitialized => {
                if state.level() == LEVEL_PAGINATE {
                    self.values.clear();
                }
                self.current_key = state.process_key();
                self.page = state.page_index();
            }
            ReportEventKind::GroupStarted if self.scope.resets_on(event) => {
                // A fresh scope instance starts a fresh bucket for the rest
                // of this page.
                self.current_key = state.process_key();
            }
            ReportEventKind::PageStarted => {
                self.page = state.page_index();
            }
            ReportEventKind::ItemsAdvanced => {
                return state.level() == LEVEL_PAGINATE;
            }
            _ => {}
        }
        false
    }

    fn current(&self) -> Option<&T> {
        self.values.get(self.page, &self.current_key)
    }

    fn update(&mut self, value: T) {
        self.values.put(self.page, self.current_key, value);
    }
}

/// Sum of a numeric field over the current page (optionally further scoped
/// to a group).
#[derive(Debug, Clone)]
pub struct TotalPageSumFunction {
    name: Option<String>,
    dependency_level: i32,
    field: String,
    inner: PageScope<Decimal>,
}

impl TotalPageSumFunction {
    #[must_use]
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: LEVEL_PAGINATE,
            field: field.into(),
            inner: PageScope::new(GroupScope::whole_report()),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.inner = PageScope::new(GroupScope::group(group));
        self
    }
}

impl Expression for TotalPageSumFunction {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        let total = self.inner.current().copied().unwrap_or(Decimal::ZERO);
        Ok(Value::Decimal(total))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for TotalPageSumFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        if self.inner.observe(event) {
            let value = runtime.data_row().get(&self.field);
            if value.is_numeric() {
                match value.as_decimal() {
                    Some(d) => {
                        let total = self.inner.current().copied().unwrap_or(Decimal::ZERO);
                        self.inner.update(total + d);
                    }
                    None => {
                        log::error!(
                            "total page sum '{}': field '{}' is numeric but not representable, \
                             row skipped",
                            self.name.as_deref().unwrap_or("<unnamed>"),
                            self.field
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}

/// Row count over the current page (optionally per group instance).
#[derive(Debug, Clone)]
pub struct TotalPageItemCountFunction {
    name: Option<String>,
    dependency_level: i32,
    inner: PageScope<i64>,
}

impl TotalPageItemCountFunction {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: LEVEL_PAGINATE,
            inner: PageScope::new(GroupScope::whole_report()),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.inner = PageScope::new(GroupScope::group(group));
        self
    }
}

impl Expression for TotalPageItemCountFunction {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        Ok(Value::Integer(self.inner.current().copied().unwrap_or(0)))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for TotalPageItemCountFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        _runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        if self.inner.observe(event) {
            let count = self.inner.current().copied().unwrap_or(0);
            self.inner.update(count + 1);
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}
