use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::function::Function;
use crate::policy::GroupScope;
use crate::runtime::ExpressionRuntime;
use report_model::Value;

/// The current page number.
///
/// Increments on every `PageStarted`; an optional group scope restarts the
/// numbering at `start_page` whenever that group begins (per-group page
/// numbering). Page events only exist while the processor paginates, so the
/// counter simply follows whatever pass delivers them.
#[derive(Debug, Clone)]
pub struct PageFunction {
    name: Option<String>,
    dependency_level: i32,
    scope: GroupScope,
    start_page: i64,
    page_increment: i64,
    page: i64,
}

impl PageFunction {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            scope: GroupScope::whole_report(),
            start_page: 1,
            page_increment: 1,
            page: 0,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.scope = GroupScope::group(group);
        self
    }

    #[must_use]
    pub fn with_start_page(mut self, start_page: i64) -> Self {
        self.start_page = start_page;
        self
    }

    #[must_use]
    pub fn with_page_increment(mut self, increment: i64) -> Self {
        self.page_increment = increment;
        self
    }
}

impl Expression for PageFunction {
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
        Ok(Value::Integer(self.page))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for PageFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        _runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        match event.kind() {
            ReportEventKind::ReportInitialized => {
                self.page = self.start_page - self.page_increment;
            }
            ReportEventKind::GroupStarted if self.scope.resets_on(event) => {
                self.page = self.start_page;
            }
            ReportEventKind::PageStarted => {
                self.page += self.page_increment;
            }
            _ => {}
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}
