use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::function::Function;
use crate::policy::{CrosstabSlot, GroupScope};
use crate::runtime::ExpressionRuntime;
use crate::sequence::Sequence;
use report_model::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Min,
    Max,
}

/// Running extremum of a comparable field.
///
/// Null rows are skipped silently; a row whose value cannot be compared to
/// the current extremum is logged and skipped, the accumulation continues.
#[derive(Debug, Clone)]
struct ItemExtremumFunction {
    name: Option<String>,
    dependency_level: i32,
    field: String,
    scope: GroupScope,
    crosstab: CrosstabSlot,
    kind: Extremum,
    deep_traversing: bool,
    value: Sequence<Value>,
    slot: usize,
}

impl ItemExtremumFunction {
    fn new(name: String, field: String, kind: Extremum) -> Self {
        Self {
            name: Some(name),
            dependency_level: 0,
            field,
            scope: GroupScope::whole_report(),
            crosstab: CrosstabSlot::none(),
            kind,
            deep_traversing: false,
            value: Sequence::new(),
            slot: 0,
        }
    }

    fn accumulate(&mut self, candidate: Value) {
        if candidate.is_null() || candidate.is_error() {
            return;
        }
        let keep_candidate = match self.value.get(self.slot) {
            None => true,
            Some(current) => match candidate.report_cmp(current) {
                Some(Ordering::Less) => self.kind == Extremum::Min,
                Some(Ordering::Greater) => self.kind == Extremum::Max,
                Some(Ordering::Equal) => false,
                None => {
                    log::error!(
                        "item extremum '{}': field '{}' produced a value not comparable \
                         to the running result, row skipped",
                        self.name.as_deref().unwrap_or("<unnamed>"),
                        self.field
                    );
                    false
                }
            },
        };
        if keep_candidate {
            self.value.set(self.slot, candidate);
        }
    }

    fn handle(&mut self, event: &ReportEvent<'_>, runtime: &ExpressionRuntime<'_>) {
        if let Some(slot) = self.crosstab.slot_for(event) {
            self.slot = slot;
        }
        if self.scope.resets_on(event) {
            match event.kind() {
                ReportEventKind::ReportInitialized => {
                    self.value.clear();
                    self.slot = 0;
                }
                _ => self.value.reset(self.slot),
            }
        }
        if event.kind() == ReportEventKind::ItemsAdvanced {
            self.accumulate(runtime.data_row().get(&self.field));
        }
    }

    fn current(&self) -> Value {
        self.value.get(self.slot).cloned().unwrap_or(Value::Null)
    }
}

macro_rules! extremum_function {
    ($name:ident, $kind:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name {
            inner: ItemExtremumFunction,
        }

        impl $name {
            #[must_use]
            pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
                Self {
                    inner: ItemExtremumFunction::new(name.into(), field.into(), $kind),
                }
            }

            #[must_use]
            pub fn with_group(mut self, group: impl Into<String>) -> Self {
                self.inner.scope = GroupScope::group(group);
                self
            }

            #[must_use]
            pub fn with_crosstab_filter_group(mut self, group: impl Into<String>) -> Self {
                self.inner.crosstab = CrosstabSlot::filter_group(group);
                self
            }

            /// Also fold in rows reported by sub-reports.
            #[must_use]
            pub fn with_deep_traversing(mut self, deep: bool) -> Self {
                self.inner.deep_traversing = deep;
                self
            }
        }

        impl Expression for $name {
            fn name(&self) -> Option<&str> {
                self.inner.name.as_deref()
            }

            fn dependency_level(&self) -> i32 {
                self.inner.dependency_level
            }

            fn set_dependency_level(&mut self, level: i32) {
                self.inner.dependency_level = level;
            }

            fn is_deep_traversing(&self) -> bool {
                self.inner.deep_traversing
            }

            fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
                Ok(self.inner.current())
            }

            fn duplicate(&self) -> Box<dyn Expression> {
                Box::new(self.clone())
            }
        }

        impl Function for $name {
            fn report_event(
                &mut self,
                event: &ReportEvent<'_>,
                runtime: &ExpressionRuntime<'_>,
            ) -> Result<(), EngineError> {
                self.inner.handle(event, runtime);
                Ok(())
            }

            fn duplicate_function(&self) -> Box<dyn Function> {
                Box::new(self.clone())
            }
        }
    };
}

extremum_function!(
    ItemMinFunction,
    Extremum::Min,
    "Smallest comparable value of a field seen since the scope last reset."
);
extremum_function!(
    ItemMaxFunction,
    Extremum::Max,
    "Largest comparable value of a field seen since the scope last reset."
);
