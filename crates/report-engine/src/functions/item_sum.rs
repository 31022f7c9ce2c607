use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::function::Function;
use crate::policy::{CrosstabSlot, GroupScope};
use crate::runtime::ExpressionRuntime;
use crate::sequence::Sequence;
use report_model::Value;
use rust_decimal::Decimal;

/// Running sum of a numeric field.
///
/// The accumulator resets when its group scope restarts; rows whose field
/// value is not numeric are skipped silently (normal data variation). A
/// crosstab filter group redirects the accumulation into per-column slots.
#[derive(Debug, Clone)]
pub struct ItemSumFunction {
    name: Option<String>,
    dependency_level: i32,
    field: String,
    scope: GroupScope,
    crosstab: CrosstabSlot,
    deep_traversing: bool,
    sum: Sequence<Decimal>,
    slot: usize,
}

impl ItemSumFunction {
    #[must_use]
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            field: field.into(),
            scope: GroupScope::whole_report(),
            crosstab: CrosstabSlot::none(),
            deep_traversing: false,
            sum: Sequence::new(),
            slot: 0,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.scope = GroupScope::group(group);
        self
    }

    #[must_use]
    pub fn with_crosstab_filter_group(mut self, group: impl Into<String>) -> Self {
        self.crosstab = CrosstabSlot::filter_group(group);
        self
    }

    /// Also fold in rows reported by sub-reports.
    #[must_use]
    pub fn with_deep_traversing(mut self, deep: bool) -> Self {
        self.deep_traversing = deep;
        self
    }

    fn accumulate(&mut self, value: Value) {
        match value {
            Value::Integer(_) | Value::Number(_) | Value::Decimal(_) => {
                match value.as_decimal() {
                    Some(d) => {
                        let total =
                            self.sum.get(self.slot).copied().unwrap_or(Decimal::ZERO) + d;
                        self.sum.set(self.slot, total);
                    }
                    None => {
                        // Non-finite float or out-of-range conversion.
                        log::error!(
                            "item sum '{}': field '{}' is numeric but not representable, row skipped",
                            self.name.as_deref().unwrap_or("<unnamed>"),
                            self.field
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

impl Expression for ItemSumFunction {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn is_deep_traversing(&self) -> bool {
        self.deep_traversing
    }

    fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        let total = self.sum.get(self.slot).copied().unwrap_or(Decimal::ZERO);
        Ok(Value::Decimal(total))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for ItemSumFunction {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        if let Some(slot) = self.crosstab.slot_for(event) {
            self.slot = slot;
        }
        if self.scope.resets_on(event) {
            match event.kind() {
                ReportEventKind::ReportInitialized => {
                    self.sum.clear();
                    self.slot = 0;
                }
                _ => self.sum.reset(self.slot),
            }
        }
        if event.kind() == ReportEventKind::ItemsAdvanced {
            self.accumulate(runtime.data_row().get(&self.field));
        }
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.clone())
    }
}
