use crate::error::EngineError;
use crate::event::{ReportEvent, ReportEventKind};
use crate::expression::Expression;
use crate::function::Function;
use crate::policy::{CrosstabSlot, GroupScope};
use crate::runtime::ExpressionRuntime;
use crate::sequence::Sequence;
use report_model::Value;
use rust_decimal::{Decimal, RoundingStrategy};

/// Running average of a numeric field: sum and row count tracked side by
/// side, divided on demand with a configurable rounding scale.
///
/// Rows counted are exactly the rows summed, so rows with non-numeric
/// values affect neither side.
#[derive(Debug, Clone)]
pub struct ItemAvgFunction {
    name: Option<String>,
    dependency_level: i32,
    field: String,
    scope: GroupScope,
    crosstab: CrosstabSlot,
    scale: u32,
    rounding: RoundingStrategy,
    deep_traversing: bool,
    sum: Sequence<Decimal>,
    count: Sequence<i64>,
    slot: usize,
}

impl ItemAvgFunction {
    #[must_use]
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            field: field.into(),
            scope: GroupScope::whole_report(),
            crosstab: CrosstabSlot::none(),
            scale: 14,
            rounding: RoundingStrategy::MidpointAwayFromZero,
            deep_traversing: false,
            sum: Sequence::new(),
            count: Sequence::new(),
            slot: 0,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.scope = GroupScope::group(group);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_rounding(mut self, rounding: RoundingStrategy) -> Self {
        self.rounding = rounding;
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
}

impl Expression for ItemAvgFunction {
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
        let count = self.count.get(self.slot).copied().unwrap_or(0);
        if count == 0 {
            return Ok(Value::Null);
        }
        let sum = self.sum.get(self.slot).copied().unwrap_or(Decimal::ZERO);
        let avg = (sum / Decimal::from(count)).round_dp_with_strategy(self.scale, self.rounding);
        Ok(Value::Decimal(avg))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}

impl Function for ItemAvgFunction {
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
                    self.count.clear();
                    self.slot = 0;
                }
                _ => {
                    self.sum.reset(self.slot);
                    self.count.reset(self.slot);
                }
            }
        }
        if event.kind() == ReportEventKind::ItemsAdvanced {
            let value = runtime.data_row().get(&self.field);
            if value.is_numeric() {
                match value.as_decimal() {
                    Some(d) => {
                        let sum = self.sum.get(self.slot).copied().unwrap_or(Decimal::ZERO) + d;
                        self.sum.set(self.slot, sum);
                        let count = self.count.get(self.slot).copied().unwrap_or(0) + 1;
                        self.count.set(self.slot, count);
                    }
                    None => {
                        log::error!(
                            "item avg '{}': field '{}' is numeric but not representable, row skipped",
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
