use crate::error::EngineError;
use crate::expression::Expression;
use crate::runtime::ExpressionRuntime;
use report_model::Value;
use rust_decimal::RoundingStrategy;

/// Ratio of two fields of the current row.
///
/// Plain mode computes `dividend / divisor`; with `use_difference` the
/// numerator becomes `dividend - divisor` (relative change). A zero or
/// non-numeric divisor yields `Null` — never infinity, never an error.
#[derive(Debug, Clone)]
pub struct PercentageExpression {
    name: Option<String>,
    dependency_level: i32,
    dividend: String,
    divisor: String,
    use_difference: bool,
    scale: u32,
    rounding: RoundingStrategy,
}

impl PercentageExpression {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        dividend: impl Into<String>,
        divisor: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            dividend: dividend.into(),
            divisor: divisor.into(),
            use_difference: false,
            scale: 14,
            rounding: RoundingStrategy::MidpointAwayFromZero,
        }
    }

    #[must_use]
    pub fn use_difference(mut self, enabled: bool) -> Self {
        self.use_difference = enabled;
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
}

impl Expression for PercentageExpression {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn evaluate(&self, runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        let row = runtime.data_row();
        let dividend = row.get(&self.dividend).as_decimal();
        let divisor = row.get(&self.divisor).as_decimal();
        let (dividend, divisor) = match (dividend, divisor) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(Value::Null),
        };
        if divisor.is_zero() {
            return Ok(Value::Null);
        }
        let numerator = if self.use_difference {
            dividend - divisor
        } else {
            dividend
        };
        let ratio = (numerator / divisor).round_dp_with_strategy(self.scale, self.rounding);
        Ok(Value::Decimal(ratio))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}
