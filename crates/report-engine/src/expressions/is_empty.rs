use crate::error::EngineError;
use crate::expression::Expression;
use crate::runtime::ExpressionRuntime;
use report_model::Value;
use rust_decimal::Decimal;

/// Tests whether a field is "empty": null, blank text, or numeric zero.
#[derive(Debug, Clone)]
pub struct FieldIsEmptyExpression {
    name: Option<String>,
    dependency_level: i32,
    field: String,
}

impl FieldIsEmptyExpression {
    #[must_use]
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            field: field.into(),
        }
    }
}

impl Expression for FieldIsEmptyExpression {
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
        let value = runtime.data_row().get(&self.field);
        let empty = match &value {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            v if v.is_numeric() => v.as_decimal() == Some(Decimal::ZERO),
            _ => false,
        };
        Ok(Value::Bool(empty))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}
