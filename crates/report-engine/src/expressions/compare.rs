use crate::error::EngineError;
use crate::expression::Expression;
use crate::runtime::ExpressionRuntime;
use report_model::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// Compares a field against a constant.
///
/// Comparison goes through [`Value::report_cmp`]: same-kind values compare
/// directly, kind mismatches fall back to decimal parsing of both sides,
/// and anything still incomparable yields `Bool(false)` — a neutral
/// outcome, not an error.
#[derive(Debug, Clone)]
pub struct FieldCompareExpression {
    name: Option<String>,
    dependency_level: i32,
    field: String,
    op: CompareOp,
    constant: Value,
}

impl FieldCompareExpression {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        field: impl Into<String>,
        op: CompareOp,
        constant: Value,
    ) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: 0,
            field: field.into(),
            op,
            constant,
        }
    }
}

impl Expression for FieldCompareExpression {
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
        let result = match value.report_cmp(&self.constant) {
            Some(ordering) => self.op.matches(ordering),
            None => false,
        };
        Ok(Value::Bool(result))
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.clone())
    }
}
