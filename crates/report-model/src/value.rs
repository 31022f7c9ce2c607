use chrono::NaiveDateTime;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Well-known evaluation failure sentinels.
///
/// These travel inside [`Value::Error`] so a failed computation stays an
/// ordinary row value: downstream consumers render it, they never unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueError {
    /// A formula evaluation produced something unusable.
    Unexpected,
    /// A formula could not be parsed or compiled.
    Invalid,
}

impl ValueError {
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            ValueError::Unexpected => "#ERROR!",
            ValueError::Invalid => "#INVALID!",
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A single row value as seen through a `DataRow`.
///
/// `Null` doubles as "field absent"; the comparison and conversion helpers
/// below implement the engine's lenient coercion rules, where a value that
/// cannot be interpreted simply drops out of the computation instead of
/// failing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDateTime),
    Error(ValueError),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Numeric view of the value.
    ///
    /// Integers and decimals convert exactly, floats convert when finite,
    /// and text is parsed after trimming. Everything else is `None` —
    /// including text that merely looks numeric but does not parse; callers
    /// decide whether that is worth a log line.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(i) => Some(Decimal::from(*i)),
            Value::Number(n) => Decimal::from_f64(*n),
            Value::Decimal(d) => Some(*d),
            Value::Text(s) => s.trim().parse::<Decimal>().ok(),
            Value::Null | Value::Bool(_) | Value::Date(_) | Value::Error(_) => None,
        }
    }

    /// `true` when the value is one of the numeric variants (text is not,
    /// even if it would parse).
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Number(_) | Value::Decimal(_))
    }

    /// Report-order comparison.
    ///
    /// Same-kind values compare directly (numeric kinds cross-compare
    /// through [`Decimal`]). Mismatched kinds fall back to parsing both
    /// sides as decimals, which mirrors how comparison expressions treat
    /// `"42"` vs `42`. Pairs that survive neither route are incomparable
    /// and return `None`; callers map that to a neutral result.
    #[must_use]
    pub fn report_cmp(&self, other: &Value) -> Option<Ordering> {
        if self.is_error() || other.is_error() {
            return None;
        }
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Some(a.as_decimal()?.cmp(&b.as_decimal()?))
            }
            // Kind mismatch: both sides must read as numbers, otherwise the
            // pair is incomparable.
            (a, b) => Some(a.as_decimal()?.cmp(&b.as_decimal()?)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{d}"),
            Value::Error(e) => write!(f, "{e}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn as_decimal_parses_trimmed_text() {
        assert_eq!(
            Value::Text("  12.5 ".into()).as_decimal(),
            Some(Decimal::new(125, 1))
        );
        assert_eq!(Value::Text("twelve".into()).as_decimal(), None);
        assert_eq!(Value::Integer(3).as_decimal(), Some(Decimal::from(3)));
        assert_eq!(Value::Bool(true).as_decimal(), None);
    }

    #[test]
    fn numeric_kinds_cross_compare() {
        let a = Value::Integer(2);
        let b = Value::Number(2.0);
        let c = Value::Decimal(Decimal::from(3));
        assert_eq!(a.report_cmp(&b), Some(Ordering::Equal));
        assert_eq!(b.report_cmp(&c), Some(Ordering::Less));
    }

    #[test]
    fn kind_mismatch_falls_back_to_decimal_parse() {
        let text = Value::Text("42".into());
        let num = Value::Integer(42);
        assert_eq!(text.report_cmp(&num), Some(Ordering::Equal));

        // A pair that parses on neither side is simply incomparable.
        let word = Value::Text("forty-two".into());
        assert_eq!(word.report_cmp(&num), None);
        assert_eq!(Value::Bool(true).report_cmp(&num), None);
    }

    #[test]
    fn errors_never_compare() {
        let err = Value::Error(ValueError::Unexpected);
        assert_eq!(err.report_cmp(&err), None);
        assert_eq!(Value::Integer(1).report_cmp(&err), None);
    }
}
