use crate::value::Value;

/// Read-only, per-row value lookup.
///
/// A data row is the union of the current table row's fields and the most
/// recently computed expression/function results, addressed by name. The
/// engine only ever reads through this interface; constructing and advancing
/// rows is the report processor's job.
pub trait DataRow {
    /// Current value of the named column. Absent names read as
    /// [`Value::Null`], never an error.
    fn get(&self, name: &str) -> Value;

    /// Whether the named column's value changed when the row last advanced.
    fn is_changed(&self, name: &str) -> bool;
}
