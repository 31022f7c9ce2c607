//! Layout-driven style mutation with cached band walks.

mod element_format;
mod row_banding;

pub use element_format::{ElementFormatFunction, ElementFormatProcessor, InstanceToken, NeedEvalResult};
pub use row_banding::{row_banding, RowBanding};
