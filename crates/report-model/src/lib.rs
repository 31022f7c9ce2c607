#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Passive data model for banded-report evaluation.
//!
//! This crate holds the types the evaluation engine reads but never drives:
//! the [`Value`] model with report comparison semantics, the [`DataRow`]
//! lookup interface, the narrow [`structure`] read interface (sections,
//! attribute stores, change trackers), the [`state::ReportState`] view of a
//! running report, and string-keyed [`config::ReportConfiguration`].
//!
//! No evaluation logic lives here; see the `report-engine` crate.

pub mod config;
pub mod data_row;
pub mod state;
pub mod structure;
pub mod value;

pub use config::ReportConfiguration;
pub use data_row::DataRow;
pub use state::{ReportState, ReportStateKey, LEVEL_PAGINATE, LEVEL_STRUCTURAL};
pub use value::{Value, ValueError};
