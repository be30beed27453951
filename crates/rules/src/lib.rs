//! `sheetcheck-rules` — correctness rule engine for spreadsheet exercises.
//!
//! Pure engine crate: receives decoded workbooks, returns `Feedback`.
//! No IO dependencies. Rules run in a fixed priority order; structural
//! failure short-circuits everything downstream.

pub mod engine;
pub mod feedback;
pub mod rule;

pub use engine::{run, GradingOptions, ScorePolicy};
pub use feedback::Feedback;
pub use rule::{RuleKind, RuleOutcome};
