//! `sheetcheck-randomize` — personalized instruction generation.
//!
//! Scans an instruction document and its companion workbooks for
//! substitutable parameters, picks one assignment deterministically from
//! the requesting login, and applies it atomically across the document
//! and both workbooks. Every attempt works on staged clones; the caller's
//! inputs are never mutated.

pub mod error;
pub mod orchestrator;
pub mod scanner;
pub mod select;

pub use error::RandomizeError;
pub use orchestrator::{create, RandomBundle, MAX_ATTEMPTS};
pub use scanner::{scan, Catalog};
pub use select::assignment_for;
