use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::refs;
use crate::value::CellValue;

/// A formula as carried by the source file: raw expression text plus the
/// sheet references extracted from it. The expression is never evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    source: String,
}

impl Formula {
    /// Normalizes to a leading `=`.
    pub fn new(source: &str) -> Self {
        let source = if source.starts_with('=') {
            source.to_string()
        } else {
            format!("={}", source)
        };
        Self { source }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of sheets this formula references.
    pub fn sheet_refs(&self) -> Vec<String> {
        refs::sheet_refs(&self.source)
    }

    /// Uppercased names of functions this formula calls.
    pub fn functions(&self) -> BTreeSet<String> {
        refs::function_names(&self.source)
    }

    /// Rewrite references to sheet `old` to address sheet `new`.
    pub fn rewrite_sheet(&mut self, old: &str, new: &str) {
        self.source = refs::rewrite_sheet_refs(&self.source, old, new);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub formula: Option<Formula>,
}

impl Cell {
    pub fn value(value: CellValue) -> Self {
        Self { value, formula: None }
    }

    pub fn formula(source: &str, cached: CellValue) -> Self {
        Self {
            value: cached,
            formula: Some(Formula::new(source)),
        }
    }
}
