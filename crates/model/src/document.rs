//! Rich-text instruction document model: blocks of runs.
//!
//! Word splits logical text into arbitrary runs, so a placeholder can
//! arrive fragmented across several of them. `from_paragraphs` therefore
//! re-splits each paragraph's concatenated text at placeholder boundaries,
//! guaranteeing every placeholder occupies exactly one run.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::{self, ParameterAssignment};

/// A text span. `token` is set when the run is a placeholder; its `text`
/// then still holds the literal `{{TOKEN}}` marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub token: Option<String>,
}

impl Run {
    pub fn text(text: &str) -> Self {
        Self { text: text.to_string(), token: None }
    }

    pub fn placeholder(token: &str) -> Self {
        Self {
            text: format!("{}{}{}", params::TOKEN_OPEN, token, params::TOKEN_CLOSE),
            token: Some(token.to_string()),
        }
    }
}

/// Paragraph-equivalent: an ordered sequence of runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub runs: Vec<Run>,
}

impl Block {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstituteError {
    /// A discovered token has no entry in the assignment.
    MissingParameter(String),
}

impl fmt::Display for SubstituteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter(token) => {
                write!(f, "no value assigned for parameter '{token}'")
            }
        }
    }
}

impl std::error::Error for SubstituteError {}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from paragraph texts, splitting each at
    /// placeholder boundaries.
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocks = paragraphs
            .into_iter()
            .map(|p| Block { runs: split_runs(p.as_ref()) })
            .collect();
        Self { blocks }
    }

    /// All placeholder tokens present in the document.
    pub fn find_placeholders(&self) -> BTreeSet<String> {
        self.blocks
            .iter()
            .flat_map(|b| b.runs.iter())
            .filter_map(|r| r.token.clone())
            .collect()
    }

    /// A new document with every placeholder run replaced by a literal
    /// text run bearing the assigned value.
    pub fn substitute(&self, assignment: &ParameterAssignment) -> Result<Document, SubstituteError> {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let mut runs = Vec::with_capacity(block.runs.len());
            for run in &block.runs {
                match &run.token {
                    Some(token) => {
                        let value = assignment
                            .get(token)
                            .ok_or_else(|| SubstituteError::MissingParameter(token.clone()))?;
                        runs.push(Run::text(value));
                    }
                    None => runs.push(run.clone()),
                }
            }
            blocks.push(Block { runs });
        }
        Ok(Document { blocks })
    }
}

/// Split paragraph text into literal and placeholder runs.
fn split_runs(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut rest = text;
    loop {
        let Some(open) = rest.find(params::TOKEN_OPEN) else {
            break;
        };
        let after = &rest[open + params::TOKEN_OPEN.len()..];
        let Some(close) = after.find(params::TOKEN_CLOSE) else {
            break;
        };
        let inner = &after[..close];
        if params::is_token_name(inner) {
            if open > 0 {
                runs.push(Run::text(&rest[..open]));
            }
            runs.push(Run::placeholder(inner));
            rest = &after[close + params::TOKEN_CLOSE.len()..];
        } else {
            // Keep the marker pair verbatim (e.g. a domain declaration)
            let keep = open + params::TOKEN_OPEN.len() + close + params::TOKEN_CLOSE.len();
            runs.push(Run::text(&rest[..keep]));
            rest = &rest[keep..];
        }
    }
    if !rest.is_empty() || runs.is_empty() {
        runs.push(Run::text(rest));
    }
    runs
}
