//! Parameter tokens, candidate domains and per-run assignments.
//!
//! A placeholder is a `{{TOKEN}}` marker where TOKEN matches
//! `[A-Z][A-Z0-9_]*`. The same token always resolves to the same literal
//! value within one generation run, across the document and both
//! workbooks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const TOKEN_OPEN: &str = "{{";
pub const TOKEN_CLOSE: &str = "}}";

/// How a token's candidate domain was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainKind {
    /// Literal candidates from a `{{TOKEN=a|b|c}}` declaration paragraph.
    Enumerated,
    /// Candidates are the names of mutually-exclusive alternative sheets
    /// (`TOKEN-variant` naming) present in the source workbooks.
    SheetChoice,
}

/// One token and its ordered, non-empty candidate domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterOption {
    pub token: String,
    pub kind: DomainKind,
    pub candidates: Vec<String>,
}

/// The token -> value mapping chosen for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterAssignment {
    values: BTreeMap<String, String>,
}

impl ParameterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &str, value: &str) {
        self.values.insert(token.to_string(), value.to_string());
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// True if `token` is a well-formed placeholder token name.
pub fn is_token_name(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Scan text for `{{TOKEN}}` placeholders, in order of appearance.
pub fn scan_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(TOKEN_OPEN) {
        let after = &rest[open + TOKEN_OPEN.len()..];
        match after.find(TOKEN_CLOSE) {
            Some(close) => {
                let inner = &after[..close];
                if is_token_name(inner) {
                    tokens.push(inner.to_string());
                }
                rest = &after[close + TOKEN_CLOSE.len()..];
            }
            None => break,
        }
    }
    tokens
}

/// Replace every well-formed placeholder in `text` with its assigned
/// value. Returns `None` if a discovered token has no entry.
pub fn substitute_text(text: &str, assignment: &ParameterAssignment) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(open) = rest.find(TOKEN_OPEN) else {
            out.push_str(rest);
            return Ok(out);
        };
        let after = &rest[open + TOKEN_OPEN.len()..];
        let Some(close) = after.find(TOKEN_CLOSE) else {
            out.push_str(rest);
            return Ok(out);
        };
        let inner = &after[..close];
        if is_token_name(inner) {
            match assignment.get(inner) {
                Some(value) => {
                    out.push_str(&rest[..open]);
                    out.push_str(value);
                }
                None => return Err(inner.to_string()),
            }
        } else {
            // Not a placeholder (e.g. a domain declaration); keep verbatim
            out.push_str(&rest[..open + TOKEN_OPEN.len() + close + TOKEN_CLOSE.len()]);
        }
        rest = &after[close + TOKEN_CLOSE.len()..];
    }
}
