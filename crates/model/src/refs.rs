//! Reference and function extraction from formula text.
//!
//! The engine never evaluates formulas; it only inspects their structure.
//! A light scanner over the raw expression text is enough for the three
//! questions asked of it: which sheets does a formula address, which
//! functions does it call, and how to rewrite sheet references after a
//! sheet-choice substitution. String literals are skipped so `"Sheet1!"`
//! inside quotes is never mistaken for a reference.

use std::collections::BTreeSet;

/// Extract the names of all sheets a formula references.
///
/// Handles both quoted (`'Summer Data'!A1`) and bare (`Data!A1`) forms.
/// Order follows first appearance; duplicates are removed.
pub fn sheet_refs(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut seen = BTreeSet::new();
    for (name, _, _) in scan_sheet_refs(source) {
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    names
}

/// Extract the set of function names called by a formula.
///
/// A function is an identifier immediately followed by `(` that is not a
/// sheet qualifier. Names are reported uppercased.
pub fn function_names(source: &str) -> BTreeSet<String> {
    let bytes = source.as_bytes();
    let mut names = BTreeSet::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i),
            b'\'' => i = skip_quoted_name(bytes, i),
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.') {
                    i += 1;
                }
                let mut j = i;
                while j < bytes.len() && bytes[j] == b' ' {
                    j += 1;
                }
                if j < bytes.len() && bytes[j] == b'(' {
                    names.insert(source[start..i].to_ascii_uppercase());
                }
            }
            _ => i += 1,
        }
    }
    names
}

/// Rewrite every reference to sheet `old` so it addresses sheet `new`.
///
/// The rewritten reference is quoted only when the new name needs it.
pub fn rewrite_sheet_refs(source: &str, old: &str, new: &str) -> String {
    let spans = scan_sheet_refs(source);
    if spans.is_empty() {
        return source.to_string();
    }
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (name, start, end) in spans {
        if name != old {
            continue;
        }
        out.push_str(&source[cursor..start]);
        if needs_quoting(new) {
            out.push('\'');
            out.push_str(new);
            out.push('\'');
        } else {
            out.push_str(new);
        }
        out.push('!');
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Spreadsheet-style address for a (row, col) pair, e.g. (0, 1) -> "B1".
pub fn cell_address(row: u32, col: u32) -> String {
    let mut letters = String::new();
    let mut c = col as i64;
    loop {
        letters.insert(0, (b'A' + (c % 26) as u8) as char);
        c = c / 26 - 1;
        if c < 0 {
            break;
        }
    }
    format!("{}{}", letters, row + 1)
}

fn needs_quoting(name: &str) -> bool {
    !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        || name.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Scan for sheet-qualified references, yielding (name, start, end) where
/// the span covers the name plus its `!` separator (and quotes, if any).
fn scan_sheet_refs(source: &str) -> Vec<(String, usize, usize)> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i),
            b'\'' => {
                let start = i;
                let close = skip_quoted_name(bytes, i);
                if close < bytes.len() && bytes[close] == b'!' {
                    // Embedded '' unescapes to a single quote
                    let name = source[start + 1..close - 1].replace("''", "'");
                    spans.push((name, start, close + 1));
                }
                i = close.max(start + 1);
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric()
                        || bytes[i] == b'_'
                        || bytes[i] == b'.'
                        || bytes[i] == b'-')
                {
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'!' {
                    // `=A1-Data!B1` is a subtraction, not a reference to a
                    // sheet named "A1-Data": trim leading cell-ref operands.
                    let mut name_start = start;
                    while let Some(dash) = source[name_start..i].find('-') {
                        if looks_like_cell_ref(&source[name_start..name_start + dash]) {
                            name_start += dash + 1;
                        } else {
                            break;
                        }
                    }
                    if name_start < i {
                        spans.push((source[name_start..i].to_string(), name_start, i + 1));
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    spans
}

/// True for A1-style operands (1-3 letters followed by digits).
fn looks_like_cell_ref(text: &str) -> bool {
    let letters = text.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    (1..=3).contains(&letters)
        && text.len() > letters
        && text[letters..].chars().all(|c| c.is_ascii_digit())
}

/// Advance past a double-quoted string literal starting at `i`.
fn skip_string(bytes: &[u8], i: usize) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        if bytes[j] == b'"' {
            // "" is an escaped quote inside the literal
            if j + 1 < bytes.len() && bytes[j + 1] == b'"' {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    j
}

/// Advance past a single-quoted sheet name starting at `i`, returning the
/// index just after the closing quote.
fn skip_quoted_name(bytes: &[u8], i: usize) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        if bytes[j] == b'\'' {
            if j + 1 < bytes.len() && bytes[j + 1] == b'\'' {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    j
}
