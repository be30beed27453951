//! Builds the token -> candidate-domain catalog.
//!
//! A token's domain comes from one of two places: a declaration paragraph
//! in the instruction document (`{{TOKEN=a|b|c}}`), or — for sheet-choice
//! tokens — the set of `TOKEN-variant` alternative sheets present in the
//! companion workbooks.

use std::collections::BTreeMap;

use sheetcheck_model::params::{is_token_name, DomainKind, TOKEN_CLOSE, TOKEN_OPEN};
use sheetcheck_model::{Block, Document, ParameterOption, Workbook};

use crate::error::RandomizeError;

/// Token -> domain, ordered by token name so selection order is stable.
pub type Catalog = BTreeMap<String, ParameterOption>;

/// Scan the instruction document and companion workbooks.
///
/// Fails with `MissingParameter` if any discovered placeholder's domain
/// is empty or unresolved.
pub fn scan(
    document: &Document,
    instruction_workbook: &Workbook,
    solution_workbook: &Workbook,
) -> Result<Catalog, RandomizeError> {
    let mut declared: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for block in &document.blocks {
        if let Some((token, candidates)) = parse_declaration(block) {
            declared.insert(token, candidates);
        }
    }

    let mut catalog = Catalog::new();
    for token in document.find_placeholders() {
        let option = if let Some(candidates) = declared.get(&token) {
            ParameterOption {
                token: token.clone(),
                kind: DomainKind::Enumerated,
                candidates: candidates.clone(),
            }
        } else {
            let candidates = sheet_family(&token, instruction_workbook, solution_workbook);
            if candidates.is_empty() {
                return Err(RandomizeError::MissingParameter(token));
            }
            ParameterOption {
                token: token.clone(),
                kind: DomainKind::SheetChoice,
                candidates,
            }
        };
        if option.candidates.is_empty() {
            return Err(RandomizeError::MissingParameter(token));
        }
        catalog.insert(token, option);
    }
    Ok(catalog)
}

/// Parse a domain declaration paragraph: `{{TOKEN=a|b|c}}`.
///
/// Returns `None` for ordinary paragraphs. Blank candidates are dropped.
pub fn parse_declaration(block: &Block) -> Option<(String, Vec<String>)> {
    let text = block.text();
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix(TOKEN_OPEN)?
        .strip_suffix(TOKEN_CLOSE)?;
    let (token, list) = inner.split_once('=')?;
    if !is_token_name(token) {
        return None;
    }
    let candidates: Vec<String> = list
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    Some((token.to_string(), candidates))
}

/// Alternative sheet names for a sheet-choice token, in workbook order.
/// Both workbooks contribute; duplicates collapse.
fn sheet_family(token: &str, instruction: &Workbook, solution: &Workbook) -> Vec<String> {
    let prefix = format!("{}-", token);
    let mut names = Vec::new();
    for workbook in [instruction, solution] {
        for sheet_name in workbook.sheet_names() {
            if sheet_name.starts_with(&prefix) && !names.iter().any(|n| n == sheet_name) {
                names.push(sheet_name.to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcheck_model::Sheet;

    fn workbook_with_sheets(names: &[&str]) -> Workbook {
        let mut wb = Workbook::new();
        for name in names {
            wb.add_sheet(Sheet::new(name)).unwrap();
        }
        wb
    }

    #[test]
    fn test_enumerated_domain() {
        let doc = Document::from_paragraphs([
            "Report sales for {{REGION}}.",
            "{{REGION=North|South|East}}",
        ]);
        let empty = Workbook::new();
        let catalog = scan(&doc, &empty, &empty).unwrap();

        let option = &catalog["REGION"];
        assert_eq!(option.kind, DomainKind::Enumerated);
        assert_eq!(option.candidates, vec!["North", "South", "East"]);
    }

    #[test]
    fn test_sheet_choice_domain() {
        let doc = Document::from_paragraphs(["Use the {{DATA}} sheet."]);
        let instruction = workbook_with_sheets(&["Summary", "DATA-1", "DATA-2"]);
        let solution = workbook_with_sheets(&["Summary", "DATA-1", "DATA-2", "DATA-3"]);
        let catalog = scan(&doc, &instruction, &solution).unwrap();

        let option = &catalog["DATA"];
        assert_eq!(option.kind, DomainKind::SheetChoice);
        assert_eq!(option.candidates, vec!["DATA-1", "DATA-2", "DATA-3"]);
    }

    #[test]
    fn test_unresolved_token_fails() {
        let doc = Document::from_paragraphs(["{{MYSTERY}}"]);
        let empty = Workbook::new();
        let err = scan(&doc, &empty, &empty).unwrap_err();
        assert!(matches!(err, RandomizeError::MissingParameter(t) if t == "MYSTERY"));
    }

    #[test]
    fn test_declaration_with_only_blanks_fails() {
        let doc = Document::from_paragraphs(["{{REGION}}", "{{REGION=| |}}"]);
        let empty = Workbook::new();
        let err = scan(&doc, &empty, &empty).unwrap_err();
        assert!(matches!(err, RandomizeError::MissingParameter(t) if t == "REGION"));
    }

    #[test]
    fn test_unused_declaration_ignored() {
        let doc = Document::from_paragraphs(["No placeholders here.", "{{REGION=North|South}}"]);
        let empty = Workbook::new();
        let catalog = scan(&doc, &empty, &empty).unwrap();
        assert!(catalog.is_empty());
    }
}
