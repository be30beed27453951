//! Randomization orchestration: scan, select, substitute, validate.
//!
//! Each attempt stages fresh clones of the document and workbooks, applies
//! one deterministic draw, and post-validates the solution's answer cells.
//! A draw that introduces a formula-error sentinel is discarded and
//! redrawn, bounded by `MAX_ATTEMPTS`.

use serde::{Deserialize, Serialize};

use sheetcheck_model::params::DomainKind;
use sheetcheck_model::{CellValue, Document, ParameterAssignment, Workbook};

use crate::error::RandomizeError;
use crate::scanner::{self, Catalog};
use crate::select;

/// Upper bound on redraws when a draw breaks the solution workbook.
pub const MAX_ATTEMPTS: usize = 10;

/// The generated, internally consistent triple for one student, tagged by
/// the requesting login for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomBundle {
    pub document: Document,
    pub instruction_workbook: Workbook,
    pub solution_workbook: Workbook,
    pub assignment: ParameterAssignment,
    pub login: String,
}

/// Generate a personalized instruction bundle.
///
/// The caller's inputs are never mutated; every attempt operates on
/// staged clones that are discarded on failure.
pub fn create(
    document: &Document,
    instruction_workbook: &Workbook,
    solution_workbook: &Workbook,
    login: &str,
) -> Result<RandomBundle, RandomizeError> {
    let catalog = scanner::scan(document, instruction_workbook, solution_workbook)?;
    if catalog.is_empty() {
        return Err(RandomizeError::EmptyCatalog);
    }

    for attempt in 0..MAX_ATTEMPTS {
        let assignment = select::assignment_for(&catalog, login, attempt as u32);
        let staged = stage(document, instruction_workbook, solution_workbook, &catalog, &assignment)?;
        let (doc, instruction, solution) = staged;

        if solution_is_sound(&solution) {
            return Ok(RandomBundle {
                document: doc,
                instruction_workbook: instruction,
                solution_workbook: solution,
                assignment,
                login: login.to_string(),
            });
        }
    }
    Err(RandomizeError::AttemptsExhausted { attempts: MAX_ATTEMPTS })
}

/// Apply one assignment to staged clones of all three artifacts.
fn stage(
    document: &Document,
    instruction_workbook: &Workbook,
    solution_workbook: &Workbook,
    catalog: &Catalog,
    assignment: &ParameterAssignment,
) -> Result<(Document, Workbook, Workbook), RandomizeError> {
    let stripped = Document {
        blocks: document
            .blocks
            .iter()
            .filter(|b| scanner::parse_declaration(b).is_none())
            .cloned()
            .collect(),
    };
    let doc = stripped.substitute(assignment)?;

    let mut instruction = instruction_workbook.clone();
    let mut solution = solution_workbook.clone();
    for (token, option) in catalog {
        if option.kind == DomainKind::SheetChoice {
            let chosen = assignment
                .get(token)
                .ok_or_else(|| RandomizeError::MissingParameter(token.clone()))?;
            instruction.choose_sheet(token, chosen);
            solution.choose_sheet(token, chosen);
        }
    }
    instruction
        .apply_assignment(assignment)
        .map_err(RandomizeError::MissingParameter)?;
    solution
        .apply_assignment(assignment)
        .map_err(RandomizeError::MissingParameter)?;

    Ok((doc, instruction, solution))
}

/// Post-validation: no answer cell of the staged solution may hold an
/// error sentinel or a formula addressing a sheet that no longer exists.
fn solution_is_sound(solution: &Workbook) -> bool {
    for ac in solution.answer_cells() {
        let Some(sheet) = solution.sheet(ac.sheet) else {
            return false;
        };
        if let CellValue::Error(_) = sheet.value(ac.row, ac.col) {
            return false;
        }
        if let Some(formula) = solution.get_formula(ac.sheet, ac.row, ac.col) {
            for name in formula.sheet_refs() {
                if solution.sheet_index(&name).is_none() {
                    return false;
                }
            }
        }
    }
    true
}
