//! The individual correctness checks.
//!
//! Each rule is a pure function of (solution, submission): no mutable
//! state, identical results for identical inputs. Once the structural rule
//! has passed, no rule fails with an exception for data-shape reasons —
//! anomalies like an unexpectedly empty answer cell are reported as
//! ordinary incorrect findings.

use sheetcheck_model::{refs, values_equal, CellValue, Workbook};

/// Rule kinds, in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Sheet count/order compatibility and positional layout. Failure
    /// short-circuits the engine.
    SheetStructure,
    /// Submission answer-cell values match the solution within epsilon.
    ValueEquality,
    /// Answer cells use the technique (functions) the solution uses.
    FormulaUsage,
}

/// What one rule found: per-check tallies plus its feedback lines.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub passed: bool,
    pub checks: usize,
    pub failures: usize,
    pub messages: Vec<String>,
}

impl RuleOutcome {
    fn pass(checks: usize, message: String) -> Self {
        Self { passed: true, checks, failures: 0, messages: vec![message] }
    }

    fn fail(checks: usize, failures: usize, messages: Vec<String>) -> Self {
        Self { passed: false, checks, failures, messages }
    }
}

impl RuleKind {
    pub fn evaluate(&self, solution: &Workbook, submission: &Workbook) -> RuleOutcome {
        match self {
            RuleKind::SheetStructure => structural(solution, submission),
            RuleKind::ValueEquality => value_equality(solution, submission),
            RuleKind::FormulaUsage => formula_usage(solution, submission),
        }
    }
}

fn address(solution: &Workbook, sheet: usize, row: u32, col: u32) -> String {
    let name = solution
        .sheet(sheet)
        .map(|s| s.name.as_str())
        .unwrap_or("?");
    format!("{}!{}", name, refs::cell_address(row, col))
}

/// Sheet count and per-position sheet names must match. Downstream rules
/// compare cells positionally and rely on this.
fn structural(solution: &Workbook, submission: &Workbook) -> RuleOutcome {
    if solution.sheet_count() != submission.sheet_count() {
        return RuleOutcome::fail(
            1,
            1,
            vec![format!(
                "Structural mismatch: expected {} sheet(s), the submission has {}.",
                solution.sheet_count(),
                submission.sheet_count()
            )],
        );
    }
    for (idx, expected) in solution.sheets().iter().enumerate() {
        let found = &submission.sheets()[idx];
        if expected.name != found.name {
            return RuleOutcome::fail(
                1,
                1,
                vec![format!(
                    "Structural mismatch: sheet {} should be named '{}', found '{}'.",
                    idx + 1,
                    expected.name,
                    found.name
                )],
            );
        }
    }
    RuleOutcome::pass(1, "Workbook structure matches the expected layout.".to_string())
}

/// Compare each answer cell's recalculated value against the solution.
/// A formula-error sentinel in the submission is a distinct finding, not
/// an unequal number.
fn value_equality(solution: &Workbook, submission: &Workbook) -> RuleOutcome {
    let answer_cells = solution.answer_cells();
    let mut messages = Vec::new();
    let mut failures = 0;

    for ac in &answer_cells {
        let expected = solution
            .sheet(ac.sheet)
            .map(|s| s.value(ac.row, ac.col))
            .unwrap_or(CellValue::Empty);
        let found = submission
            .sheet(ac.sheet)
            .map(|s| s.value(ac.row, ac.col))
            .unwrap_or(CellValue::Empty);

        if let CellValue::Error(kind) = &found {
            // Not an unequal number: a distinct finding. A solution
            // carrying the identical sentinel still compares clean.
            if !values_equal(&expected, &found) {
                failures += 1;
                messages.push(format!(
                    "Cell {}: the formula produced a computation error ({}).",
                    address(solution, ac.sheet, ac.row, ac.col),
                    kind.as_str()
                ));
            }
            continue;
        }
        if !values_equal(&expected, &found) {
            failures += 1;
            messages.push(format!(
                "Cell {}: expected {}, found {}.",
                address(solution, ac.sheet, ac.row, ac.col),
                describe(&expected),
                describe(&found)
            ));
        }
    }

    if failures == 0 {
        RuleOutcome::pass(
            answer_cells.len(),
            "All answer cells hold the expected values.".to_string(),
        )
    } else {
        RuleOutcome::fail(answer_cells.len(), failures, messages)
    }
}

/// Require the submission to reach each answer value by formula, using
/// every function the solution formula uses. A correct value typed in as
/// a literal still fails here.
fn formula_usage(solution: &Workbook, submission: &Workbook) -> RuleOutcome {
    let mut messages = Vec::new();
    let mut checks = 0;
    let mut failures = 0;

    for ac in solution.answer_cells() {
        let Some(required) = solution.get_formula(ac.sheet, ac.row, ac.col) else {
            continue;
        };
        let required_functions = required.functions();
        if required_functions.is_empty() {
            continue;
        }
        checks += 1;

        let found = submission.get_formula(ac.sheet, ac.row, ac.col);
        let missing: Vec<&str> = match found {
            Some(formula) => {
                let used = formula.functions();
                required_functions
                    .iter()
                    .filter(|f| !used.contains(*f))
                    .map(|f| f.as_str())
                    .collect()
            }
            None => required_functions.iter().map(|f| f.as_str()).collect(),
        };

        if !missing.is_empty() {
            failures += 1;
            let technique = missing.join(", ");
            match found {
                Some(_) => messages.push(format!(
                    "Cell {}: the formula must use {}.",
                    address(solution, ac.sheet, ac.row, ac.col),
                    technique
                )),
                None => messages.push(format!(
                    "Cell {}: a formula using {} is required, not a literal value.",
                    address(solution, ac.sheet, ac.row, ac.col),
                    technique
                )),
            }
        }
    }

    if failures == 0 {
        RuleOutcome::pass(checks, "The required formulas are used.".to_string())
    } else {
        RuleOutcome::fail(checks, failures, messages)
    }
}

fn describe(value: &CellValue) -> String {
    match value {
        CellValue::Empty => "an empty cell".to_string(),
        CellValue::Text(s) => format!("'{}'", s),
        other => other.display(),
    }
}
