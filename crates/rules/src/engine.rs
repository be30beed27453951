use sheetcheck_model::Workbook;

use crate::feedback::Feedback;
use crate::rule::RuleKind;

/// How individual rule verdicts aggregate into the overall verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScorePolicy {
    /// Strict AND: every check of every rule must pass.
    AllChecks,
    /// Partial credit: the fraction of passed checks must reach
    /// `pass_mark` (0..=1). Opt-in; never assumed.
    Weighted { pass_mark: f64 },
}

#[derive(Debug, Clone)]
pub struct GradingOptions {
    /// Rules in evaluation order. `SheetStructure` short-circuits.
    pub rules: Vec<RuleKind>,
    pub policy: ScorePolicy,
}

impl Default for GradingOptions {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleKind::SheetStructure,
                RuleKind::ValueEquality,
                RuleKind::FormulaUsage,
            ],
            policy: ScorePolicy::AllChecks,
        }
    }
}

/// Decide correctness of a submission against a solution.
///
/// Malformed inputs fail earlier at decode time; this function never
/// fails — an incorrect submission is an ordinary `Feedback` value.
pub fn run(solution: &Workbook, submission: &Workbook, options: &GradingOptions) -> Feedback {
    let mut lines = Vec::new();
    let mut total_checks = 0usize;
    let mut total_failures = 0usize;

    for kind in &options.rules {
        let outcome = kind.evaluate(solution, submission);
        if *kind == RuleKind::SheetStructure && !outcome.passed {
            // Downstream rules assume positional compatibility
            return Feedback::new(false, outcome.messages);
        }
        total_checks += outcome.checks;
        total_failures += outcome.failures;
        lines.extend(outcome.messages);
    }

    let is_correct = match options.policy {
        ScorePolicy::AllChecks => total_failures == 0,
        ScorePolicy::Weighted { pass_mark } => {
            if total_checks == 0 {
                true
            } else {
                let score = (total_checks - total_failures) as f64 / total_checks as f64;
                score >= pass_mark
            }
        }
    };

    Feedback::new(is_correct, lines)
}
