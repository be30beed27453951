//! `sheetcheck-api` — the two operations the surrounding service calls.
//!
//! Both accept opaque byte buffers in the native spreadsheet and
//! word-processor formats and return fresh byte buffers plus structured
//! results. Persistence, access control and HTTP exposure are the
//! caller's concern.

use std::fmt;

use serde::{Deserialize, Serialize};

use sheetcheck_io::{docx, xlsx, DecodeError};
use sheetcheck_randomize::RandomizeError;
use sheetcheck_rules::{Feedback, GradingOptions};

/// The generated triple for one student, re-encoded in source formats and
/// tagged by the requesting login for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomInstruction {
    pub document: Vec<u8>,
    pub instruction_workbook: Vec<u8>,
    pub solution_workbook: Vec<u8>,
    pub login: String,
}

#[derive(Debug)]
pub enum InstructionError {
    Decode(DecodeError),
    Randomize(RandomizeError),
}

impl fmt::Display for InstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "{e}"),
            Self::Randomize(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Randomize(e) => Some(e),
        }
    }
}

impl From<DecodeError> for InstructionError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<RandomizeError> for InstructionError {
    fn from(e: RandomizeError) -> Self {
        Self::Randomize(e)
    }
}

/// Grade a submission workbook against a solution workbook.
///
/// An incorrect submission is an ordinary `Feedback`; only malformed
/// bytes fail.
pub fn run_correction(solution: &[u8], submission: &[u8]) -> Result<Feedback, DecodeError> {
    run_correction_with(solution, submission, &GradingOptions::default())
}

/// `run_correction` with explicit rule selection and scoring policy.
pub fn run_correction_with(
    solution: &[u8],
    submission: &[u8],
    options: &GradingOptions,
) -> Result<Feedback, DecodeError> {
    let solution = xlsx::decode(solution)?;
    let submission = xlsx::decode(submission)?;
    Ok(sheetcheck_rules::run(&solution, &submission, options))
}

/// Generate a personalized instruction bundle for one student.
pub fn create_instruction(
    document: &[u8],
    instruction_workbook: &[u8],
    solution_workbook: &[u8],
    login: &str,
) -> Result<RandomInstruction, InstructionError> {
    let doc = docx::decode(document)?;
    let instruction = xlsx::decode(instruction_workbook)?;
    let solution = xlsx::decode(solution_workbook)?;

    let bundle = sheetcheck_randomize::create(&doc, &instruction, &solution, login)?;

    Ok(RandomInstruction {
        document: docx::encode(document, &bundle.document)?,
        instruction_workbook: xlsx::encode(&bundle.instruction_workbook)?,
        solution_workbook: xlsx::encode(&bundle.solution_workbook)?,
        login: bundle.login,
    })
}
