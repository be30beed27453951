use std::fmt;

use sheetcheck_model::SubstituteError;

#[derive(Debug)]
pub enum RandomizeError {
    /// A discovered placeholder has no resolvable candidate domain, or a
    /// token found during substitution has no assigned value.
    MissingParameter(String),
    /// The instruction document declares no substitutable parameters.
    EmptyCatalog,
    /// Every bounded attempt produced a formula error in an answer cell.
    AttemptsExhausted { attempts: usize },
}

impl fmt::Display for RandomizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter(token) => {
                write!(f, "parameter '{token}' has no resolvable value")
            }
            Self::EmptyCatalog => write!(f, "instruction document declares no parameters"),
            Self::AttemptsExhausted { attempts } => {
                write!(f, "no valid instruction after {attempts} attempt(s)")
            }
        }
    }
}

impl std::error::Error for RandomizeError {}

impl From<SubstituteError> for RandomizeError {
    fn from(err: SubstituteError) -> Self {
        match err {
            SubstituteError::MissingParameter(token) => Self::MissingParameter(token),
        }
    }
}
