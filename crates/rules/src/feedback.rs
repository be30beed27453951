use serde::{Deserialize, Serialize};

/// The sole output of a correction run. Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub is_correct: bool,
    pub text: String,
}

impl Feedback {
    pub fn new(is_correct: bool, lines: Vec<String>) -> Self {
        Self {
            is_correct,
            text: lines.join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_concatenated_in_order() {
        let fb = Feedback::new(false, vec!["first".into(), "second".into()]);
        assert_eq!(fb.text, "first\nsecond");
        assert!(!fb.is_correct);
    }
}
