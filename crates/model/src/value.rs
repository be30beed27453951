use serde::{Deserialize, Serialize};

/// Formula error sentinels carried over from the source file.
///
/// These are recalculated results, not conditions raised by this engine.
/// They form a distinct value kind and are never coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Div0,
    Ref,
    Value,
    Na,
    Name,
    Num,
    Null,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Div0 => "#DIV/0!",
            ErrorKind::Ref => "#REF!",
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Na => "#N/A",
            ErrorKind::Name => "#NAME?",
            ErrorKind::Num => "#NUM!",
            ErrorKind::Null => "#NULL!",
        }
    }

    pub fn parse(text: &str) -> Option<ErrorKind> {
        match text {
            "#DIV/0!" => Some(ErrorKind::Div0),
            "#REF!" => Some(ErrorKind::Ref),
            "#VALUE!" => Some(ErrorKind::Value),
            "#N/A" => Some(ErrorKind::Na),
            "#NAME?" => Some(ErrorKind::Name),
            "#NUM!" => Some(ErrorKind::Num),
            "#NULL!" => Some(ErrorKind::Null),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Error(ErrorKind),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Build a value from a cached textual result.
    ///
    /// Recognizes error sentinels, booleans and numbers; everything else
    /// stays text. Whitespace-only input is `Empty`.
    pub fn from_cached(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Some(kind) = ErrorKind::parse(trimmed) {
            return CellValue::Error(kind);
        }
        match trimmed {
            "TRUE" => return CellValue::Bool(true),
            "FALSE" => return CellValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return CellValue::Number(n);
        }
        CellValue::Text(trimmed.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Display form, matching how the value appears in a grid.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(kind) => kind.as_str().to_string(),
        }
    }
}

/// Tolerance for comparing recalculated numbers from different engines.
const ABS_EPSILON: f64 = 1e-9;
const REL_EPSILON: f64 = 1e-9;

/// Value equality as used by the correction rules.
///
/// Numbers are equal within a small relative/absolute epsilon to tolerate
/// floating-point recalculation drift. `Empty` is distinct from zero and
/// from the empty string. Error sentinels only equal the same sentinel.
pub fn values_equal(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Empty, CellValue::Empty) => true,
        (CellValue::Number(x), CellValue::Number(y)) => {
            let scale = x.abs().max(y.abs());
            (x - y).abs() <= ABS_EPSILON.max(REL_EPSILON * scale)
        }
        (CellValue::Text(x), CellValue::Text(y)) => x == y,
        (CellValue::Bool(x), CellValue::Bool(y)) => x == y,
        (CellValue::Error(x), CellValue::Error(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cached_recognizes_kinds() {
        assert!(matches!(CellValue::from_cached(""), CellValue::Empty));
        assert!(matches!(CellValue::from_cached("  "), CellValue::Empty));
        assert!(matches!(CellValue::from_cached("42"), CellValue::Number(n) if n == 42.0));
        assert!(matches!(CellValue::from_cached("TRUE"), CellValue::Bool(true)));
        assert!(matches!(
            CellValue::from_cached("#DIV/0!"),
            CellValue::Error(ErrorKind::Div0)
        ));
        assert!(matches!(CellValue::from_cached("North"), CellValue::Text(_)));
    }

    #[test]
    fn test_numbers_equal_within_epsilon() {
        let a = CellValue::Number(0.1 + 0.2);
        let b = CellValue::Number(0.3);
        assert!(values_equal(&a, &b));

        let c = CellValue::Number(1_000_000.0);
        let d = CellValue::Number(1_000_000.0000001);
        assert!(values_equal(&c, &d));

        let e = CellValue::Number(1.0);
        let f = CellValue::Number(1.001);
        assert!(!values_equal(&e, &f));
    }

    #[test]
    fn test_empty_is_not_zero() {
        assert!(!values_equal(&CellValue::Empty, &CellValue::Number(0.0)));
        assert!(!values_equal(&CellValue::Empty, &CellValue::Text(String::new())));
    }

    #[test]
    fn test_errors_never_coerce() {
        let err = CellValue::Error(ErrorKind::Ref);
        assert!(!values_equal(&err, &CellValue::Number(0.0)));
        assert!(!values_equal(&err, &CellValue::Error(ErrorKind::Div0)));
        assert!(values_equal(&err, &CellValue::Error(ErrorKind::Ref)));
    }

    #[test]
    fn test_error_sentinel_round_trip() {
        for kind in [
            ErrorKind::Div0,
            ErrorKind::Ref,
            ErrorKind::Value,
            ErrorKind::Na,
            ErrorKind::Name,
            ErrorKind::Num,
            ErrorKind::Null,
        ] {
            assert_eq!(ErrorKind::parse(kind.as_str()), Some(kind));
        }
    }
}
