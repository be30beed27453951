//! Deterministic parameter selection.
//!
//! The seed is a pure function of (login, attempt): re-invoking for the
//! same login and inputs reproduces the same assignment, which keeps
//! grading review reproducible, while different logins spread across the
//! catalog's domains.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use sheetcheck_model::ParameterAssignment;

use crate::scanner::Catalog;

/// Pick one candidate per token for the given login and attempt number.
///
/// Tokens are visited in catalog (name) order, so the draw sequence is
/// stable for a given catalog shape.
pub fn assignment_for(catalog: &Catalog, login: &str, attempt: u32) -> ParameterAssignment {
    let mut rng = StdRng::from_seed(seed(login, attempt));
    let mut assignment = ParameterAssignment::new();
    for (token, option) in catalog {
        let idx = rng.gen_range(0..option.candidates.len());
        assignment.insert(token, &option.candidates[idx]);
    }
    assignment
}

fn seed(login: &str, attempt: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(login.as_bytes());
    hasher.update(attempt.to_le_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcheck_model::params::DomainKind;
    use sheetcheck_model::ParameterOption;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for (token, candidates) in [
            ("REGION", vec!["North", "South", "East"]),
            ("YEAR", vec!["2022", "2023", "2024", "2025"]),
        ] {
            catalog.insert(
                token.to_string(),
                ParameterOption {
                    token: token.to_string(),
                    kind: DomainKind::Enumerated,
                    candidates: candidates.into_iter().map(str::to_string).collect(),
                },
            );
        }
        catalog
    }

    #[test]
    fn test_same_login_same_assignment() {
        let catalog = catalog();
        let a = assignment_for(&catalog, "k12345678", 0);
        let b = assignment_for(&catalog, "k12345678", 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_attempts_redraw() {
        let catalog = catalog();
        let draws: Vec<_> = (0..8).map(|n| assignment_for(&catalog, "k12345678", n)).collect();
        // 12 combinations; eight attempts must not all collapse to one
        assert!(draws.iter().any(|d| d != &draws[0]));
    }

    #[test]
    fn test_logins_spread_across_domain() {
        let catalog = catalog();
        let mut seen = std::collections::BTreeSet::new();
        for i in 0..40 {
            let login = format!("student{i}");
            let assignment = assignment_for(&catalog, &login, 0);
            seen.insert(assignment.get("REGION").unwrap().to_string());
        }
        assert_eq!(seen.len(), 3, "all candidates should be reachable");
    }

    #[test]
    fn test_values_come_from_domain() {
        let catalog = catalog();
        let assignment = assignment_for(&catalog, "someone", 0);
        assert!(["North", "South", "East"].contains(&assignment.get("REGION").unwrap()));
        assert!(["2022", "2023", "2024", "2025"].contains(&assignment.get("YEAR").unwrap()));
    }
}
