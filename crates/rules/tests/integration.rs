use sheetcheck_model::{Cell, CellValue, ErrorKind, Sheet, Workbook};
use sheetcheck_rules::{run, GradingOptions};

fn sum_exercise_solution() -> Workbook {
    let mut wb = Workbook::new();
    let mut sheet = Sheet::new("Task");
    sheet.set_value(0, 1, CellValue::Number(1.0));
    sheet.set_value(1, 1, CellValue::Number(2.0));
    sheet.set_value(2, 1, CellValue::Number(3.0));
    sheet.set(3, 1, Cell::formula("=SUM(B1:B3)", CellValue::Number(6.0)));
    wb.add_sheet(sheet).unwrap();
    wb
}

#[test]
fn solution_against_itself_is_correct() {
    let solution = sum_exercise_solution();
    let feedback = run(&solution, &solution, &GradingOptions::default());
    assert!(feedback.is_correct, "{}", feedback.text);
}

#[test]
fn missing_sheet_is_a_structural_mismatch_not_a_panic() {
    let solution = sum_exercise_solution();
    let submission = Workbook::new();

    let feedback = run(&solution, &submission, &GradingOptions::default());
    assert!(!feedback.is_correct);
    assert!(feedback.text.contains("Structural mismatch"));
}

#[test]
fn hardcoded_literal_fails_formula_usage_despite_correct_value() {
    let solution = sum_exercise_solution();
    let mut submission = Workbook::new();
    let mut sheet = Sheet::new("Task");
    sheet.set_value(0, 1, CellValue::Number(1.0));
    sheet.set_value(1, 1, CellValue::Number(2.0));
    sheet.set_value(2, 1, CellValue::Number(3.0));
    sheet.set_value(3, 1, CellValue::Number(6.0));
    submission.add_sheet(sheet).unwrap();

    let feedback = run(&solution, &submission, &GradingOptions::default());
    assert!(!feedback.is_correct);
    assert!(feedback.text.contains("SUM"), "feedback names the technique: {}", feedback.text);
}

#[test]
fn division_by_zero_is_reported_as_computation_error() {
    let solution = sum_exercise_solution();
    let mut submission = Workbook::new();
    let mut sheet = Sheet::new("Task");
    sheet.set_value(0, 1, CellValue::Number(1.0));
    sheet.set_value(1, 1, CellValue::Number(2.0));
    sheet.set_value(2, 1, CellValue::Number(3.0));
    sheet.set(3, 1, Cell::formula("=SUM(B1:B3)/C1", CellValue::Error(ErrorKind::Div0)));
    submission.add_sheet(sheet).unwrap();

    let feedback = run(&solution, &submission, &GradingOptions::default());
    assert!(!feedback.is_correct);
    assert!(feedback.text.contains("computation error"));
}

#[test]
fn feedback_lines_follow_rule_order() {
    let solution = sum_exercise_solution();
    let mut submission = Workbook::new();
    let mut sheet = Sheet::new("Task");
    // Wrong value and no formula: both rules produce a finding
    sheet.set_value(3, 1, CellValue::Number(5.0));
    submission.add_sheet(sheet).unwrap();

    let feedback = run(&solution, &submission, &GradingOptions::default());
    assert!(!feedback.is_correct);
    let lines: Vec<&str> = feedback.text.lines().collect();
    let value_line = lines.iter().position(|l| l.contains("expected 6")).unwrap();
    let usage_line = lines.iter().position(|l| l.contains("SUM")).unwrap();
    assert!(value_line < usage_line);
}
