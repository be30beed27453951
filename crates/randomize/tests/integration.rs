use proptest::prelude::*;

use sheetcheck_model::{Cell, CellValue, Document, Sheet, Workbook};
use sheetcheck_randomize::{create, RandomizeError};

fn region_document() -> Document {
    Document::from_paragraphs([
        "Compute the total revenue for the {{REGION}} region.",
        "{{REGION=North|South|East}}",
    ])
}

fn region_workbooks() -> (Workbook, Workbook) {
    let mut instruction = Workbook::new();
    let mut task = Sheet::new("Task");
    task.set_value(0, 0, CellValue::Text("Region: {{REGION}}".to_string()));
    instruction.add_sheet(task).unwrap();

    let mut solution = Workbook::new();
    let mut sheet = Sheet::new("Task");
    sheet.set_value(0, 0, CellValue::Text("Region: {{REGION}}".to_string()));
    sheet.set(
        1,
        0,
        Cell::formula("=SUMIF(A3:A9,\"{{REGION}}\",B3:B9)", CellValue::Number(0.0)),
    );
    solution.add_sheet(sheet).unwrap();
    (instruction, solution)
}

#[test]
fn same_login_reproduces_the_same_bundle() {
    let doc = region_document();
    let (instruction, solution) = region_workbooks();

    let first = create(&doc, &instruction, &solution, "k12345678").unwrap();
    let second = create(&doc, &instruction, &solution, "k12345678").unwrap();
    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.document, second.document);
}

#[test]
fn chosen_literal_is_consistent_across_all_artifacts() {
    let doc = region_document();
    let (instruction, solution) = region_workbooks();

    let bundle = create(&doc, &instruction, &solution, "k12345678").unwrap();
    let region = bundle.assignment.get("REGION").unwrap().to_string();
    assert!(["North", "South", "East"].contains(&region.as_str()));

    // Document: no placeholders remain, exactly the chosen literal appears
    assert!(bundle.document.find_placeholders().is_empty());
    let text = bundle.document.blocks[0].text();
    assert!(text.contains(&region));
    for other in ["North", "South", "East"] {
        if other != region {
            assert!(!text.contains(other));
        }
    }

    // Instruction workbook text cell
    let cell = bundle.instruction_workbook.sheet(0).unwrap().value(0, 0);
    assert!(matches!(cell, CellValue::Text(t) if t == format!("Region: {region}")));

    // Solution workbook formula text
    let formula = bundle.solution_workbook.get_formula(0, 1, 0).unwrap();
    assert!(formula.source().contains(&region));
    assert!(!formula.source().contains("{{"));
}

#[test]
fn declaration_paragraph_is_stripped() {
    let doc = region_document();
    let (instruction, solution) = region_workbooks();

    let bundle = create(&doc, &instruction, &solution, "k12345678").unwrap();
    assert_eq!(bundle.document.blocks.len(), 1);
}

#[test]
fn sheet_choice_retries_past_broken_draws() {
    // The solution's answer formula addresses the South variant
    // specifically, so any draw picking North strands it with #REF! and
    // must be retried.
    let doc = Document::from_paragraphs(["Work with the {{DATA}} sheet."]);

    let mut solution = Workbook::new();
    let mut summary = Sheet::new("Summary");
    summary.set(
        0,
        0,
        Cell::formula("=SUM('DATA-South'!B1:B3)", CellValue::Number(6.0)),
    );
    solution.add_sheet(summary).unwrap();
    for name in ["DATA-North", "DATA-South"] {
        let mut sheet = Sheet::new(name);
        for row in 0..3 {
            sheet.set_value(row, 1, CellValue::Number((row + 1) as f64));
        }
        solution.add_sheet(sheet).unwrap();
    }
    let instruction = solution.clone();

    let bundle = create(&doc, &instruction, &solution, "k12345678").unwrap();

    // Only the surviving draw is valid
    assert_eq!(bundle.assignment.get("DATA"), Some("DATA-South"));
    assert_eq!(bundle.solution_workbook.sheet_names(), vec!["Summary", "DATA"]);
    let formula = bundle.solution_workbook.get_formula(0, 0, 0).unwrap();
    assert_eq!(formula.source(), "=SUM(DATA!B1:B3)");
    for ac in bundle.solution_workbook.answer_cells() {
        let value = bundle.solution_workbook.sheet(ac.sheet).unwrap().value(ac.row, ac.col);
        assert!(!value.is_error());
    }
}

#[test]
fn exhausted_attempts_surface_as_failure() {
    let doc = Document::from_paragraphs(["Use {{DATA}}."]);
    let mut solution = Workbook::new();
    let mut summary = Sheet::new("Summary");
    summary.set(0, 0, Cell::formula("='DATA-Missing'!A1", CellValue::Number(1.0)));
    solution.add_sheet(summary).unwrap();
    solution.add_sheet(Sheet::new("DATA-1")).unwrap();
    let instruction = solution.clone();

    let err = create(&doc, &instruction, &solution, "k12345678").unwrap_err();
    assert!(matches!(err, RandomizeError::AttemptsExhausted { .. }));
}

#[test]
fn inputs_are_never_mutated() {
    let doc = region_document();
    let (instruction, solution) = region_workbooks();
    let doc_before = doc.clone();
    let solution_cell_before = solution.sheet(0).unwrap().value(0, 0).display();

    let _ = create(&doc, &instruction, &solution, "k12345678").unwrap();

    assert_eq!(doc, doc_before);
    assert_eq!(solution.sheet(0).unwrap().value(0, 0).display(), solution_cell_before);
}

proptest! {
    #[test]
    fn assignment_is_deterministic_per_login(login in "[a-z][a-z0-9]{0,11}") {
        let doc = region_document();
        let (instruction, solution) = region_workbooks();
        let a = create(&doc, &instruction, &solution, &login).unwrap();
        let b = create(&doc, &instruction, &solution, &login).unwrap();
        prop_assert_eq!(a.assignment, b.assignment);
    }
}
