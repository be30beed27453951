use serde::{Deserialize, Serialize};

use crate::cell::Formula;
use crate::params::ParameterAssignment;
use crate::sheet::Sheet;
use crate::value::{CellValue, ErrorKind};

/// Ordered collection of sheets. Order is significant: corrections compare
/// sheets position by position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

/// Position of a designated answer cell within a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCell {
    pub sheet: usize,
    pub row: u32,
    pub col: u32,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet. Names must be unique within the workbook; a
    /// duplicate is rejected.
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<(), String> {
        if self.sheet_index(&sheet.name).is_some() {
            return Err(format!("duplicate sheet name '{}'", sheet.name));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn get_cell(&self, sheet: usize, row: u32, col: u32) -> Option<&crate::cell::Cell> {
        self.sheets.get(sheet).and_then(|s| s.get(row, col))
    }

    pub fn get_formula(&self, sheet: usize, row: u32, col: u32) -> Option<&Formula> {
        self.get_cell(sheet, row, col).and_then(|c| c.formula.as_ref())
    }

    /// The designated answer cells: every formula-bearing cell, in sheet
    /// order then row-major order.
    pub fn answer_cells(&self) -> Vec<AnswerCell> {
        let mut out = Vec::new();
        for (sheet_idx, sheet) in self.sheets.iter().enumerate() {
            for ((row, col), cell) in sheet.sorted_cells() {
                if cell.formula.is_some() {
                    out.push(AnswerCell { sheet: sheet_idx, row, col });
                }
            }
        }
        out
    }

    /// Replace placeholder tokens in every sheet's text values and formula
    /// sources. Returns the first unresolved token name on failure.
    pub fn apply_assignment(&mut self, assignment: &ParameterAssignment) -> Result<(), String> {
        for sheet in &mut self.sheets {
            sheet.apply_assignment(assignment)?;
        }
        Ok(())
    }

    /// Collapse a sheet-choice family: keep `chosen`, rename it to the
    /// bare `token`, drop the other `token-*` alternatives, and rewrite
    /// formula references accordingly.
    ///
    /// Formulas that still reference a dropped sibling have their cached
    /// value replaced by the `#REF!` sentinel, which post-validation
    /// treats as a failed draw.
    pub fn choose_sheet(&mut self, token: &str, chosen: &str) {
        let family_prefix = format!("{}-", token);
        let dropped: Vec<String> = self
            .sheets
            .iter()
            .filter(|s| s.name.starts_with(&family_prefix) && s.name != chosen)
            .map(|s| s.name.clone())
            .collect();

        self.sheets
            .retain(|s| !s.name.starts_with(&family_prefix) || s.name == chosen);

        let chosen_name = chosen.to_string();
        for sheet in &mut self.sheets {
            if sheet.name == chosen_name {
                sheet.name = token.to_string();
            }
        }

        for sheet in &mut self.sheets {
            for (_, cell) in sheet.cells_mut() {
                let Some(formula) = cell.formula.as_mut() else {
                    continue;
                };
                formula.rewrite_sheet(&chosen_name, token);
                let refs = formula.sheet_refs();
                if refs.iter().any(|r| dropped.iter().any(|d| d == r)) {
                    cell.value = CellValue::Error(ErrorKind::Ref);
                }
            }
        }
    }

    /// Sheet names referenced by formulas but absent from the workbook.
    pub fn dangling_sheet_refs(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for sheet in &self.sheets {
            for (_, cell) in sheet.cells() {
                if let Some(formula) = &cell.formula {
                    for name in formula.sheet_refs() {
                        if self.sheet_index(&name).is_none() && !missing.contains(&name) {
                            missing.push(name);
                        }
                    }
                }
            }
        }
        missing
    }
}
