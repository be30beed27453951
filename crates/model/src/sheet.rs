use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::params::{self, ParameterAssignment};
use crate::value::CellValue;

/// A sparse grid of cells addressed by (row, col), zero-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    cells: FxHashMap<(u32, u32), Cell>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: FxHashMap::default(),
        }
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// The cell's value; absent cells read as `Empty`.
    pub fn value(&self, row: u32, col: u32) -> CellValue {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    pub fn set(&mut self, row: u32, col: u32, cell: Cell) {
        self.cells.insert((row, col), cell);
    }

    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        self.cells.insert((row, col), Cell::value(value));
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u32), &Cell)> {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (&(u32, u32), &mut Cell)> {
        self.cells.iter_mut()
    }

    /// Cells in row-major order, for deterministic encoding and display.
    pub fn sorted_cells(&self) -> Vec<((u32, u32), &Cell)> {
        let mut out: Vec<_> = self.cells.iter().map(|(pos, cell)| (*pos, cell)).collect();
        out.sort_by_key(|(pos, _)| *pos);
        out
    }

    /// Replace placeholder tokens in text values and formula sources.
    ///
    /// Returns the name of the first token without an assignment entry.
    pub fn apply_assignment(&mut self, assignment: &ParameterAssignment) -> Result<(), String> {
        for cell in self.cells.values_mut() {
            if let CellValue::Text(text) = &cell.value {
                if text.contains(params::TOKEN_OPEN) {
                    let replaced = params::substitute_text(text, assignment)?;
                    cell.value = CellValue::from_cached(&replaced);
                }
            }
            if let Some(formula) = &cell.formula {
                if formula.source().contains(params::TOKEN_OPEN) {
                    let replaced = params::substitute_text(formula.source(), assignment)?;
                    cell.formula = Some(crate::cell::Formula::new(&replaced));
                }
            }
        }
        Ok(())
    }
}
