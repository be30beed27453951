//! `sheetcheck-model` — in-memory workbook and document models.
//!
//! Pure value types: no IO, no recalculation. Cell values are the last
//! recalculated results carried by the source file; formulas are kept as
//! raw expression text plus extracted references.

pub mod cell;
pub mod document;
pub mod params;
pub mod refs;
pub mod sheet;
pub mod value;
pub mod workbook;

pub use cell::{Cell, Formula};
pub use document::{Block, Document, Run, SubstituteError};
pub use params::{ParameterAssignment, ParameterOption};
pub use sheet::Sheet;
pub use value::{values_equal, CellValue, ErrorKind};
pub use workbook::{AnswerCell, Workbook};
