//! XLSX decode/encode.
//!
//! Decode reads cached values through calamine's `worksheet_range` and
//! merges in formula text from `worksheet_formula`; nothing is
//! recalculated. Encode writes a presentation of the model through
//! rust_xlsxwriter, carrying each formula's cached result along so a
//! round-trip sees the same values.

use std::io::Cursor;

use calamine::{CellErrorType, Data, Reader, Xlsx};
use rust_xlsxwriter::{Formula as XlsxFormula, Workbook as XlsxWorkbook};

use sheetcheck_model::{Cell, CellValue, ErrorKind, Sheet, Workbook};

use crate::error::DecodeError;

/// Guard against pathological inputs.
const MAX_CELLS: usize = 1_000_000;

/// Decode an XLSX byte buffer into a workbook model.
pub fn decode(bytes: &[u8]) -> Result<Workbook, DecodeError> {
    let mut source: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| DecodeError::Workbook(format!("failed to open workbook: {e}")))?;

    let sheet_names: Vec<String> = source.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(DecodeError::Workbook("workbook contains no sheets".to_string()));
    }

    let mut workbook = Workbook::new();
    let mut total_cells = 0usize;

    for sheet_name in &sheet_names {
        let range = source
            .worksheet_range(sheet_name)
            .map_err(|e| DecodeError::Workbook(format!("failed to read sheet '{sheet_name}': {e}")))?;

        let mut sheet = Sheet::new(sheet_name);

        // Cached values. Data may not begin at A1.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, data) in row.iter().enumerate() {
                let value = match convert(data) {
                    Some(v) => v,
                    None => continue,
                };
                total_cells += 1;
                if total_cells > MAX_CELLS {
                    return Err(DecodeError::Workbook(format!(
                        "workbook exceeds {MAX_CELLS} cells"
                    )));
                }
                sheet.set_value(start_row + row_idx as u32, start_col + col_idx as u32, value);
            }
        }

        // Formula text, possibly offset differently from the data range
        if let Ok(formulas) = source.worksheet_formula(sheet_name) {
            let (f_row, f_col) = formulas.start().unwrap_or((0, 0));
            for (row_idx, row) in formulas.rows().enumerate() {
                for (col_idx, formula) in row.iter().enumerate() {
                    if formula.is_empty() {
                        continue;
                    }
                    let row = f_row + row_idx as u32;
                    let col = f_col + col_idx as u32;
                    let mut cached = sheet.value(row, col);
                    // Cached formula results sometimes arrive as text
                    if let CellValue::Text(text) = &cached {
                        cached = CellValue::from_cached(text);
                    }
                    sheet.set(row, col, Cell::formula(formula, cached));
                }
            }
        }

        workbook
            .add_sheet(sheet)
            .map_err(DecodeError::Workbook)?;
    }

    Ok(workbook)
}

/// Encode a workbook model to XLSX bytes.
pub fn encode(workbook: &Workbook) -> Result<Vec<u8>, DecodeError> {
    let mut out = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = out
            .add_worksheet()
            .set_name(&sheet.name)
            .map_err(|e| DecodeError::Encode(format!("sheet '{}': {e}", sheet.name)))?;

        for ((row, col), cell) in sheet.sorted_cells() {
            let col16 = u16::try_from(col)
                .map_err(|_| DecodeError::Encode(format!("column {col} out of range")))?;
            let fail = |e| DecodeError::Encode(format!("cell ({row}, {col}): {e}"));

            if let Some(formula) = &cell.formula {
                let source = formula.source().strip_prefix('=').unwrap_or(formula.source());
                let with_result = XlsxFormula::new(source).set_result(cell.value.display());
                worksheet.write_formula(row, col16, with_result).map_err(fail)?;
                continue;
            }
            match &cell.value {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    worksheet.write_number(row, col16, *n).map_err(fail)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col16, s).map_err(fail)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col16, *b).map_err(fail)?;
                }
                CellValue::Error(kind) => {
                    // Sentinel as text; decode recognizes it again
                    worksheet.write_string(row, col16, kind.as_str()).map_err(fail)?;
                }
            }
        }
    }

    out.save_to_buffer()
        .map_err(|e| DecodeError::Encode(format!("failed to serialize workbook: {e}")))
}

fn convert(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                // Error sentinels may arrive as plain text
                match ErrorKind::parse(s) {
                    Some(kind) => Some(CellValue::Error(kind)),
                    None => Some(CellValue::Text(s.clone())),
                }
            }
        }
        Data::Float(n) => Some(CellValue::Number(*n)),
        Data::Int(n) => Some(CellValue::Number(*n as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::Error(e) => Some(CellValue::Error(convert_error(e))),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
    }
}

fn convert_error(error: &CellErrorType) -> ErrorKind {
    match error {
        CellErrorType::Div0 => ErrorKind::Div0,
        CellErrorType::NA => ErrorKind::Na,
        CellErrorType::Name => ErrorKind::Name,
        CellErrorType::Null => ErrorKind::Null,
        CellErrorType::Num => ErrorKind::Num,
        CellErrorType::Ref => ErrorKind::Ref,
        CellErrorType::Value => ErrorKind::Value,
        CellErrorType::GettingData => ErrorKind::Na,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workbook() -> Workbook {
        let mut wb = Workbook::new();
        let mut sheet = Sheet::new("Task");
        sheet.set_value(0, 1, CellValue::Number(1.0));
        sheet.set_value(1, 1, CellValue::Number(2.0));
        sheet.set_value(2, 1, CellValue::Number(3.0));
        sheet.set_value(0, 0, CellValue::Text("Revenue".to_string()));
        sheet.set(3, 1, Cell::formula("=SUM(B1:B3)", CellValue::Number(6.0)));
        wb.add_sheet(sheet).unwrap();
        wb.add_sheet(Sheet::new("Notes")).unwrap();
        wb
    }

    #[test]
    fn test_encode_decode_preserves_model() {
        let original = sample_workbook();
        let bytes = encode(&original).unwrap();
        let decoded = decode(&bytes).unwrap();

        assert_eq!(decoded.sheet_names(), vec!["Task", "Notes"]);
        let sheet = decoded.sheet(0).unwrap();
        assert!(matches!(sheet.value(0, 1), CellValue::Number(n) if n == 1.0));
        assert!(matches!(sheet.value(0, 0), CellValue::Text(ref s) if s == "Revenue"));

        let formula = decoded.get_formula(0, 3, 1).unwrap();
        assert_eq!(formula.source(), "=SUM(B1:B3)");
        assert!(matches!(sheet.value(3, 1), CellValue::Number(n) if n == 6.0));
    }

    #[test]
    fn test_error_sentinel_survives_round_trip() {
        let mut wb = Workbook::new();
        let mut sheet = Sheet::new("Task");
        sheet.set(0, 0, Cell::formula("=1/0", CellValue::Error(ErrorKind::Div0)));
        wb.add_sheet(sheet).unwrap();

        let decoded = decode(&encode(&wb).unwrap()).unwrap();
        assert!(matches!(
            decoded.sheet(0).unwrap().value(0, 0),
            CellValue::Error(ErrorKind::Div0)
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_decode() {
        let err = decode(b"not a zip archive").unwrap_err();
        assert!(matches!(err, DecodeError::Workbook(_)));
    }
}
