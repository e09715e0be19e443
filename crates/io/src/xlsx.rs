// Excel / ODS import via calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use fiberaudit_recon::{CellValue, GridSheet};

use crate::{SheetError, SheetSelector};

/// Maximum dimensions read from a sheet
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Import one sheet of an Excel file (xlsx, xlsm, xls, xlsb, ods)
pub fn import(path: &Path, selector: &SheetSelector) -> Result<GridSheet, SheetError> {
    let path_str = path.display().to_string();

    let mut workbook = open_workbook_auto(path).map_err(|e| SheetError::Open {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(SheetError::NoSheets { path: path_str });
    }

    let sheet_name = match selector {
        SheetSelector::Index(i) => sheet_names.get(*i).cloned(),
        SheetSelector::Name(name) => sheet_names.iter().find(|n| *n == name).cloned(),
    }
    .ok_or_else(|| SheetError::SheetNotFound {
        path: path_str.clone(),
        sheet: match selector {
            SheetSelector::Index(i) => format!("#{i}"),
            SheetSelector::Name(name) => format!("'{name}'"),
        },
    })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SheetError::Open {
            path: path_str.clone(),
            message: format!("failed to read sheet '{sheet_name}': {e}"),
        })?;

    let mut sheet = GridSheet::new(&sheet_name);

    // Range start offset (data may not begin at A1)
    let (data_start_row, data_start_col) = range.start().unwrap_or((0, 0));
    let mut cells = 0usize;

    for (row_idx, row) in range.rows().enumerate() {
        let target_row = data_start_row as usize + row_idx;
        if target_row >= MAX_ROWS {
            break;
        }

        for (col_idx, cell) in row.iter().enumerate() {
            let target_col = data_start_col as usize + col_idx;
            if target_col >= MAX_COLS {
                break;
            }

            let value = match cell {
                Data::Empty => continue,
                Data::String(s) => {
                    if s.is_empty() {
                        continue;
                    }
                    CellValue::Text(s.clone())
                }
                Data::Float(n) => CellValue::Number(*n),
                Data::Int(n) => CellValue::Number(*n as f64),
                Data::Bool(b) => CellValue::Bool(*b),
                Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
                // Dates are not compared semantically; keep the serial.
                Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
                Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            };

            // GridSheet rows are 1-based
            sheet.set(target_col, target_row + 1, value);
            cells += 1;
        }
    }

    tracing::debug!(path = %path_str, sheet = %sheet_name, cells, "imported sheet");

    Ok(sheet)
}
