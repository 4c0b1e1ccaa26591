//! Stock importer for .xlsx files

use crate::error::{T2lError, T2lResult};
use crate::stock::{StockRow, StockTable};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::Path;

/// Reads the first worksheet of a stock workbook. Row 0 holds the headers.
pub struct StockImporter {
    path: std::path::PathBuf,
}

impl StockImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn import(&self) -> T2lResult<StockTable> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| T2lError::Excel(format!("Failed to open Excel file: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| T2lError::Excel("Workbook has no worksheets".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| T2lError::Excel(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

        Ok(Self::range_to_table(&range))
    }

    fn range_to_table(range: &Range<Data>) -> StockTable {
        let (height, width) = range.get_size();
        if height == 0 {
            return StockTable::default();
        }

        let headers: Vec<String> = (0..width)
            .map(|col| {
                range
                    .get((0, col))
                    .map(cell_text)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("col_{}", col))
            })
            .collect();

        let mut rows = Vec::new();
        for row in 1..height {
            let mut record = StockRow::new();
            for (col, header) in headers.iter().enumerate() {
                let value = range.get((row, col)).map(cell_text).unwrap_or_default();
                record.insert(header.clone(), value);
            }
            if record.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(record);
        }

        StockTable::new(headers, rows)
    }
}

/// Cell text as the stock CSV export would show it
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string().to_uppercase(),
        other => other.to_string(),
    }
}
