//! Stock file ingestion
//!
//! Reads the stock export (CSV, or XLSX through [`crate::excel::StockImporter`])
//! into a [`StockTable`] and guesses which headers hold the chassis number,
//! destination and model.

use crate::error::{T2lError, T2lResult};
use crate::excel::StockImporter;
use csv::ReaderBuilder;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

/// One stock row: header → cell text
pub type StockRow = HashMap<String, String>;

/// Parsed stock file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockTable {
    /// Headers in file order
    pub headers: Vec<String>,
    pub rows: Vec<StockRow>,
}

impl StockTable {
    pub fn new(headers: Vec<String>, rows: Vec<StockRow>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse CSV text with a header row. The delimiter is sniffed from the
    /// header line.
    pub fn from_reader<R: Read>(reader: R) -> T2lResult<Self> {
        let mut buffered = BufReader::new(reader);
        let mut content = Vec::new();
        buffered.read_to_end(&mut content)?;

        let delimiter = sniff_delimiter(&content);
        debug!(delimiter = %(delimiter as char), "sniffed CSV delimiter");

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(Cursor::new(content));

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| cell_text(h).trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            let mut row = StockRow::new();
            for (idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(idx) {
                    row.insert(header.clone(), cell_text(value).trim().to_string());
                }
            }

            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Load a stock file, choosing the reader by extension
    pub fn load(path: &Path) -> T2lResult<Self> {
        if !path.exists() {
            return Err(T2lError::Validation(format!(
                "Stock file not found: {}",
                path.display()
            )));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let table = match ext.as_str() {
            "xlsx" | "xlsm" => StockImporter::new(path).import()?,
            _ => Self::from_reader(File::open(path)?)?,
        };

        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "stock file loaded"
        );
        Ok(table)
    }

    pub fn column_keys(&self) -> ColumnKeys {
        ColumnKeys::detect(&self.headers)
    }
}

/// Cell bytes as text. Exports in legacy code pages keep their ASCII parts,
/// other bytes become U+FFFD.
fn cell_text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Pick the delimiter that occurs most often on the first non-empty line.
/// Ties and no hits fall back to a comma.
fn sniff_delimiter(content: &[u8]) -> u8 {
    let header_line = content
        .split(|b| *b == b'\n')
        .map(cell_text)
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    let mut best = b',';
    let mut best_count = header_line.matches(',').count();
    for candidate in [b';', b'\t'] {
        let count = header_line.matches(candidate as char).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

//==============================================================================
// Column Role Detection
//==============================================================================

fn chassis_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)chassis|vin|ident").expect("valid regex"))
}

fn destination_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)dest|ship-to").expect("valid regex"))
}

fn model_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)model|mat|desc").expect("valid regex"))
}

fn weight_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)weight|gewicht").expect("valid regex"))
}

/// Headers chosen for each column role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnKeys {
    pub chassis: Option<String>,
    pub destination: Option<String>,
    pub model: Option<String>,
    pub weight: Option<String>,
}

impl ColumnKeys {
    /// First header (in file order) matching each role's pattern. Roles are
    /// detected independently, so one header may fill several roles.
    pub fn detect(headers: &[String]) -> Self {
        let find = |re: &Regex| headers.iter().find(|h| re.is_match(h)).cloned();
        let keys = Self {
            chassis: find(chassis_pattern()),
            destination: find(destination_pattern()),
            model: find(model_pattern()),
            weight: find(weight_pattern()),
        };
        debug!(?keys, "detected stock columns");
        keys
    }
}
