//! Excel exporters: the four-column T2L sheet and the attached list workbook

use crate::error::{T2lError, T2lResult};
use crate::matcher::resolve_mapping;
use crate::render::T2lReport;
use crate::types::{Brand, DerivedRecord, MappingEntry};
use regex::Regex;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// Name of the single sheet in the T2L export
pub const T2L_SHEET_NAME: &str = "T2L Data";

/// Header row of the T2L export
pub const T2L_HEADERS: [&str; 4] = ["HS Code", "G3 String", "Pack 1", "Pack 2"];

/// Vehicles per HS code sheet in the attached list
pub const DEFAULT_CHUNK_SIZE: usize = 99;

/// Excel's limit on worksheet name length
const MAX_SHEET_NAME_LEN: usize = 31;

/// `T2L_Export_<swb>.xlsx`, with `data` standing in for an empty SWB.
/// Characters that are not allowed in file names become `_`.
pub fn default_file_name(swb: &str) -> String {
    let swb = swb.trim();
    if swb.is_empty() {
        return "T2L_Export_data.xlsx".to_string();
    }
    let stem: String = swb
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            other => other,
        })
        .collect();
    format!("T2L_Export_{}.xlsx", stem)
}

fn xlsx_err(context: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> T2lError + '_ {
    move |e| T2lError::Export(format!("{}: {}", context, e))
}

//==============================================================================
// T2L Export
//==============================================================================

/// Writes the rendered report as one sheet with HS, G3, Pack 1 and Pack 2
pub struct T2lExporter<'a> {
    report: &'a T2lReport,
}

impl<'a> T2lExporter<'a> {
    pub fn new(report: &'a T2lReport) -> Self {
        Self { report }
    }

    pub fn build(&self) -> T2lResult<Workbook> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(T2L_SHEET_NAME)
            .map_err(xlsx_err("Failed to set worksheet name"))?;

        for (col, header) in T2L_HEADERS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *header, &bold)
                .map_err(xlsx_err("Failed to write header"))?;
        }

        for (idx, item) in self.report.items.iter().enumerate() {
            let row = (idx + 1) as u32;
            let cells = [&item.c3, &item.g3, &item.pack1, &item.pack2];
            for (col, text) in cells.iter().enumerate() {
                worksheet
                    .write_string(row, col as u16, text.as_str())
                    .map_err(xlsx_err("Failed to write cell"))?;
            }
        }

        worksheet
            .set_column_width(0, 12)
            .map_err(xlsx_err("Failed to set column width"))?;
        worksheet
            .set_column_width(1, 60)
            .map_err(xlsx_err("Failed to set column width"))?;
        worksheet
            .set_column_width(2, 16)
            .map_err(xlsx_err("Failed to set column width"))?;
        worksheet
            .set_column_width(3, 28)
            .map_err(xlsx_err("Failed to set column width"))?;

        Ok(workbook)
    }

    pub fn export(&self, output_path: &Path) -> T2lResult<()> {
        let mut workbook = self.build()?;
        workbook
            .save(output_path)
            .map_err(xlsx_err("Failed to save Excel file"))
    }

    pub fn to_bytes(&self) -> T2lResult<Vec<u8>> {
        let mut workbook = self.build()?;
        workbook
            .save_to_buffer()
            .map_err(xlsx_err("Failed to serialize Excel file"))
    }
}

//==============================================================================
// Attached List Export
//==============================================================================

/// Destinations printed on the attached list in addition to the user's
/// mappings. User mappings are tried first.
pub const ATTACHED_LIST_DESTINATIONS: [(&str, &str); 17] = [
    ("EGYAG", "ALEXANDRIA (EGIPT)"),
    ("AZEMQ", "AZERBAIJAN"),
    ("CYPEY", "LIMASSOL (CIPER)"),
    ("GEODB", "GEORGIA"),
    ("CYPXP", "LIMASSOL (CIPER)"),
    ("CYPEZ", "NORTH CYPRUS"),
    ("GRCGR", "PIRAEUS (GRČIJA)"),
    ("GRCDP", "PIRAEUS (GRČIJA)"),
    ("ILASH", "HAIFA"),
    ("ILHFA", "HAIFA"),
    ("ILPAL", "PALESTINA (HAIFA)"),
    ("LBNLJ", "BEIRUT"),
    ("MTSGW", "LA VALLETTA (MALTA)"),
    ("TNTUN", "LA GOULLETE (TUNISIJA)"),
    ("TREYP", "EFESAN (TURČIJA)"),
    ("LIMA", "LIMASSOL (CIPER)"),
    ("PIRE", "PIRAEUS (GRČIJA)"),
];

fn parenthesized() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(.*?\)\s*").expect("valid regex"))
}

/// Drop parenthesized parts: `ALEXANDRIA (EGIPT)` → `ALEXANDRIA`
pub fn clean_destination(name: &str) -> String {
    parenthesized().replace_all(name, "").trim().to_string()
}

/// `base` plus ` (n)`, shortening `base` so the result fits a sheet name
fn with_suffix(base: &str, n: usize) -> String {
    let suffix = format!(" ({})", n);
    let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
    let mut name: String = base.chars().take(keep).collect();
    name.push_str(&suffix);
    name
}

/// Replace characters Excel rejects in sheet names and cap the length
fn sheet_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

/// Attached list: an overview sheet plus one sheet per HS code chunk
pub struct AttachedListExporter<'a> {
    records: &'a [DerivedRecord],
    destinations: Vec<MappingEntry>,
    swb: &'a str,
    brand: Brand,
    chunk_size: usize,
}

impl<'a> AttachedListExporter<'a> {
    pub fn new(
        records: &'a [DerivedRecord],
        mappings: &'a [MappingEntry],
        swb: &'a str,
        brand: Brand,
    ) -> Self {
        let destinations = mappings
            .iter()
            .cloned()
            .chain(
                ATTACHED_LIST_DESTINATIONS
                    .iter()
                    .map(|(code, name)| MappingEntry::new(*code, *name)),
            )
            .collect();
        Self {
            records,
            destinations,
            swb,
            brand,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn destination(&self, record: &DerivedRecord) -> String {
        clean_destination(&resolve_mapping(&record.dest, &self.destinations))
    }

    /// Sheet names for each chunk, in order: HS codes sorted, `{n}x {hs}`,
    /// repeated names get ` (2)`, ` (3)`, ... Names are cut to Excel's
    /// limit before they are made unique.
    pub fn chunk_sheets(&self) -> Vec<(String, Vec<&'a DerivedRecord>)> {
        let mut by_hs: BTreeMap<&str, Vec<&'a DerivedRecord>> = BTreeMap::new();
        for record in self.records {
            by_hs.entry(record.hs_code.as_str()).or_default().push(record);
        }

        // Excel compares sheet names case-insensitively
        let mut used: HashSet<String> = HashSet::new();
        let mut sheets = Vec::new();
        for (hs, vehicles) in by_hs {
            for chunk in vehicles.chunks(self.chunk_size) {
                let base = sheet_safe(&format!("{}x {}", chunk.len(), hs));
                let mut name = base.clone();
                let mut n = 1;
                while used.contains(&name.to_lowercase()) {
                    n += 1;
                    name = with_suffix(&base, n);
                }
                used.insert(name.to_lowercase());
                sheets.push((name, chunk.to_vec()));
            }
        }
        sheets
    }

    pub fn build(&self) -> T2lResult<Workbook> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let badge = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xCCFFCC))
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);

        let overview = workbook.add_worksheet();
        overview
            .set_name(format!("ALL {}", self.brand.label()))
            .map_err(xlsx_err("Failed to set worksheet name"))?;
        self.write_overview(overview, &bold, &badge)?;

        for (name, chunk) in self.chunk_sheets() {
            let sheet = workbook.add_worksheet();
            sheet
                .set_name(&name)
                .map_err(xlsx_err("Failed to set worksheet name"))?;
            self.write_chunk(sheet, &chunk, &bold)?;
        }

        Ok(workbook)
    }

    fn write_overview(&self, ws: &mut Worksheet, bold: &Format, badge: &Format) -> T2lResult<()> {
        ws.write_string_with_format(1, 1, format!("ATTACHED LIST SWB NO.: {}", self.swb), bold)
            .map_err(xlsx_err("Failed to write title"))?;
        ws.write_string_with_format(1, 2, "T2L", badge)
            .map_err(xlsx_err("Failed to write title"))?;

        let headers = ["", "VINS:", "DIZ", "MODEL", "WEIGHT", "DESTINATION", "HS CODE"];
        for (col, header) in headers.iter().enumerate() {
            ws.write_string_with_format(2, col as u16, *header, bold)
                .map_err(xlsx_err("Failed to write header"))?;
        }

        for (idx, record) in self.records.iter().enumerate() {
            let row = (idx + 3) as u32;
            ws.write_number(row, 0, (idx + 1) as f64)
                .map_err(xlsx_err("Failed to write cell"))?;
            self.write_vehicle(ws, row, 1, record)?;
        }

        let total_row = (self.records.len() + 3) as u32;
        let total = total_weight(self.records.iter());
        ws.write_number_with_format(total_row, 4, total as f64, bold)
            .map_err(xlsx_err("Failed to write total"))?;

        ws.set_column_width(0, 5)
            .map_err(xlsx_err("Failed to set column width"))?;
        for col in 1..=6 {
            ws.set_column_width(col, 20)
                .map_err(xlsx_err("Failed to set column width"))?;
        }
        Ok(())
    }

    fn write_chunk(&self, ws: &mut Worksheet, chunk: &[&DerivedRecord], bold: &Format) -> T2lResult<()> {
        let headers = ["CHASSIS", "DIZ", "MODEL", "WEIGHT", "DESTINATION", "HS CODE"];
        for (col, header) in headers.iter().enumerate() {
            ws.write_string_with_format(0, col as u16, *header, bold)
                .map_err(xlsx_err("Failed to write header"))?;
        }

        for (idx, record) in chunk.iter().enumerate() {
            self.write_vehicle(ws, (idx + 1) as u32, 0, record)?;
        }

        let total_row = (chunk.len() + 1) as u32;
        let total = total_weight(chunk.iter().copied());
        ws.write_number_with_format(total_row, 3, total as f64, bold)
            .map_err(xlsx_err("Failed to write total"))?;

        for col in 0..=5 {
            ws.set_column_width(col, 20)
                .map_err(xlsx_err("Failed to set column width"))?;
        }
        Ok(())
    }

    /// VIN, DIZ, model, weight, destination and HS code from column `first`
    fn write_vehicle(
        &self,
        ws: &mut Worksheet,
        row: u32,
        first: u16,
        record: &DerivedRecord,
    ) -> T2lResult<()> {
        ws.write_string(row, first, &record.vin)
            .map_err(xlsx_err("Failed to write cell"))?;
        ws.write_string(row, first + 1, &record.diz)
            .map_err(xlsx_err("Failed to write cell"))?;
        ws.write_string(row, first + 2, &record.model)
            .map_err(xlsx_err("Failed to write cell"))?;
        ws.write_number(row, first + 3, record.weight as f64)
            .map_err(xlsx_err("Failed to write cell"))?;
        ws.write_string(row, first + 4, self.destination(record))
            .map_err(xlsx_err("Failed to write cell"))?;
        ws.write_string(row, first + 5, &record.hs_code)
            .map_err(xlsx_err("Failed to write cell"))?;
        Ok(())
    }

    pub fn export(&self, output_path: &Path) -> T2lResult<()> {
        let mut workbook = self.build()?;
        workbook
            .save(output_path)
            .map_err(xlsx_err("Failed to save Excel file"))
    }
}

fn total_weight<'r>(records: impl Iterator<Item = &'r DerivedRecord>) -> u64 {
    records.map(|r| r.weight).sum()
}
