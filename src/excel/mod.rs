//! Excel import/export
//!
//! - Export: rendered T2L lists → `T2L Data` sheet, derived records → attached list
//! - Import: stock workbooks (.xlsx) → [`crate::stock::StockTable`]

mod exporter;
mod importer;

pub use exporter::{
    clean_destination, default_file_name, AttachedListExporter, T2lExporter,
    ATTACHED_LIST_DESTINATIONS, DEFAULT_CHUNK_SIZE, T2L_HEADERS, T2L_SHEET_NAME,
};
pub use importer::StockImporter;
