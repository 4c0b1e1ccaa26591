//! T2L - transit document helper
//!
//! Matches operator-entered chassis numbers against a stock export and
//! renders the lists needed to fill in a T2L declaration.
//!
//! # Pipeline
//!
//! - [`stock`]: read the stock CSV/XLSX and detect chassis, destination and model columns
//! - [`matcher`]: build one [`DerivedRecord`] per chassis number
//! - [`render`]: format C3, G3, packaging and document lines
//! - [`excel`]: write the T2L sheet and the attached list workbook
//!
//! Destination mappings and HS overrides live in [`store`] on top of the
//! [`storage::KeyValueStore`] port.
//!
//! # Example
//!
//! ```
//! use t2l::pipeline::{generate, GenerateRequest, GenerateSettings};
//! use t2l::stock::StockTable;
//! use t2l::store::default_mappings;
//! use t2l::types::{HsOverrides, DEFAULT_HS_CODE, DEFAULT_WEIGHT};
//!
//! let stock = StockTable::from_reader("VIN,Dest,Model\nABC123,DEHAMXX,X1\n".as_bytes())?;
//! let mappings = default_mappings();
//! let hs = HsOverrides::new();
//! let settings = GenerateSettings {
//!     mappings: &mappings,
//!     hs_overrides: &hs,
//!     weight: DEFAULT_WEIGHT,
//!     default_hs_code: DEFAULT_HS_CODE,
//! };
//! let request = GenerateRequest {
//!     chassis_text: "ABC123".into(),
//!     swb: "SWB1".into(),
//!     ..Default::default()
//! };
//!
//! let output = generate(&request, Some(&stock), &settings)?;
//! assert_eq!(output.report.items[0].g3, "SWB1 - 001 - 1000 - ABC123 - X1 - HAMBURG");
//! # Ok::<(), t2l::error::T2lError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod logging;
pub mod matcher;
pub mod pipeline;
pub mod prefs;
pub mod render;
pub mod stock;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{T2lError, T2lResult};
pub use types::{Brand, DerivedRecord, HsOverrides, MappingEntry};
