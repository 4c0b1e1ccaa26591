use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HS code used when no override applies
pub const DEFAULT_HS_CODE: &str = "87032319";

/// Placeholder weight printed on every G3 line
pub const DEFAULT_WEIGHT: &str = "1000";

/// Shown instead of an empty destination
pub const UNKNOWN_DESTINATION: &str = "UNKNOWN";

//==============================================================================
// Brand Variant
//==============================================================================

/// Product variant the T2L is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    /// Volkswagen stock: a stock file is mandatory
    #[default]
    #[serde(alias = "vw")]
    Volkswagen,
    /// Toyota: stock file optional, per-VIN HS overrides apply
    Toyota,
}

impl Brand {
    /// Upper-case label used in sheet names and headers
    pub fn label(&self) -> &'static str {
        match self {
            Brand::Volkswagen => "VW",
            Brand::Toyota => "TOYOTA",
        }
    }

    /// Whether generation may run without a stock file
    pub fn stock_optional(&self) -> bool {
        matches!(self, Brand::Toyota)
    }

    /// Whether the per-VIN HS override table is consulted
    pub fn uses_hs_overrides(&self) -> bool {
        matches!(self, Brand::Toyota)
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Brand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vw" | "volkswagen" => Ok(Brand::Volkswagen),
            "toyota" => Ok(Brand::Toyota),
            other => Err(format!("Unknown brand '{}' (expected vw or toyota)", other)),
        }
    }
}

//==============================================================================
// Lookup Tables
//==============================================================================

/// Location code and its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub code: String,
    pub name: String,
}

impl MappingEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// VIN → HS code overrides (Toyota only)
pub type HsOverrides = BTreeMap<String, String>;

//==============================================================================
// Derived Records
//==============================================================================

/// One vehicle of the shipment, built per entered chassis number
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DerivedRecord {
    pub vin: String,
    /// Document index at the same input position, empty if none
    pub diz: String,
    /// Raw destination cell from the matched stock row
    pub dest: String,
    pub model: String,
    pub hs_code: String,
    /// Kilograms from the stock's weight column, 0 when missing or unreadable
    pub weight: u64,
}

/// Stock weight cell to whole kilograms. A decimal comma is accepted and the
/// fraction is dropped; anything unparsable is 0.
pub fn parse_weight(cell: &str) -> u64 {
    cell.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
        .map(|w| w as u64)
        .unwrap_or(0)
}

/// Split a text area into trimmed, non-empty lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
