//! Generation pipeline: validate input, match, render

use crate::error::{T2lError, T2lResult};
use crate::matcher::{derive_records, MatchContext};
use crate::render::{render, T2lReport};
use crate::stock::StockTable;
use crate::types::{split_lines, Brand, DerivedRecord, HsOverrides, MappingEntry};
use tracing::info;

/// Operator input for one T2L
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Newline-separated chassis numbers
    pub chassis_text: String,
    /// Newline-separated DIZ values, paired with chassis numbers by position
    pub diz_text: String,
    pub swb: String,
    pub brand: Brand,
}

/// Lookup tables and constants the pipeline reads
#[derive(Debug, Clone, Copy)]
pub struct GenerateSettings<'a> {
    pub mappings: &'a [MappingEntry],
    pub hs_overrides: &'a HsOverrides,
    pub weight: &'a str,
    pub default_hs_code: &'a str,
}

#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub records: Vec<DerivedRecord>,
    pub report: T2lReport,
}

/// Run the whole transformation.
///
/// Fails only on missing input: no chassis numbers, or no stock file for a
/// brand that needs one.
pub fn generate(
    request: &GenerateRequest,
    stock: Option<&StockTable>,
    settings: &GenerateSettings<'_>,
) -> T2lResult<GenerateOutput> {
    let swb = request.swb.trim();
    let chassis = split_lines(&request.chassis_text);

    if stock.is_none() && !request.brand.stock_optional() {
        return Err(T2lError::NoStock);
    }
    if chassis.is_empty() {
        return Err(T2lError::NoChassis);
    }

    let diz = split_lines(&request.diz_text);
    let keys = stock.map(StockTable::column_keys);
    let ctx = MatchContext {
        stock,
        keys: keys.as_ref(),
        brand: request.brand,
        hs_overrides: settings.hs_overrides,
        default_hs_code: settings.default_hs_code,
    };

    let records = derive_records(&chassis, &diz, &ctx);
    let report = render(&records, swb, settings.weight, settings.mappings);
    info!(brand = %request.brand, vehicles = records.len(), "T2L generated");

    Ok(GenerateOutput { records, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_mappings;
    use crate::types::{DEFAULT_HS_CODE, DEFAULT_WEIGHT};

    fn settings<'a>(mappings: &'a [MappingEntry], hs: &'a HsOverrides) -> GenerateSettings<'a> {
        GenerateSettings {
            mappings,
            hs_overrides: hs,
            weight: DEFAULT_WEIGHT,
            default_hs_code: DEFAULT_HS_CODE,
        }
    }

    #[test]
    fn test_missing_stock_for_vw() {
        let mappings = default_mappings();
        let hs = HsOverrides::new();
        let request = GenerateRequest {
            chassis_text: "ABC".into(),
            ..Default::default()
        };
        let result = generate(&request, None, &settings(&mappings, &hs));
        assert!(matches!(result, Err(T2lError::NoStock)));
    }

    #[test]
    fn test_blank_chassis_rejected() {
        let mappings = default_mappings();
        let hs = HsOverrides::new();
        let request = GenerateRequest {
            chassis_text: " \n\n ".into(),
            brand: Brand::Toyota,
            ..Default::default()
        };
        let result = generate(&request, None, &settings(&mappings, &hs));
        assert!(matches!(result, Err(T2lError::NoChassis)));
    }

    #[test]
    fn test_toyota_without_stock() {
        let mappings = default_mappings();
        let mut hs = HsOverrides::new();
        hs.insert("VIN1".into(), "12345678".into());
        let request = GenerateRequest {
            chassis_text: "VIN1\nVIN2\n".into(),
            diz_text: "DIZ-A".into(),
            swb: " SWB1 ".into(),
            brand: Brand::Toyota,
        };
        let output = generate(&request, None, &settings(&mappings, &hs)).unwrap();
        assert_eq!(output.records.len(), 2);
        assert_eq!(output.report.lines(crate::render::ListKind::C3), vec!["12345678", "87032319"]);
        assert_eq!(output.report.items[0].g3, "SWB1 - 001 - 1000 - VIN1 -  - UNKNOWN");
        assert_eq!(output.report.items[0].pack2, "VIN1 DIZ-A");
    }

    #[test]
    fn test_vw_with_stock() {
        let mappings = default_mappings();
        let hs = HsOverrides::new();
        let stock =
            StockTable::from_reader("VIN,Dest,Model\nABC123,DEHAMXX,X1\n".as_bytes()).unwrap();
        let request = GenerateRequest {
            chassis_text: "ABC123".into(),
            swb: "S9".into(),
            ..Default::default()
        };
        let output = generate(&request, Some(&stock), &settings(&mappings, &hs)).unwrap();
        assert_eq!(output.report.items[0].g3, "S9 - 001 - 1000 - ABC123 - X1 - HAMBURG");
    }
}
