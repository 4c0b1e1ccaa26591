//! Chassis → stock row matching and destination resolution

use crate::stock::{ColumnKeys, StockRow, StockTable};
use crate::types::{
    parse_weight, Brand, DerivedRecord, HsOverrides, MappingEntry, UNKNOWN_DESTINATION,
};
use tracing::{debug, warn};

/// Everything the matcher needs besides the chassis and DIZ lists
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub stock: Option<&'a StockTable>,
    pub keys: Option<&'a ColumnKeys>,
    pub brand: Brand,
    pub hs_overrides: &'a HsOverrides,
    pub default_hs_code: &'a str,
}

/// Display name of the first mapping whose code occurs in `raw_dest`.
///
/// Empty input gives `UNKNOWN`; no hit returns the input unchanged. Matching
/// is case-sensitive.
pub fn resolve_mapping(raw_dest: &str, mappings: &[MappingEntry]) -> String {
    if raw_dest.is_empty() {
        return UNKNOWN_DESTINATION.to_string();
    }
    mappings
        .iter()
        .find(|m| raw_dest.contains(m.code.as_str()))
        .map(|m| m.name.clone())
        .unwrap_or_else(|| raw_dest.to_string())
}

/// First row whose chassis cell contains `vin`.
///
/// Substring match: a short VIN can hit a longer one that contains it.
pub fn find_row<'a>(stock: &'a StockTable, chassis_key: &str, vin: &str) -> Option<&'a StockRow> {
    stock.rows.iter().find(|row| {
        row.get(chassis_key)
            .is_some_and(|cell| !cell.is_empty() && cell.contains(vin))
    })
}

/// Build one record per chassis number, in input order.
///
/// DIZ values are paired by position only. Without stock data or a detected
/// column the destination and model stay empty.
pub fn derive_records(
    chassis: &[String],
    diz: &[String],
    ctx: &MatchContext<'_>,
) -> Vec<DerivedRecord> {
    chassis
        .iter()
        .enumerate()
        .map(|(idx, vin)| {
            let row = match (ctx.stock, ctx.keys.and_then(|k| k.chassis.as_deref())) {
                (Some(stock), Some(key)) => find_row(stock, key, vin),
                _ => None,
            };

            if row.is_none() && ctx.stock.is_some() {
                warn!(%vin, "no stock row for chassis number");
            }

            let cell = |key: Option<&String>| -> String {
                match (row, key) {
                    (Some(row), Some(key)) => row.get(key).cloned().unwrap_or_default(),
                    _ => String::new(),
                }
            };
            let dest = cell(ctx.keys.and_then(|k| k.destination.as_ref()));
            let model = cell(ctx.keys.and_then(|k| k.model.as_ref()));
            let weight = parse_weight(&cell(ctx.keys.and_then(|k| k.weight.as_ref())));

            let hs_code = if ctx.brand.uses_hs_overrides() {
                ctx.hs_overrides
                    .get(vin)
                    .cloned()
                    .unwrap_or_else(|| ctx.default_hs_code.to_string())
            } else {
                ctx.default_hs_code.to_string()
            };

            let record = DerivedRecord {
                vin: vin.clone(),
                diz: diz.get(idx).cloned().unwrap_or_default(),
                dest,
                model,
                hs_code,
                weight,
            };
            debug!(?record, matched = row.is_some(), "derived record");
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_mappings;
    use crate::types::DEFAULT_HS_CODE;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn stock() -> StockTable {
        let csv = "VIN,Dest,Model\nABC123,DEHAMXX,X1\nXYZ999,BEZEE01,X5\n";
        StockTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_resolve_mapping_contained_code() {
        assert_eq!(resolve_mapping("DEHAMXX", &default_mappings()), "HAMBURG");
        assert_eq!(resolve_mapping("01BEANR", &default_mappings()), "ANTWERP");
    }

    #[test]
    fn test_resolve_mapping_no_match_returns_raw() {
        assert_eq!(resolve_mapping("ITGOA", &default_mappings()), "ITGOA");
    }

    #[test]
    fn test_resolve_mapping_empty_is_unknown() {
        assert_eq!(resolve_mapping("", &default_mappings()), "UNKNOWN");
    }

    #[test]
    fn test_resolve_mapping_first_entry_wins() {
        let mappings = vec![
            MappingEntry::new("DEH", "FIRST"),
            MappingEntry::new("DEHAM", "SECOND"),
        ];
        assert_eq!(resolve_mapping("DEHAM", &mappings), "FIRST");
    }

    #[test]
    fn test_resolve_mapping_is_case_sensitive() {
        assert_eq!(resolve_mapping("deham", &default_mappings()), "deham");
    }

    #[test]
    fn test_derive_matches_stock_row() {
        let stock = stock();
        let keys = stock.column_keys();
        let overrides = HsOverrides::new();
        let ctx = MatchContext {
            stock: Some(&stock),
            keys: Some(&keys),
            brand: Brand::Volkswagen,
            hs_overrides: &overrides,
            default_hs_code: DEFAULT_HS_CODE,
        };

        let records = derive_records(&strings(&["ABC123"]), &[], &ctx);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dest, "DEHAMXX");
        assert_eq!(records[0].model, "X1");
        assert_eq!(records[0].hs_code, "87032319");
        assert_eq!(resolve_mapping(&records[0].dest, &default_mappings()), "HAMBURG");
    }

    #[test]
    fn test_derive_substring_match() {
        let stock = stock();
        let keys = stock.column_keys();
        let overrides = HsOverrides::new();
        let ctx = MatchContext {
            stock: Some(&stock),
            keys: Some(&keys),
            brand: Brand::Volkswagen,
            hs_overrides: &overrides,
            default_hs_code: DEFAULT_HS_CODE,
        };

        let records = derive_records(&strings(&["Z99"]), &[], &ctx);
        assert_eq!(records[0].model, "X5");
    }

    #[test]
    fn test_derive_count_and_diz_alignment() {
        let stock = stock();
        let keys = stock.column_keys();
        let overrides = HsOverrides::new();
        let ctx = MatchContext {
            stock: Some(&stock),
            keys: Some(&keys),
            brand: Brand::Volkswagen,
            hs_overrides: &overrides,
            default_hs_code: DEFAULT_HS_CODE,
        };

        let chassis = strings(&["ABC123", "NOPE", "XYZ999"]);
        let records = derive_records(&chassis, &strings(&["D1"]), &ctx);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].diz, "D1");
        assert_eq!(records[1].diz, "");
        assert_eq!(records[2].diz, "");
        assert_eq!(records[1].dest, "");
        assert_eq!(records[1].model, "");

        let records = derive_records(&chassis[..1], &strings(&["D1", "D2", "D3"]), &ctx);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].diz, "D1");
    }

    #[test]
    fn test_derive_reads_weight_column() {
        let csv = "VIN;Dest;Model;Weight\nABC123;DEHAMXX;X1;1375,5\nXYZ999;BEZEE01;X5;\n";
        let stock = StockTable::from_reader(csv.as_bytes()).unwrap();
        let keys = stock.column_keys();
        let overrides = HsOverrides::new();
        let ctx = MatchContext {
            stock: Some(&stock),
            keys: Some(&keys),
            brand: Brand::Volkswagen,
            hs_overrides: &overrides,
            default_hs_code: DEFAULT_HS_CODE,
        };

        let records = derive_records(&strings(&["ABC123", "XYZ999", "NOPE"]), &[], &ctx);
        let weights: Vec<u64> = records.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![1375, 0, 0]);
    }

    #[test]
    fn test_derive_without_stock() {
        let overrides = HsOverrides::new();
        let ctx = MatchContext {
            stock: None,
            keys: None,
            brand: Brand::Toyota,
            hs_overrides: &overrides,
            default_hs_code: DEFAULT_HS_CODE,
        };
        let records = derive_records(&strings(&["A", "B"]), &strings(&["X", "Y"]), &ctx);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].vin, "B");
        assert_eq!(records[1].diz, "Y");
        assert_eq!(records[1].dest, "");
    }

    #[test]
    fn test_derive_without_chassis_column() {
        let csv = "Colour,Dest\nRED,DEHAM\n";
        let stock = StockTable::from_reader(csv.as_bytes()).unwrap();
        let keys = stock.column_keys();
        let overrides = HsOverrides::new();
        let ctx = MatchContext {
            stock: Some(&stock),
            keys: Some(&keys),
            brand: Brand::Volkswagen,
            hs_overrides: &overrides,
            default_hs_code: DEFAULT_HS_CODE,
        };
        let records = derive_records(&strings(&["RED"]), &[], &ctx);
        assert_eq!(records[0].dest, "");
    }

    #[test]
    fn test_hs_override_applies_to_toyota_only() {
        let mut overrides = HsOverrides::new();
        overrides.insert("VIN1".to_string(), "12345678".to_string());

        let toyota = MatchContext {
            stock: None,
            keys: None,
            brand: Brand::Toyota,
            hs_overrides: &overrides,
            default_hs_code: DEFAULT_HS_CODE,
        };
        let records = derive_records(&strings(&["VIN1", "VIN2"]), &[], &toyota);
        assert_eq!(records[0].hs_code, "12345678");
        assert_eq!(records[1].hs_code, "87032319");

        let vw = MatchContext {
            brand: Brand::Volkswagen,
            ..toyota
        };
        let records = derive_records(&strings(&["VIN1"]), &[], &vw);
        assert_eq!(records[0].hs_code, "87032319");
    }
}
