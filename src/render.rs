//! Text line rendering for the T2L lists

use crate::matcher::resolve_mapping;
use crate::types::{DerivedRecord, MappingEntry};
use serde::Serialize;

/// The six lines produced for one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedItem {
    /// 1-based position, zero-padded to three digits
    pub item_no: String,
    /// C3: HS code only
    pub c3: String,
    /// G3: `SWB - item - weight - VIN - model - destination`
    pub g3: String,
    pub pack1: String,
    pub pack2: String,
    pub doc1: String,
    pub doc2: String,
}

/// Rendered lists for a whole shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct T2lReport {
    pub swb: String,
    pub items: Vec<RenderedItem>,
}

/// Identifies one of the rendered lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    C3,
    G3,
    Pack1,
    Pack2,
    Doc1,
    Doc2,
}

impl ListKind {
    pub const ALL: [ListKind; 6] = [
        ListKind::C3,
        ListKind::G3,
        ListKind::Pack1,
        ListKind::Pack2,
        ListKind::Doc1,
        ListKind::Doc2,
    ];

    /// Short name, also used as the list file stem
    pub fn name(&self) -> &'static str {
        match self {
            ListKind::C3 => "c3",
            ListKind::G3 => "g3",
            ListKind::Pack1 => "pack1",
            ListKind::Pack2 => "pack2",
            ListKind::Doc1 => "doc1",
            ListKind::Doc2 => "doc2",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListKind::C3 => "Good Items: C3 (HS Code)",
            ListKind::G3 => "Good Items: G3",
            ListKind::Pack1 => "Packaging: A3:B3",
            ListKind::Pack2 => "Packaging: D3:E3",
            ListKind::Doc1 => "Documents: A3:B3",
            ListKind::Doc2 => "Documents: E3",
        }
    }
}

impl RenderedItem {
    pub fn line(&self, kind: ListKind) -> &str {
        match kind {
            ListKind::C3 => &self.c3,
            ListKind::G3 => &self.g3,
            ListKind::Pack1 => &self.pack1,
            ListKind::Pack2 => &self.pack2,
            ListKind::Doc1 => &self.doc1,
            ListKind::Doc2 => &self.doc2,
        }
    }
}

impl T2lReport {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn lines(&self, kind: ListKind) -> Vec<&str> {
        self.items.iter().map(|item| item.line(kind)).collect()
    }

    /// One list joined with newlines, as it would be copied to the clipboard
    pub fn list_text(&self, kind: ListKind) -> String {
        self.lines(kind).join("\n")
    }
}

/// Format every record. `weight` is printed as-is on every G3 line.
pub fn render(
    records: &[DerivedRecord],
    swb: &str,
    weight: &str,
    mappings: &[MappingEntry],
) -> T2lReport {
    let items = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let item_no = format!("{:03}", i + 1);
            let dest_name = resolve_mapping(&record.dest, mappings);
            RenderedItem {
                c3: record.hs_code.clone(),
                g3: format!(
                    "{} - {} - {} - {} - {} - {}",
                    swb, item_no, weight, record.vin, record.model, dest_name
                ),
                pack1: format!("{} {}", swb, item_no),
                pack2: format!("{} {}", record.vin, record.diz),
                doc1: format!("{} {}", swb, item_no),
                doc2: record.diz.clone(),
                item_no,
            }
        })
        .collect();

    T2lReport {
        swb: swb.to_string(),
        items,
    }
}
