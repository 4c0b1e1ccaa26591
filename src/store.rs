//! Destination mapping and HS override stores
//!
//! Both stores keep their table in memory and write the whole structure back
//! through the [`KeyValueStore`] after every mutation.

use crate::error::{T2lError, T2lResult};
use crate::storage::{KeyValueStore, HS_CODES_KEY, MAPPINGS_KEY};
use crate::types::{split_lines, HsOverrides, MappingEntry};
use tracing::info;

/// Mappings used when nothing has been saved yet
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("DEHAM", "HAMBURG"),
    ("BEZEE", "ZEEBRUGGE"),
    ("ESSET", "SETUBAL"),
    ("DEEMD", "EMDEN"),
    ("ESVGP", "VIGO"),
    ("ESSDR", "SANTANDER"),
    ("TRYKC", "YARIMCA"),
    ("FRLEH", "LE HAVRE"),
    ("IEDUB", "DUBLIN"),
    ("GBSHE", "SHEERNESS"),
    ("GBGRI", "GRIMSBY"),
    ("GBTYN", "TYNE"),
    ("BEANR", "ANTWERP"),
];

pub fn default_mappings() -> Vec<MappingEntry> {
    DEFAULT_MAPPINGS
        .iter()
        .map(|(code, name)| MappingEntry::new(*code, *name))
        .collect()
}

//==============================================================================
// Mapping Store
//==============================================================================

/// Ordered list of location code → display name mappings
pub struct MappingStore<S: KeyValueStore> {
    backend: S,
    entries: Vec<MappingEntry>,
}

impl<S: KeyValueStore> MappingStore<S> {
    /// Load the saved list, falling back to [`DEFAULT_MAPPINGS`]
    pub fn load(backend: S) -> T2lResult<Self> {
        let entries = match backend.get(MAPPINGS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => default_mappings(),
        };
        Ok(Self { backend, entries })
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Append a mapping. Code and name are trimmed and upper-cased; returns
    /// `false` without touching storage if either ends up empty.
    pub fn add(&mut self, code: &str, name: &str) -> T2lResult<bool> {
        let code = code.trim().to_uppercase();
        let name = name.trim().to_uppercase();
        if code.is_empty() || name.is_empty() {
            return Ok(false);
        }
        info!(%code, %name, "mapping added");
        self.entries.push(MappingEntry { code, name });
        self.save()?;
        Ok(true)
    }

    /// Remove the mapping at `index` (0-based)
    pub fn remove(&mut self, index: usize) -> T2lResult<MappingEntry> {
        if index >= self.entries.len() {
            return Err(T2lError::Validation(format!(
                "No mapping at position {} (have {})",
                index,
                self.entries.len()
            )));
        }
        let removed = self.entries.remove(index);
        info!(code = %removed.code, "mapping removed");
        self.save()?;
        Ok(removed)
    }

    /// Replace the list with the defaults and persist it
    pub fn reset(&mut self) -> T2lResult<()> {
        self.entries = default_mappings();
        self.save()
    }

    pub fn save(&mut self) -> T2lResult<()> {
        let raw = serde_json::to_string(&self.entries)?;
        self.backend.set(MAPPINGS_KEY, &raw)
    }

    pub fn into_backend(self) -> S {
        self.backend
    }
}

//==============================================================================
// HS Code Store
//==============================================================================

/// Per-VIN HS code overrides
pub struct HsCodeStore<S: KeyValueStore> {
    backend: S,
    codes: HsOverrides,
}

impl<S: KeyValueStore> HsCodeStore<S> {
    /// Load the saved table, empty if none
    pub fn load(backend: S) -> T2lResult<Self> {
        let codes = match backend.get(HS_CODES_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => HsOverrides::new(),
        };
        Ok(Self { backend, codes })
    }

    pub fn codes(&self) -> &HsOverrides {
        &self.codes
    }

    pub fn get(&self, vin: &str) -> Option<&str> {
        self.codes.get(vin).map(String::as_str)
    }

    /// Insert VIN/code pairs from two newline-separated text blocks.
    ///
    /// Blank lines are dropped from both sides before pairing. On a count
    /// mismatch nothing is stored. Existing VINs are overwritten. Returns the
    /// number of pairs written.
    pub fn add_bulk(&mut self, vins_text: &str, codes_text: &str) -> T2lResult<usize> {
        let vins = split_lines(vins_text);
        let codes = split_lines(codes_text);

        if vins.len() != codes.len() {
            return Err(T2lError::Mismatch {
                vins: vins.len(),
                codes: codes.len(),
            });
        }

        let count = vins.len();
        for (vin, code) in vins.into_iter().zip(codes) {
            self.codes.insert(vin, code);
        }
        info!(count, "HS codes added");
        self.save()?;
        Ok(count)
    }

    /// Delete the override for `vin`; returns whether one existed
    pub fn remove(&mut self, vin: &str) -> T2lResult<bool> {
        let existed = self.codes.remove(vin).is_some();
        self.save()?;
        Ok(existed)
    }

    pub fn save(&mut self) -> T2lResult<()> {
        let raw = serde_json::to_string(&self.codes)?;
        self.backend.set(HS_CODES_KEY, &raw)
    }

    pub fn into_backend(self) -> S {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mapping_defaults_when_unset() {
        let store = MappingStore::load(MemoryStore::new()).unwrap();
        assert_eq!(store.entries().len(), 13);
        assert_eq!(store.entries()[0], MappingEntry::new("DEHAM", "HAMBURG"));
        assert_eq!(store.entries()[12], MappingEntry::new("BEANR", "ANTWERP"));
    }

    #[test]
    fn test_mapping_add_normalizes_and_persists() {
        let mut store = MappingStore::load(MemoryStore::new()).unwrap();
        assert!(store.add("  itgoa ", "genova").unwrap());

        let backend = store.into_backend();
        let reloaded = MappingStore::load(backend).unwrap();
        let last = reloaded.entries().last().unwrap();
        assert_eq!(last, &MappingEntry::new("ITGOA", "GENOVA"));
    }

    #[test]
    fn test_mapping_add_ignores_blank_fields() {
        let mut backend = MemoryStore::new();
        let mut store = MappingStore::load(&mut backend).unwrap();
        assert!(!store.add("   ", "NAME").unwrap());
        assert!(!store.add("CODE", "").unwrap());
        drop(store);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_mapping_duplicates_allowed() {
        let mut store = MappingStore::load(MemoryStore::new()).unwrap();
        store.add("DEHAM", "HAMBURG PORT").unwrap();
        let hits = store
            .entries()
            .iter()
            .filter(|entry| entry.code == "DEHAM")
            .count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_mapping_add_then_remove_restores_list() {
        let mut store = MappingStore::load(MemoryStore::new()).unwrap();
        store.save().unwrap();
        let before = store.entries().to_vec();

        store.add("ITGOA", "GENOVA").unwrap();
        let index = store.entries().len() - 1;
        store.remove(index).unwrap();

        let reloaded = MappingStore::load(store.into_backend()).unwrap();
        assert_eq!(reloaded.entries(), before.as_slice());
    }

    #[test]
    fn test_mapping_remove_out_of_range() {
        let mut store = MappingStore::load(MemoryStore::new()).unwrap();
        let result = store.remove(99);
        assert!(matches!(result, Err(T2lError::Validation(_))));
        assert_eq!(store.entries().len(), 13);
    }

    #[test]
    fn test_mapping_reset_restores_defaults() {
        let mut store = MappingStore::load(MemoryStore::new()).unwrap();
        store.remove(0).unwrap();
        store.reset().unwrap();
        assert_eq!(store.entries(), default_mappings().as_slice());
    }

    #[test]
    fn test_hs_empty_when_unset() {
        let store = HsCodeStore::load(MemoryStore::new()).unwrap();
        assert!(store.codes().is_empty());
    }

    #[test]
    fn test_hs_add_bulk_pairs_lines() {
        let mut store = HsCodeStore::load(MemoryStore::new()).unwrap();
        let added = store
            .add_bulk("VIN1\n\n VIN2 \n", "12345678\n87032319\n")
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.get("VIN1"), Some("12345678"));
        assert_eq!(store.get("VIN2"), Some("87032319"));

        let reloaded = HsCodeStore::load(store.into_backend()).unwrap();
        assert_eq!(reloaded.codes().len(), 2);
    }

    #[test]
    fn test_hs_add_bulk_mismatch_changes_nothing() {
        let mut backend = MemoryStore::new();
        let mut store = HsCodeStore::load(&mut backend).unwrap();
        let result = store.add_bulk("VIN1\nVIN2", "12345678");
        assert!(matches!(
            result,
            Err(T2lError::Mismatch { vins: 2, codes: 1 })
        ));
        assert!(store.codes().is_empty());
        drop(store);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_hs_add_overwrites_existing_vin() {
        let mut store = HsCodeStore::load(MemoryStore::new()).unwrap();
        store.add_bulk("VIN1", "11111111").unwrap();
        store.add_bulk("VIN1", "22222222").unwrap();
        assert_eq!(store.get("VIN1"), Some("22222222"));
        assert_eq!(store.codes().len(), 1);
    }

    #[test]
    fn test_hs_remove() {
        let mut store = HsCodeStore::load(MemoryStore::new()).unwrap();
        store.add_bulk("VIN1", "12345678").unwrap();
        assert!(store.remove("VIN1").unwrap());
        assert!(!store.remove("VIN1").unwrap());

        let reloaded = HsCodeStore::load(store.into_backend()).unwrap();
        assert!(reloaded.codes().is_empty());
    }
}
