use super::{CallableKind, FunctionCatalog, FunctionRecord};
use crate::error::CatalogError;
use ahash::AHashMap;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// The exact-match key a catalog entry is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogKey {
    pub org: String,
    pub module: String,
    pub symbol: String,
    pub kind: CallableKind,
}

impl CatalogKey {
    pub fn new(
        org: impl Into<String>,
        module: impl Into<String>,
        symbol: impl Into<String>,
        kind: CallableKind,
    ) -> Self {
        Self {
            org: org.into(),
            module: module.into(),
            symbol: symbol.into(),
            kind,
        }
    }
}

/// One entry of a JSON catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub org: String,
    pub module: String,
    pub kind: CallableKind,
    pub record: FunctionRecord,
}

/// An in-memory [`FunctionCatalog`] backed by a hash map, with snapshot
/// persistence in the bincode format and a JSON interchange loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    functions: AHashMap<CatalogKey, FunctionRecord>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: CatalogKey, record: FunctionRecord) {
        self.functions.insert(key, record);
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Loads a catalog from its JSON interchange form: a list of entries,
    /// each record keyed under its org/module and the record's own name.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to parse catalog JSON: {}", e)))?;
        let mut catalog = Self::new();
        for entry in entries {
            let key = CatalogKey::new(entry.org, entry.module, entry.record.name.clone(), entry.kind);
            catalog.insert(key, entry.record);
        }
        Ok(catalog)
    }

    /// Saves the catalog snapshot to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), CatalogError> {
        let bytes = encode_to_vec(self, standard())
            .map_err(|e| CatalogError::Snapshot(format!("Serialization failed: {}", e)))?;
        let mut file = fs::File::create(path).map_err(|e| {
            CatalogError::Snapshot(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            CatalogError::Snapshot(format!("Could not write to file '{}': {}", path, e))
        })?;
        Ok(())
    }

    /// Loads a catalog snapshot from a file.
    pub fn from_file(path: &str) -> Result<Self, CatalogError> {
        let mut file = fs::File::open(path).map_err(|e| {
            CatalogError::Snapshot(format!("Could not open file '{}': {}", path, e))
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            CatalogError::Snapshot(format!("Could not read from file '{}': {}", path, e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a catalog snapshot from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        decode_from_slice(bytes, standard())
            .map(|(catalog, _)| catalog)
            .map_err(|e| CatalogError::Snapshot(format!("Deserialization failed: {}", e)))
    }
}

impl FunctionCatalog for InMemoryCatalog {
    fn function(
        &self,
        org: &str,
        module: &str,
        symbol: &str,
        kind: CallableKind,
    ) -> Option<FunctionRecord> {
        let key = CatalogKey::new(org, module, symbol, kind);
        self.functions.get(&key).cloned()
    }
}
