pub mod store;

pub use store::*;

use crate::semantic::ParameterKind;
use serde::{Deserialize, Serialize};

/// Whether a catalog entry describes a free function or an object method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallableKind {
    Function,
    Method,
}

/// A persisted signature of a function or connector action declared outside
/// the current compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub description: Option<String>,
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    pub description: Option<String>,
    pub type_signature: String,
    pub default_value: Option<String>,
    pub kind: ParameterKind,
}

impl ParameterRecord {
    pub fn is_optional(&self) -> bool {
        !matches!(self.kind, ParameterKind::Required)
    }
}

/// Read-only lookup into the function/connector metadata store. Queried by
/// exact key; an absent key is a normal miss, not an error. Implementations
/// must tolerate concurrent reads from many in-flight requests.
pub trait FunctionCatalog: Sync {
    fn function(
        &self,
        org: &str,
        module: &str,
        symbol: &str,
        kind: CallableKind,
    ) -> Option<FunctionRecord>;
}

/// A catalog with no entries; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl FunctionCatalog for EmptyCatalog {
    fn function(&self, _: &str, _: &str, _: &str, _: CallableKind) -> Option<FunctionRecord> {
        None
    }
}
