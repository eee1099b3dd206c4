use crate::syntax::Expression;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The organization/name pair identifying a module outside the current
/// compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    pub org: String,
    pub name: String,
}

impl ModuleId {
    pub fn new(org: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            name: name.into(),
        }
    }

    /// The short prefix used to qualify calls into this module: the last
    /// dot-separated segment of the module name.
    pub fn qualifier(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Method,
    ResourceMethod,
    Other,
}

/// A resolved callable as the external resolver reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// `None` for symbols declared in the current compilation unit.
    pub module: Option<ModuleId>,
    pub name: String,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    Required,
    Defaultable,
    IncludedRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub type_signature: String,
    pub kind: ParameterKind,
    pub default_value: Option<String>,
}

/// A resolved type, carrying just enough shape to classify clients and to
/// flatten record parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInfo {
    pub signature: String,
    pub shape: TypeShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeShape {
    /// A connector/client object type; calls on values of this type are
    /// candidates for protocol-action classification.
    Client { module: ModuleId, object: String },
    Record {
        inclusions: Vec<TypeInfo>,
        fields: Vec<FieldInfo>,
    },
    /// The bottom type; a record field of this type truncates flattening.
    Never,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub type_info: TypeInfo,
    pub documentation: Option<String>,
    pub has_default: bool,
    pub optional: bool,
}

/// The resolver the analyzer consults. Implemented by the external compiler
/// front end; every lookup is fallible and a miss is a normal outcome.
pub trait SemanticModel {
    /// Resolves the target of a call-shaped expression.
    fn call_symbol(&self, call: &Expression) -> Option<Symbol>;

    /// Resolves the type of an expression.
    fn type_of(&self, expr: &Expression) -> Option<TypeInfo>;

    /// Resolves a type by name, optionally within a specific module. Used
    /// to recover record shapes for included-record parameter flattening.
    fn named_type(&self, module: Option<&ModuleId>, name: &str) -> Option<TypeInfo>;

    /// Looks up a function declared in the current compilation unit.
    fn module_function(&self, name: &str) -> Option<Symbol>;
}

/// A table-backed [`SemanticModel`] for callers without a live front end:
/// fixtures, snapshots, and the CLI. Lookups are exact-text matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticSemanticModel {
    /// Call symbols keyed by the call expression's source text.
    pub calls: AHashMap<String, Symbol>,
    /// Expression types keyed by the expression's source text.
    pub types: AHashMap<String, TypeInfo>,
    /// Named types keyed by `module/name`, or bare `name` for local types.
    pub named: AHashMap<String, TypeInfo>,
    /// Functions declared in the current compilation unit, by name.
    pub functions: AHashMap<String, Symbol>,
}

impl StaticSemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn named_key(module: Option<&ModuleId>, name: &str) -> String {
        match module {
            Some(module) => format!("{}/{}", module, name),
            None => name.to_string(),
        }
    }

    pub fn insert_call(&mut self, text: impl Into<String>, symbol: Symbol) {
        self.calls.insert(text.into(), symbol);
    }

    pub fn insert_type(&mut self, text: impl Into<String>, type_info: TypeInfo) {
        self.types.insert(text.into(), type_info);
    }

    pub fn insert_named_type(
        &mut self,
        module: Option<&ModuleId>,
        name: &str,
        type_info: TypeInfo,
    ) {
        self.named.insert(Self::named_key(module, name), type_info);
    }

    pub fn insert_function(&mut self, symbol: Symbol) {
        self.functions.insert(symbol.name.clone(), symbol);
    }
}

impl SemanticModel for StaticSemanticModel {
    fn call_symbol(&self, call: &Expression) -> Option<Symbol> {
        self.calls.get(&call.text).cloned()
    }

    fn type_of(&self, expr: &Expression) -> Option<TypeInfo> {
        self.types.get(&expr.text).cloned()
    }

    fn named_type(&self, module: Option<&ModuleId>, name: &str) -> Option<TypeInfo> {
        self.named.get(&Self::named_key(module, name)).cloned()
    }

    fn module_function(&self, name: &str) -> Option<Symbol> {
        self.functions.get(name).cloned()
    }
}
