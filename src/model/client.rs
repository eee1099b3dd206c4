use crate::semantic::{ModuleId, TypeInfo, TypeShape};
use crate::text::LineRange;
use serde::{Deserialize, Serialize};

/// Where a client handle is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientScope {
    Local,
    Module,
}

/// A detected external-service handle. Built once during analysis, never
/// mutated; call sites consult it to classify actions on the handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub label: String,
    pub scope: ClientScope,
    pub type_signature: String,
    pub module: ModuleId,
    pub object: String,
    pub line_range: LineRange,
}

/// Step-wise construction of a [`Client`]. `build` succeeds only when the
/// resolved type is actually client-shaped.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    label: Option<String>,
    scope: Option<ClientScope>,
    line_range: Option<LineRange>,
    type_info: Option<TypeInfo>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub fn scope(&mut self, scope: ClientScope) -> &mut Self {
        self.scope = Some(scope);
        self
    }

    pub fn line_range(&mut self, line_range: LineRange) -> &mut Self {
        self.line_range = Some(line_range);
        self
    }

    pub fn type_info(&mut self, type_info: TypeInfo) -> &mut Self {
        self.type_info = Some(type_info);
        self
    }

    pub fn build(self, index: usize) -> Option<Client> {
        let type_info = self.type_info?;
        let TypeShape::Client { module, object } = type_info.shape else {
            return None;
        };
        Some(Client {
            id: format!("client-{}", index),
            label: self.label.unwrap_or_default(),
            scope: self.scope.unwrap_or(ClientScope::Local),
            type_signature: type_info.signature,
            module,
            object,
            line_range: self.line_range.unwrap_or_default(),
        })
    }
}
