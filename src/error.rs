use crate::model::NodeKind;
use thiserror::Error;

/// Errors that can occur while building a node insertion template.
#[derive(Error, Debug, Clone)]
pub enum TemplateError {
    #[error("Function '{symbol}' not found in the catalog under '{org}/{module}'")]
    FunctionNotFound {
        org: String,
        module: String,
        symbol: String,
    },

    #[error("Local function '{0}' is not visible to the semantic model")]
    LocalSymbolNotFound(String),

    #[error("Node kind {0:?} has no insertion template")]
    UnsupportedKind(NodeKind),
}

/// Errors that can occur during source synthesis. Any of these aborts the
/// whole `to_source` call; emitting a call with the wrong arity would
/// produce invalid source, so there is no partial output.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("No source template for call '{symbol}': catalog entry '{org}/{module}' is missing")]
    TemplateNotFound {
        org: String,
        module: String,
        symbol: String,
    },

    #[error("Node '{node}' is missing required property '{key}'")]
    MissingProperty { node: String, key: String },

    #[error("Node '{node}' is missing required branch '{label}'")]
    MissingBranch { node: String, label: String },

    #[error("Call node '{node}' carries no target coordinates")]
    MissingCallTarget { node: String },
}

/// Errors that can occur when lowering a custom parser output into the
/// canonical `FunctionSource` model.
#[derive(Error, Debug, Clone)]
pub enum SyntaxConversionError {
    #[error("Invalid source fragment: {0}")]
    ValidationError(String),
}

/// Errors that can occur loading or saving a catalog snapshot.
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Catalog snapshot error: {0}")]
    Snapshot(String),
}
