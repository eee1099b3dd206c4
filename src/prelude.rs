//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and traits of the keiro crate.
//! Import this module to get access to the core functionality without
//! having to import each type individually.

// Analysis and synthesis entry points
pub use crate::analyzer::{Analyzer, AnalyzerBuilder, FlowModel};
pub use crate::source::{Emission, SourceBuilder, SourceChange, SourceContext, to_source};
pub use crate::templates::{TemplateContext, template};

// Flow model types
pub use crate::model::keys;
pub use crate::model::{
    Branch, BranchKind, Client, ClientScope, Codedata, FlowNode, NodeBuilder, NodeFlags, NodeId,
    NodeKind, ParameterRef, Property, PropertyBag, ValueType,
};

// Canonical syntax model
pub use crate::syntax::{
    Argument, BindingPattern, Block, CallExpr, CheckKind, DoStatement, ElseBody, Expression,
    ExpressionKind, ForeachStatement, FunctionKind, FunctionSource, IfStatement,
    IntoFunctionSource, MatchClause, MatchStatement, NamedWorker, NewExpr, OnFailClause,
    Statement, StatementKind, TransactionStatement, VariableDecl, WhileStatement,
};

// External collaborator interfaces
pub use crate::catalog::{
    CallableKind, CatalogKey, EmptyCatalog, FunctionCatalog, FunctionRecord, InMemoryCatalog,
    ParameterRecord,
};
pub use crate::semantic::{
    FieldInfo, ModuleId, ParameterKind, ParameterSymbol, SemanticModel, StaticSemanticModel,
    Symbol, SymbolKind, TypeInfo, TypeShape,
};

// Text primitives
pub use crate::text::{LineRange, Position, TextEdit};

// Error types
pub use crate::error::{CatalogError, SourceError, SyntaxConversionError, TemplateError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
