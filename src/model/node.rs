use super::property::{Property, PropertyBag};
use crate::text::LineRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A stable, deterministic node identifier, assigned in analysis order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(format!("node-{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out sequential [`NodeId`]s within one analysis or template call.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    next: usize,
}

impl NodeIdGen {
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next);
        self.next += 1;
        id
    }
}

/// The boolean markers a node carries. Stored as a bit set so flags stay
/// cheap to copy and compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeFlags(u16);

impl NodeFlags {
    pub const FINAL: NodeFlags = NodeFlags(1 << 0);
    pub const CHECKED: NodeFlags = NodeFlags(1 << 1);
    pub const CHECKPANIC: NodeFlags = NodeFlags(1 << 2);
    pub const RESOURCE: NodeFlags = NodeFlags(1 << 3);
    pub const RETURNING: NodeFlags = NodeFlags(1 << 4);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: NodeFlags) {
        self.0 |= other.0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for NodeFlags {
    type Output = NodeFlags;

    fn bitor(self, rhs: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for NodeFlags {
    fn bitor_assign(&mut self, rhs: NodeFlags) {
        self.0 |= rhs.0;
    }
}

/// The closed set of flow node kinds. Dispatch over this enum is always an
/// exhaustive match; adding a kind is a compile-enforced, crate-wide change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    EventHttpApi,
    If,
    While,
    Do,
    Foreach,
    Lock,
    Transaction,
    Match,
    Fork,
    Return,
    Panic,
    Fail,
    Break,
    Continue,
    ExpressionStatement,
    VariableDeclaration,
    FunctionCall,
    HttpGet,
    HttpPost,
    ActionCall,
    Default,
}

impl NodeKind {
    /// Kinds that always carry at least one branch, even when empty.
    pub fn requires_body(self) -> bool {
        matches!(
            self,
            NodeKind::If
                | NodeKind::While
                | NodeKind::Do
                | NodeKind::Foreach
                | NodeKind::Lock
                | NodeKind::Transaction
                | NodeKind::Match
                | NodeKind::Fork
        )
    }
}

/// Call-target coordinates for nodes that resolve against the catalog.
/// A target with no org/module/version belongs to the current compilation
/// unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Codedata {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
}

impl Codedata {
    pub fn local(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }

    pub fn is_local(&self) -> bool {
        self.org.is_none() || self.module.is_none()
    }

    /// The short call-site qualifier: the last dot-separated segment of the
    /// module name.
    pub fn module_qualifier(&self) -> Option<&str> {
        self.module
            .as_deref()
            .map(|module| module.rsplit('.').next().unwrap_or(module))
    }
}

/// The branch kinds a node may own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchKind {
    Block,
    Worker,
    OnFailure,
}

/// A named, ordered child sequence of a node. Order is execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub label: String,
    pub kind: BranchKind,
    #[serde(skip_serializing_if = "PropertyBag::is_empty", default)]
    pub properties: PropertyBag,
    pub children: Vec<FlowNode>,
}

impl Branch {
    pub const BODY_LABEL: &'static str = "Body";
    pub const THEN_LABEL: &'static str = "Then";
    pub const ELSE_LABEL: &'static str = "Else";
    pub const ON_FAILURE_LABEL: &'static str = "On Failure";

    pub fn new(label: impl Into<String>, kind: BranchKind, children: Vec<FlowNode>) -> Self {
        Self {
            label: label.into(),
            kind,
            properties: PropertyBag::new(),
            children,
        }
    }

    pub fn empty_body() -> Self {
        Self::new(Self::BODY_LABEL, BranchKind::Block, Vec::new())
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }
}

/// One step of the flow model: a visual node with its properties and any
/// nested branches. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub line_range: LineRange,
    #[serde(skip_serializing_if = "NodeFlags::is_empty", default)]
    pub flags: NodeFlags,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub codedata: Option<Codedata>,
    #[serde(skip_serializing_if = "PropertyBag::is_empty", default)]
    pub properties: PropertyBag,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub branches: Vec<Branch>,
}

impl FlowNode {
    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn branch(&self, label: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.label == label)
    }

    pub fn returning(&self) -> bool {
        self.has_flag(NodeFlags::RETURNING)
    }
}
