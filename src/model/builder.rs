use super::node::{Branch, Codedata, FlowNode, NodeFlags, NodeIdGen, NodeKind};
use super::property::{Property, PropertyBag};
use crate::text::LineRange;

/// Whether a specialized kind has claimed the node under construction.
/// Checked at seal time; an unclassified builder seals into the opaque
/// fallback kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Classification {
    #[default]
    Unclassified,
    Classified(NodeKind),
}

/// The single mutable stage of node construction. One builder is live per
/// traversal frame; it is owned exclusively by that frame and discarded
/// once sealed.
#[derive(Debug, Default)]
pub struct NodeBuilder {
    classification: Classification,
    label: Option<String>,
    flags: NodeFlags,
    line_range: Option<LineRange>,
    codedata: Option<Codedata>,
    properties: PropertyBag,
    branches: Vec<Branch>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unclassified(&self) -> bool {
        self.classification == Classification::Unclassified
    }

    /// Claims the node for `kind` and applies the kind's default label.
    /// The first claim wins; later claims from nested sub-expressions are
    /// ignored.
    pub fn classify(&mut self, kind: NodeKind) -> &mut Self {
        if self.is_unclassified() {
            self.classification = Classification::Classified(kind);
            if self.label.is_none() {
                self.label = Some(kind.spec().label.to_string());
            }
        }
        self
    }

    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub fn flag(&mut self, flag: NodeFlags) -> &mut Self {
        self.flags.insert(flag);
        self
    }

    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn line_range(&mut self, line_range: LineRange) -> &mut Self {
        self.line_range = Some(line_range);
        self
    }

    pub fn codedata(&mut self, codedata: Codedata) -> &mut Self {
        self.codedata = Some(codedata);
        self
    }

    pub fn property(&mut self, key: impl Into<String>, property: Property) -> &mut Self {
        self.properties.insert(key, property);
        self
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains(key)
    }

    pub fn branch(&mut self, branch: Branch) -> &mut Self {
        self.branches.push(branch);
        self
    }

    /// Seals the builder into an immutable node. An unclassified builder
    /// becomes the opaque fallback kind. Body-requiring kinds are
    /// guaranteed at least one branch, so an empty construct still renders
    /// with a place to drop children into.
    pub fn build(self, ids: &mut NodeIdGen) -> FlowNode {
        let kind = match self.classification {
            Classification::Classified(kind) => kind,
            Classification::Unclassified => NodeKind::Default,
        };
        let mut branches = self.branches;
        if kind.requires_body() && branches.is_empty() {
            branches.push(Branch::empty_body());
        }
        FlowNode {
            id: ids.next_id(),
            kind,
            label: self
                .label
                .unwrap_or_else(|| kind.spec().label.to_string()),
            line_range: self.line_range.unwrap_or_default(),
            flags: self.flags,
            codedata: self.codedata,
            properties: self.properties,
            branches,
        }
    }
}
