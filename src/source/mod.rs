pub mod builder;
pub mod emit;

pub use builder::*;

use crate::catalog::FunctionCatalog;
use crate::error::SourceError;
use crate::model::{Branch, FlowNode};
use crate::text::{LineRange, TextEdit};
use ahash::AHashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What the emitter knows about the document it is editing: where it lives,
/// which modules it already imports, and where its `do` clauses span. The
/// `do` ranges exist only to decide whether a call needs the check keyword.
#[derive(Debug, Clone, Default)]
pub struct SourceContext {
    pub file: PathBuf,
    pub imports: Vec<String>,
    pub do_clause_ranges: Vec<LineRange>,
}

impl SourceContext {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            imports: Vec::new(),
            do_clause_ranges: Vec::new(),
        }
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }

    pub fn with_do_clauses(mut self, ranges: Vec<LineRange>) -> Self {
        self.do_clause_ranges = ranges;
        self
    }

    pub fn has_import(&self, module: &str) -> bool {
        self.imports.iter().any(|existing| existing == module)
    }

    pub fn within_do_clause(&self, range: &LineRange) -> bool {
        self.do_clause_ranges
            .iter()
            .any(|clause| clause.contains(range))
    }
}

/// The synthesizer's output: per-file ordered edit lists. Nothing is
/// written to disk; the caller owns application.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceChange {
    edits: AHashMap<PathBuf, Vec<TextEdit>>,
}

impl SourceChange {
    pub fn add_edit(&mut self, file: PathBuf, edit: TextEdit) {
        self.edits.entry(file).or_default().push(edit);
    }

    pub fn edits_for(&self, file: &Path) -> &[TextEdit] {
        self.edits.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.edits.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// One in-flight emission: the text under construction plus everything the
/// per-kind emitters may consult. Import requirements accumulate here and
/// are deduplicated when the change is assembled.
pub struct Emission<'a> {
    pub out: SourceBuilder,
    pub ctx: &'a SourceContext,
    pub catalog: &'a dyn FunctionCatalog,
    imports: Vec<String>,
}

impl<'a> Emission<'a> {
    pub fn new(ctx: &'a SourceContext, catalog: &'a dyn FunctionCatalog) -> Self {
        Self {
            out: SourceBuilder::new(),
            ctx,
            catalog,
            imports: Vec::new(),
        }
    }

    /// Emits one node by dispatching to its kind's registered emitter.
    pub fn node(&mut self, node: &FlowNode) -> Result<(), SourceError> {
        (node.kind.spec().emit)(node, self)
    }

    /// Emits the named branch of `node` as a brace-delimited block.
    pub fn block(&mut self, node: &FlowNode, label: &str) -> Result<(), SourceError> {
        let branch = node
            .branch(label)
            .ok_or_else(|| SourceError::MissingBranch {
                node: node.id.to_string(),
                label: label.to_string(),
            })?;
        self.children_block(branch)
    }

    /// Emits a branch's children, in order, between braces.
    pub fn children_block(&mut self, branch: &Branch) -> Result<(), SourceError> {
        self.out.open_brace();
        for child in &branch.children {
            self.node(child)?;
        }
        self.out.close_brace();
        Ok(())
    }

    /// Records that the emitted text references `org/module`.
    pub fn require_import(&mut self, org: &str, module: &str) {
        let id = format!("{}/{}", org, module);
        if !self.imports.contains(&id) {
            self.imports.push(id);
        }
    }
}

/// Reconstructs source text for one flow node (and everything nested under
/// it) as a set of text edits. Fails atomically: a node whose catalog
/// record cannot be resolved aborts the whole call, because emitting a call
/// with guessed arity would produce invalid source.
pub fn to_source(
    node: &FlowNode,
    ctx: &SourceContext,
    catalog: &dyn FunctionCatalog,
) -> Result<SourceChange, SourceError> {
    let mut emission = Emission::new(ctx, catalog);
    emission.node(node)?;

    let mut change = SourceChange::default();
    let text = emission.out.build();
    if !text.is_empty() {
        change.add_edit(ctx.file.clone(), TextEdit::new(node.line_range, text));
    }
    for module in emission.imports {
        if !ctx.has_import(&module) {
            change.add_edit(
                ctx.file.clone(),
                TextEdit::at_document_start(format!("import {};\n", module)),
            );
        }
    }
    Ok(change)
}
