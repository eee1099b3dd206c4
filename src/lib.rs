//! # Keiro - Flow Graph Model Synthesis Engine
//!
//! **Keiro** bridges program source and editable flow diagrams, in both
//! directions. Given a parsed function body and a resolved semantic model,
//! it synthesizes a flow graph model of typed nodes, nested branches, and
//! displayable properties; given an edited flow graph model, it synthesizes
//! the source text that matches it, down to the text edits a language
//! service would apply.
//!
//! ## Core Workflow
//!
//! The engine is format-agnostic on the way in. It operates on a canonical
//! syntax model of a function body; parsing stays with your front end.
//!
//! 1. **Lower Your Syntax Tree**: Implement the `IntoFunctionSource` trait
//!    for your parser's output to translate it into Keiro's `FunctionSource`.
//! 2. **Analyze**: Build an `Analyzer` over your `SemanticModel` and
//!    `FunctionCatalog` implementations and produce a `FlowModel`: the
//!    ordered node sequence plus every discovered client handle.
//! 3. **Edit**: The model is plain serializable data; a diagram editor
//!    mutates it freely.
//! 4. **Synthesize**: Feed edited nodes to `to_source` to get back per-file
//!    text edits, including any import statements the edits now require.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Stub collaborators; a language service wires real ones.
//!     let semantic = StaticSemanticModel::new();
//!     let catalog = InMemoryCatalog::new();
//!
//!     let source = FunctionSource {
//!         name: "greeting".to_string(),
//!         kind: FunctionKind::Function,
//!         return_type: None,
//!         body: vec![],
//!         line_range: LineRange::lines(0, 0),
//!     };
//!
//!     // Forward: syntax -> flow model.
//!     let analyzer = Analyzer::builder(&semantic, &catalog).build();
//!     let model = analyzer.analyze(&source);
//!     println!("{} nodes", model.nodes.len());
//!
//!     // Reverse: flow model -> text edits.
//!     let ctx = SourceContext::new("service.bal");
//!     for node in &model.nodes {
//!         let change = to_source(node, &ctx, &catalog)?;
//!         for edit in change.edits_for(ctx.file.as_path()) {
//!             println!("{:?} -> {}", edit.range, edit.new_text);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod catalog;
pub mod error;
pub mod model;
pub mod prelude;
pub mod registry;
pub mod semantic;
pub mod source;
pub mod syntax;
pub mod templates;
pub mod text;
