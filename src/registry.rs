//! The per-kind dispatch table. Every [`NodeKind`] resolves to one
//! [`NodeSpec`] triple: its constant label, its insertion-template builder,
//! and its source emitter. The table is generated by one macro and matched
//! exhaustively, so a new kind cannot be added without deciding all three.

use crate::error::{SourceError, TemplateError};
use crate::model::{FlowNode, NodeBuilder, NodeKind};
use crate::source::{Emission, emit};
use crate::templates::{self, TemplateContext};

pub type TemplateFn =
    for<'a, 'b, 'c> fn(&'a mut NodeBuilder, &'b TemplateContext<'c>) -> Result<(), TemplateError>;

pub type EmitFn =
    for<'a, 'b, 'c> fn(&'a FlowNode, &'b mut Emission<'c>) -> Result<(), SourceError>;

/// The behavior triple registered for one node kind.
pub struct NodeSpec {
    pub label: &'static str,
    pub template: Option<TemplateFn>,
    pub emit: EmitFn,
}

/// Master macro tying each kind to its label, template builder, and emitter.
macro_rules! define_node_specs {
    ( $( ($kind:ident, $label:expr, $template:expr, $emit:path) ),* $(,)? ) => {
        impl NodeKind {
            pub fn spec(self) -> &'static NodeSpec {
                match self {
                    $(
                        NodeKind::$kind => {
                            static SPEC: NodeSpec = NodeSpec {
                                label: $label,
                                template: $template,
                                emit: $emit,
                            };
                            &SPEC
                        }
                    )*
                }
            }
        }
    };
}

define_node_specs! {
    (EventHttpApi, "API Event", Some(templates::event_http_api), emit::event_http_api),
    (If, "If", Some(templates::if_node), emit::if_node),
    (While, "While", Some(templates::while_node), emit::while_node),
    (Do, "Do", Some(templates::do_node), emit::do_node),
    (Foreach, "Foreach", Some(templates::foreach_node), emit::foreach_node),
    (Lock, "Lock", Some(templates::lock_node), emit::lock_node),
    (Transaction, "Transaction", Some(templates::transaction_node), emit::transaction_node),
    (Match, "Match", Some(templates::match_node), emit::match_node),
    (Fork, "Fork", Some(templates::fork_node), emit::fork_node),
    (Return, "Return", Some(templates::return_node), emit::return_node),
    (Panic, "Panic", Some(templates::panic_node), emit::panic_node),
    (Fail, "Fail", Some(templates::fail_node), emit::fail_node),
    (Break, "Break", Some(templates::break_node), emit::break_node),
    (Continue, "Continue", Some(templates::continue_node), emit::continue_node),
    (ExpressionStatement, "Expression", Some(templates::expression_statement), emit::expression_statement),
    (VariableDeclaration, "Variable", Some(templates::variable_declaration), emit::variable_declaration),
    (FunctionCall, "Function Call", Some(templates::function_call), emit::function_call),
    (HttpGet, "HTTP GET", Some(templates::http_get), emit::http_get),
    (HttpPost, "HTTP POST", Some(templates::http_post), emit::http_post),
    (ActionCall, "Action Call", Some(templates::action_call), emit::action_call),
    (Default, "Statement", None, emit::default_node),
}
