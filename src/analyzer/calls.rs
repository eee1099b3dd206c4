//! Call-site classification: resolving call-shaped expressions through the
//! semantic model and claiming the current builder with the matching node
//! kind. Resolution misses fall through silently; the statement-level
//! default rule then produces the generic node.

use super::Analyzer;
use crate::catalog::CallableKind;
use crate::model::keys;
use crate::model::{Codedata, NodeKind, ParameterRef, Property, ValueType};
use crate::semantic::{ParameterKind, Symbol, SymbolKind, TypeShape};
use crate::syntax::{CallExpr, Expression};
use ahash::AHashMap;
use itertools::Itertools;

/// The built-in protocol-action table. Classification is a pure function
/// of the resolved (module, member) pair, so the same symbol always yields
/// the same kind.
pub(super) fn register_default_actions(actions: &mut AHashMap<(String, String), NodeKind>) {
    actions.insert(("http".to_string(), "get".to_string()), NodeKind::HttpGet);
    actions.insert(("http".to_string(), "post".to_string()), NodeKind::HttpPost);
}

impl<'a> Analyzer<'a> {
    /// A remote call or resource access on some receiver. Only method and
    /// resource-method symbols classify; anything else stays generic.
    pub(super) fn visit_action(&mut self, whole: &Expression, call: &CallExpr) {
        for argument in &call.arguments {
            self.visit_expression(&argument.value);
        }
        if !self.builder.is_unclassified() {
            return;
        }
        let Some(symbol) = self.semantic.call_symbol(whole) else {
            return;
        };
        if !matches!(symbol.kind, SymbolKind::Method | SymbolKind::ResourceMethod) {
            return;
        }

        let module_name = symbol
            .module
            .as_ref()
            .map(|module| module.name.clone())
            .unwrap_or_default();
        let action = self
            .actions
            .get(&(module_name, call.method.clone()))
            .copied();

        self.builder.line_range(whole.line_range);
        match action {
            Some(kind) => self.classify_protocol_action(kind, call, &symbol),
            None => self.classify_generic_action(call, &symbol),
        }
    }

    /// A plain call. A resolved function symbol claims the builder as a
    /// function-call node carrying the target's coordinates.
    pub(super) fn visit_function_call(&mut self, whole: &Expression, call: &CallExpr) {
        for argument in &call.arguments {
            self.visit_expression(&argument.value);
        }
        if !self.builder.is_unclassified() {
            return;
        }
        let Some(symbol) = self.semantic.call_symbol(whole) else {
            return;
        };
        if symbol.kind != SymbolKind::Function {
            return;
        }

        self.builder.line_range(whole.line_range);
        self.builder.classify(NodeKind::FunctionCall);
        self.builder.label(&symbol.name);
        self.builder.codedata(codedata_for(&symbol));
        self.add_symbol_arguments(call, &symbol, 0, &[], CallableKind::Function);
        self.set_binding_properties();
    }

    fn classify_protocol_action(&mut self, kind: NodeKind, call: &CallExpr, symbol: &Symbol) {
        self.builder.classify(kind);

        let mut codedata = codedata_for(symbol);
        if let Some(target) = &call.target {
            if let Some(type_info) = self.semantic.type_of(target) {
                if let TypeShape::Client { object, .. } = type_info.shape {
                    codedata.object = Some(object);
                }
            }
            self.builder
                .property(keys::CLIENT, Property::identifier("Client", &target.text));
        }
        self.builder.codedata(codedata);

        // The path is syntactic for resource accesses and the leading
        // positional argument for remote calls.
        let (path, path_from_arguments) = match resource_path_text(call) {
            Some(path) => (path, false),
            None => match call.arguments.iter().find(|argument| argument.name.is_none()) {
                Some(argument) => (argument.value.text.clone(), true),
                None => ("\"\"".to_string(), false),
            },
        };
        self.builder
            .property(keys::PATH, Property::expression("Path", path));
        if let Some(binding) = &self.pending_binding {
            self.builder.property(
                keys::TARGET_TYPE,
                Property::type_descriptor("Target Type", &binding.type_descriptor),
            );
        }

        let skip_arguments = usize::from(path_from_arguments);
        self.add_symbol_arguments(
            call,
            symbol,
            skip_arguments,
            &["path", "targetType"],
            CallableKind::Method,
        );
        self.set_binding_properties();
    }

    fn classify_generic_action(&mut self, call: &CallExpr, symbol: &Symbol) {
        self.builder.classify(NodeKind::ActionCall);
        self.builder.label(&symbol.name);
        self.builder.codedata(codedata_for(symbol));
        if let Some(target) = &call.target {
            self.builder
                .property(keys::CLIENT, Property::identifier("Client", &target.text));
        }
        self.add_symbol_arguments(call, symbol, 0, &[], CallableKind::Method);
        self.set_binding_properties();
    }

    /// Pairs call arguments with the symbol's parameters, positionally in
    /// declaration order or by name, and records each match as a property
    /// carrying its parameter reference. For non-local symbols the
    /// catalog record, when present, contributes documentation and default
    /// values; its absence changes nothing here.
    fn add_symbol_arguments(
        &mut self,
        call: &CallExpr,
        symbol: &Symbol,
        skip_arguments: usize,
        skip_parameters: &[&str],
        callable: CallableKind,
    ) {
        let record = symbol.module.as_ref().and_then(|module| {
            self.catalog
                .function(&module.org, &module.name, &symbol.name, callable)
        });

        let arguments: Vec<_> = call.arguments.iter().skip(skip_arguments).collect();
        let mut positional = arguments.iter().filter(|argument| argument.name.is_none());

        for parameter in &symbol.parameters {
            if skip_parameters.contains(&parameter.name.as_str()) {
                continue;
            }
            let named = arguments
                .iter()
                .find(|argument| argument.name.as_deref() == Some(parameter.name.as_str()));
            let value = named.map(|argument| argument.value.text.clone()).or_else(|| {
                if parameter.kind == ParameterKind::IncludedRecord {
                    None
                } else {
                    positional.next().map(|argument| argument.value.text.clone())
                }
            });
            let Some(value) = value else {
                continue;
            };

            let record_parameter = record.as_ref().and_then(|record| {
                record
                    .parameters
                    .iter()
                    .find(|candidate| candidate.name == parameter.name)
            });
            let mut property = Property::builder()
                .label(&parameter.name)
                .value(value)
                .value_type(ValueType::Expression)
                .editable()
                .parameter(ParameterRef {
                    name: parameter.name.clone(),
                    type_signature: parameter.type_signature.clone(),
                    default_value: record_parameter
                        .and_then(|candidate| candidate.default_value.clone())
                        .or_else(|| parameter.default_value.clone()),
                    optional: parameter.kind != ParameterKind::Required,
                });
            if let Some(description) =
                record_parameter.and_then(|candidate| candidate.description.clone())
            {
                property = property.documentation(description);
            }
            if parameter.kind != ParameterKind::Required {
                property = property.advanced();
            }
            self.builder.property(&parameter.name, property.build());
        }

        // Named arguments addressing flattened included-record fields have
        // no parameter of their own; they land as their own properties.
        for argument in arguments.iter().filter(|argument| argument.name.is_some()) {
            let name = argument.name.as_deref().unwrap_or_default();
            if self.builder.has_property(name) || skip_parameters.contains(&name) {
                continue;
            }
            self.builder.property(
                name,
                Property::builder()
                    .label(name)
                    .value(&argument.value.text)
                    .value_type(ValueType::Expression)
                    .editable()
                    .advanced()
                    .build(),
            );
        }
    }
}

fn codedata_for(symbol: &Symbol) -> Codedata {
    match &symbol.module {
        Some(module) => Codedata {
            org: Some(module.org.clone()),
            module: Some(module.name.clone()),
            object: None,
            symbol: Some(symbol.name.clone()),
            version: None,
        },
        None => Codedata::local(&symbol.name),
    }
}

fn resource_path_text(call: &CallExpr) -> Option<String> {
    if call.resource_path.is_empty() {
        return None;
    }
    Some(format!("/{}", call.resource_path.iter().join("/")))
}
