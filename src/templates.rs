//! Insertion templates: the default property set a node of a given kind
//! carries when the user drops a fresh one onto the diagram. Call-shaped
//! kinds consult the catalog (and the semantic model, for record
//! flattening) to shape their parameter list.

use crate::catalog::{CallableKind, FunctionCatalog, FunctionRecord};
use crate::error::TemplateError;
use crate::model::keys;
use crate::model::{
    Branch, BranchKind, Codedata, FlowNode, NodeBuilder, NodeIdGen, NodeKind, ParameterRef,
    Property, ValueType,
};
use crate::semantic::{ModuleId, ParameterKind, SemanticModel, TypeInfo, TypeShape};

/// Everything a template builder may consult.
pub struct TemplateContext<'a> {
    pub semantic: &'a dyn SemanticModel,
    pub catalog: &'a dyn FunctionCatalog,
    /// Target coordinates for call-shaped kinds; ignored by control kinds.
    pub codedata: Codedata,
}

impl<'a> TemplateContext<'a> {
    pub fn new(semantic: &'a dyn SemanticModel, catalog: &'a dyn FunctionCatalog) -> Self {
        Self {
            semantic,
            catalog,
            codedata: Codedata::default(),
        }
    }

    pub fn with_codedata(mut self, codedata: Codedata) -> Self {
        self.codedata = codedata;
        self
    }
}

/// Builds the insertion template for `kind`, or fails when the kind has no
/// template or its catalog record cannot be resolved.
pub fn template(kind: NodeKind, ctx: &TemplateContext<'_>) -> Result<FlowNode, TemplateError> {
    let Some(build) = kind.spec().template else {
        return Err(TemplateError::UnsupportedKind(kind));
    };
    let mut builder = NodeBuilder::new();
    builder.classify(kind);
    build(&mut builder, ctx)?;
    let mut ids = NodeIdGen::default();
    Ok(builder.build(&mut ids))
}

fn empty_expression(label: &str, documentation: &str) -> Property {
    Property::builder()
        .label(label)
        .value_type(ValueType::Expression)
        .documentation(documentation)
        .editable()
        .build()
}

pub(crate) fn event_http_api(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(
        keys::METHOD,
        Property::builder()
            .label("Method")
            .value("get")
            .value_type(ValueType::Choice(
                ["get", "post", "put", "delete", "patch", "head", "options"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ))
            .editable()
            .build(),
    );
    builder.property(keys::PATH, Property::identifier("Path", "."));
    Ok(())
}

pub(crate) fn if_node(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::CONDITION, empty_expression("Condition", "Boolean condition"));
    builder.branch(Branch::new(Branch::THEN_LABEL, BranchKind::Block, Vec::new()));
    Ok(())
}

pub(crate) fn while_node(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::CONDITION, empty_expression("Condition", "Boolean condition"));
    Ok(())
}

pub(crate) fn do_node(
    _builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    Ok(())
}

pub(crate) fn foreach_node(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::TYPE, Property::type_descriptor("Type", "var"));
    builder.property(keys::VARIABLE, Property::identifier("Variable", "item"));
    builder.property(
        keys::COLLECTION,
        empty_expression("Collection", "Iterable expression"),
    );
    Ok(())
}

pub(crate) fn lock_node(
    _builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    Ok(())
}

pub(crate) fn transaction_node(
    _builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    Ok(())
}

pub(crate) fn match_node(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::SUBJECT, empty_expression("Subject", "Matched expression"));
    Ok(())
}

pub(crate) fn fork_node(
    _builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    Ok(())
}

pub(crate) fn return_node(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::EXPRESSION, empty_expression("Expression", "Returned value"));
    Ok(())
}

pub(crate) fn panic_node(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::EXPRESSION, empty_expression("Expression", "Panicked error"));
    Ok(())
}

pub(crate) fn fail_node(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::EXPRESSION, empty_expression("Expression", "Failed error"));
    Ok(())
}

pub(crate) fn break_node(
    _builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    Ok(())
}

pub(crate) fn continue_node(
    _builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    Ok(())
}

pub(crate) fn expression_statement(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::EXPRESSION, empty_expression("Expression", "Statement expression"));
    Ok(())
}

pub(crate) fn variable_declaration(
    builder: &mut NodeBuilder,
    _ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    builder.property(keys::TYPE, Property::type_descriptor("Type", "var"));
    builder.property(keys::VARIABLE, Property::identifier("Variable", "item"));
    builder.property(keys::EXPRESSION, empty_expression("Expression", "Initializer"));
    Ok(())
}

pub(crate) fn function_call(
    builder: &mut NodeBuilder,
    ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    let codedata = ctx.codedata.clone();
    let symbol_name = codedata.symbol.clone().unwrap_or_default();

    if codedata.is_local() {
        let symbol = ctx
            .semantic
            .module_function(&symbol_name)
            .ok_or_else(|| TemplateError::LocalSymbolNotFound(symbol_name.clone()))?;
        builder.label(&symbol.name);
        builder.codedata(Codedata::local(&symbol.name));
        for param in &symbol.parameters {
            builder.property(
                &param.name,
                Property::builder()
                    .label(&param.name)
                    .value(param.default_value.clone().unwrap_or_default())
                    .value_type(ValueType::Expression)
                    .editable()
                    .parameter(ParameterRef {
                        name: param.name.clone(),
                        type_signature: param.type_signature.clone(),
                        default_value: param.default_value.clone(),
                        optional: param.kind != ParameterKind::Required,
                    })
                    .build(),
            );
        }
        add_return_binding(builder, symbol.return_type.as_deref());
        return Ok(());
    }

    let record = lookup_record(ctx, &codedata, CallableKind::Function)?;
    builder.label(&record.name);
    if let Some(description) = &record.description {
        builder.property(
            keys::VIEW,
            Property::builder()
                .label("Description")
                .value(description)
                .value_type(ValueType::Identifier)
                .build(),
        );
    }
    builder.codedata(codedata.clone());
    add_record_parameters(builder, ctx, &codedata, &record);
    add_return_binding(builder, record.return_type.as_deref());
    Ok(())
}

pub(crate) fn http_get(
    builder: &mut NodeBuilder,
    ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    client_action(builder, ctx, "get")
}

pub(crate) fn http_post(
    builder: &mut NodeBuilder,
    ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    client_action(builder, ctx, "post")
}

pub(crate) fn action_call(
    builder: &mut NodeBuilder,
    ctx: &TemplateContext<'_>,
) -> Result<(), TemplateError> {
    let codedata = ctx.codedata.clone();
    builder.property(keys::CLIENT, Property::identifier("Client", ""));
    if codedata.is_local() {
        builder.codedata(codedata);
        return Ok(());
    }
    let record = lookup_record(ctx, &codedata, CallableKind::Method)?;
    builder.label(&record.name);
    builder.codedata(codedata.clone());
    add_record_parameters(builder, ctx, &codedata, &record);
    add_return_binding(builder, record.return_type.as_deref());
    Ok(())
}

/// The shared template shape of the recognized HTTP actions. The catalog is
/// consulted for the action's extra parameters; a miss leaves the basic
/// client/path/target shape, which is still a valid insertion.
fn client_action(
    builder: &mut NodeBuilder,
    ctx: &TemplateContext<'_>,
    method: &str,
) -> Result<(), TemplateError> {
    let mut codedata = ctx.codedata.clone();
    if codedata.org.is_none() {
        codedata.org = Some("ballerina".to_string());
    }
    if codedata.module.is_none() {
        codedata.module = Some("http".to_string());
    }
    codedata.object.get_or_insert_with(|| "Client".to_string());
    codedata.symbol = Some(method.to_string());

    builder.property(keys::CLIENT, Property::identifier("Client", ""));
    builder.property(keys::PATH, Property::expression("Path", "\"\""));
    builder.property(
        keys::TARGET_TYPE,
        Property::type_descriptor("Target Type", "json"),
    );
    builder.property(keys::TYPE, Property::type_descriptor("Type", "json"));
    builder.property(keys::VARIABLE, Property::identifier("Variable", "response"));

    let (org, module) = (
        codedata.org.clone().unwrap_or_default(),
        codedata.module.clone().unwrap_or_default(),
    );
    if let Some(record) = ctx
        .catalog
        .function(&org, &module, method, CallableKind::Method)
    {
        add_record_parameters(builder, ctx, &codedata, &record);
    }
    builder.codedata(codedata);
    Ok(())
}

fn lookup_record(
    ctx: &TemplateContext<'_>,
    codedata: &Codedata,
    kind: CallableKind,
) -> Result<FunctionRecord, TemplateError> {
    let org = codedata.org.clone().unwrap_or_default();
    let module = codedata.module.clone().unwrap_or_default();
    let symbol = codedata.symbol.clone().unwrap_or_default();
    ctx.catalog
        .function(&org, &module, &symbol, kind)
        .ok_or(TemplateError::FunctionNotFound {
            org,
            module,
            symbol,
        })
}

fn add_return_binding(builder: &mut NodeBuilder, return_type: Option<&str>) {
    if let Some(return_type) = return_type {
        builder.property(keys::TYPE, Property::type_descriptor("Type", return_type));
        builder.property(keys::VARIABLE, Property::identifier("Variable", "result"));
    }
}

/// Turns a catalog record's parameters into properties. Included-record
/// parameters do not appear themselves; each of the record's fields becomes
/// its own top-level property.
fn add_record_parameters(
    builder: &mut NodeBuilder,
    ctx: &TemplateContext<'_>,
    codedata: &Codedata,
    record: &FunctionRecord,
) {
    let module = codedata
        .org
        .as_deref()
        .zip(codedata.module.as_deref())
        .map(|(org, module)| ModuleId::new(org, module));

    for param in &record.parameters {
        if param.kind == ParameterKind::IncludedRecord {
            let type_name = param
                .type_signature
                .rsplit(':')
                .next()
                .unwrap_or(&param.type_signature);
            if let Some(record_type) = ctx.semantic.named_type(module.as_ref(), type_name) {
                add_record_fields(builder, &record_type);
            }
            continue;
        }
        let mut property = Property::builder()
            .label(&param.name)
            .value(param.default_value.clone().unwrap_or_default())
            .value_type(ValueType::Expression)
            .editable()
            .parameter(ParameterRef {
                name: param.name.clone(),
                type_signature: param.type_signature.clone(),
                default_value: param.default_value.clone(),
                optional: param.is_optional(),
            });
        if let Some(description) = &param.description {
            property = property.documentation(description);
        }
        if param.is_optional() {
            property = property.advanced();
        }
        builder.property(&param.name, property.build());
    }
}

/// Flattens one record shape into properties, recursing through its type
/// inclusions first. A field of the `never` type ends the flattening of
/// this record: the field itself is skipped and no later field of the same
/// record is included.
fn add_record_fields(builder: &mut NodeBuilder, record_type: &TypeInfo) {
    let TypeShape::Record { inclusions, fields } = &record_type.shape else {
        return;
    };
    for inclusion in inclusions {
        add_record_fields(builder, inclusion);
    }
    for field in fields {
        if matches!(field.type_info.shape, TypeShape::Never) {
            return;
        }
        let mut property = Property::builder()
            .label(&field.name)
            .value_type(ValueType::Expression)
            .editable()
            .parameter(ParameterRef {
                name: field.name.clone(),
                type_signature: field.type_info.signature.clone(),
                default_value: None,
                optional: field.has_default || field.optional,
            });
        if let Some(documentation) = &field.documentation {
            property = property.documentation(documentation);
        }
        if field.has_default || field.optional {
            property = property.advanced();
        }
        builder.property(&field.name, property.build());
    }
}
