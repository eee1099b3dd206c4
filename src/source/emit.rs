//! Per-kind source emitters. Each function owns the full statement shape of
//! its node kind; shared fragments (binding prefix, check prefix, on-fail
//! clause, argument lists) live in the helpers at the bottom.

use super::{Emission, Keyword};
use crate::catalog::{CallableKind, FunctionRecord};
use crate::error::SourceError;
use crate::model::keys;
use crate::model::{Branch, BranchKind, Codedata, FlowNode, NodeFlags, NodeKind};
use itertools::Itertools;

pub(crate) fn event_http_api(_node: &FlowNode, _e: &mut Emission<'_>) -> Result<(), SourceError> {
    // The event node mirrors the enclosing resource signature; it owns no
    // statement text of its own.
    Ok(())
}

pub(crate) fn if_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let condition = require_property(node, keys::CONDITION)?;
    e.out.keyword(Keyword::If);
    e.out.token(condition);
    e.block(node, Branch::THEN_LABEL)?;

    match node.branch(Branch::ELSE_LABEL) {
        Some(else_branch) => {
            e.out.token(" ");
            e.out.bare_keyword(Keyword::Else);
            // A chained `else if` was flattened into a single nested if
            // node at analysis time; unfold it back onto the same line.
            if else_branch.children.len() == 1 && else_branch.children[0].kind == NodeKind::If {
                e.out.space();
                return e.node(&else_branch.children[0]);
            }
            e.children_block(else_branch)?;
            e.out.newline();
        }
        None => {
            e.out.newline();
        }
    }
    Ok(())
}

pub(crate) fn while_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let condition = require_property(node, keys::CONDITION)?;
    e.out.keyword(Keyword::While);
    e.out.token(condition);
    e.block(node, Branch::BODY_LABEL)?;
    emit_on_fail(node, e)?;
    e.out.newline();
    Ok(())
}

pub(crate) fn do_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    e.out.bare_keyword(Keyword::Do);
    e.block(node, Branch::BODY_LABEL)?;
    emit_on_fail(node, e)?;
    e.out.newline();
    Ok(())
}

pub(crate) fn foreach_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let variable = require_property(node, keys::VARIABLE)?;
    let collection = require_property(node, keys::COLLECTION)?;
    e.out.keyword(Keyword::Foreach);
    match node.property(keys::TYPE) {
        Some(type_property) => e.out.expression(type_property),
        None => e.out.token("var"),
    };
    e.out.space();
    e.out.token(variable);
    e.out.space();
    e.out.keyword(Keyword::In);
    e.out.token(collection);
    e.block(node, Branch::BODY_LABEL)?;
    emit_on_fail(node, e)?;
    e.out.newline();
    Ok(())
}

pub(crate) fn lock_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    e.out.bare_keyword(Keyword::Lock);
    e.block(node, Branch::BODY_LABEL)?;
    e.out.newline();
    Ok(())
}

pub(crate) fn transaction_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    e.out.bare_keyword(Keyword::Transaction);
    e.block(node, Branch::BODY_LABEL)?;
    emit_on_fail(node, e)?;
    e.out.newline();
    Ok(())
}

pub(crate) fn match_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let subject = require_property(node, keys::SUBJECT)?;
    e.out.keyword(Keyword::Match);
    e.out.token(subject);
    e.out.open_brace();
    for branch in &node.branches {
        // An empty placeholder body stands in for "no clauses yet"; it has
        // no clause syntax to emit.
        if branch.label == Branch::BODY_LABEL && branch.children.is_empty() {
            continue;
        }
        e.out.token(&branch.label);
        e.out.token(" =>");
        e.children_block(branch)?;
        e.out.newline();
    }
    e.out.close_brace();
    e.out.newline();
    Ok(())
}

pub(crate) fn fork_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    e.out.bare_keyword(Keyword::Fork);
    e.out.open_brace();
    for branch in &node.branches {
        if branch.kind != BranchKind::Worker {
            continue;
        }
        e.out.keyword(Keyword::Worker);
        e.out.token(&branch.label);
        e.children_block(branch)?;
        e.out.newline();
    }
    e.out.close_brace();
    e.out.newline();
    Ok(())
}

pub(crate) fn return_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    e.out.bare_keyword(Keyword::Return);
    if let Some(expression) = node.property(keys::EXPRESSION) {
        e.out.space();
        e.out.expression(expression);
    }
    e.out.semicolon();
    Ok(())
}

pub(crate) fn panic_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let expression = require_property(node, keys::EXPRESSION)?;
    e.out.keyword(Keyword::Panic);
    e.out.token(expression);
    e.out.semicolon();
    Ok(())
}

pub(crate) fn fail_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let expression = require_property(node, keys::EXPRESSION)?;
    e.out.keyword(Keyword::Fail);
    e.out.token(expression);
    e.out.semicolon();
    Ok(())
}

pub(crate) fn break_node(_node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    e.out.bare_keyword(Keyword::Break);
    e.out.semicolon();
    Ok(())
}

pub(crate) fn continue_node(_node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    e.out.bare_keyword(Keyword::Continue);
    e.out.semicolon();
    Ok(())
}

pub(crate) fn expression_statement(
    node: &FlowNode,
    e: &mut Emission<'_>,
) -> Result<(), SourceError> {
    let expression = require_property(node, keys::EXPRESSION)?;
    emit_check_prefix(node, e);
    e.out.token(expression);
    e.out.semicolon();
    Ok(())
}

pub(crate) fn variable_declaration(
    node: &FlowNode,
    e: &mut Emission<'_>,
) -> Result<(), SourceError> {
    let expression = require_property(node, keys::EXPRESSION)?;
    emit_binding_prefix(node, e)?;
    emit_check_prefix(node, e);
    e.out.token(expression);
    e.out.semicolon();
    Ok(())
}

pub(crate) fn function_call(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    emit_binding_prefix(node, e)?;
    emit_check_prefix(node, e);

    let codedata = require_codedata(node)?;
    if codedata.is_local() {
        let symbol = codedata
            .symbol
            .as_deref()
            .unwrap_or(node.label.as_str());
        e.out.token(symbol);
        emit_property_arguments(node, e);
    } else {
        let record = resolve_record(node, codedata, CallableKind::Function, e)?;
        let qualifier = codedata.module_qualifier().unwrap_or_default();
        e.out.token(qualifier);
        e.out.token(":");
        e.out.token(&record.name);
        emit_record_arguments(node, &record, e)?;
    }
    e.out.semicolon();
    Ok(())
}

pub(crate) fn http_get(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    client_call(node, e, "get")
}

pub(crate) fn http_post(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    client_call(node, e, "post")
}

pub(crate) fn action_call(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    emit_binding_prefix(node, e)?;
    emit_check_prefix(node, e);

    let client = require_property(node, keys::CLIENT)?.to_string();
    let codedata = require_codedata(node)?;
    e.out.token(&client);
    e.out.token("->");
    if codedata.is_local() {
        let symbol = codedata.symbol.as_deref().unwrap_or_default();
        e.out.token(symbol);
        emit_property_arguments(node, e);
    } else {
        let record = resolve_record(node, codedata, CallableKind::Method, e)?;
        e.out.token(&record.name);
        emit_record_arguments(node, &record, e)?;
    }
    e.out.semicolon();
    Ok(())
}

pub(crate) fn default_node(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let statement = require_property(node, keys::STATEMENT)?;
    e.out.token(statement);
    e.out.semicolon();
    Ok(())
}

/// The shared emission shape of the recognized HTTP actions: the path goes
/// first, remaining catalog-declared properties follow in order. The
/// binding, target type, and view metadata never appear as arguments.
fn client_call(node: &FlowNode, e: &mut Emission<'_>, method: &str) -> Result<(), SourceError> {
    emit_binding_prefix(node, e)?;
    emit_check_prefix(node, e);

    let client = require_property(node, keys::CLIENT)?.to_string();
    let path = require_property(node, keys::PATH)?.to_string();
    let symbol = node
        .codedata
        .as_ref()
        .and_then(|codedata| codedata.symbol.as_deref())
        .unwrap_or(method);

    e.out.token(&client);
    e.out.token("->");
    e.out.token(symbol);
    e.out.token("(");
    e.out.token(&path);

    let skipped = [
        keys::VARIABLE,
        keys::TYPE,
        keys::VIEW,
        keys::CLIENT,
        keys::PATH,
        keys::TARGET_TYPE,
    ];
    for (key, property) in node.properties.iter() {
        if skipped.contains(&key) || property.value.is_empty() {
            continue;
        }
        e.out.token(", ");
        e.out.expression(property);
    }
    e.out.token(")");
    e.out.semicolon();
    Ok(())
}

fn require_property<'n>(node: &'n FlowNode, key: &str) -> Result<&'n str, SourceError> {
    node.property(key)
        .map(|property| property.value.as_str())
        .ok_or_else(|| SourceError::MissingProperty {
            node: node.id.to_string(),
            key: key.to_string(),
        })
}

fn require_codedata(node: &FlowNode) -> Result<&Codedata, SourceError> {
    node.codedata
        .as_ref()
        .ok_or_else(|| SourceError::MissingCallTarget {
            node: node.id.to_string(),
        })
}

/// Resolves the catalog record a non-local call emits against, recording
/// the import requirement on the way. A miss is fatal for the whole
/// emission: guessing the arity would produce invalid source.
fn resolve_record(
    node: &FlowNode,
    codedata: &Codedata,
    kind: CallableKind,
    e: &mut Emission<'_>,
) -> Result<FunctionRecord, SourceError> {
    let org = codedata.org.clone().unwrap_or_default();
    let module = codedata.module.clone().unwrap_or_default();
    let symbol = codedata
        .symbol
        .clone()
        .unwrap_or_else(|| node.label.clone());
    let record = e
        .catalog
        .function(&org, &module, &symbol, kind)
        .ok_or_else(|| SourceError::TemplateNotFound {
            org: org.clone(),
            module: module.clone(),
            symbol,
        })?;
    e.require_import(&org, &module);
    Ok(record)
}

/// `final`, the declared type, the bound variable, and `=`, emitted only
/// when the node actually binds its result.
fn emit_binding_prefix(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let Some(variable) = node.property(keys::VARIABLE) else {
        return Ok(());
    };
    if node.has_flag(NodeFlags::FINAL) {
        e.out.keyword(Keyword::Final);
    }
    match node.property(keys::TYPE) {
        Some(type_property) => e.out.expression(type_property),
        None => e.out.token("var"),
    };
    e.out.space();
    e.out.expression(variable);
    e.out.token(" = ");
    Ok(())
}

/// `check`/`checkpanic`, from the node's flags or from lexical enclosure in
/// a `do` clause of the target document.
fn emit_check_prefix(node: &FlowNode, e: &mut Emission<'_>) {
    if node.has_flag(NodeFlags::CHECKPANIC) {
        e.out.keyword(Keyword::CheckPanic);
    } else if node.has_flag(NodeFlags::CHECKED) || e.ctx.within_do_clause(&node.line_range) {
        e.out.keyword(Keyword::Check);
    }
}

/// Positional arguments for local calls: every non-internal property, in
/// insertion order. Optional properties left empty are dropped.
fn emit_property_arguments(node: &FlowNode, e: &mut Emission<'_>) {
    let arguments = node
        .properties
        .iter()
        .filter(|(key, property)| {
            !keys::INTERNAL.contains(key) && !(property.value.is_empty() && property.advanced)
        })
        .map(|(_, property)| property.value.as_str())
        .join(", ");
    e.out.token("(");
    e.out.token(&arguments);
    e.out.token(")");
}

/// Arguments for catalog-resolved calls: only catalog-declared parameters
/// serialize, required ones positionally and optional ones as named
/// arguments. A required parameter with no property is a hard failure.
fn emit_record_arguments(
    node: &FlowNode,
    record: &FunctionRecord,
    e: &mut Emission<'_>,
) -> Result<(), SourceError> {
    let mut arguments = Vec::new();
    for parameter in &record.parameters {
        match node.property(&parameter.name) {
            Some(property) if parameter.is_optional() => {
                if !property.value.is_empty() {
                    arguments.push(format!("{} = {}", parameter.name, property.value));
                }
            }
            Some(property) => arguments.push(property.value.clone()),
            None if parameter.is_optional() => {}
            None => {
                return Err(SourceError::MissingProperty {
                    node: node.id.to_string(),
                    key: parameter.name.clone(),
                });
            }
        }
    }
    e.out.token("(");
    e.out.token(&arguments.iter().join(", "));
    e.out.token(")");
    Ok(())
}

/// The `on fail` clause shared by loops, `do`, and transactions. Present
/// only when an on-failure branch is; its bound error variable comes from
/// the branch's own properties.
fn emit_on_fail(node: &FlowNode, e: &mut Emission<'_>) -> Result<(), SourceError> {
    let Some(branch) = node
        .branches
        .iter()
        .find(|branch| branch.kind == BranchKind::OnFailure)
    else {
        return Ok(());
    };
    e.out.token(" on fail");
    if let Some(variable) = branch.property(keys::VARIABLE) {
        e.out.space();
        if let Some(type_property) = branch.property(keys::TYPE) {
            e.out.expression(type_property);
            e.out.space();
        }
        e.out.expression(variable);
    }
    e.children_block(branch)?;
    Ok(())
}
