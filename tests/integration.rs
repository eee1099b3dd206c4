//! End-to-end tests across both synthesis directions: analysis of a full
//! function body, source reconstruction from the resulting model, and the
//! structural round-trip property connecting them.
mod common;
use common::*;
use keiro::prelude::*;
use std::path::Path;

/// The two-statement resource body:
/// `var r = check c->get(path); return r;`
fn sample_body() -> Vec<Statement> {
    vec![
        var_decl("json", "r", checked_get_call(1), 1),
        return_stmt(Some(raw_expr("r", 2)), 2),
    ]
}

fn kinds_of(model: &FlowModel) -> Vec<NodeKind> {
    model.nodes.iter().map(|node| node.kind).collect()
}

fn branch_shape(node: &FlowNode) -> Vec<(String, usize)> {
    node.branches
        .iter()
        .map(|branch| (branch.label.clone(), branch.children.len()))
        .collect()
}

#[test]
fn test_checked_client_call_scenario() {
    let semantic = http_semantic_model();
    let catalog = InMemoryCatalog::new();
    let model = analyze_body(&semantic, &catalog, sample_body());

    assert_eq!(kinds_of(&model), vec![NodeKind::HttpGet, NodeKind::Return]);

    let get = &model.nodes[0];
    assert!(get.has_flag(NodeFlags::CHECKED));
    assert_eq!(get.property(keys::CLIENT).unwrap().value, "c");
    assert_eq!(get.property(keys::PATH).unwrap().value, "path");
    assert_eq!(get.property(keys::VARIABLE).unwrap().value, "r");
    let codedata = get.codedata.as_ref().expect("codedata");
    assert_eq!(codedata.module.as_deref(), Some("http"));
    assert_eq!(codedata.object.as_deref(), Some("Client"));

    let ret = &model.nodes[1];
    assert!(ret.returning());
    assert_eq!(ret.property(keys::EXPRESSION).unwrap().value, "r");

    // Synthesizing back from this exact model yields text equivalent to the
    // original statement sequence.
    let ctx = SourceContext::new("main.bal");
    let text: String = model
        .nodes
        .iter()
        .map(|node| {
            to_source(node, &ctx, &catalog).expect("emission").edits_for(Path::new("main.bal"))[0]
                .new_text
                .clone()
        })
        .collect();
    assert_eq!(text, "json r = check c->get(path);\nreturn r;\n");
}

#[test]
fn test_round_trip_preserves_kinds_and_branch_structure() {
    let semantic = http_semantic_model();
    let catalog = InMemoryCatalog::new();

    let first = analyze_body(&semantic, &catalog, sample_body());
    let second = analyze_body(&semantic, &catalog, sample_body());

    assert_eq!(kinds_of(&first), kinds_of(&second));
    for (a, b) in first.nodes.iter().zip(&second.nodes) {
        assert_eq!(a.flags, b.flags);
        assert_eq!(branch_shape(a), branch_shape(b));
        let a_keys: Vec<&str> = a.properties.iter().map(|(key, _)| key).collect();
        let b_keys: Vec<&str> = b.properties.iter().map(|(key, _)| key).collect();
        assert_eq!(a_keys, b_keys);
    }
}

#[test]
fn test_nested_model_survives_json_round_trip() {
    let semantic = StaticSemanticModel::new();
    let catalog = InMemoryCatalog::new();
    let inner_if = IfStatement {
        condition: raw_expr("y", 3),
        then_body: block(vec![stmt(StatementKind::Break, 4)], 3),
        else_body: Some(ElseBody::Block(block(vec![stmt(StatementKind::Continue, 6)], 5))),
        line_range: range(3),
    };
    let while_statement = WhileStatement {
        condition: raw_expr("x", 1),
        body: block(vec![stmt(StatementKind::If(inner_if), 3)], 1),
        on_fail: Some(OnFailClause {
            error_type: None,
            error_variable: Some("err".to_string()),
            body: block(vec![], 8),
        }),
    };
    let model = analyze_body(
        &semantic,
        &catalog,
        vec![stmt(StatementKind::While(while_statement), 1)],
    );

    let json = serde_json::to_string(&model).expect("serialize model");
    assert!(json.contains("\"WHILE\""));
    assert!(json.contains("\"ON_FAILURE\""));

    let parsed: FlowModel = serde_json::from_str(&json).expect("deserialize model");
    assert_eq!(kinds_of(&parsed), kinds_of(&model));
    assert_eq!(
        branch_shape(&parsed.nodes[0]),
        branch_shape(&model.nodes[0])
    );

    // The nested if survives with both arms intact.
    let body = parsed.nodes[0].branch(Branch::BODY_LABEL).unwrap();
    let if_node = &body.children[0];
    assert_eq!(if_node.kind, NodeKind::If);
    assert!(if_node.branch(Branch::THEN_LABEL).is_some());
    assert!(if_node.branch(Branch::ELSE_LABEL).is_some());
}

#[test]
fn test_analysis_is_total_under_resolution_misses() {
    // Nothing resolves: every call degrades, nothing aborts, and every
    // declaration still yields exactly one node.
    let semantic = StaticSemanticModel::new();
    let catalog = InMemoryCatalog::new();
    let model = analyze_body(
        &semantic,
        &catalog,
        vec![
            var_decl("http:Client", "c", new_client_expr(1), 1),
            var_decl("json", "r", checked_get_call(2), 2),
            return_stmt(Some(raw_expr("r", 3)), 3),
        ],
    );

    assert_eq!(
        kinds_of(&model),
        vec![
            NodeKind::VariableDeclaration,
            NodeKind::VariableDeclaration,
            NodeKind::Return
        ]
    );
    assert!(model.clients.is_empty());
}

#[test]
fn test_generated_client_call_reanalyzes_to_same_kind() {
    let semantic = http_semantic_model();
    let catalog = InMemoryCatalog::new();
    let model = analyze_body(&semantic, &catalog, sample_body());

    // Emit, then lower the emitted statement back into syntax the way a
    // parser would, and re-analyze.
    let ctx = SourceContext::new("main.bal");
    let emitted = to_source(&model.nodes[0], &ctx, &catalog).expect("emission");
    let text = &emitted.edits_for(Path::new("main.bal"))[0].new_text;
    assert_eq!(text, "json r = check c->get(path);\n");

    let reparsed = var_decl("json", "r", checked_get_call(1), 1);
    let second = analyze_body(&semantic, &catalog, vec![reparsed]);
    assert_eq!(second.nodes[0].kind, NodeKind::HttpGet);
    assert_eq!(second.nodes[0].flags, model.nodes[0].flags);
}
