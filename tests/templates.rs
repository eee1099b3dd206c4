//! Tests for node insertion templates and included-record flattening.
use keiro::prelude::*;

fn module() -> ModuleId {
    ModuleId::new("ballerinax", "redis")
}

/// A catalog whose `connect` function takes one included-record parameter.
fn redis_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert(
        CatalogKey::new("ballerinax", "redis", "connect", CallableKind::Function),
        FunctionRecord {
            name: "connect".to_string(),
            description: Some("Opens a connection".to_string()),
            return_type: Some("redis:Connection".to_string()),
            parameters: vec![ParameterRecord {
                name: "config".to_string(),
                description: None,
                type_signature: "redis:ConnectionConfig".to_string(),
                default_value: None,
                kind: ParameterKind::IncludedRecord,
            }],
        },
    );
    catalog
}

fn field(name: &str, shape: TypeShape, optional: bool) -> FieldInfo {
    FieldInfo {
        name: name.to_string(),
        type_info: TypeInfo {
            signature: "string".to_string(),
            shape,
        },
        documentation: None,
        has_default: false,
        optional,
    }
}

/// `ConnectionConfig` includes a base record and carries a `never` field
/// that truncates its own field list.
fn redis_semantic_model() -> StaticSemanticModel {
    let mut semantic = StaticSemanticModel::new();
    let base = TypeInfo {
        signature: "redis:BaseConfig".to_string(),
        shape: TypeShape::Record {
            inclusions: vec![],
            fields: vec![
                field("host", TypeShape::Other, false),
                field("port", TypeShape::Other, true),
            ],
        },
    };
    let config = TypeInfo {
        signature: "redis:ConnectionConfig".to_string(),
        shape: TypeShape::Record {
            inclusions: vec![base],
            fields: vec![
                field("auth", TypeShape::Other, true),
                field("stop", TypeShape::Never, false),
                field("afterStop", TypeShape::Other, false),
            ],
        },
    };
    semantic.insert_named_type(Some(&module()), "ConnectionConfig", config);
    semantic
}

#[test]
fn test_while_template_shape() {
    let semantic = StaticSemanticModel::new();
    let catalog = InMemoryCatalog::new();
    let ctx = TemplateContext::new(&semantic, &catalog);

    let node = template(NodeKind::While, &ctx).expect("while template");
    assert_eq!(node.kind, NodeKind::While);
    assert_eq!(node.label, "While");

    let condition = node.property(keys::CONDITION).expect("condition property");
    assert!(condition.editable);
    assert!(condition.value.is_empty());

    // The empty body branch is present even before any child exists.
    let body = node.branch(Branch::BODY_LABEL).expect("body branch");
    assert!(body.children.is_empty());
}

#[test]
fn test_if_template_has_then_branch() {
    let semantic = StaticSemanticModel::new();
    let catalog = InMemoryCatalog::new();
    let ctx = TemplateContext::new(&semantic, &catalog);

    let node = template(NodeKind::If, &ctx).expect("if template");
    assert_eq!(node.branches.len(), 1);
    assert!(node.branch(Branch::THEN_LABEL).is_some());
}

#[test]
fn test_default_kind_has_no_template() {
    let semantic = StaticSemanticModel::new();
    let catalog = EmptyCatalog;
    let ctx = TemplateContext::new(&semantic, &catalog);

    assert!(matches!(
        template(NodeKind::Default, &ctx),
        Err(TemplateError::UnsupportedKind(NodeKind::Default))
    ));
}

#[test]
fn test_local_function_template_from_semantic_model() {
    let mut semantic = StaticSemanticModel::new();
    semantic.insert_function(Symbol {
        kind: SymbolKind::Function,
        module: None,
        name: "calculate".to_string(),
        parameters: vec![
            ParameterSymbol {
                name: "a".to_string(),
                type_signature: "int".to_string(),
                kind: ParameterKind::Required,
                default_value: None,
            },
            ParameterSymbol {
                name: "b".to_string(),
                type_signature: "int".to_string(),
                kind: ParameterKind::Defaultable,
                default_value: Some("0".to_string()),
            },
        ],
        return_type: Some("int".to_string()),
    });
    let catalog = InMemoryCatalog::new();
    let ctx = TemplateContext::new(&semantic, &catalog)
        .with_codedata(Codedata::local("calculate"));

    let node = template(NodeKind::FunctionCall, &ctx).expect("local template");
    assert_eq!(node.label, "calculate");
    assert_eq!(node.property("a").unwrap().value, "");
    assert_eq!(node.property("b").unwrap().value, "0");
    assert!(node.property("b").unwrap().advanced);
    assert_eq!(node.property(keys::TYPE).unwrap().value, "int");
    assert!(node.property(keys::VARIABLE).is_some());
}

#[test]
fn test_local_function_template_missing_symbol() {
    let semantic = StaticSemanticModel::new();
    let catalog = InMemoryCatalog::new();
    let ctx = TemplateContext::new(&semantic, &catalog)
        .with_codedata(Codedata::local("vanished"));

    assert!(matches!(
        template(NodeKind::FunctionCall, &ctx),
        Err(TemplateError::LocalSymbolNotFound(name)) if name == "vanished"
    ));
}

#[test]
fn test_included_record_flattening_stops_at_never() {
    let semantic = redis_semantic_model();
    let catalog = redis_catalog();
    let ctx = TemplateContext::new(&semantic, &catalog).with_codedata(Codedata {
        org: Some("ballerinax".to_string()),
        module: Some("redis".to_string()),
        object: None,
        symbol: Some("connect".to_string()),
        version: Some("3.0.0".to_string()),
    });

    let node = template(NodeKind::FunctionCall, &ctx).expect("catalog template");
    assert_eq!(node.label, "connect");

    // Included fields surface as their own top-level properties: the base
    // record's fields first, then the including record's own.
    assert!(node.property("host").is_some());
    assert!(node.property("port").is_some());
    assert!(node.property("auth").is_some());

    // The never-typed field truncates its record's flattening: neither it
    // nor any later field of that record appears.
    assert!(node.property("stop").is_none());
    assert!(node.property("afterStop").is_none());

    // The included-record parameter itself never becomes a property.
    assert!(node.property("config").is_none());
}

#[test]
fn test_non_local_template_missing_record_fails() {
    let semantic = StaticSemanticModel::new();
    let catalog = InMemoryCatalog::new();
    let ctx = TemplateContext::new(&semantic, &catalog).with_codedata(Codedata {
        org: Some("ballerinax".to_string()),
        module: Some("redis".to_string()),
        object: None,
        symbol: Some("connect".to_string()),
        version: None,
    });

    assert!(matches!(
        template(NodeKind::FunctionCall, &ctx),
        Err(TemplateError::FunctionNotFound { .. })
    ));
}

#[test]
fn test_http_get_template_defaults() {
    let semantic = StaticSemanticModel::new();
    let catalog = InMemoryCatalog::new();
    let ctx = TemplateContext::new(&semantic, &catalog);

    let node = template(NodeKind::HttpGet, &ctx).expect("http get template");
    assert_eq!(node.kind, NodeKind::HttpGet);
    assert!(node.property(keys::CLIENT).is_some());
    assert!(node.property(keys::PATH).is_some());
    assert!(node.property(keys::TARGET_TYPE).is_some());
    assert!(node.property(keys::VARIABLE).is_some());

    let codedata = node.codedata.as_ref().expect("codedata");
    assert_eq!(codedata.org.as_deref(), Some("ballerina"));
    assert_eq!(codedata.module.as_deref(), Some("http"));
    assert_eq!(codedata.symbol.as_deref(), Some("get"));
}
