//! Unit tests for the shared node/property model and catalog store.
mod common;
use keiro::prelude::*;

#[test]
fn test_property_bag_preserves_insertion_order() {
    let mut bag = PropertyBag::new();
    bag.insert("zeta", Property::expression("Zeta", "1"));
    bag.insert("alpha", Property::expression("Alpha", "2"));
    bag.insert("mid", Property::expression("Mid", "3"));

    let keys: Vec<&str> = bag.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_property_bag_overwrites_in_place() {
    let mut bag = PropertyBag::new();
    bag.insert("a", Property::expression("A", "1"));
    bag.insert("b", Property::expression("B", "2"));
    bag.insert("a", Property::expression("A", "changed"));

    assert_eq!(bag.len(), 2);
    let keys: Vec<&str> = bag.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(bag.get("a").unwrap().value, "changed");
}

#[test]
fn test_node_flags() {
    let mut flags = NodeFlags::empty();
    assert!(flags.is_empty());
    flags.insert(NodeFlags::CHECKED);
    flags.insert(NodeFlags::RETURNING);
    assert!(flags.contains(NodeFlags::CHECKED));
    assert!(flags.contains(NodeFlags::RETURNING));
    assert!(!flags.contains(NodeFlags::FINAL));
    assert!(flags.contains(NodeFlags::CHECKED | NodeFlags::RETURNING));
}

#[test]
fn test_unclassified_builder_seals_to_default_kind() {
    let mut ids = keiro::model::NodeIdGen::default();
    let node = NodeBuilder::new().build(&mut ids);
    assert_eq!(node.kind, NodeKind::Default);
    assert_eq!(node.id.as_str(), "node-0");
}

#[test]
fn test_body_requiring_kind_always_has_a_branch() {
    let mut ids = keiro::model::NodeIdGen::default();
    let mut builder = NodeBuilder::new();
    builder.classify(NodeKind::While);
    let node = builder.build(&mut ids);

    assert_eq!(node.branches.len(), 1);
    let body = &node.branches[0];
    assert_eq!(body.label, Branch::BODY_LABEL);
    assert!(body.children.is_empty());
}

#[test]
fn test_classification_first_claim_wins() {
    let mut ids = keiro::model::NodeIdGen::default();
    let mut builder = NodeBuilder::new();
    builder.classify(NodeKind::HttpGet);
    builder.classify(NodeKind::Return);
    let node = builder.build(&mut ids);
    assert_eq!(node.kind, NodeKind::HttpGet);
    assert_eq!(node.label, "HTTP GET");
}

#[test]
fn test_codedata_locality_and_qualifier() {
    let local = Codedata::local("calculate");
    assert!(local.is_local());

    let remote = Codedata {
        org: Some("ballerinax".to_string()),
        module: Some("health.fhir".to_string()),
        object: None,
        symbol: Some("parse".to_string()),
        version: Some("1.0.0".to_string()),
    };
    assert!(!remote.is_local());
    assert_eq!(remote.module_qualifier(), Some("fhir"));
}

#[test]
fn test_line_range_containment() {
    let outer = LineRange::lines(2, 10);
    assert!(outer.contains(&LineRange::lines(3, 5)));
    assert!(outer.contains(&LineRange::lines(2, 10)));
    assert!(!outer.contains(&LineRange::lines(1, 5)));
    assert!(!outer.contains(&LineRange::lines(9, 11)));
}

#[test]
fn test_flow_node_json_round_trip() {
    let mut ids = keiro::model::NodeIdGen::default();
    let mut builder = NodeBuilder::new();
    builder.classify(NodeKind::HttpGet);
    builder.flag(NodeFlags::CHECKED);
    builder.line_range(LineRange::lines(4, 4));
    builder.property(keys::CLIENT, Property::identifier("Client", "c"));
    builder.property(keys::PATH, Property::expression("Path", "path"));
    let node = builder.build(&mut ids);

    let json = serde_json::to_string(&node).expect("serialize");
    assert!(json.contains("\"HTTP_GET\""));
    let parsed: FlowNode = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, node);

    let property_keys: Vec<&str> = parsed.properties.iter().map(|(key, _)| key).collect();
    assert_eq!(property_keys, vec![keys::CLIENT, keys::PATH]);
}

#[test]
fn test_catalog_exact_key_lookup() {
    let catalog = common::math_catalog();
    assert!(
        catalog
            .function("ballerina", "math", "sqrt", CallableKind::Function)
            .is_some()
    );
    // Kind is part of the key; a method lookup under the same name misses.
    assert!(
        catalog
            .function("ballerina", "math", "sqrt", CallableKind::Method)
            .is_none()
    );
    assert!(
        catalog
            .function("ballerina", "math", "cbrt", CallableKind::Function)
            .is_none()
    );
}

#[test]
fn test_catalog_snapshot_round_trip() {
    let catalog = common::math_catalog();
    let path = std::env::temp_dir().join("keiro_catalog_snapshot_test.bin");
    let path = path.to_str().expect("temp path");

    catalog.save(path).expect("save snapshot");
    let loaded = InMemoryCatalog::from_file(path).expect("load snapshot");
    assert_eq!(loaded.len(), catalog.len());
    let record = loaded
        .function("ballerina", "math", "sqrt", CallableKind::Function)
        .expect("record survives the round trip");
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "value");
}

#[test]
fn test_catalog_from_json() {
    let json = r#"[
        {
            "org": "ballerina",
            "module": "log",
            "kind": "Function",
            "record": {
                "name": "printInfo",
                "description": null,
                "return_type": null,
                "parameters": []
            }
        }
    ]"#;
    let catalog = InMemoryCatalog::from_json(json).expect("parse catalog JSON");
    assert_eq!(catalog.len(), 1);
    assert!(
        catalog
            .function("ballerina", "log", "printInfo", CallableKind::Function)
            .is_some()
    );
}

#[test]
fn test_error_display() {
    let err = SourceError::TemplateNotFound {
        org: "ballerina".to_string(),
        module: "math".to_string(),
        symbol: "sqrt".to_string(),
    };
    assert!(err.to_string().contains("sqrt"));
    assert!(err.to_string().contains("ballerina/math"));

    let template_err = TemplateError::LocalSymbolNotFound("calculate".to_string());
    assert!(template_err.to_string().contains("calculate"));
}
