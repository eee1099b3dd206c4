//! Common test utilities for building syntax fixtures and stub collaborators.
use keiro::prelude::*;

#[allow(dead_code)]
pub fn range(line: u32) -> LineRange {
    LineRange::lines(line, line)
}

#[allow(dead_code)]
pub fn raw_expr(text: &str, line: u32) -> Expression {
    Expression::raw(text, range(line))
}

#[allow(dead_code)]
pub fn stmt(kind: StatementKind, line: u32) -> Statement {
    Statement {
        kind,
        line_range: range(line),
    }
}

#[allow(dead_code)]
pub fn block(statements: Vec<Statement>, line: u32) -> Block {
    Block {
        statements,
        line_range: range(line),
    }
}

#[allow(dead_code)]
pub fn var_decl(type_descriptor: &str, name: &str, initializer: Expression, line: u32) -> Statement {
    stmt(
        StatementKind::VariableDecl(VariableDecl {
            binding: BindingPattern::new(type_descriptor, name),
            initializer: Some(initializer),
            is_final: false,
        }),
        line,
    )
}

#[allow(dead_code)]
pub fn return_stmt(expression: Option<Expression>, line: u32) -> Statement {
    stmt(StatementKind::Return { expression }, line)
}

#[allow(dead_code)]
pub fn assignment(target: &str, value: &str, line: u32) -> Statement {
    stmt(
        StatementKind::Assignment {
            target: target.to_string(),
            value: raw_expr(value, line),
        },
        line,
    )
}

/// `check c->get(path)`: a remote call on client `c` wrapped in `check`.
#[allow(dead_code)]
pub fn checked_get_call(line: u32) -> Expression {
    let call = Expression {
        kind: ExpressionKind::RemoteCall(CallExpr {
            target: Some(Box::new(raw_expr("c", line))),
            method: "get".to_string(),
            resource_path: vec![],
            arguments: vec![Argument {
                name: None,
                value: raw_expr("path", line),
            }],
        }),
        text: "c->get(path)".to_string(),
        line_range: range(line),
    };
    Expression {
        kind: ExpressionKind::Check {
            keyword: CheckKind::Check,
            inner: Box::new(call),
        },
        text: "check c->get(path)".to_string(),
        line_range: range(line),
    }
}

/// `new ("http://localhost:9090")`: an implicit client construction.
#[allow(dead_code)]
pub fn new_client_expr(line: u32) -> Expression {
    Expression {
        kind: ExpressionKind::New(NewExpr {
            class: None,
            arguments: vec![Argument {
                name: None,
                value: raw_expr("\"http://localhost:9090\"", line),
            }],
        }),
        text: "new (\"http://localhost:9090\")".to_string(),
        line_range: range(line),
    }
}

/// A semantic model resolving the fixtures above: the HTTP `get` action on
/// client `c` and the client construction's type.
#[allow(dead_code)]
pub fn http_semantic_model() -> StaticSemanticModel {
    let mut semantic = StaticSemanticModel::new();
    semantic.insert_call(
        "c->get(path)",
        Symbol {
            kind: SymbolKind::Method,
            module: Some(ModuleId::new("ballerina", "http")),
            name: "get".to_string(),
            parameters: vec![
                ParameterSymbol {
                    name: "path".to_string(),
                    type_signature: "string".to_string(),
                    kind: ParameterKind::Required,
                    default_value: None,
                },
                ParameterSymbol {
                    name: "headers".to_string(),
                    type_signature: "map<string|string[]>?".to_string(),
                    kind: ParameterKind::Defaultable,
                    default_value: Some("()".to_string()),
                },
            ],
            return_type: Some("json|error".to_string()),
        },
    );
    let client_type = TypeInfo {
        signature: "http:Client".to_string(),
        shape: TypeShape::Client {
            module: ModuleId::new("ballerina", "http"),
            object: "Client".to_string(),
        },
    };
    semantic.insert_type("new (\"http://localhost:9090\")", client_type.clone());
    semantic.insert_type("c", client_type);
    semantic
}

/// A catalog carrying `ballerina/math#sqrt`, used for non-local call
/// emission.
#[allow(dead_code)]
pub fn math_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert(
        CatalogKey::new("ballerina", "math", "sqrt", CallableKind::Function),
        FunctionRecord {
            name: "sqrt".to_string(),
            description: Some("Square root".to_string()),
            return_type: Some("float".to_string()),
            parameters: vec![ParameterRecord {
                name: "value".to_string(),
                description: Some("The radicand".to_string()),
                type_signature: "float".to_string(),
                default_value: None,
                kind: ParameterKind::Required,
            }],
        },
    );
    catalog
}

#[allow(dead_code)]
pub fn function_body(statements: Vec<Statement>) -> FunctionSource {
    FunctionSource {
        name: "sample".to_string(),
        kind: FunctionKind::Function,
        return_type: None,
        body: statements,
        line_range: LineRange::lines(0, 20),
    }
}

#[allow(dead_code)]
pub fn analyze_body(
    semantic: &StaticSemanticModel,
    catalog: &InMemoryCatalog,
    statements: Vec<Statement>,
) -> FlowModel {
    let source = function_body(statements);
    Analyzer::builder(semantic, catalog).build().analyze(&source)
}
