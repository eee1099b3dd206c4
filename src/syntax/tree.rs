use crate::text::LineRange;
use serde::{Deserialize, Serialize};

/// A parsed function or method body, ready for flow analysis.
/// This is the canonical input model: external parsers lower their own
/// syntax trees into this closed set of statement and expression kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSource {
    pub name: String,
    pub kind: FunctionKind,
    pub return_type: Option<String>,
    pub body: Vec<Statement>,
    pub line_range: LineRange,
}

/// How the analyzed function is declared in its service or module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionKind {
    Function,
    ResourceMethod { accessor: String, path: String },
}

/// One statement with the span it occupies in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub line_range: LineRange,
}

/// The closed set of statement kinds the analyzer understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatementKind {
    VariableDecl(VariableDecl),
    Assignment {
        target: String,
        value: Expression,
    },
    CompoundAssignment {
        target: String,
        operator: String,
        value: Expression,
    },
    ExpressionStmt(Expression),
    If(IfStatement),
    While(WhileStatement),
    Foreach(ForeachStatement),
    Do(DoStatement),
    Lock(Block),
    Transaction(TransactionStatement),
    Match(MatchStatement),
    Fork {
        workers: Vec<NamedWorker>,
    },
    Return {
        expression: Option<Expression>,
    },
    Panic {
        expression: Expression,
    },
    Fail {
        expression: Expression,
    },
    Break,
    Continue,
    Rollback {
        expression: Option<Expression>,
    },
    Retry {
        body: Block,
    },
    LocalTypeDefinition {
        name: String,
        descriptor: String,
    },
    Block(Block),
}

/// A local declaration such as `final json payload = ...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDecl {
    pub binding: BindingPattern,
    pub initializer: Option<Expression>,
    pub is_final: bool,
}

/// The typed left-hand side of a declaration. `type_descriptor` is the
/// written type, or `var` when inference is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingPattern {
    pub type_descriptor: String,
    pub name: String,
}

impl BindingPattern {
    pub fn new(type_descriptor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_descriptor: type_descriptor.into(),
            name: name.into(),
        }
    }

    pub fn text(&self) -> String {
        format!("{} {}", self.type_descriptor, self.name)
    }
}

/// A brace-delimited statement sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub line_range: LineRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_body: Block,
    pub else_body: Option<ElseBody>,
    pub line_range: LineRange,
}

/// The else arm of an `if`: either a plain block or a chained `else if`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElseBody {
    Block(Block),
    If(Box<IfStatement>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Block,
    pub on_fail: Option<OnFailClause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeachStatement {
    pub binding: BindingPattern,
    pub collection: Expression,
    pub body: Block,
    pub on_fail: Option<OnFailClause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoStatement {
    pub body: Block,
    pub on_fail: Option<OnFailClause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatement {
    pub body: Block,
    pub on_fail: Option<OnFailClause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStatement {
    pub subject: Expression,
    pub clauses: Vec<MatchClause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchClause {
    pub patterns: Vec<String>,
    pub body: Block,
}

/// One worker of a `fork` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedWorker {
    pub name: String,
    pub body: Block,
}

/// The `on fail` clause a loop, `do`, or transaction may carry.
/// Attachment is a single syntactic fact: the clause is either present on
/// the construct or it is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnFailClause {
    pub error_type: Option<String>,
    pub error_variable: Option<String>,
    pub body: Block,
}

/// One expression with its verbatim source text. The text is what property
/// values display; the kind is what classification inspects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub text: String,
    pub line_range: LineRange,
}

impl Expression {
    /// A plain expression carrying only its source text.
    pub fn raw(text: impl Into<String>, line_range: LineRange) -> Self {
        Self {
            kind: ExpressionKind::Raw,
            text: text.into(),
            line_range,
        }
    }
}

/// The closed set of expression shapes the analyzer cares about. Anything
/// else arrives as `Raw` and flows through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExpressionKind {
    Check {
        keyword: CheckKind,
        inner: Box<Expression>,
    },
    RemoteCall(CallExpr),
    ResourceCall(CallExpr),
    FunctionCall(CallExpr),
    New(NewExpr),
    Raw,
}

/// Which checking keyword wraps an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckKind {
    Check,
    CheckPanic,
}

/// A call-shaped expression: remote action, resource access, or plain call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallExpr {
    /// Receiver expression for remote/resource calls; absent for plain calls.
    pub target: Option<Box<Expression>>,
    pub method: String,
    /// Resource access path segments; empty for non-resource calls.
    pub resource_path: Vec<String>,
    pub arguments: Vec<Argument>,
}

/// A positional or named call argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expression,
}

/// An implicit or explicit `new` expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpr {
    pub class: Option<String>,
    pub arguments: Vec<Argument>,
}

impl Statement {
    /// A source-shaped rendering of statements that the analyzer keeps
    /// opaque. Used to fill the fallback node's statement property.
    pub fn display_text(&self) -> String {
        match &self.kind {
            StatementKind::VariableDecl(decl) => match &decl.initializer {
                Some(init) => format!("{} = {}", decl.binding.text(), init.text),
                None => decl.binding.text(),
            },
            StatementKind::Assignment { target, value } => {
                format!("{} = {}", target, value.text)
            }
            StatementKind::CompoundAssignment {
                target,
                operator,
                value,
            } => format!("{} {}= {}", target, operator, value.text),
            StatementKind::ExpressionStmt(expr) => expr.text.clone(),
            StatementKind::Return { expression } => match expression {
                Some(expr) => format!("return {}", expr.text),
                None => "return".to_string(),
            },
            StatementKind::Panic { expression } => format!("panic {}", expression.text),
            StatementKind::Fail { expression } => format!("fail {}", expression.text),
            StatementKind::Break => "break".to_string(),
            StatementKind::Continue => "continue".to_string(),
            StatementKind::Rollback { expression } => match expression {
                Some(expr) => format!("rollback {}", expr.text),
                None => "rollback".to_string(),
            },
            StatementKind::Retry { .. } => "retry".to_string(),
            StatementKind::LocalTypeDefinition { name, descriptor } => {
                format!("type {} {}", name, descriptor)
            }
            StatementKind::If(stmt) => format!("if {}", stmt.condition.text),
            StatementKind::While(stmt) => format!("while {}", stmt.condition.text),
            StatementKind::Foreach(stmt) => {
                format!("foreach {} in {}", stmt.binding.text(), stmt.collection.text)
            }
            StatementKind::Do(_) => "do".to_string(),
            StatementKind::Lock(_) => "lock".to_string(),
            StatementKind::Transaction(_) => "transaction".to_string(),
            StatementKind::Match(stmt) => format!("match {}", stmt.subject.text),
            StatementKind::Fork { .. } => "fork".to_string(),
            StatementKind::Block(_) => "{ ... }".to_string(),
        }
    }
}
