//! The graph synthesizer: a stateful walk over a [`FunctionSource`] that
//! assembles the flow model. One [`NodeBuilder`] is live at any moment;
//! entering a nested branch scope suspends it on an explicit stack frame
//! and resumes it on the way out. Client discovery runs as a second
//! accumulator threaded through the same walk.

mod calls;

use crate::catalog::FunctionCatalog;
use crate::model::keys;
use crate::model::{
    Branch, BranchKind, Client, ClientBuilder, ClientScope, FlowNode, NodeBuilder, NodeFlags,
    NodeIdGen, NodeKind, Property, ValueType,
};
use crate::semantic::SemanticModel;
use crate::syntax::{
    BindingPattern, Block, CheckKind, DoStatement, ElseBody, Expression, ExpressionKind,
    ForeachStatement, FunctionKind, FunctionSource, IfStatement, MatchStatement, NamedWorker,
    NewExpr, OnFailClause, Statement, StatementKind, TransactionStatement, VariableDecl,
    WhileStatement,
};
use crate::text::LineRange;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::mem;

/// The analysis result: the ordered node sequence plus every client handle
/// discovered along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowModel {
    pub nodes: Vec<FlowNode>,
    pub clients: Vec<Client>,
}

/// Configures an [`Analyzer`]. The protocol-action table maps a resolved
/// (module, member) pair onto a dedicated node kind; `http/get` and
/// `http/post` are registered out of the box and callers may add their own.
pub struct AnalyzerBuilder<'a> {
    semantic: &'a dyn SemanticModel,
    catalog: &'a dyn FunctionCatalog,
    actions: AHashMap<(String, String), NodeKind>,
}

impl<'a> AnalyzerBuilder<'a> {
    pub fn new(semantic: &'a dyn SemanticModel, catalog: &'a dyn FunctionCatalog) -> Self {
        let mut actions = AHashMap::new();
        calls::register_default_actions(&mut actions);
        Self {
            semantic,
            catalog,
            actions,
        }
    }

    pub fn with_action(mut self, module: &str, method: &str, kind: NodeKind) -> Self {
        self.actions
            .insert((module.to_string(), method.to_string()), kind);
        self
    }

    pub fn build(self) -> Analyzer<'a> {
        Analyzer {
            semantic: self.semantic,
            catalog: self.catalog,
            actions: self.actions,
            nodes: Vec::new(),
            clients: Vec::new(),
            builder: NodeBuilder::new(),
            stack: Vec::new(),
            pending_binding: None,
            ids: NodeIdGen::default(),
        }
    }
}

/// Walks one function body and produces its [`FlowModel`]. Analysis is
/// best-effort and total: a resolution miss degrades the affected node to
/// its generic shape, never aborting the walk.
pub struct Analyzer<'a> {
    semantic: &'a dyn SemanticModel,
    catalog: &'a dyn FunctionCatalog,
    actions: AHashMap<(String, String), NodeKind>,
    nodes: Vec<FlowNode>,
    clients: Vec<Client>,
    builder: NodeBuilder,
    stack: Vec<NodeBuilder>,
    pending_binding: Option<BindingPattern>,
    ids: NodeIdGen,
}

impl<'a> Analyzer<'a> {
    pub fn builder(
        semantic: &'a dyn SemanticModel,
        catalog: &'a dyn FunctionCatalog,
    ) -> AnalyzerBuilder<'a> {
        AnalyzerBuilder::new(semantic, catalog)
    }

    pub fn analyze(mut self, source: &FunctionSource) -> FlowModel {
        if let FunctionKind::ResourceMethod { accessor, path } = &source.kind {
            self.builder.classify(NodeKind::EventHttpApi);
            self.builder.flag(NodeFlags::RESOURCE);
            self.builder.line_range(LineRange::lines(
                source.line_range.start.line,
                source.line_range.start.line,
            ));
            self.builder
                .property(keys::METHOD, Property::identifier("Method", accessor));
            self.builder
                .property(keys::PATH, Property::identifier("Path", path));
            if let Some(return_type) = &source.return_type {
                self.builder
                    .property(keys::TYPE, Property::type_descriptor("Type", return_type));
            }
            self.append();
        }

        for statement in &source.body {
            self.visit_statement(statement);
        }
        FlowModel {
            nodes: self.nodes,
            clients: self.clients,
        }
    }

    // Statement traversal

    fn visit_statement(&mut self, statement: &Statement) {
        match &statement.kind {
            StatementKind::VariableDecl(decl) => {
                self.visit_variable_decl(decl, statement.line_range)
            }
            StatementKind::If(if_statement) => self.visit_if(if_statement),
            StatementKind::While(while_statement) => {
                self.visit_while(while_statement, statement.line_range)
            }
            StatementKind::Foreach(foreach_statement) => {
                self.visit_foreach(foreach_statement, statement.line_range)
            }
            StatementKind::Do(do_statement) => self.visit_do(do_statement, statement.line_range),
            StatementKind::Lock(body) => self.visit_lock(body, statement.line_range),
            StatementKind::Transaction(transaction) => {
                self.visit_transaction(transaction, statement.line_range)
            }
            StatementKind::Match(match_statement) => {
                self.visit_match(match_statement, statement.line_range)
            }
            StatementKind::Fork { workers } => self.visit_fork(workers, statement.line_range),
            StatementKind::Return { expression } => {
                self.visit_return(expression.as_ref(), statement.line_range)
            }
            StatementKind::Panic { expression } => {
                self.visit_terminal(statement, NodeKind::Panic, expression)
            }
            StatementKind::Fail { expression } => {
                self.visit_terminal(statement, NodeKind::Fail, expression)
            }
            StatementKind::Break => self.visit_simple(statement, NodeKind::Break),
            StatementKind::Continue => self.visit_simple(statement, NodeKind::Continue),
            StatementKind::ExpressionStmt(expression) => {
                self.visit_expression_stmt(statement, expression)
            }
            StatementKind::Assignment { value, .. } => self.visit_default(statement, Some(value)),
            StatementKind::CompoundAssignment { value, .. } => {
                self.visit_default(statement, Some(value))
            }
            StatementKind::Rollback { expression } => {
                self.visit_default(statement, expression.as_ref())
            }
            StatementKind::Retry { body } => {
                self.visit_for_side_effects(body);
                self.visit_default(statement, None);
            }
            StatementKind::LocalTypeDefinition { .. } => self.visit_default(statement, None),
            StatementKind::Block(body) => {
                self.visit_for_side_effects(body);
                self.visit_default(statement, None);
            }
        }
    }

    fn visit_variable_decl(&mut self, decl: &VariableDecl, line_range: LineRange) {
        let Some(initializer) = &decl.initializer else {
            return;
        };
        if decl.is_final {
            self.builder.flag(NodeFlags::FINAL);
        }
        self.pending_binding = Some(decl.binding.clone());
        self.visit_expression(initializer);

        // The default-node guarantee: when no specialized kind claimed the
        // initializer, the declaration still yields exactly one node built
        // from its raw text.
        if self.builder.is_unclassified() {
            self.builder.line_range(line_range);
            self.builder.classify(NodeKind::VariableDeclaration);
            self.builder.property(
                keys::EXPRESSION,
                Property::expression("Expression", &initializer.text),
            );
            self.set_binding_properties();
        }
        self.append();
        self.pending_binding = None;
    }

    fn visit_return(&mut self, expression: Option<&Expression>, line_range: LineRange) {
        if let Some(expression) = expression {
            self.visit_expression(expression);
        }
        if self.builder.is_unclassified() {
            self.builder.classify(NodeKind::Return);
            self.builder.line_range(line_range);
            if let Some(expression) = expression {
                self.builder.property(
                    keys::EXPRESSION,
                    Property::expression("Expression", &expression.text),
                );
            }
        }
        self.builder.flag(NodeFlags::RETURNING);
        self.append();
    }

    fn visit_terminal(&mut self, statement: &Statement, kind: NodeKind, expression: &Expression) {
        self.builder.line_range(statement.line_range);
        self.visit_expression(expression);
        if self.builder.is_unclassified() {
            self.builder.classify(kind);
            self.builder.property(
                keys::EXPRESSION,
                Property::expression("Expression", &expression.text),
            );
        }
        self.append();
    }

    fn visit_simple(&mut self, statement: &Statement, kind: NodeKind) {
        self.builder.line_range(statement.line_range);
        self.builder.classify(kind);
        self.append();
    }

    fn visit_expression_stmt(&mut self, statement: &Statement, expression: &Expression) {
        self.builder.line_range(statement.line_range);
        self.visit_expression(expression);
        if self.builder.is_unclassified() {
            self.builder.classify(NodeKind::ExpressionStatement);
            self.builder.property(
                keys::EXPRESSION,
                Property::expression("Expression", &expression.text),
            );
        }
        self.append();
    }

    /// Statements with no dedicated kind: record the span, recurse for side
    /// effects, and seal. An unclassified seal becomes the opaque node
    /// carrying the statement's raw text.
    fn visit_default(&mut self, statement: &Statement, value: Option<&Expression>) {
        self.builder.line_range(statement.line_range);
        if let Some(value) = value {
            self.visit_expression(value);
        }
        if self.builder.is_unclassified() {
            self.builder.property(
                keys::STATEMENT,
                Property::expression("Statement", statement.display_text()),
            );
        }
        self.append();
    }

    // Branching statements

    fn visit_if(&mut self, statement: &IfStatement) {
        self.builder.line_range(statement.line_range);
        self.builder.classify(NodeKind::If);
        self.builder.property(
            keys::CONDITION,
            Property::builder()
                .label("Condition")
                .value(&statement.condition.text)
                .value_type(ValueType::Expression)
                .documentation("Boolean condition")
                .editable()
                .build(),
        );

        self.start_branch();
        let then_children = self.visit_branch_statements(&statement.then_body);
        self.end_branch();
        self.builder
            .branch(Branch::new(Branch::THEN_LABEL, BranchKind::Block, then_children));

        if let Some(else_body) = &statement.else_body {
            self.start_branch();
            let else_children = self.visit_else_body(else_body);
            self.end_branch();
            self.builder
                .branch(Branch::new(Branch::ELSE_LABEL, BranchKind::Block, else_children));
        }
        self.append();
    }

    /// An `else` block analyzes statement by statement; a chained `else if`
    /// flattens into a single-element branch holding the nested if node.
    fn visit_else_body(&mut self, else_body: &ElseBody) -> Vec<FlowNode> {
        match else_body {
            ElseBody::Block(block) => self.visit_branch_statements(block),
            ElseBody::If(nested) => {
                self.visit_if(nested);
                vec![self.seal()]
            }
        }
    }

    fn visit_while(&mut self, statement: &WhileStatement, line_range: LineRange) {
        self.builder.line_range(line_range);
        self.builder.classify(NodeKind::While);
        self.builder.property(
            keys::CONDITION,
            Property::builder()
                .label("Condition")
                .value(&statement.condition.text)
                .value_type(ValueType::Expression)
                .documentation("Boolean condition")
                .editable()
                .build(),
        );
        self.attach_body(&statement.body);
        self.attach_on_fail(statement.on_fail.as_ref());
        self.append();
    }

    fn visit_foreach(&mut self, statement: &ForeachStatement, line_range: LineRange) {
        self.builder.line_range(line_range);
        self.builder.classify(NodeKind::Foreach);
        self.builder.property(
            keys::TYPE,
            Property::type_descriptor("Type", &statement.binding.type_descriptor),
        );
        self.builder.property(
            keys::VARIABLE,
            Property::identifier("Variable", &statement.binding.name),
        );
        self.builder.property(
            keys::COLLECTION,
            Property::expression("Collection", &statement.collection.text),
        );
        self.attach_body(&statement.body);
        self.attach_on_fail(statement.on_fail.as_ref());
        self.append();
    }

    fn visit_do(&mut self, statement: &DoStatement, line_range: LineRange) {
        self.builder.line_range(line_range);
        self.builder.classify(NodeKind::Do);
        self.attach_body(&statement.body);
        self.attach_on_fail(statement.on_fail.as_ref());
        self.append();
    }

    fn visit_lock(&mut self, body: &Block, line_range: LineRange) {
        self.builder.line_range(line_range);
        self.builder.classify(NodeKind::Lock);
        self.attach_body(body);
        self.append();
    }

    fn visit_transaction(&mut self, statement: &TransactionStatement, line_range: LineRange) {
        self.builder.line_range(line_range);
        self.builder.classify(NodeKind::Transaction);
        self.attach_body(&statement.body);
        self.attach_on_fail(statement.on_fail.as_ref());
        self.append();
    }

    fn visit_match(&mut self, statement: &MatchStatement, line_range: LineRange) {
        self.builder.line_range(line_range);
        self.builder.classify(NodeKind::Match);
        self.builder.property(
            keys::SUBJECT,
            Property::expression("Subject", &statement.subject.text),
        );
        for clause in &statement.clauses {
            self.start_branch();
            let children = self.visit_branch_statements(&clause.body);
            self.end_branch();
            let label = clause.patterns.iter().join("|");
            self.builder
                .branch(Branch::new(label, BranchKind::Block, children));
        }
        self.append();
    }

    fn visit_fork(&mut self, workers: &[NamedWorker], line_range: LineRange) {
        self.builder.line_range(line_range);
        self.builder.classify(NodeKind::Fork);
        for worker in workers {
            self.start_branch();
            let children = self.visit_branch_statements(&worker.body);
            self.end_branch();
            self.builder
                .branch(Branch::new(&worker.name, BranchKind::Worker, children));
        }
        self.append();
    }

    fn attach_body(&mut self, block: &Block) {
        self.start_branch();
        let children = self.visit_branch_statements(block);
        self.end_branch();
        self.builder
            .branch(Branch::new(Branch::BODY_LABEL, BranchKind::Block, children));
    }

    /// On-fail attachment is one syntactic check: the clause is either on
    /// the construct or absent, and the node's own builder attaches the
    /// branch before sealing.
    fn attach_on_fail(&mut self, clause: Option<&OnFailClause>) {
        let Some(clause) = clause else {
            return;
        };
        self.start_branch();
        let children = self.visit_branch_statements(&clause.body);
        self.end_branch();
        let mut branch = Branch::new(Branch::ON_FAILURE_LABEL, BranchKind::OnFailure, children);
        if let Some(variable) = &clause.error_variable {
            if let Some(error_type) = &clause.error_type {
                branch
                    .properties
                    .insert(keys::TYPE, Property::type_descriptor("Type", error_type));
            }
            branch
                .properties
                .insert(keys::VARIABLE, Property::identifier("Variable", variable));
        }
        self.builder.branch(branch);
    }

    // Expression traversal

    fn visit_expression(&mut self, expression: &Expression) {
        match &expression.kind {
            ExpressionKind::Check { keyword, inner } => {
                match keyword {
                    CheckKind::Check => self.builder.flag(NodeFlags::CHECKED),
                    CheckKind::CheckPanic => self.builder.flag(NodeFlags::CHECKPANIC),
                };
                self.visit_expression(inner);
            }
            ExpressionKind::RemoteCall(call) | ExpressionKind::ResourceCall(call) => {
                self.visit_action(expression, call)
            }
            ExpressionKind::FunctionCall(call) => self.visit_function_call(expression, call),
            ExpressionKind::New(new_expression) => self.visit_new(expression, new_expression),
            ExpressionKind::Raw => {}
        }
    }

    /// Client discovery: independent of whatever node is being built, any
    /// `new` expression whose type resolves to a client shape appends to
    /// the client accumulator.
    fn visit_new(&mut self, expression: &Expression, new_expression: &NewExpr) {
        for argument in &new_expression.arguments {
            self.visit_expression(&argument.value);
        }
        let Some(type_info) = self.semantic.type_of(expression) else {
            return;
        };
        let mut client_builder = ClientBuilder::new();
        if let Some(binding) = &self.pending_binding {
            client_builder.label(&binding.name);
        }
        client_builder.scope(ClientScope::Local);
        client_builder.line_range(expression.line_range);
        client_builder.type_info(type_info);
        if let Some(client) = client_builder.build(self.clients.len()) {
            self.clients.push(client);
        }
    }

    // Builder stack plumbing

    fn set_binding_properties(&mut self) {
        if let Some(binding) = &self.pending_binding {
            self.builder.property(
                keys::TYPE,
                Property::type_descriptor("Type", &binding.type_descriptor),
            );
            self.builder.property(
                keys::VARIABLE,
                Property::identifier("Variable", &binding.name),
            );
        }
    }

    fn visit_branch_statements(&mut self, block: &Block) -> Vec<FlowNode> {
        let mut children = Vec::new();
        for statement in &block.statements {
            self.visit_statement(statement);
            let node = self.seal();
            // A statement that produced nothing (an uninitialized
            // declaration) seals into an empty opaque node; drop it.
            if node.kind == NodeKind::Default
                && node.properties.is_empty()
                && node.branches.is_empty()
            {
                continue;
            }
            children.push(node);
        }
        children
    }

    /// Walks a block purely for its side effects; the sealed nodes are
    /// discarded but discovered clients stay.
    fn visit_for_side_effects(&mut self, block: &Block) {
        self.start_branch();
        for statement in &block.statements {
            self.visit_statement(statement);
            let _ = self.seal();
        }
        self.end_branch();
    }

    fn start_branch(&mut self) {
        self.stack.push(mem::take(&mut self.builder));
    }

    fn end_branch(&mut self) {
        self.builder = self.stack.pop().unwrap_or_default();
    }

    fn seal(&mut self) -> FlowNode {
        mem::take(&mut self.builder).build(&mut self.ids)
    }

    /// Appends the sealed node at the top level. Inside a branch scope the
    /// enclosing traversal collects the node instead.
    fn append(&mut self) {
        if self.stack.is_empty() {
            let node = self.seal();
            self.nodes.push(node);
        }
    }
}
