//! The binder: resolves names, checks types and builds the bound tree.
//!
//! Binding runs over every syntax tree of a compilation at once:
//!
//! 1. Declare all functions, so calls resolve regardless of order.
//! 2. Bind the global statements and apply the placement rules for global
//!    statements and `main`.
//! 3. Bind each function body in its own scope.
//!
//! The scope stack starts with the built-ins, then one frame per earlier
//! submission (oldest first), then the compilation's own globals.

use crate::bound_tree::*;
use crate::conversion::Conversion;
use crate::operators::{BoundBinaryOperator, BoundUnaryOperator};
use crate::program::BoundGlobalScope;
use crate::scope::{Declaration, ScopeKind, ScopeStack};
use crate::symbol::*;
use indexmap::IndexMap;
use quill_core::text::{SourceText, TextLocation, TextSpan};
use quill_core::value::Value;
use quill_diagnostics::{messages, DiagnosticBag};
use quill_syntax::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// Bind a compilation's syntax trees on top of `previous`.
pub fn bind_global_scope(is_script: bool, previous: Option<Rc<BoundGlobalScope>>, trees: &[SyntaxTree<'_>]) -> BoundGlobalScope {
    let _span = tracing::debug_span!("bind", files = trees.len(), is_script).entered();

    let mut binder = Binder::new(is_script);
    binder.seed_scopes(previous.as_ref());

    // Pass 1: functions.
    let mut pending = Vec::new();
    let mut functions = Vec::new();
    for tree in trees {
        binder.text = tree.text().clone();
        for member in tree.root().members {
            if let Member::Function(declaration) = member {
                let (function, declared) = binder.declare_function(declaration);
                if declared {
                    functions.push(function.clone());
                }
                pending.push((function, *declaration, tree.text().clone(), declared));
            }
        }
    }

    // Pass 2: global statements.
    for tree in trees {
        binder.text = tree.text().clone();
        for member in tree.root().members {
            if let Member::GlobalStatement(global) = member {
                binder.collect_labels(global.statement);
            }
        }
    }
    let mut global_statements = Vec::new();
    let mut first_global_statements = Vec::new();
    for tree in trees {
        binder.text = tree.text().clone();
        let mut first = None;
        for member in tree.root().members {
            if let Member::GlobalStatement(global) = member {
                first.get_or_insert_with(|| binder.location(global.statement.span()));
                global_statements.push(binder.bind_statement(global.statement));
            }
        }
        first_global_statements.extend(first);
    }

    if first_global_statements.len() > 1 {
        for location in &first_global_statements {
            binder.diagnostics.report(location.clone(), &messages::ONLY_ONE_FILE_CAN_HAVE_GLOBAL_STATEMENTS, &[]);
        }
    }

    let (main_function, script_function) = if is_script {
        let script = (!global_statements.is_empty()).then(|| FunctionSymbol::synthesized("$eval", TypeSymbol::Void));
        (None, script)
    } else if let Some(main) = functions.iter().find(|f| f.name == "main").cloned() {
        if let Some(location) = &main.declaration {
            if !main.parameters.is_empty() || main.ty != TypeSymbol::Void {
                binder.diagnostics.report(location.clone(), &messages::MAIN_MUST_HAVE_CORRECT_SIGNATURE, &[]);
            }
            if !global_statements.is_empty() {
                binder.diagnostics.report(location.clone(), &messages::CANNOT_MIX_MAIN_AND_GLOBAL_STATEMENTS, &[]);
                for location in &first_global_statements {
                    binder.diagnostics.report(location.clone(), &messages::CANNOT_MIX_MAIN_AND_GLOBAL_STATEMENTS, &[]);
                }
            }
        }
        (Some(main), None)
    } else if !global_statements.is_empty() {
        (Some(FunctionSymbol::synthesized("main", TypeSymbol::Void)), None)
    } else {
        (None, None)
    };

    // Pass 3: function bodies.
    let mut function_bodies = IndexMap::new();
    for (function, declaration, text, declared) in pending {
        binder.text = text;
        let body = binder.bind_function_body(&function, declaration);
        if declared {
            function_bodies.insert(function, body);
        }
    }

    let entry = script_function
        .clone()
        .or_else(|| main_function.clone().filter(|f| f.is_synthesized));
    if let Some(entry) = entry.filter(|_| !global_statements.is_empty()) {
        let mut location = global_statements[0].location().clone();
        let last = global_statements[global_statements.len() - 1].location();
        if Arc::ptr_eq(&location.text, &last.text) {
            location.span = location.span.union(&last.span);
        }
        let body = Rc::new(BoundBlockStatement {
            location,
            statements: global_statements,
        });
        function_bodies.insert(entry, body);
    }

    let mut diagnostics = DiagnosticBag::new();
    for tree in trees {
        diagnostics.extend_from_slice(tree.diagnostics().diagnostics());
    }
    diagnostics.extend(binder.diagnostics);

    debug!(
        functions = functions.len(),
        variables = binder.globals.len(),
        diagnostics = diagnostics.len(),
        "bound global scope"
    );

    BoundGlobalScope {
        previous,
        diagnostics,
        main_function,
        script_function,
        functions,
        variables: binder.globals,
        function_bodies,
    }
}

struct Binder {
    is_script: bool,
    /// Text of the tree being bound; every location is built against it.
    text: Arc<SourceText>,
    /// The function whose body is being bound, `None` for global statements.
    function: Option<Rc<FunctionSymbol>>,
    scopes: ScopeStack,
    diagnostics: DiagnosticBag,
    globals: Vec<Rc<VariableSymbol>>,
    /// Labels of the current function body or of the global statements.
    labels: FxHashMap<String, BoundLabel>,
    /// `(break, continue)` targets of the enclosing loops.
    loops: Vec<(BoundLabel, BoundLabel)>,
    loop_count: usize,
}

impl Binder {
    fn new(is_script: bool) -> Self {
        Self {
            is_script,
            text: SourceText::shared("", ""),
            function: None,
            scopes: ScopeStack::new(),
            diagnostics: DiagnosticBag::new(),
            globals: Vec::new(),
            labels: FxHashMap::default(),
            loops: Vec::new(),
            loop_count: 0,
        }
    }

    fn location(&self, span: TextSpan) -> TextLocation {
        TextLocation::new(self.text.clone(), span)
    }

    fn seed_scopes(&mut self, previous: Option<&Rc<BoundGlobalScope>>) {
        self.scopes.push(ScopeKind::Builtins);
        for builtin in BuiltinFunction::ALL {
            self.scopes.declare(Symbol::Function(builtin.symbol()));
        }

        let mut chain = Vec::new();
        let mut current = previous;
        while let Some(scope) = current {
            chain.push(scope);
            current = scope.previous.as_ref();
        }
        for scope in chain.into_iter().rev() {
            self.scopes.push(ScopeKind::Submission);
            for function in &scope.functions {
                self.scopes.declare(Symbol::Function(function.clone()));
            }
            for variable in &scope.variables {
                self.scopes.declare(Symbol::Variable(variable.clone()));
            }
        }

        self.scopes.push(ScopeKind::Global);
    }

    /// Declare in the innermost scope, reporting redeclaration and shadowing.
    /// A top-level symbol that replaces one from an earlier submission is
    /// not a shadow; anything nested still is.
    fn declare(&mut self, symbol: Symbol, location: TextLocation) -> bool {
        let declaring_in = self.scopes.current_kind();
        match self.scopes.declare(symbol.clone()) {
            Declaration::AlreadyDeclared(_) => {
                self.diagnostics.report(location, &messages::SYMBOL_ALREADY_DECLARED, &[symbol.name()]);
                false
            }
            Declaration::Declared {
                hidden: Some((hidden, kind)),
            } if !(kind == ScopeKind::Submission && declaring_in == Some(ScopeKind::Global)) => {
                self.diagnostics.report(
                    location,
                    &messages::SYMBOL_HIDES_SYMBOL,
                    &[symbol.declared_description(), symbol.name(), hidden.hidden_description()],
                );
                true
            }
            Declaration::Declared { .. } => true,
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declare_function(&mut self, syntax: &FunctionDeclaration<'_>) -> (Rc<FunctionSymbol>, bool) {
        let mut parameters = Vec::new();
        let mut seen = FxHashSet::default();
        for parameter in syntax.parameters.iter() {
            let ty = self.bind_type_clause(Some(parameter.type_clause)).unwrap_or(TypeSymbol::Error);
            let identifier = parameter.identifier;
            if identifier.is_missing() {
                continue;
            }
            let location = self.location(identifier.span);
            if !seen.insert(identifier.text) {
                self.diagnostics.report(location, &messages::SYMBOL_ALREADY_DECLARED, &[identifier.text]);
                continue;
            }
            parameters.push(VariableSymbol::new(identifier.text, VariableKind::Parameter, ty, false, None, Some(location)));
        }

        let ty = self.bind_type_clause(syntax.type_clause).unwrap_or(TypeSymbol::Void);
        let location = self.location(syntax.identifier.span);
        let function = FunctionSymbol::new(syntax.identifier.text, parameters, ty, Some(location.clone()));
        let declared = !syntax.identifier.is_missing() && self.declare(Symbol::Function(function.clone()), location);
        (function, declared)
    }

    fn bind_function_body(&mut self, function: &Rc<FunctionSymbol>, syntax: &FunctionDeclaration<'_>) -> Rc<BoundBlockStatement> {
        self.function = Some(function.clone());
        self.scopes.push(ScopeKind::Function);
        for parameter in &function.parameters {
            if let Some(location) = parameter.declaration.clone() {
                self.declare(Symbol::Variable(parameter.clone()), location);
            }
        }
        self.labels.clear();
        self.collect_labels(Statement::Block(syntax.body));
        let body = self.bind_block(syntax.body);
        self.scopes.pop();
        self.function = None;
        body
    }

    /// `None` when there is no clause; the error type when the name is unknown.
    fn bind_type_clause(&mut self, clause: Option<&TypeClause<'_>>) -> Option<TypeSymbol> {
        let identifier = clause?.identifier;
        if identifier.is_missing() {
            return Some(TypeSymbol::Error);
        }
        match TypeSymbol::lookup(identifier.text) {
            Some(ty) => Some(ty),
            None => {
                self.diagnostics
                    .report(self.location(identifier.span), &messages::UNDEFINED_TYPE, &[identifier.text]);
                Some(TypeSymbol::Error)
            }
        }
    }

    fn declare_variable(
        &mut self,
        identifier: &SyntaxToken<'_>,
        is_read_only: bool,
        ty: TypeSymbol,
        constant: Option<Value>,
    ) -> Rc<VariableSymbol> {
        let kind = if self.function.is_none() && self.scopes.current_kind() == Some(ScopeKind::Global) {
            VariableKind::Global
        } else {
            VariableKind::Local
        };
        let location = self.location(identifier.span);
        let variable = VariableSymbol::new(identifier.text, kind, ty, is_read_only, constant, Some(location.clone()));
        if !identifier.is_missing()
            && self.declare(Symbol::Variable(variable.clone()), location)
            && kind == VariableKind::Global
        {
            self.globals.push(variable.clone());
        }
        variable
    }

    /// Labels are visible across their whole function body, so they are
    /// registered before any statement is bound.
    fn collect_labels(&mut self, statement: Statement<'_>) {
        match statement {
            Statement::Block(n) => {
                for statement in n.statements {
                    self.collect_labels(*statement);
                }
            }
            Statement::If(n) => {
                self.collect_labels(n.then_statement);
                if let Some(else_clause) = n.else_clause {
                    self.collect_labels(else_clause.else_statement);
                }
            }
            Statement::While(n) => self.collect_labels(n.body),
            Statement::DoWhile(n) => self.collect_labels(n.body),
            Statement::For(n) => self.collect_labels(n.body),
            Statement::Label(n) => {
                let name = n.identifier.text;
                if self.labels.contains_key(name) {
                    self.diagnostics
                        .report(self.location(n.identifier.span), &messages::LABEL_ALREADY_DECLARED, &[name]);
                } else {
                    self.labels.insert(name.to_string(), BoundLabel::new(name));
                }
            }
            Statement::VariableDeclaration(_)
            | Statement::Break(_)
            | Statement::Continue(_)
            | Statement::Return(_)
            | Statement::Goto(_)
            | Statement::Expression(_) => {}
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn bind_statement(&mut self, syntax: Statement<'_>) -> BoundStatement {
        let location = self.location(syntax.span());
        match syntax {
            Statement::Block(n) => BoundStatement::Block(self.bind_block(n)),
            Statement::VariableDeclaration(n) => self.bind_variable_declaration(n, location),
            Statement::If(n) => {
                let condition = self.bind_conversion(n.condition, TypeSymbol::Bool, false);
                let then_statement = self.bind_statement(n.then_statement);
                let else_statement = n.else_clause.map(|c| self.bind_statement(c.else_statement));
                BoundStatement::If(Rc::new(BoundIfStatement {
                    location,
                    condition,
                    then_statement,
                    else_statement,
                }))
            }
            Statement::While(n) => {
                let condition = self.bind_conversion(n.condition, TypeSymbol::Bool, false);
                let (body, break_label, continue_label) = self.bind_loop_body(n.body);
                BoundStatement::While(Rc::new(BoundWhileStatement {
                    location,
                    condition,
                    body,
                    break_label,
                    continue_label,
                }))
            }
            Statement::DoWhile(n) => {
                let (body, break_label, continue_label) = self.bind_loop_body(n.body);
                let condition = self.bind_conversion(n.condition, TypeSymbol::Bool, false);
                BoundStatement::DoWhile(Rc::new(BoundDoWhileStatement {
                    location,
                    body,
                    condition,
                    break_label,
                    continue_label,
                }))
            }
            Statement::For(n) => {
                let lower_bound = self.bind_conversion(n.lower_bound, TypeSymbol::Int, false);
                let upper_bound = self.bind_conversion(n.upper_bound, TypeSymbol::Int, false);
                self.scopes.push(ScopeKind::Block);
                let variable = self.declare_variable(n.identifier, true, TypeSymbol::Int, None);
                let (body, break_label, continue_label) = self.bind_loop_body(n.body);
                self.scopes.pop();
                BoundStatement::For(Rc::new(BoundForStatement {
                    location,
                    variable,
                    lower_bound,
                    upper_bound,
                    body,
                    break_label,
                    continue_label,
                }))
            }
            Statement::Break(n) => match self.loops.last() {
                Some((break_label, _)) => BoundStatement::goto(location, break_label.clone()),
                None => self.invalid_break_or_continue(n.keyword, location),
            },
            Statement::Continue(n) => match self.loops.last() {
                Some((_, continue_label)) => BoundStatement::goto(location, continue_label.clone()),
                None => self.invalid_break_or_continue(n.keyword, location),
            },
            Statement::Return(n) => self.bind_return(n, location),
            Statement::Label(n) => {
                let name = n.identifier.text;
                let label = self.labels.get(name).cloned().unwrap_or_else(|| BoundLabel::new(name));
                BoundStatement::label(location, label)
            }
            Statement::Goto(n) => match self.labels.get(n.label.text) {
                Some(label) => BoundStatement::goto(location, label.clone()),
                None => {
                    if !n.label.is_missing() {
                        self.diagnostics
                            .report(self.location(n.label.span), &messages::UNDEFINED_LABEL, &[n.label.text]);
                    }
                    error_statement(location)
                }
            },
            Statement::Expression(n) => {
                let expression = self.bind_expression(n.expression, true);
                let allowed = (self.is_script && self.function.is_none())
                    || matches!(
                        expression,
                        BoundExpression::Error(_)
                            | BoundExpression::Assignment(_)
                            | BoundExpression::CompoundAssignment(_)
                            | BoundExpression::Call(_)
                            | BoundExpression::Increment(_)
                    );
                if !allowed {
                    self.diagnostics
                        .report(expression.location().clone(), &messages::INVALID_EXPRESSION_STATEMENT, &[]);
                }
                BoundStatement::expression(location, expression)
            }
        }
    }

    fn bind_block(&mut self, syntax: &BlockStatement<'_>) -> Rc<BoundBlockStatement> {
        let location = self.location(SyntaxNode::Statement(Statement::Block(syntax)).span());
        self.scopes.push(ScopeKind::Block);
        let statements = syntax.statements.iter().map(|s| self.bind_statement(*s)).collect();
        self.scopes.pop();
        Rc::new(BoundBlockStatement { location, statements })
    }

    fn bind_variable_declaration(&mut self, syntax: &VariableDeclaration<'_>, location: TextLocation) -> BoundStatement {
        let declared_type = self.bind_type_clause(syntax.type_clause);
        let initializer = match declared_type {
            Some(ty) => self.bind_conversion(syntax.initializer, ty, false),
            None => self.bind_expression(syntax.initializer, false),
        };
        let ty = declared_type.unwrap_or_else(|| initializer.ty());
        let is_read_only = syntax.is_read_only();
        let constant = if is_read_only { initializer.constant().cloned() } else { None };
        let variable = self.declare_variable(syntax.identifier, is_read_only, ty, constant);
        BoundStatement::variable_declaration(location, variable, initializer)
    }

    fn bind_loop_body(&mut self, syntax: Statement<'_>) -> (BoundStatement, BoundLabel, BoundLabel) {
        self.loop_count += 1;
        let break_label = BoundLabel::new(format!("break{}", self.loop_count));
        let continue_label = BoundLabel::new(format!("continue{}", self.loop_count));
        self.loops.push((break_label.clone(), continue_label.clone()));
        let body = self.bind_statement(syntax);
        self.loops.pop();
        (body, break_label, continue_label)
    }

    fn invalid_break_or_continue(&mut self, keyword: &SyntaxToken<'_>, location: TextLocation) -> BoundStatement {
        self.diagnostics
            .report(self.location(keyword.span), &messages::INVALID_BREAK_OR_CONTINUE, &[keyword.text]);
        error_statement(location)
    }

    fn bind_return(&mut self, syntax: &ReturnStatement<'_>, location: TextLocation) -> BoundStatement {
        let mut expression = syntax.expression.map(|e| self.bind_expression(e, true));
        match self.function.clone() {
            None => {
                if !self.is_script {
                    if let Some(value) = expression.take() {
                        self.diagnostics.report(
                            value.location().clone(),
                            &messages::INVALID_RETURN_WITH_VALUE_IN_GLOBAL_STATEMENTS,
                            &[],
                        );
                    }
                }
            }
            Some(function) if function.ty == TypeSymbol::Void => {
                if let Some(value) = expression.take() {
                    self.diagnostics.report(
                        value.location().clone(),
                        &messages::INVALID_RETURN_EXPRESSION,
                        &[function.name.as_str(), value.ty().name()],
                    );
                }
            }
            Some(function) => match expression.take() {
                Some(value) => {
                    let value_location = value.location().clone();
                    expression = Some(self.convert(value, function.ty, false, value_location));
                }
                None => {
                    self.diagnostics.report(
                        self.location(syntax.return_keyword.span),
                        &messages::MISSING_RETURN_EXPRESSION,
                        &[function.ty.name()],
                    );
                }
            },
        }
        BoundStatement::Return(Rc::new(BoundReturnStatement {
            location,
            expression,
            is_synthesized: false,
        }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Bind an expression; unless `can_be_void`, a `void` result is reported
    /// and replaced by an error expression.
    fn bind_expression(&mut self, syntax: Expression<'_>, can_be_void: bool) -> BoundExpression {
        let result = self.bind_expression_internal(syntax);
        if !can_be_void && result.ty() == TypeSymbol::Void {
            self.diagnostics
                .report(result.location().clone(), &messages::EXPRESSION_MUST_HAVE_VALUE, &[]);
            return BoundExpression::error(result.location().clone());
        }
        result
    }

    fn bind_expression_internal(&mut self, syntax: Expression<'_>) -> BoundExpression {
        let location = self.location(syntax.span());
        match syntax {
            Expression::Literal(n) => BoundExpression::literal(location, n.value.to_value()),
            Expression::Name(n) => match self.bind_variable_reference(n.identifier) {
                Some(variable) => BoundExpression::variable(location, variable),
                None => BoundExpression::error(location),
            },
            Expression::Parenthesized(n) => self.bind_expression_internal(n.expression),
            Expression::Assignment(n) => self.bind_assignment(n, location),
            Expression::Unary(n) => {
                let operand = self.bind_expression(n.operand, false);
                if operand.ty().is_error() {
                    return BoundExpression::error(location);
                }
                match BoundUnaryOperator::bind(n.operator_token.kind, operand.ty()) {
                    Some(op) => BoundExpression::unary(location, op, operand),
                    None => {
                        self.diagnostics.report(
                            self.location(n.operator_token.span),
                            &messages::UNDEFINED_UNARY_OPERATOR,
                            &[n.operator_token.text, operand.ty().name()],
                        );
                        BoundExpression::error(location)
                    }
                }
            }
            Expression::Binary(n) => {
                let left = self.bind_expression(n.left, false);
                let right = self.bind_expression(n.right, false);
                if left.ty().is_error() || right.ty().is_error() {
                    return BoundExpression::error(location);
                }
                match BoundBinaryOperator::bind(n.operator_token.kind, left.ty(), right.ty()) {
                    Some(op) => BoundExpression::binary(location, left, op, right),
                    None => {
                        self.diagnostics.report(
                            self.location(n.operator_token.span),
                            &messages::UNDEFINED_BINARY_OPERATOR,
                            &[n.operator_token.text, left.ty().name(), right.ty().name()],
                        );
                        BoundExpression::error(location)
                    }
                }
            }
            Expression::Call(n) => self.bind_call(n, location),
            Expression::Prefix(n) => self.bind_increment(n.identifier, n.operator_token, true, location),
            Expression::Postfix(n) => self.bind_increment(n.identifier, n.operator_token, false, location),
        }
    }

    /// Resolve a name that must denote a variable.
    fn bind_variable_reference(&mut self, identifier: &SyntaxToken<'_>) -> Option<Rc<VariableSymbol>> {
        if identifier.is_missing() {
            return None;
        }
        match self.scopes.lookup(identifier.text) {
            Some(Symbol::Variable(variable)) => Some(variable.clone()),
            _ => {
                self.diagnostics
                    .report(self.location(identifier.span), &messages::UNDEFINED_VARIABLE, &[identifier.text]);
                None
            }
        }
    }

    fn bind_assignment(&mut self, syntax: &AssignmentExpression<'_>, location: TextLocation) -> BoundExpression {
        let expression = self.bind_expression(syntax.expression, false);
        let Some(variable) = self.bind_variable_reference(syntax.identifier) else {
            return BoundExpression::error(location);
        };
        let token = syntax.assignment_token;
        if variable.is_read_only {
            self.diagnostics
                .report(self.location(token.span), &messages::CANNOT_ASSIGN, &[variable.name.as_str()]);
        }

        let expression_location = expression.location().clone();
        let Some(operator_kind) = token.kind.compound_assignment_operator() else {
            let converted = self.convert(expression, variable.ty, false, expression_location);
            return BoundExpression::assignment(location, variable, converted);
        };

        if expression.ty().is_error() || variable.ty.is_error() {
            return BoundExpression::error(location);
        }
        match BoundBinaryOperator::bind(operator_kind, variable.ty, expression.ty()) {
            Some(op) => {
                let converted = self.convert(expression, variable.ty, false, expression_location);
                BoundExpression::compound_assignment(location, variable, op, converted)
            }
            None => {
                self.diagnostics.report(
                    self.location(token.span),
                    &messages::UNDEFINED_BINARY_OPERATOR,
                    &[token.text, variable.ty.name(), expression.ty().name()],
                );
                BoundExpression::error(location)
            }
        }
    }

    fn bind_call(&mut self, syntax: &CallExpression<'_>, location: TextLocation) -> BoundExpression {
        let name = syntax.identifier.text;
        if let ([argument], Some(ty)) = (syntax.arguments.nodes, TypeSymbol::lookup(name)) {
            return self.bind_conversion(*argument, ty, true);
        }

        let arguments: Vec<BoundExpression> = syntax.arguments.iter().map(|a| self.bind_expression(*a, false)).collect();

        let function = match self.scopes.lookup(name) {
            Some(Symbol::Function(function)) => function.clone(),
            Some(symbol) => {
                let kind = symbol.kind_name();
                self.diagnostics
                    .report(self.location(syntax.identifier.span), &messages::NOT_A_FUNCTION, &[kind, name]);
                return BoundExpression::error(location);
            }
            None => {
                if !syntax.identifier.is_missing() {
                    self.diagnostics
                        .report(self.location(syntax.identifier.span), &messages::UNDEFINED_FUNCTION, &[name]);
                }
                return BoundExpression::error(location);
            }
        };

        let expected = function.parameters.len();
        if arguments.len() != expected {
            let span = if arguments.len() > expected {
                let first = syntax.arguments.nodes[expected].span();
                let last = syntax.arguments.nodes[arguments.len() - 1].span();
                TextSpan::from_bounds(first.start, last.end())
            } else {
                syntax.close_parenthesis_token.span
            };
            self.diagnostics.report(
                self.location(span),
                &messages::WRONG_ARGUMENT_COUNT,
                &[name, expected.to_string().as_str(), arguments.len().to_string().as_str()],
            );
            return BoundExpression::error(location);
        }

        let arguments = arguments
            .into_iter()
            .zip(&function.parameters)
            .map(|(argument, parameter)| {
                let argument_location = argument.location().clone();
                self.convert(argument, parameter.ty, false, argument_location)
            })
            .collect();
        BoundExpression::call(location, function, arguments)
    }

    fn bind_increment(
        &mut self,
        identifier: &SyntaxToken<'_>,
        operator_token: &SyntaxToken<'_>,
        is_prefix: bool,
        location: TextLocation,
    ) -> BoundExpression {
        let Some(variable) = self.bind_variable_reference(identifier) else {
            return BoundExpression::error(location);
        };
        if variable.ty.is_error() {
            return BoundExpression::error(location);
        }
        if variable.ty != TypeSymbol::Int {
            self.diagnostics.report(
                self.location(operator_token.span),
                &messages::UNDEFINED_UNARY_OPERATOR,
                &[operator_token.text, variable.ty.name()],
            );
            return BoundExpression::error(location);
        }
        if variable.is_read_only {
            self.diagnostics
                .report(self.location(operator_token.span), &messages::CANNOT_ASSIGN, &[variable.name.as_str()]);
        }
        let is_increment = operator_token.kind == SyntaxKind::PlusPlusToken;
        BoundExpression::increment(location, variable, is_increment, is_prefix)
    }

    /// Bind `syntax` and convert it to `ty`.
    fn bind_conversion(&mut self, syntax: Expression<'_>, ty: TypeSymbol, allow_explicit: bool) -> BoundExpression {
        let expression = self.bind_expression(syntax, false);
        let location = self.location(syntax.span());
        self.convert(expression, ty, allow_explicit, location)
    }

    fn convert(&mut self, expression: BoundExpression, ty: TypeSymbol, allow_explicit: bool, location: TextLocation) -> BoundExpression {
        let from = expression.ty();
        if from.is_error() {
            return expression;
        }
        if ty.is_error() {
            return BoundExpression::error(location);
        }
        let conversion = Conversion::classify(from, ty);
        if !conversion.exists() {
            self.diagnostics
                .report(location.clone(), &messages::CANNOT_CONVERT, &[from.name(), ty.name()]);
            return BoundExpression::error(location);
        }
        if !allow_explicit && conversion.is_explicit() {
            self.diagnostics
                .report(location.clone(), &messages::CANNOT_CONVERT_IMPLICITLY, &[from.name(), ty.name()]);
        }
        if conversion.is_identity() {
            return expression;
        }
        BoundExpression::conversion(location, ty, expression)
    }
}

fn error_statement(location: TextLocation) -> BoundStatement {
    BoundStatement::expression(location.clone(), BoundExpression::error(location))
}
