//! Execution of lowered bodies.

use crate::host::Host;
use quill_binder::operators::{evaluate_binary, evaluate_unary};
use quill_binder::*;
use quill_core::Value;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use thiserror::Error;

/// Deepest call nesting before evaluation gives up.
pub const MAX_CALL_DEPTH: usize = 256;

/// Global variable values, keyed by symbol. Carried from one submission to
/// the next.
pub type Globals = FxHashMap<Rc<VariableSymbol>, Value>;

type Locals = FxHashMap<Rc<VariableSymbol>, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Cannot convert '{value}' to '{ty}'")]
    InvalidConversion { value: String, ty: TypeSymbol },
    #[error("Variable '{0}' was read before it was assigned")]
    UnassignedVariable(String),
    #[error("Call depth exceeded {}", MAX_CALL_DEPTH)]
    CallDepthExceeded,
    #[error("Function '{0}' has no body")]
    MissingBody(String),
}

/// Run the entry point of `program`.
///
/// `globals` supplies the values of earlier submissions' globals and receives
/// this run's. The result is the value of the entry point's `return`, or
/// else of its last expression statement or declaration.
pub fn evaluate(program: &BoundProgram, globals: &mut Globals, host: &mut dyn Host) -> Result<Option<Value>, EvaluationError> {
    let Some(entry) = program.entry_point() else {
        return Ok(None);
    };
    let _span = tracing::debug_span!("evaluate", entry = %entry.name).entered();
    let mut evaluator = Evaluator {
        program,
        globals,
        host,
        frames: Vec::new(),
        last_value: None,
    };
    let returned = evaluator.call_function(entry, Vec::new())?;
    let result = returned.or(evaluator.last_value.take());
    tracing::debug!(result = ?result, "evaluated");
    Ok(result)
}

struct Evaluator<'a> {
    program: &'a BoundProgram,
    globals: &'a mut Globals,
    host: &'a mut dyn Host,
    frames: Vec<Locals>,
    last_value: Option<Value>,
}

impl<'a> Evaluator<'a> {
    fn call_function(&mut self, function: &FunctionSymbol, arguments: Vec<Value>) -> Result<Option<Value>, EvaluationError> {
        let program = self.program;
        let body = program
            .lookup_body(function)
            .ok_or_else(|| EvaluationError::MissingBody(function.name.clone()))?;
        if self.frames.len() >= MAX_CALL_DEPTH {
            return Err(EvaluationError::CallDepthExceeded);
        }

        let locals: Locals = function.parameters.iter().cloned().zip(arguments).collect();
        self.frames.push(locals);
        let result = self.run(body);
        self.frames.pop();
        result
    }

    fn run(&mut self, body: &BoundBlockStatement) -> Result<Option<Value>, EvaluationError> {
        let statements = &body.statements;
        let labels: FxHashMap<&BoundLabel, usize> = statements
            .iter()
            .enumerate()
            .filter_map(|(index, statement)| match statement {
                BoundStatement::Label(n) => Some((&n.label, index + 1)),
                _ => None,
            })
            .collect();
        let target = |label: &BoundLabel| match labels.get(label) {
            Some(&index) => index,
            None => unreachable!("jump to missing label {label}"),
        };

        let mut ip = 0;
        while let Some(statement) = statements.get(ip) {
            ip += 1;
            match statement {
                BoundStatement::VariableDeclaration(n) => {
                    let value = self.evaluate_expression(&n.initializer)?;
                    self.last_value = Some(value.clone());
                    self.assign(&n.variable, value);
                }
                BoundStatement::Expression(n) => {
                    self.last_value = self.evaluate_statement_expression(&n.expression)?;
                }
                BoundStatement::Label(_) => {}
                BoundStatement::Goto(n) => ip = target(&n.label),
                BoundStatement::ConditionalGoto(n) => {
                    let condition = self.evaluate_expression(&n.condition)?;
                    if condition.as_bool() == Some(n.jump_if_true) {
                        ip = target(&n.label);
                    }
                }
                BoundStatement::Return(n) => {
                    return match &n.expression {
                        Some(expression) => self.evaluate_expression(expression).map(Some),
                        None => Ok(None),
                    };
                }
                other => unreachable!("unexpected {:?} in a lowered body", other.kind()),
            }
        }
        Ok(None)
    }

    /// Evaluate an expression whose value may be `void`.
    fn evaluate_statement_expression(&mut self, expression: &BoundExpression) -> Result<Option<Value>, EvaluationError> {
        match expression {
            BoundExpression::Call(n) => self.evaluate_call(n),
            _ => self.evaluate_expression(expression).map(Some),
        }
    }

    fn evaluate_expression(&mut self, expression: &BoundExpression) -> Result<Value, EvaluationError> {
        if let Some(value) = expression.constant() {
            return Ok(value.clone());
        }
        match expression {
            BoundExpression::Error(_) => unreachable!("error expression in a lowered body"),
            BoundExpression::Literal(n) => Ok(n.value.clone()),
            BoundExpression::Variable(n) => self.lookup(&n.variable),
            BoundExpression::Assignment(n) => {
                let value = self.evaluate_expression(&n.expression)?;
                self.assign(&n.variable, value.clone());
                Ok(value)
            }
            BoundExpression::CompoundAssignment(n) => {
                let current = self.lookup(&n.variable)?;
                let operand = self.evaluate_expression(&n.expression)?;
                let value = apply_binary(n.op, &current, &operand)?;
                self.assign(&n.variable, value.clone());
                Ok(value)
            }
            BoundExpression::Unary(n) => {
                let operand = self.evaluate_expression(&n.operand)?;
                match evaluate_unary(n.op.kind, &operand) {
                    Some(value) => Ok(value),
                    None => unreachable!("{:?} applied to {operand:?}", n.op.kind),
                }
            }
            BoundExpression::Binary(n) => {
                let left = self.evaluate_expression(&n.left)?;
                match (n.op.kind, left.as_bool()) {
                    (BoundBinaryOperatorKind::LogicalAnd, Some(false)) => return Ok(left),
                    (BoundBinaryOperatorKind::LogicalOr, Some(true)) => return Ok(left),
                    _ => {}
                }
                let right = self.evaluate_expression(&n.right)?;
                apply_binary(n.op, &left, &right)
            }
            BoundExpression::Call(n) => match self.evaluate_call(n)? {
                Some(value) => Ok(value),
                None => unreachable!("void call to '{}' used as a value", n.function.name),
            },
            BoundExpression::Conversion(n) => {
                let value = self.evaluate_expression(&n.expression)?;
                convert_value(&value, n.ty).ok_or_else(|| EvaluationError::InvalidConversion {
                    value: value.to_string(),
                    ty: n.ty,
                })
            }
            BoundExpression::Increment(n) => {
                let Value::Integer(old) = self.lookup(&n.variable)? else {
                    unreachable!("increment of non-integer '{}'", n.variable.name);
                };
                let new = if n.is_increment { old.wrapping_add(1) } else { old.wrapping_sub(1) };
                self.assign(&n.variable, Value::Integer(new));
                Ok(Value::Integer(if n.is_prefix { new } else { old }))
            }
        }
    }

    fn evaluate_call(&mut self, node: &BoundCallExpression) -> Result<Option<Value>, EvaluationError> {
        let mut arguments = Vec::with_capacity(node.arguments.len());
        for argument in &node.arguments {
            arguments.push(self.evaluate_expression(argument)?);
        }
        match node.function.builtin {
            Some(BuiltinFunction::Print) => {
                let text = arguments.first().and_then(Value::as_str).unwrap_or_default();
                self.host.print(text);
                Ok(None)
            }
            Some(BuiltinFunction::Input) => Ok(Some(Value::String(self.host.input()))),
            Some(BuiltinFunction::Random) => {
                let maximum = arguments.first().and_then(Value::as_integer).unwrap_or_default();
                Ok(Some(Value::Integer(self.host.random(maximum))))
            }
            None => self.call_function(&node.function, arguments),
        }
    }

    fn lookup(&self, variable: &Rc<VariableSymbol>) -> Result<Value, EvaluationError> {
        let value = match variable.kind {
            VariableKind::Global => self.globals.get(variable),
            VariableKind::Local | VariableKind::Parameter => self.frames.last().and_then(|frame| frame.get(variable)),
        };
        value
            .cloned()
            .ok_or_else(|| EvaluationError::UnassignedVariable(variable.name.clone()))
    }

    fn assign(&mut self, variable: &Rc<VariableSymbol>, value: Value) {
        match variable.kind {
            VariableKind::Global => {
                self.globals.insert(variable.clone(), value);
            }
            VariableKind::Local | VariableKind::Parameter => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.insert(variable.clone(), value);
                }
            }
        }
    }
}

fn apply_binary(op: &BoundBinaryOperator, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    match evaluate_binary(op.kind, left, right) {
        Some(value) => Ok(value),
        None if matches!(op.kind, BoundBinaryOperatorKind::Division | BoundBinaryOperatorKind::Modulus) => {
            Err(EvaluationError::DivisionByZero)
        }
        None => unreachable!("{:?} applied to {left:?} and {right:?}", op.kind),
    }
}
