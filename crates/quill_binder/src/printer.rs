//! Source-like rendering of bound trees, used by `quillc --emit bound|lowered`
//! and by tests that check what lowering produced.

use crate::bound_tree::*;
use crate::symbol::{FunctionSymbol, TypeSymbol};
use quill_core::value::Value;
use quill_syntax::SyntaxKind;
use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Render a function header followed by its body.
pub fn write_function(out: &mut impl Write, function: &FunctionSymbol, body: &BoundBlockStatement) -> fmt::Result {
    write!(out, "function {}(", function.name)?;
    for (index, parameter) in function.parameters.iter().enumerate() {
        if index > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}: {}", parameter.name, parameter.ty)?;
    }
    write!(out, ")")?;
    if function.ty != TypeSymbol::Void {
        write!(out, ": {}", function.ty)?;
    }
    writeln!(out)?;
    BoundTreePrinter { out, depth: 0 }.write_block(body)
}

pub fn write_statement(out: &mut impl Write, statement: &BoundStatement) -> fmt::Result {
    BoundTreePrinter { out, depth: 0 }.write_statement(statement)
}

pub fn statement_to_string(statement: &BoundStatement) -> String {
    let mut out = String::new();
    let _ = write_statement(&mut out, statement);
    out
}

pub fn expression_to_string(expression: &BoundExpression) -> String {
    let mut out = String::new();
    let _ = BoundTreePrinter { out: &mut out, depth: 0 }.write_expression(expression);
    out
}

struct BoundTreePrinter<'w, W: Write> {
    out: &'w mut W,
    depth: usize,
}

impl<W: Write> BoundTreePrinter<'_, W> {
    fn line_start(&mut self) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        Ok(())
    }

    /// A statement nested under `if`, `while` or `for`; blocks stay at the
    /// current depth, anything else is indented one level.
    fn write_nested(&mut self, statement: &BoundStatement) -> fmt::Result {
        if let BoundStatement::Block(block) = statement {
            return self.write_block(block);
        }
        self.depth += 1;
        self.write_statement(statement)?;
        self.depth -= 1;
        Ok(())
    }

    fn write_block(&mut self, node: &BoundBlockStatement) -> fmt::Result {
        self.line_start()?;
        writeln!(self.out, "{{")?;
        self.depth += 1;
        for statement in &node.statements {
            self.write_statement(statement)?;
        }
        self.depth -= 1;
        self.line_start()?;
        writeln!(self.out, "}}")
    }

    fn write_statement(&mut self, statement: &BoundStatement) -> fmt::Result {
        match statement {
            BoundStatement::Block(n) => self.write_block(n),
            BoundStatement::VariableDeclaration(n) => {
                self.line_start()?;
                let keyword = if n.variable.is_read_only { "let" } else { "var" };
                write!(self.out, "{} {} = ", keyword, n.variable.name)?;
                self.write_expression(&n.initializer)?;
                writeln!(self.out)
            }
            BoundStatement::If(n) => {
                self.line_start()?;
                write!(self.out, "if ")?;
                self.write_expression(&n.condition)?;
                writeln!(self.out)?;
                self.write_nested(&n.then_statement)?;
                if let Some(else_statement) = &n.else_statement {
                    self.line_start()?;
                    writeln!(self.out, "else")?;
                    self.write_nested(else_statement)?;
                }
                Ok(())
            }
            BoundStatement::While(n) => {
                self.line_start()?;
                write!(self.out, "while ")?;
                self.write_expression(&n.condition)?;
                writeln!(self.out)?;
                self.write_nested(&n.body)
            }
            BoundStatement::DoWhile(n) => {
                self.line_start()?;
                writeln!(self.out, "do")?;
                self.write_nested(&n.body)?;
                self.line_start()?;
                write!(self.out, "while ")?;
                self.write_expression(&n.condition)?;
                writeln!(self.out)
            }
            BoundStatement::For(n) => {
                self.line_start()?;
                write!(self.out, "for {} = ", n.variable.name)?;
                self.write_expression(&n.lower_bound)?;
                write!(self.out, " to ")?;
                self.write_expression(&n.upper_bound)?;
                writeln!(self.out)?;
                self.write_nested(&n.body)
            }
            BoundStatement::Label(n) => {
                self.line_start()?;
                writeln!(self.out, "{}:", n.label)
            }
            BoundStatement::Goto(n) => {
                self.line_start()?;
                writeln!(self.out, "goto {}", n.label)
            }
            BoundStatement::ConditionalGoto(n) => {
                self.line_start()?;
                write!(self.out, "goto {} {} ", n.label, if n.jump_if_true { "if" } else { "unless" })?;
                self.write_expression(&n.condition)?;
                writeln!(self.out)
            }
            BoundStatement::Return(n) => {
                self.line_start()?;
                write!(self.out, "return")?;
                if let Some(expression) = &n.expression {
                    write!(self.out, " ")?;
                    self.write_expression(expression)?;
                }
                writeln!(self.out)
            }
            BoundStatement::Expression(n) => {
                self.line_start()?;
                self.write_expression(&n.expression)?;
                writeln!(self.out)
            }
        }
    }

    fn write_expression(&mut self, expression: &BoundExpression) -> fmt::Result {
        match expression {
            BoundExpression::Error(_) => write!(self.out, "?"),
            BoundExpression::Literal(n) => match &n.value {
                Value::String(text) => write!(self.out, "{:?}", text),
                value => write!(self.out, "{}", value),
            },
            BoundExpression::Variable(n) => write!(self.out, "{}", n.variable.name),
            BoundExpression::Assignment(n) => {
                write!(self.out, "{} = ", n.variable.name)?;
                self.write_expression(&n.expression)
            }
            BoundExpression::CompoundAssignment(n) => {
                write!(self.out, "{} {}= ", n.variable.name, operator_text(n.op.syntax_kind))?;
                self.write_expression(&n.expression)
            }
            BoundExpression::Unary(n) => {
                write!(self.out, "{}", operator_text(n.op.syntax_kind))?;
                self.write_operand(&n.operand)
            }
            BoundExpression::Binary(n) => {
                self.write_operand(&n.left)?;
                write!(self.out, " {} ", operator_text(n.op.syntax_kind))?;
                self.write_operand(&n.right)
            }
            BoundExpression::Call(n) => {
                write!(self.out, "{}(", n.function.name)?;
                for (index, argument) in n.arguments.iter().enumerate() {
                    if index > 0 {
                        write!(self.out, ", ")?;
                    }
                    self.write_expression(argument)?;
                }
                write!(self.out, ")")
            }
            BoundExpression::Conversion(n) => {
                write!(self.out, "{}(", n.ty)?;
                self.write_expression(&n.expression)?;
                write!(self.out, ")")
            }
            BoundExpression::Increment(n) => {
                let op = if n.is_increment { "++" } else { "--" };
                if n.is_prefix {
                    write!(self.out, "{}{}", op, n.variable.name)
                } else {
                    write!(self.out, "{}{}", n.variable.name, op)
                }
            }
        }
    }

    fn write_operand(&mut self, operand: &BoundExpression) -> fmt::Result {
        if matches!(operand, BoundExpression::Binary(_) | BoundExpression::Assignment(_) | BoundExpression::CompoundAssignment(_)) {
            write!(self.out, "(")?;
            self.write_expression(operand)?;
            write!(self.out, ")")
        } else {
            self.write_expression(operand)
        }
    }
}

fn operator_text(kind: SyntaxKind) -> &'static str {
    kind.fixed_text().unwrap_or("?")
}
