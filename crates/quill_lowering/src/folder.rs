//! Constant folding and jump simplification.

use quill_binder::rewriter::{walk_expression, BoundTreeRewriter};
use quill_binder::{BoundExpression, BoundLabel, BoundStatement};
use rustc_hash::FxHashSet;

/// Replace every expression with a known value by a literal.
///
/// Children are folded first. An operation is only folded when all of its
/// operands are known, so `f() && false` keeps its call. Reads of read-only
/// variables with a constant initializer become literals too.
pub fn fold_constants(statement: &BoundStatement) -> BoundStatement {
    ConstantFolder.rewrite_statement(statement)
}

struct ConstantFolder;

impl BoundTreeRewriter for ConstantFolder {
    fn rewrite_expression(&mut self, expression: &BoundExpression) -> BoundExpression {
        let rewritten = walk_expression(self, expression);
        if matches!(rewritten, BoundExpression::Literal(_)) {
            return rewritten;
        }
        match rewritten.constant() {
            Some(value) => BoundExpression::literal(rewritten.location().clone(), value.clone()),
            None => rewritten,
        }
    }
}

/// Resolve conditional jumps whose condition is a known boolean, then drop
/// labels nothing jumps to.
///
/// A jump that always fires becomes a plain `goto`; one that never fires is
/// removed.
pub fn simplify_jumps(statements: Vec<BoundStatement>) -> Vec<BoundStatement> {
    let mut simplified = Vec::with_capacity(statements.len());
    for statement in statements {
        if let BoundStatement::ConditionalGoto(node) = &statement {
            match node.condition.constant().and_then(|v| v.as_bool()) {
                Some(value) if value == node.jump_if_true => {
                    simplified.push(BoundStatement::synthesized_goto(node.location.clone(), node.label.clone()));
                }
                Some(_) => {}
                None => simplified.push(statement),
            }
            continue;
        }
        simplified.push(statement);
    }

    let referenced: FxHashSet<BoundLabel> = simplified
        .iter()
        .filter_map(|statement| match statement {
            BoundStatement::Goto(n) => Some(n.label.clone()),
            BoundStatement::ConditionalGoto(n) => Some(n.label.clone()),
            _ => None,
        })
        .collect();
    simplified.retain(|statement| match statement {
        BoundStatement::Label(n) => referenced.contains(&n.label),
        _ => true,
    });
    simplified
}
