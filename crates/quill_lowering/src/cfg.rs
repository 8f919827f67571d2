//! Control flow graph over a lowered statement list.
//!
//! Blocks are index ranges into the statement slice. Block 0 is the start
//! sentinel and block 1 the end sentinel; both are always present and empty.

use quill_binder::printer::{expression_to_string, statement_to_string};
use quill_binder::{BoundExpression, BoundLabel, BoundStatement, BoundUnaryOperator};
use quill_syntax::SyntaxKind;
use rustc_hash::FxHashMap;
use std::fmt::{self, Write};
use std::ops::Range;

pub const START: usize = 0;
pub const END: usize = 1;

#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// Statements of this block. Empty for the sentinels.
    pub statements: Range<usize>,
    pub incoming: Vec<usize>,
    pub outgoing: Vec<usize>,
}

impl BasicBlock {
    fn new(statements: Range<usize>) -> Self {
        Self {
            statements,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasicBlockEdge {
    pub from: usize,
    pub to: usize,
    /// `None` when the edge is always taken.
    pub condition: Option<BoundExpression>,
}

#[derive(Debug)]
pub struct ControlFlowGraph<'s> {
    statements: &'s [BoundStatement],
    blocks: Vec<BasicBlock>,
    edges: Vec<BasicBlockEdge>,
}

impl<'s> ControlFlowGraph<'s> {
    /// Build the graph of a flat statement list and prune every block that
    /// nothing jumps or falls into.
    ///
    /// Panics when `statements` still contains structured statements or a
    /// jump to a label that isn't in the list.
    pub fn create(statements: &'s [BoundStatement]) -> Self {
        let mut builder = GraphBuilder {
            blocks: vec![BasicBlock::new(0..0), BasicBlock::new(0..0)],
            edges: Vec::new(),
        };
        builder.split_blocks(statements);
        builder.connect_blocks(statements);
        let removed = builder.prune();
        tracing::trace!(blocks = builder.blocks.len(), removed, "built control flow graph");
        builder.finish(statements)
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn edges(&self) -> &[BasicBlockEdge] {
        &self.edges
    }

    pub fn block_statements(&self, block: usize) -> &'s [BoundStatement] {
        &self.statements[self.blocks[block].statements.clone()]
    }

    /// Whether every path reaching the end leaves through a `return`.
    pub fn all_paths_return(&self) -> bool {
        self.blocks[END].incoming.iter().all(|&edge| {
            let from = self.edges[edge].from;
            matches!(self.block_statements(from).last(), Some(BoundStatement::Return(_)))
        })
    }

    /// One flag per statement: whether a surviving block holds it.
    pub fn reachable_statements(&self) -> Vec<bool> {
        let mut reachable = vec![false; self.statements.len()];
        for block in &self.blocks[END + 1..] {
            reachable[block.statements.clone()].fill(true);
        }
        reachable
    }

    /// Render the graph in Graphviz `dot` syntax.
    pub fn write_dot(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "digraph G {{")?;
        for index in 0..self.blocks.len() {
            let label = match index {
                START => "<Start>".to_string(),
                END => "<End>".to_string(),
                _ => self
                    .block_statements(index)
                    .iter()
                    .map(|statement| escape_dot(statement_to_string(statement).trim_end()) + "\\l")
                    .collect(),
            };
            writeln!(out, "    N{index} [label = \"{label}\", shape = box]")?;
        }
        for edge in &self.edges {
            write!(out, "    N{} -> N{}", edge.from, edge.to)?;
            if let Some(condition) = &edge.condition {
                write!(out, " [label = \"{}\"]", escape_dot(&expression_to_string(condition)))?;
            }
            writeln!(out)?;
        }
        writeln!(out, "}}")
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\l")
}

struct GraphBuilder {
    blocks: Vec<BasicBlock>,
    edges: Vec<BasicBlockEdge>,
}

impl GraphBuilder {
    fn split_blocks(&mut self, statements: &[BoundStatement]) {
        let mut start = 0;
        for (index, statement) in statements.iter().enumerate() {
            match statement {
                BoundStatement::Label(_) => {
                    if start < index {
                        self.blocks.push(BasicBlock::new(start..index));
                    }
                    start = index;
                }
                BoundStatement::Goto(_) | BoundStatement::ConditionalGoto(_) | BoundStatement::Return(_) => {
                    self.blocks.push(BasicBlock::new(start..index + 1));
                    start = index + 1;
                }
                BoundStatement::VariableDeclaration(_) | BoundStatement::Expression(_) => {}
                other => unreachable!("unexpected {:?} in a lowered body", other.kind()),
            }
        }
        if start < statements.len() {
            self.blocks.push(BasicBlock::new(start..statements.len()));
        }
    }

    fn connect_blocks(&mut self, statements: &[BoundStatement]) {
        let mut label_blocks: FxHashMap<&BoundLabel, usize> = FxHashMap::default();
        for (index, block) in self.blocks.iter().enumerate().skip(END + 1) {
            if let BoundStatement::Label(node) = &statements[block.statements.start] {
                label_blocks.insert(&node.label, index);
            }
        }
        let block_of = |label: &BoundLabel| match label_blocks.get(label) {
            Some(&block) => block,
            None => panic!("no block starts at label {label}"),
        };

        let first = if self.blocks.len() > END + 1 { END + 1 } else { END };
        self.connect(START, first, None);

        for index in END + 1..self.blocks.len() {
            let next = if index + 1 < self.blocks.len() { index + 1 } else { END };
            let last = &statements[self.blocks[index].statements.end - 1];
            match last {
                BoundStatement::Goto(node) => self.connect(index, block_of(&node.label), None),
                BoundStatement::ConditionalGoto(node) => {
                    let target = block_of(&node.label);
                    let negated = negate(&node.condition);
                    let (jump, fall_through) = if node.jump_if_true {
                        (node.condition.clone(), negated)
                    } else {
                        (negated, node.condition.clone())
                    };
                    self.connect(index, target, Some(jump));
                    self.connect(index, next, Some(fall_through));
                }
                BoundStatement::Return(_) => self.connect(index, END, None),
                _ => self.connect(index, next, None),
            }
        }
    }

    fn connect(&mut self, from: usize, to: usize, condition: Option<BoundExpression>) {
        let condition = match condition {
            Some(condition) => match condition.constant().and_then(|value| value.as_bool()) {
                Some(true) => None,
                Some(false) => return,
                None => Some(condition),
            },
            None => None,
        };
        let edge = self.edges.len();
        self.edges.push(BasicBlockEdge { from, to, condition });
        self.blocks[from].outgoing.push(edge);
        self.blocks[to].incoming.push(edge);
    }

    /// Remove blocks without incoming edges until none is left. Returns how
    /// many blocks went away.
    fn prune(&mut self) -> usize {
        let mut alive = vec![true; self.blocks.len()];
        let mut incoming: Vec<usize> = self.blocks.iter().map(|block| block.incoming.len()).collect();
        let mut worklist: Vec<usize> = (END + 1..self.blocks.len()).filter(|&b| incoming[b] == 0).collect();
        let mut removed = 0;
        while let Some(block) = worklist.pop() {
            if !alive[block] {
                continue;
            }
            alive[block] = false;
            removed += 1;
            for &edge in &self.blocks[block].outgoing {
                let to = self.edges[edge].to;
                incoming[to] -= 1;
                if incoming[to] == 0 && to > END && alive[to] {
                    worklist.push(to);
                }
            }
        }
        if removed > 0 {
            self.retain(&alive);
        }
        removed
    }

    fn retain(&mut self, alive: &[bool]) {
        let mut remap = vec![usize::MAX; self.blocks.len()];
        let mut next = 0;
        for (index, &keep) in alive.iter().enumerate() {
            if keep {
                remap[index] = next;
                next += 1;
            }
        }

        let edges: Vec<BasicBlockEdge> = std::mem::take(&mut self.edges)
            .into_iter()
            .filter(|edge| alive[edge.from] && alive[edge.to])
            .map(|edge| BasicBlockEdge {
                from: remap[edge.from],
                to: remap[edge.to],
                condition: edge.condition,
            })
            .collect();
        let mut blocks: Vec<BasicBlock> = std::mem::take(&mut self.blocks)
            .into_iter()
            .zip(alive)
            .filter(|(_, &keep)| keep)
            .map(|(block, _)| BasicBlock::new(block.statements))
            .collect();
        for (index, edge) in edges.iter().enumerate() {
            blocks[edge.from].outgoing.push(index);
            blocks[edge.to].incoming.push(index);
        }
        self.blocks = blocks;
        self.edges = edges;
    }

    fn finish(self, statements: &[BoundStatement]) -> ControlFlowGraph<'_> {
        ControlFlowGraph {
            statements,
            blocks: self.blocks,
            edges: self.edges,
        }
    }
}

fn negate(condition: &BoundExpression) -> BoundExpression {
    let Some(op) = BoundUnaryOperator::bind(SyntaxKind::BangToken, condition.ty()) else {
        unreachable!("jump condition of type {}", condition.ty());
    };
    BoundExpression::unary(condition.location().clone(), op, condition.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_binder::{BoundStatement, TypeSymbol, VariableKind, VariableSymbol};
    use quill_core::text::{SourceText, TextLocation, TextSpan};
    use quill_core::Value;

    fn location() -> TextLocation {
        TextLocation::new(SourceText::shared("test.qs", "x"), TextSpan::new(0, 1))
    }

    fn ret() -> BoundStatement {
        BoundStatement::Return(std::rc::Rc::new(quill_binder::BoundReturnStatement {
            location: location(),
            expression: None,
            is_synthesized: false,
        }))
    }

    fn flag() -> BoundExpression {
        let variable = VariableSymbol::new("flag", VariableKind::Local, TypeSymbol::Bool, false, None, None);
        BoundExpression::variable(location(), variable)
    }

    #[test]
    fn test_empty_body_goes_to_end() {
        let graph = ControlFlowGraph::create(&[]);
        assert_eq!(graph.blocks().len(), 2);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!((graph.edges()[0].from, graph.edges()[0].to), (START, END));
        assert!(!graph.all_paths_return());
    }

    #[test]
    fn test_conditional_goto_has_two_guarded_edges() {
        let target = BoundLabel::new("target");
        let statements = vec![
            BoundStatement::conditional_goto(location(), target.clone(), flag(), true),
            ret(),
            BoundStatement::label(location(), target),
            ret(),
        ];
        let graph = ControlFlowGraph::create(&statements);
        assert_eq!(graph.blocks().len(), 5);
        let guarded: Vec<String> = graph
            .edges()
            .iter()
            .filter_map(|edge| edge.condition.as_ref().map(expression_to_string))
            .collect();
        assert_eq!(guarded, ["flag", "!flag"]);
        assert!(graph.all_paths_return());
    }

    #[test]
    fn test_false_guard_prunes_cascade() {
        let skip = BoundLabel::new("skip");
        let never = BoundExpression::literal(location(), Value::Boolean(false));
        let statements = vec![
            BoundStatement::goto(location(), skip.clone()),
            BoundStatement::conditional_goto(location(), skip.clone(), never, true),
            BoundStatement::expression(location(), flag()),
            ret(),
            BoundStatement::label(location(), skip),
            ret(),
        ];
        let graph = ControlFlowGraph::create(&statements);
        assert_eq!(graph.reachable_statements(), [true, false, false, false, true, true]);
        assert!(graph.all_paths_return());
    }

    #[test]
    fn test_fall_through_to_end_does_not_return() {
        let statements = vec![BoundStatement::expression(location(), flag())];
        let graph = ControlFlowGraph::create(&statements);
        assert!(!graph.all_paths_return());
    }

    #[test]
    fn test_write_dot() {
        let statements = vec![ret()];
        let graph = ControlFlowGraph::create(&statements);
        let mut dot = String::new();
        graph.write_dot(&mut dot).unwrap();
        assert!(dot.starts_with("digraph G {\n"));
        assert!(dot.contains("N0 [label = \"<Start>\", shape = box]"));
        assert!(dot.contains("N2 [label = \"return\\l\", shape = box]"));
        assert!(dot.contains("N0 -> N2\n"));
        assert!(dot.contains("N2 -> N1\n"));
        assert!(dot.ends_with("}\n"));
    }
}
