//! Indented tree dump of syntax nodes, used by `quillc --emit syntax` and tests.

use crate::node::{SyntaxNode, Trivia};
use std::fmt::{self, Write};

/// Render `node` and all of its descendants, one per line:
///
/// ```text
/// └──BinaryExpression
///     ├──LiteralExpression
///     │   └──NumberToken 1
/// ```
///
/// Tokens show their text; trivia is listed as `L:` (leading) and `T:`
/// (trailing) lines around the token when `with_trivia` is set.
pub fn write_tree(out: &mut impl Write, node: SyntaxNode<'_>, with_trivia: bool) -> fmt::Result {
    write_node(out, node, "", true, with_trivia)
}

/// Convenience wrapper around [`write_tree`] returning a `String`.
pub fn tree_to_string(node: SyntaxNode<'_>, with_trivia: bool) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_tree(&mut out, node, with_trivia);
    out
}

fn write_node(out: &mut impl Write, node: SyntaxNode<'_>, indent: &str, is_last: bool, with_trivia: bool) -> fmt::Result {
    let marker = if is_last { "└──" } else { "├──" };

    if let SyntaxNode::Token(token) = node {
        if with_trivia {
            write_trivia(out, indent, "L", token.leading_trivia)?;
        }
        write!(out, "{}{}{:?}", indent, marker, token.kind)?;
        if token.is_missing() {
            write!(out, " (missing)")?;
        } else if !token.text.is_empty() && token.kind.fixed_text().is_none() {
            write!(out, " {}", token.text)?;
        }
        writeln!(out)?;
        if with_trivia {
            write_trivia(out, indent, "T", token.trailing_trivia)?;
        }
        return Ok(());
    }

    writeln!(out, "{}{}{:?}", indent, marker, node.kind())?;
    let child_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
    let children = node.children();
    let count = children.len();
    for (index, child) in children.into_iter().enumerate() {
        write_node(out, child, &child_indent, index + 1 == count, with_trivia)?;
    }
    Ok(())
}

fn write_trivia(out: &mut impl Write, indent: &str, prefix: &str, trivia: &[Trivia<'_>]) -> fmt::Result {
    for piece in trivia {
        writeln!(out, "{}{}: {:?} {:?}", indent, prefix, piece.kind, piece.text)?;
    }
    Ok(())
}
