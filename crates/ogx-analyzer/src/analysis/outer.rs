//! Control flow that escapes a scope's own body.

use super::{Scope, walk_in_scope};
use crate::line_index::LineIndex;
use crate::parser::cst::{SyntaxKind, SyntaxNode};

/// Lines of `return` statements that belong to `scope` itself.
pub fn outer_return_lines(scope: &Scope, lines: &LineIndex) -> Vec<u32> {
    outer_lines(scope, lines, SyntaxKind::ReturnStmt)
}

/// Lines of `yield` and `yield from` expressions that belong to `scope` itself.
pub fn outer_yield_lines(scope: &Scope, lines: &LineIndex) -> Vec<u32> {
    outer_lines(scope, lines, SyntaxKind::YieldExpr)
}

fn outer_lines(scope: &Scope, lines: &LineIndex, kind: SyntaxKind) -> Vec<u32> {
    let mut found = Vec::new();
    let mut visit = |node: &SyntaxNode| {
        if node.kind() == kind {
            found.push(lines.line(node.text_range().start()));
        }
    };
    for body in scope.body_nodes() {
        let nested = body.kind().is_scope() && body.kind() != SyntaxKind::Root;
        if nested {
            continue;
        }
        visit(&body);
        walk_in_scope(&body, &mut visit);
    }
    found
}
