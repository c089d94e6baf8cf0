//! Scope analyses over the typed AST.
//!
//! Everything here works on one [`Scope`] at a time: a module, a function,
//! a lambda, a class body, a comprehension, or the body of a with block
//! viewed as a zero-argument function.

mod bound;
mod free_vars;
mod fstring;
mod lookup;
mod members;
mod outer;


pub use bound::bound_values_in_scope;
pub use free_vars::{base_class_chains, free_variable_chains};
pub use fstring::{FormatField, format_fields};
pub use lookup::{class_at_line, function_or_lambda_at_line, with_block_at_line};
pub use members::data_members;
pub use outer::{outer_return_lines, outer_yield_lines};

use crate::line_index::LineIndex;
use crate::parser::SyntaxNode;
use crate::parser::ast::{ClassDef, Comprehension, FuncDef, LambdaExpr, Root, WithStmt};
use crate::parser::cst::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Module(Root),
    Function(FuncDef),
    Lambda(LambdaExpr),
    Class(ClassDef),
    Comprehension(Comprehension),
    /// Body of a with block, analyzed as if it were a function without
    /// parameters.
    WithBody(WithStmt),
}

impl Scope {
    pub fn with_body(with: WithStmt) -> Self {
        Scope::WithBody(with)
    }

    /// The scope a node opens, if any.
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let scope = match node.kind() {
            SyntaxKind::Root => Scope::Module(Root::cast(node)?),
            SyntaxKind::FuncDef => Scope::Function(FuncDef::cast(node)?),
            SyntaxKind::ClassDef => Scope::Class(ClassDef::cast(node)?),
            SyntaxKind::LambdaExpr => Scope::Lambda(LambdaExpr::cast(node)?),
            SyntaxKind::ListComp
            | SyntaxKind::SetComp
            | SyntaxKind::DictComp
            | SyntaxKind::GeneratorExpr => match crate::parser::ast::Expr::cast(node)? {
                crate::parser::ast::Expr::Comprehension(c) => Scope::Comprehension(c),
                _ => return None,
            },
            _ => return None,
        };
        Some(scope)
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Scope::Module(n) => n.as_cst(),
            Scope::Function(n) => n.as_cst(),
            Scope::Lambda(n) => n.as_cst(),
            Scope::Class(n) => n.as_cst(),
            Scope::Comprehension(n) => n.as_cst(),
            Scope::WithBody(n) => n.as_cst(),
        }
    }

    /// Line of the keyword that introduces the scope (`def`, `class`,
    /// `lambda`, `with`), else the line the node starts on.
    pub fn line(&self, lines: &LineIndex) -> u32 {
        let keyword = match self {
            Scope::Function(f) => f.def_token(),
            Scope::Class(c) => c.class_token(),
            Scope::WithBody(w) => w.with_token(),
            _ => None,
        };
        let offset = keyword
            .map(|t| t.text_range().start())
            .unwrap_or_else(|| self.as_cst().text_range().start());
        lines.line(offset)
    }

    /// Nodes holding the code that runs inside the scope.
    pub(crate) fn body_nodes(&self) -> Vec<SyntaxNode> {
        match self {
            Scope::Module(root) => vec![root.as_cst().clone()],
            Scope::Function(f) => f.body().map(|b| b.as_cst().clone()).into_iter().collect(),
            Scope::Lambda(l) => l.body().map(|b| b.as_cst().clone()).into_iter().collect(),
            Scope::Class(c) => c.body().map(|b| b.as_cst().clone()).into_iter().collect(),
            Scope::Comprehension(c) => c.as_cst().children().collect(),
            Scope::WithBody(w) => w.body().map(|b| b.as_cst().clone()).into_iter().collect(),
        }
    }
}

/// Preorder walk below `node` that does not enter nested scopes.
pub(crate) fn walk_in_scope(node: &SyntaxNode, f: &mut impl FnMut(&SyntaxNode)) {
    for child in node.children() {
        if child.kind().is_scope() {
            continue;
        }
        f(&child);
        walk_in_scope(&child, f);
    }
}
