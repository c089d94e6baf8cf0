//! Parser for the Python subset that function sources are written in.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Layout pass: the lexer turns indentation into `Indent`/`Dedent` tokens up front,
//!   so the grammar never looks at whitespace
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: retroactively wrap nodes for binary operators, trailers,
//!   assignments and displays whose kind is known only after the first element
//!
//! # Recovery Strategy
//!
//! The parser always produces a tree. Recovery follows these rules:
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. A broken simple statement is skipped up to the end of its logical line
//! 4. On recursion limit, remaining input goes into a single Error node

pub mod ast;
pub mod cst;
pub mod lexer;
pub mod printer;

mod core;
mod grammar;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use core::Parser;
pub use printer::CstPrinter;

use crate::diagnostics::Diagnostics;
use lexer::lex;

/// Parse result containing the green tree.
///
/// The tree is always complete. Diagnostics are returned separately and
/// error nodes in the tree mark the recovery points.
#[derive(Debug, Clone)]
pub struct Parse {
    cst: rowan::GreenNode,
}

impl Parse {
    pub fn as_cst(&self) -> &rowan::GreenNode {
        &self.cst
    }

    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.cst.clone())
    }

    pub fn root(&self) -> ast::Root {
        ast::Root::cast(self.syntax()).expect("parser always produces Root")
    }
}

/// Main entry point.
pub fn parse(source: &str) -> (Parse, Diagnostics) {
    parse_with_parser(Parser::new(source, lex(source)))
}

/// Parse with a pre-configured parser (for a custom recursion limit).
pub fn parse_with_parser(mut parser: Parser) -> (Parse, Diagnostics) {
    parser.parse_root();
    let (cst, diagnostics) = parser.finish();
    (Parse { cst }, diagnostics)
}
