//! Finding a definition from the line number a host runtime reports.

use rowan::TextRange;

use super::Scope;
use crate::error::{AnalysisError, AnalysisResult, DefinitionKind};
use crate::line_index::LineIndex;
use crate::parser::ast::{ClassDef, FuncDef, LambdaExpr, Root, WithStmt};
use crate::parser::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

/// The function or lambda defined at `line`.
///
/// A decorated function matches both on its first decorator's line and on
/// the line of its `def` keyword.
pub fn function_or_lambda_at_line(
    root: &Root,
    lines: &LineIndex,
    line: u32,
) -> AnalysisResult<Scope> {
    find_unique(root, lines, line, DefinitionKind::FunctionOrLambda, |node| {
        match node.kind() {
            SyntaxKind::FuncDef => {
                let f = FuncDef::cast(node.clone())?;
                let keyword = f.def_token();
                Some((Scope::Function(f), keyword))
            }
            SyntaxKind::LambdaExpr => {
                let l = LambdaExpr::cast(node.clone())?;
                Some((Scope::Lambda(l), None))
            }
            _ => None,
        }
    })
}

pub fn class_at_line(root: &Root, lines: &LineIndex, line: u32) -> AnalysisResult<ClassDef> {
    find_unique(root, lines, line, DefinitionKind::Class, |node| {
        let class = ClassDef::cast(node.clone())?;
        let keyword = class.class_token();
        Some((class, keyword))
    })
}

pub fn with_block_at_line(root: &Root, lines: &LineIndex, line: u32) -> AnalysisResult<WithStmt> {
    find_unique(root, lines, line, DefinitionKind::WithBlock, |node| {
        let with = WithStmt::cast(node.clone())?;
        let keyword = with.with_token();
        Some((with, keyword))
    })
}

fn find_unique<T>(
    root: &Root,
    lines: &LineIndex,
    line: u32,
    what: DefinitionKind,
    mut candidate: impl FnMut(&SyntaxNode) -> Option<(T, Option<SyntaxToken>)>,
) -> AnalysisResult<T> {
    let mut matches: Vec<(T, TextRange)> = Vec::new();

    for node in root.as_cst().descendants() {
        let Some((item, keyword)) = candidate(&node) else {
            continue;
        };
        let range = node.text_range();
        let starts_here = lines.line(range.start()) == line;
        let keyword_here = keyword.is_some_and(|k| lines.line(k.text_range().start()) == line);
        if starts_here || keyword_here {
            matches.push((item, range));
        }
    }

    if matches.len() > 1 {
        return Err(AnalysisError::NotUnique {
            what,
            line,
            range: matches[1].1,
        });
    }

    match matches.pop() {
        Some((item, _)) => Ok(item),
        None => {
            let offset = lines
                .line_start(line)
                .unwrap_or_else(|| root.as_cst().text_range().end());
            Err(AnalysisError::NotFound {
                what,
                line,
                range: TextRange::empty(offset),
            })
        }
    }
}
