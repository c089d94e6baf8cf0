use std::fmt;

use rowan::TextRange;

use crate::diagnostics::Diagnostics;

/// What an at-line lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    FunctionOrLambda,
    Class,
    WithBlock,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionKind::FunctionOrLambda => f.write_str("function definition"),
            DefinitionKind::Class => f.write_str("class definition"),
            DefinitionKind::WithBlock => f.write_str("with block"),
        }
    }
}

/// Errors raised by the scope analyses.
///
/// Lines are 1-based. Every variant knows the source range it is about, so
/// callers can render it next to the parse diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("`global` statement not supported (line {line})")]
    GlobalStatement { line: u32, range: TextRange },

    #[error("`nonlocal` statement not supported (line {line})")]
    NonlocalStatement { line: u32, range: TextRange },

    #[error("can't find a {what} at line {line}")]
    NotFound {
        what: DefinitionKind,
        line: u32,
        range: TextRange,
    },

    #[error("can't find a unique {what} at line {line}")]
    NotUnique {
        what: DefinitionKind,
        line: u32,
        range: TextRange,
    },

    #[error("`return` statement not supported in a with block (line {line})")]
    ReturnInWithBlock { line: u32, range: TextRange },

    #[error("`yield` expression not supported in a with block (line {line})")]
    YieldInWithBlock { line: u32, range: TextRange },

    #[error("functions and classes in `__init__` may rebind `self` (line {line})")]
    NestedDefinitionInInit { line: u32, range: TextRange },

    #[error("`__init__` is missing a first positional `self` argument (line {line})")]
    MissingSelfInInit { line: u32, range: TextRange },

    #[error("source has {} syntax error(s)", .0.error_count())]
    Syntax(Diagnostics),
}

impl AnalysisError {
    pub fn range(&self) -> TextRange {
        match self {
            AnalysisError::GlobalStatement { range, .. }
            | AnalysisError::NonlocalStatement { range, .. }
            | AnalysisError::NotFound { range, .. }
            | AnalysisError::NotUnique { range, .. }
            | AnalysisError::ReturnInWithBlock { range, .. }
            | AnalysisError::YieldInWithBlock { range, .. }
            | AnalysisError::NestedDefinitionInInit { range, .. }
            | AnalysisError::MissingSelfInInit { range, .. } => *range,
            AnalysisError::Syntax(diagnostics) => diagnostics
                .first_error()
                .map(|d| d.range())
                .unwrap_or_default(),
        }
    }

    /// Line the error is reported at, when it has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            AnalysisError::GlobalStatement { line, .. }
            | AnalysisError::NonlocalStatement { line, .. }
            | AnalysisError::NotFound { line, .. }
            | AnalysisError::NotUnique { line, .. }
            | AnalysisError::ReturnInWithBlock { line, .. }
            | AnalysisError::YieldInWithBlock { line, .. }
            | AnalysisError::NestedDefinitionInInit { line, .. }
            | AnalysisError::MissingSelfInInit { line, .. } => Some(*line),
            AnalysisError::Syntax(_) => None,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
