//! A parsed source file and the analyses that need one.

use ogx_core::{ChainWithPosition, FreeVariableChain};

use crate::analysis::{self, Scope};
use crate::diagnostics::Diagnostics;
use crate::error::{AnalysisError, AnalysisResult};
use crate::line_index::LineIndex;
use crate::parser::ast::{ClassDef, Root, WithStmt};
use crate::parser::{self, Parse};

/// Source text parsed once and queried many times.
///
/// Every query first checks that the text parsed without errors; analyses
/// of a broken tree would silently miss bindings.
#[derive(Debug, Clone)]
pub struct SourceModule {
    text: String,
    parse: Parse,
    diagnostics: Diagnostics,
    lines: LineIndex,
}

impl SourceModule {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let (parse, diagnostics) = parser::parse(&text);
        let lines = LineIndex::new(&text);
        tracing::debug!(
            bytes = text.len(),
            errors = diagnostics.error_count(),
            "parsed source"
        );
        Self {
            text,
            parse,
            diagnostics,
            lines,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Root {
        self.parse.root()
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn require_valid(&self) -> AnalysisResult<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(AnalysisError::Syntax(self.diagnostics.filtered()))
    }

    pub fn module_scope(&self) -> AnalysisResult<Scope> {
        self.require_valid()?;
        Ok(Scope::Module(self.root()))
    }

    pub fn function_or_lambda_at_line(&self, line: u32) -> AnalysisResult<Scope> {
        self.require_valid()?;
        analysis::function_or_lambda_at_line(&self.root(), &self.lines, line)
    }

    pub fn class_at_line(&self, line: u32) -> AnalysisResult<ClassDef> {
        self.require_valid()?;
        analysis::class_at_line(&self.root(), &self.lines, line)
    }

    pub fn with_block_at_line(&self, line: u32) -> AnalysisResult<WithStmt> {
        self.require_valid()?;
        analysis::with_block_at_line(&self.root(), &self.lines, line)
    }

    pub fn free_variable_chains(&self, scope: &Scope) -> AnalysisResult<Vec<ChainWithPosition>> {
        analysis::free_variable_chains(scope, &self.lines)
    }

    pub fn bound_values_in_scope(&self, scope: &Scope) -> AnalysisResult<Vec<String>> {
        let names = analysis::bound_values_in_scope(scope, &self.lines)?;
        Ok(names.into_iter().collect())
    }

    pub fn outer_return_lines(&self, scope: &Scope) -> Vec<u32> {
        analysis::outer_return_lines(scope, &self.lines)
    }

    pub fn outer_yield_lines(&self, scope: &Scope) -> Vec<u32> {
        analysis::outer_yield_lines(scope, &self.lines)
    }

    pub fn base_class_chains(&self, class: &ClassDef) -> Vec<Option<FreeVariableChain>> {
        analysis::base_class_chains(class)
    }

    pub fn data_members(&self, class: &ClassDef) -> AnalysisResult<Vec<String>> {
        analysis::data_members(class, &self.lines)
    }

    /// Body of the with block at `line` as a zero-argument function, after
    /// checking that no `return` or `yield` escapes it.
    pub fn with_body_at_line(&self, line: u32) -> AnalysisResult<Scope> {
        let with = self.with_block_at_line(line)?;
        let scope = Scope::with_body(with);

        if let Some(&line) = self.outer_return_lines(&scope).first() {
            return Err(AnalysisError::ReturnInWithBlock {
                line,
                range: self.line_range(line),
            });
        }
        if let Some(&line) = self.outer_yield_lines(&scope).first() {
            return Err(AnalysisError::YieldInWithBlock {
                line,
                range: self.line_range(line),
            });
        }
        Ok(scope)
    }

    fn line_range(&self, line: u32) -> rowan::TextRange {
        let start = self.lines.line_start(line).unwrap_or_default();
        let end = self
            .lines
            .line_start(line + 1)
            .unwrap_or_else(|| rowan::TextSize::of(self.text.as_str()));
        rowan::TextRange::new(start, end.max(start))
    }
}
