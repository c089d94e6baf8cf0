//! Token cursor and tree building shared by the grammar rules.
//!
//! Trivia (whitespace, comments, continuation lines) never reaches the
//! grammar. The cursor steps over it lazily, and whatever it stepped over is
//! written into the tree right before the next node or token, so trivia ends
//! up as leading trivia of whatever comes after it.

use std::cell::Cell;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::cst::{SyntaxKind, TokenSet};
use super::lexer::{Token, token_text};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Nesting deeper than this turns the rest of the input into an error node.
const DEFAULT_RECURSION_LIMIT: u32 = 512;

/// Lookaheads allowed between two consumed tokens before we call the grammar stuck.
const STALL_LIMIT: u32 = 256;

#[derive(Debug, Clone, Copy)]
struct OpenDelimiter {
    kind: SyntaxKind,
    span: TextRange,
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// Next token the grammar will see, once trivia is skipped.
    cursor: usize,
    /// Tokens before this index are already in the tree.
    emitted: usize,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Diagnostics,
    last_report: Option<TextSize>,
    open_delimiters: Vec<OpenDelimiter>,
    depth: u32,
    recursion_limit: u32,
    stall: Cell<u32>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            cursor: 0,
            emitted: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            last_report: None,
            open_delimiters: Vec::new(),
            depth: 0,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            stall: Cell::new(STALL_LIMIT),
        }
    }

    pub fn with_recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub(super) fn finish(mut self) -> (GreenNode, Diagnostics) {
        self.flush_trivia();
        (self.builder.finish(), self.diagnostics)
    }

    // Cursor

    pub(super) fn skip_trivia(&mut self) {
        while self
            .tokens
            .get(self.cursor)
            .is_some_and(|t| t.kind.is_trivia())
        {
            self.cursor += 1;
        }
    }

    fn token(&mut self) -> Option<Token> {
        self.skip_trivia();
        self.tokens.get(self.cursor).copied()
    }

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.tick();
        self.token().map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        let eof = self.eof_offset();
        self.token().map_or(TextRange::empty(eof), |t| t.span)
    }

    pub(super) fn current_text(&mut self) -> &'src str {
        let source = self.source;
        self.token().map_or("", |t| token_text(source, &t))
    }

    /// Kind of the significant token after the current one.
    pub(super) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.skip_trivia();
        self.tick();
        self.tokens
            .iter()
            .skip(self.cursor + 1)
            .find(|t| !t.kind.is_trivia())
            .is_some_and(|t| t.kind == kind)
    }

    /// Only trivia left.
    pub(super) fn eof(&self) -> bool {
        self.tokens[self.cursor..].iter().all(|t| t.kind.is_trivia())
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::of(self.source)
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    // Tree building

    /// Writes skipped trivia into the node that is currently open.
    pub(super) fn flush_trivia(&mut self) {
        for token in &self.tokens[self.emitted..self.cursor] {
            self.builder
                .token(token.kind.into(), token_text(self.source, token));
        }
        self.emitted = self.cursor;
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.flush_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn bump(&mut self) {
        self.skip_trivia();
        assert!(self.cursor < self.tokens.len(), "bump called at EOF");
        self.stall.set(STALL_LIMIT);
        self.flush_trivia();

        let token = self.tokens[self.cursor];
        self.builder
            .token(token.kind.into(), token_text(self.source, &token));
        self.cursor += 1;
        self.emitted = self.cursor;
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let matched = self.currently_is(kind);
        if matched {
            self.bump();
        }
        matched
    }

    /// On mismatch: report, but leave the token for the caller.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        self.eat_token(kind) || {
            self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {what}"));
            false
        }
    }

    /// Like [`expect`](Self::expect) with a dedicated diagnostic kind.
    pub(super) fn expect_kind(&mut self, kind: SyntaxKind, diagnostic: DiagnosticKind) -> bool {
        self.eat_token(kind) || {
            self.error(diagnostic);
            false
        }
    }

    pub(super) fn bump_as_error(&mut self) {
        if self.eof() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }

    // Diagnostics

    /// One diagnostic per position: the first report at a spot wins.
    fn report(&mut self, kind: DiagnosticKind, range: TextRange, detail: Option<String>) {
        if self.last_report == Some(range.start()) {
            return;
        }
        self.last_report = Some(range.start());
        let builder = self.diagnostics.report(kind, range);
        match detail {
            Some(detail) => builder.message(detail).emit(),
            None => builder.emit(),
        }
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_span();
        self.report(kind, range, None);
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        self.report(kind, range, Some(message.into()));
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.bump_as_error();
    }

    pub(super) fn error_and_bump_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump_as_error();
    }

    /// Reports at the current token, then swallows everything up to a token
    /// in `recovery` into one `Error` node.
    pub(super) fn error_recover(&mut self, kind: DiagnosticKind, message: &str, recovery: TokenSet) {
        let at_recovery = self.currently_is_one_of(recovery) || self.eof();
        if !at_recovery {
            self.start_node(SyntaxKind::Error);
        }
        self.error_msg(kind, message);
        if at_recovery {
            return;
        }
        while !self.currently_is_one_of(recovery) && !self.eof() {
            self.bump();
        }
        self.finish_node();
    }

    // Nesting

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= self.recursion_limit {
            return false;
        }
        self.depth += 1;
        self.stall.set(STALL_LIMIT);
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.stall.set(STALL_LIMIT);
    }

    /// Wraps the rest of the input into one `Error` node.
    pub(super) fn bail_out(&mut self, what: &str) {
        self.start_node(SyntaxKind::Error);
        self.error_msg(
            DiagnosticKind::UnexpectedToken,
            format!("{what} nested too deeply"),
        );
        while !self.eof() {
            self.bump();
        }
        self.finish_node();
    }

    pub(super) fn push_delimiter(&mut self, kind: SyntaxKind) {
        let span = self.current_span();
        self.open_delimiters.push(OpenDelimiter { kind, span });
    }

    /// Consumes `close` for the innermost open delimiter, or reports that
    /// delimiter as unclosed, spanning from the opener to the current token.
    pub(super) fn close_delimiter(&mut self, close: SyntaxKind) {
        let open = self.open_delimiters.pop();
        if self.eat_token(close) {
            return;
        }
        let Some(open) = open else {
            return;
        };

        let (kind, opener) = match open.kind {
            SyntaxKind::ParenOpen => (DiagnosticKind::UnclosedParen, "`(`"),
            SyntaxKind::BracketOpen => (DiagnosticKind::UnclosedBracket, "`[`"),
            _ => (DiagnosticKind::UnclosedBrace, "`{`"),
        };
        let here = self.current_span();
        if self.last_report == Some(here.start()) {
            return;
        }
        self.last_report = Some(here.start());
        let range = TextRange::new(open.span.start(), here.end().max(open.span.end()));
        self.diagnostics
            .report(kind, range)
            .related_to(format!("{opener} opened here"), open.span)
            .emit();
    }

    /// Panics when the grammar keeps looking ahead without consuming anything.
    #[inline]
    fn tick(&self) {
        let left = self.stall.get();
        assert!(left != 0, "parser is stuck: too many lookaheads");
        self.stall.set(left - 1);
    }
}
