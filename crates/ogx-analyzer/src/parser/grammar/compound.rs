use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

impl Parser<'_> {
    /// Suite after a `:`. Either the rest of the line or an indented block.
    pub(crate) fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        if self.eat_token(SyntaxKind::Newline) {
            if self.eat_token(SyntaxKind::Indent) {
                self.parse_statements_until_dedent();
            } else {
                self.error(DiagnosticKind::ExpectedIndentedBlock);
            }
        } else if self.at_end() || self.currently_is(SyntaxKind::Dedent) {
            self.error(DiagnosticKind::ExpectedIndentedBlock);
        } else {
            self.parse_simple_line();
        }
        self.finish_node();
    }

    fn parse_colon_block(&mut self) {
        self.expect_kind(SyntaxKind::Colon, DiagnosticKind::ExpectedColon);
        self.parse_block();
    }

    /// `if test: block (elif test: block)* [else: block]`
    pub(crate) fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        self.bump();
        self.parse_test_or_error();
        self.parse_colon_block();
        while self.currently_is(SyntaxKind::KwElif) {
            self.start_node(SyntaxKind::ElifClause);
            self.bump();
            self.parse_test_or_error();
            self.parse_colon_block();
            self.finish_node();
        }
        self.parse_else_clause();
        self.finish_node();
    }

    fn parse_else_clause(&mut self) {
        if !self.currently_is(SyntaxKind::KwElse) {
            return;
        }
        self.start_node(SyntaxKind::ElseClause);
        self.bump();
        self.parse_colon_block();
        self.finish_node();
    }

    pub(crate) fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WhileStmt);
        self.bump();
        self.parse_test_or_error();
        self.parse_colon_block();
        self.parse_else_clause();
        self.finish_node();
    }

    /// `[async] for targets in testlist: block [else: block]`
    pub(crate) fn parse_for(&mut self) {
        self.start_node(SyntaxKind::ForStmt);
        self.eat_token(SyntaxKind::KwAsync);
        self.bump();
        self.parse_target_list();
        self.expect(SyntaxKind::KwIn, "`in`");
        self.parse_star_exprs_or_error();
        self.parse_colon_block();
        self.parse_else_clause();
        self.finish_node();
    }

    /// `try: block (except [test [as name]]: block)* [else: block] [finally: block]`
    pub(crate) fn parse_try(&mut self) {
        self.start_node(SyntaxKind::TryStmt);
        self.bump();
        self.parse_colon_block();

        let mut handlers = 0;
        while self.currently_is(SyntaxKind::KwExcept) {
            handlers += 1;
            self.start_node(SyntaxKind::ExceptClause);
            self.bump();
            self.eat_token(SyntaxKind::Star);
            if !self.currently_is(SyntaxKind::Colon) {
                self.parse_test_or_error();
                if self.eat_token(SyntaxKind::KwAs) {
                    self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
                }
            }
            self.parse_colon_block();
            self.finish_node();
        }
        if handlers > 0 {
            self.parse_else_clause();
        }

        if self.currently_is(SyntaxKind::KwFinally) {
            self.start_node(SyntaxKind::FinallyClause);
            self.bump();
            self.parse_colon_block();
            self.finish_node();
        } else if handlers == 0 {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected `except` or `finally`");
        }
        self.finish_node();
    }

    /// `[async] with item (, item)*: block`
    pub(crate) fn parse_with(&mut self) {
        self.start_node(SyntaxKind::WithStmt);
        self.eat_token(SyntaxKind::KwAsync);
        self.bump();
        loop {
            self.start_node(SyntaxKind::WithItem);
            self.parse_test_or_error();
            if self.eat_token(SyntaxKind::KwAs) {
                self.parse_target();
            }
            self.finish_node();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        self.parse_colon_block();
        self.finish_node();
    }

    /// Decorators followed by a `def` or a `class`. The decorators become the
    /// first children of the definition node.
    pub(crate) fn parse_definition(&mut self) {
        let checkpoint = self.checkpoint();
        while self.currently_is(SyntaxKind::At) {
            self.start_node(SyntaxKind::Decorator);
            self.bump();
            self.parse_test_or_error();
            self.expect_kind(SyntaxKind::Newline, DiagnosticKind::ExpectedNewline);
            self.finish_node();
        }

        match self.current() {
            SyntaxKind::KwDef => self.parse_funcdef(checkpoint),
            SyntaxKind::KwAsync if self.next_is(SyntaxKind::KwDef) => {
                self.parse_funcdef(checkpoint)
            }
            SyntaxKind::KwClass => self.parse_classdef(checkpoint),
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::Error);
                self.error_msg(
                    DiagnosticKind::UnexpectedToken,
                    "expected `def` or `class` after decorator",
                );
                self.finish_node();
            }
        }
    }

    fn parse_funcdef(&mut self, checkpoint: rowan::Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::FuncDef);
        self.eat_token(SyntaxKind::KwAsync);
        self.bump();
        self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);

        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_def_params();
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected `(`");
        }

        if self.currently_is(SyntaxKind::Arrow) {
            self.start_node(SyntaxKind::ReturnType);
            self.bump();
            self.parse_test_or_error();
            self.finish_node();
        }

        self.parse_colon_block();
        self.finish_node();
    }

    fn parse_classdef(&mut self, checkpoint: rowan::Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::ClassDef);
        self.bump();
        self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_arg_list();
        }
        self.parse_colon_block();
        self.finish_node();
    }
}
