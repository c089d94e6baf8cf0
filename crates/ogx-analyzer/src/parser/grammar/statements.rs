use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::{SyntaxKind, TokenSet};
use crate::parser::cst::token_sets::{AUG_ASSIGN, EXPR_FIRST, STAR_EXPR_FIRST, STMT_END};

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);
        while !self.at_end() {
            self.parse_statement();
        }
        self.flush_trivia();
        self.finish_node();
    }

    /// True once only trivia is left.
    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_trivia();
        self.eof()
    }

    pub(crate) fn parse_statement(&mut self) {
        if !self.enter_recursion() {
            self.bail_out("statement");
            return;
        }

        match self.current() {
            SyntaxKind::KwIf => self.parse_if(),
            SyntaxKind::KwWhile => self.parse_while(),
            SyntaxKind::KwFor => self.parse_for(),
            SyntaxKind::KwTry => self.parse_try(),
            SyntaxKind::KwWith => self.parse_with(),
            SyntaxKind::KwDef | SyntaxKind::KwClass | SyntaxKind::At => self.parse_definition(),
            SyntaxKind::KwAsync if self.next_is(SyntaxKind::KwDef) => self.parse_definition(),
            SyntaxKind::KwAsync if self.next_is(SyntaxKind::KwFor) => self.parse_for(),
            SyntaxKind::KwAsync if self.next_is(SyntaxKind::KwWith) => self.parse_with(),
            SyntaxKind::Indent => self.parse_unexpected_indent(),
            SyntaxKind::Dedent => self.error_and_bump(DiagnosticKind::InconsistentDedent),
            SyntaxKind::Newline => self.error_and_bump(DiagnosticKind::UnexpectedToken),
            SyntaxKind::Garbage if self.current_span().is_empty() => self.parse_misaligned_block(),
            _ => self.parse_simple_line(),
        }

        self.exit_recursion();
    }

    /// An indented run of statements nobody opened; parsed as a block anyway.
    fn parse_unexpected_indent(&mut self) {
        self.error(DiagnosticKind::UnexpectedIndent);
        self.start_node(SyntaxKind::Block);
        self.bump();
        self.parse_statements_until_dedent();
        self.finish_node();
    }

    /// Lines dedented to a column no enclosing block opened. The layout pass
    /// opened a level for them, so they run until its `Dedent`.
    fn parse_misaligned_block(&mut self) {
        self.error(DiagnosticKind::InconsistentDedent);
        self.start_node(SyntaxKind::Block);
        self.bump();
        self.parse_statements_until_dedent();
        self.finish_node();
    }

    pub(crate) fn parse_statements_until_dedent(&mut self) {
        while !self.at_end() && !self.currently_is(SyntaxKind::Dedent) {
            self.parse_statement();
        }
        self.eat_token(SyntaxKind::Dedent);
    }

    /// `simple_stmt (';' simple_stmt)* [';'] NEWLINE`
    pub(crate) fn parse_simple_line(&mut self) {
        loop {
            self.parse_simple_statement();
            if !self.eat_token(SyntaxKind::Semicolon) {
                break;
            }
            if self.at_end() || self.currently_is_one_of(STMT_END) {
                break;
            }
        }
        self.expect_newline();
    }

    fn expect_newline(&mut self) {
        if self.eat_token(SyntaxKind::Newline) || self.at_end() {
            return;
        }
        self.error_recover(
            DiagnosticKind::ExpectedNewline,
            "statement continues past this point",
            TokenSet::single(SyntaxKind::Newline),
        );
        self.eat_token(SyntaxKind::Newline);
    }

    fn parse_simple_statement(&mut self) {
        match self.current() {
            SyntaxKind::KwPass => self.parse_keyword_statement(SyntaxKind::PassStmt),
            SyntaxKind::KwBreak => self.parse_keyword_statement(SyntaxKind::BreakStmt),
            SyntaxKind::KwContinue => self.parse_keyword_statement(SyntaxKind::ContinueStmt),
            SyntaxKind::KwReturn => self.parse_return(),
            SyntaxKind::KwRaise => self.parse_raise(),
            SyntaxKind::KwGlobal => self.parse_name_list_statement(SyntaxKind::GlobalStmt),
            SyntaxKind::KwNonlocal => self.parse_name_list_statement(SyntaxKind::NonlocalStmt),
            SyntaxKind::KwDel => self.parse_del(),
            SyntaxKind::KwAssert => self.parse_assert(),
            SyntaxKind::KwImport => self.parse_import(),
            SyntaxKind::KwFrom => self.parse_from_import(),
            kind if STAR_EXPR_FIRST.contains(kind) || kind == SyntaxKind::KwYield => {
                self.parse_expr_statement()
            }
            SyntaxKind::Garbage => self.error_garbage(),
            _ => self.error_recover(
                DiagnosticKind::UnexpectedToken,
                "not a valid statement",
                STMT_END,
            ),
        }
    }

    fn parse_keyword_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `return [testlist]`
    fn parse_return(&mut self) {
        self.start_node(SyntaxKind::ReturnStmt);
        self.bump();
        if self.currently_is_one_of(STAR_EXPR_FIRST) {
            self.parse_star_exprs();
        }
        self.finish_node();
    }

    /// `raise [test ['from' test]]`
    fn parse_raise(&mut self) {
        self.start_node(SyntaxKind::RaiseStmt);
        self.bump();
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_test();
            if self.eat_token(SyntaxKind::KwFrom) {
                self.parse_test_or_error();
            }
        }
        self.finish_node();
    }

    /// `global a, b` / `nonlocal a, b`
    fn parse_name_list_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        loop {
            self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_del(&mut self) {
        self.start_node(SyntaxKind::DelStmt);
        self.bump();
        self.parse_target_list();
        self.finish_node();
    }

    /// `assert test [',' test]`
    fn parse_assert(&mut self) {
        self.start_node(SyntaxKind::AssertStmt);
        self.bump();
        self.parse_test_or_error();
        if self.eat_token(SyntaxKind::Comma) {
            self.parse_test_or_error();
        }
        self.finish_node();
    }

    /// `import a.b [as c], d`
    fn parse_import(&mut self) {
        self.start_node(SyntaxKind::ImportStmt);
        self.bump();
        loop {
            self.start_node(SyntaxKind::ImportAlias);
            self.parse_dotted_name();
            if self.eat_token(SyntaxKind::KwAs) {
                self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
            }
            self.finish_node();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_dotted_name(&mut self) {
        self.start_node(SyntaxKind::DottedName);
        self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
        while self.currently_is(SyntaxKind::Dot) {
            self.bump();
            self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
        }
        self.finish_node();
    }

    /// `from .mod import (a as b, c)` / `from mod import *`
    fn parse_from_import(&mut self) {
        self.start_node(SyntaxKind::FromImportStmt);
        self.bump();
        while self.currently_is(SyntaxKind::Dot) || self.currently_is(SyntaxKind::Ellipsis) {
            self.bump();
        }
        if self.currently_is(SyntaxKind::Id) {
            self.parse_dotted_name();
        }
        self.expect(SyntaxKind::KwImport, "`import`");

        if self.eat_token(SyntaxKind::Star) {
            self.finish_node();
            return;
        }

        let parenthesized = self.currently_is(SyntaxKind::ParenOpen);
        if parenthesized {
            self.push_delimiter(SyntaxKind::ParenOpen);
            self.bump();
        }
        loop {
            if parenthesized && self.currently_is(SyntaxKind::ParenClose) {
                break;
            }
            self.start_node(SyntaxKind::ImportAlias);
            self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
            if self.eat_token(SyntaxKind::KwAs) {
                self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
            }
            self.finish_node();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        if parenthesized {
            self.close_delimiter(SyntaxKind::ParenClose);
        }
        self.finish_node();
    }

    /// Expression statement, or one of the assignment forms that start like one.
    fn parse_expr_statement(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_star_exprs_or_yield();

        match self.current() {
            SyntaxKind::Equals => {
                self.start_node_at(checkpoint, SyntaxKind::AssignStmt);
                while self.eat_token(SyntaxKind::Equals) {
                    self.parse_assigned_value();
                }
                self.finish_node();
            }
            kind if AUG_ASSIGN.contains(kind) => {
                self.start_node_at(checkpoint, SyntaxKind::AugAssignStmt);
                self.bump();
                self.parse_assigned_value();
                self.finish_node();
            }
            SyntaxKind::Colon => {
                self.start_node_at(checkpoint, SyntaxKind::AnnAssignStmt);
                self.bump();
                self.parse_test_or_error();
                if self.eat_token(SyntaxKind::Equals) {
                    self.parse_assigned_value();
                }
                self.finish_node();
            }
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::ExprStmt);
                self.finish_node();
            }
        }
    }

    fn parse_assigned_value(&mut self) {
        if self.currently_is_one_of(STAR_EXPR_FIRST) || self.currently_is(SyntaxKind::KwYield) {
            self.parse_star_exprs_or_yield();
        } else if self.currently_is(SyntaxKind::Garbage) {
            self.error_garbage();
        } else {
            self.error(DiagnosticKind::ExpectedExpression);
        }
    }

    /// Lexer garbage: an unterminated string, a bad dedent, or stray characters.
    pub(crate) fn error_garbage(&mut self) {
        let text = self.current_text();
        let quote = text.find(['"', '\'']);
        let is_string = quote.is_some_and(|i| {
            i <= 2 && text[..i].chars().all(|c| "rRbBuUfF".contains(c))
        });
        if is_string {
            self.error_and_bump(DiagnosticKind::UnterminatedString);
        } else if text.is_empty() {
            self.error_and_bump(DiagnosticKind::InconsistentDedent);
        } else {
            self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, format!("`{text}`"));
        }
    }
}
