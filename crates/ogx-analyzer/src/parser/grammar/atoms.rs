//! Atoms, trailers, displays and comprehensions.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::token_sets::{EXPR_FIRST, STAR_EXPR_FIRST};
use crate::parser::cst::{SyntaxKind, TokenSet};

impl Parser<'_> {
    /// `atom trailer*` where a trailer is a call, a subscript or `.name`.
    pub(crate) fn parse_primary(&mut self) {
        if !self.enter_recursion() {
            self.bail_out("expression");
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_atom();
        loop {
            match self.current() {
                SyntaxKind::Dot => {
                    self.start_node_at(checkpoint, SyntaxKind::AttributeExpr);
                    self.bump();
                    self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
                    self.finish_node();
                }
                SyntaxKind::ParenOpen => {
                    self.start_node_at(checkpoint, SyntaxKind::CallExpr);
                    self.parse_arg_list();
                    self.finish_node();
                }
                SyntaxKind::BracketOpen => {
                    self.start_node_at(checkpoint, SyntaxKind::SubscriptExpr);
                    self.push_delimiter(SyntaxKind::BracketOpen);
                    self.bump();
                    self.parse_subscripts();
                    self.close_delimiter(SyntaxKind::BracketClose);
                    self.finish_node();
                }
                _ => break,
            }
        }

        self.exit_recursion();
    }

    fn parse_atom(&mut self) {
        match self.current() {
            SyntaxKind::Id => {
                self.start_node(SyntaxKind::NameExpr);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Number
            | SyntaxKind::Ellipsis
            | SyntaxKind::KwNone
            | SyntaxKind::KwTrue
            | SyntaxKind::KwFalse => {
                self.start_node(SyntaxKind::LiteralExpr);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::String => {
                self.start_node(SyntaxKind::StringExpr);
                while self.currently_is(SyntaxKind::String) {
                    self.bump();
                }
                self.finish_node();
            }
            SyntaxKind::ParenOpen => self.parse_paren(),
            SyntaxKind::BracketOpen => self.parse_list_display(),
            SyntaxKind::BraceOpen => self.parse_brace_display(),
            SyntaxKind::Garbage => self.error_garbage(),
            _ => self.error(DiagnosticKind::ExpectedExpression),
        }
    }

    fn at_comp_for(&mut self) -> bool {
        self.currently_is(SyntaxKind::KwFor)
            || (self.currently_is(SyntaxKind::KwAsync) && self.next_is(SyntaxKind::KwFor))
    }

    /// `( )`, `(x)`, `(x,)`, `(x for ...)` or `(yield ...)`. The node kind is only
    /// known after the first element, so the node is opened retroactively.
    fn parse_paren(&mut self) {
        let checkpoint = self.checkpoint();
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();

        let kind = if self.currently_is(SyntaxKind::ParenClose) {
            SyntaxKind::TupleExpr
        } else if self.currently_is(SyntaxKind::KwYield) {
            self.parse_yield();
            SyntaxKind::ParenExpr
        } else {
            self.parse_star_expr();
            if self.at_comp_for() {
                self.parse_comp_clauses();
                SyntaxKind::GeneratorExpr
            } else if self.currently_is(SyntaxKind::Comma) {
                self.parse_display_tail(Self::parse_star_expr, STAR_EXPR_FIRST);
                SyntaxKind::TupleExpr
            } else {
                SyntaxKind::ParenExpr
            }
        };

        self.close_delimiter(SyntaxKind::ParenClose);
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    /// `[...]` list display or list comprehension.
    fn parse_list_display(&mut self) {
        let checkpoint = self.checkpoint();
        self.push_delimiter(SyntaxKind::BracketOpen);
        self.bump();

        let mut kind = SyntaxKind::ListExpr;
        if self.currently_is_one_of(STAR_EXPR_FIRST) {
            self.parse_star_expr();
            if self.at_comp_for() {
                self.parse_comp_clauses();
                kind = SyntaxKind::ListComp;
            } else {
                self.parse_display_tail(Self::parse_star_expr, STAR_EXPR_FIRST);
            }
        }

        self.close_delimiter(SyntaxKind::BracketClose);
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    /// `{...}`: dict or set display, dict or set comprehension.
    fn parse_brace_display(&mut self) {
        let checkpoint = self.checkpoint();
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump();

        let kind = if self.currently_is(SyntaxKind::BraceClose) {
            SyntaxKind::DictExpr
        } else if self.currently_is(SyntaxKind::DoubleStar) {
            self.parse_dict_entry();
            self.parse_display_tail(Self::parse_dict_entry, dict_entry_first());
            SyntaxKind::DictExpr
        } else {
            let entry = self.checkpoint();
            self.parse_star_expr();
            if self.eat_token(SyntaxKind::Colon) {
                self.parse_test_or_error();
                self.start_node_at(entry, SyntaxKind::DictEntry);
                self.finish_node();
                if self.at_comp_for() {
                    self.parse_comp_clauses();
                    SyntaxKind::DictComp
                } else {
                    self.parse_display_tail(Self::parse_dict_entry, dict_entry_first());
                    SyntaxKind::DictExpr
                }
            } else if self.at_comp_for() {
                self.parse_comp_clauses();
                SyntaxKind::SetComp
            } else {
                self.parse_display_tail(Self::parse_star_expr, STAR_EXPR_FIRST);
                SyntaxKind::SetExpr
            }
        };

        self.close_delimiter(SyntaxKind::BraceClose);
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    /// `key: value` or `**mapping`.
    fn parse_dict_entry(&mut self) {
        self.start_node(SyntaxKind::DictEntry);
        if self.eat_token(SyntaxKind::DoubleStar) {
            self.parse_bitor();
        } else {
            self.parse_test_or_error();
            self.expect_kind(SyntaxKind::Colon, DiagnosticKind::ExpectedColon);
            self.parse_test_or_error();
        }
        self.finish_node();
    }

    /// `(',' element)* [',']` after the first element of a display.
    fn parse_display_tail(&mut self, element: fn(&mut Self), first: TokenSet) {
        while self.eat_token(SyntaxKind::Comma) {
            if !self.currently_is_one_of(first) {
                break;
            }
            element(self);
        }
    }

    /// `comp_for (comp_for | comp_if)*`
    pub(crate) fn parse_comp_clauses(&mut self) {
        loop {
            if self.at_comp_for() {
                self.start_node(SyntaxKind::CompFor);
                self.eat_token(SyntaxKind::KwAsync);
                self.bump();
                self.parse_target_list();
                self.expect(SyntaxKind::KwIn, "`in`");
                self.parse_or();
                self.finish_node();
            } else if self.currently_is(SyntaxKind::KwIf) {
                self.start_node(SyntaxKind::CompIf);
                self.bump();
                self.parse_or();
                self.finish_node();
            } else {
                break;
            }
        }
    }

    /// `( arg, ... )` of a call or a class header.
    pub(crate) fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ArgList);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();

        let recovery = TokenSet::new(&[SyntaxKind::Comma, SyntaxKind::ParenClose]);
        while !self.at_end() && !self.currently_is(SyntaxKind::ParenClose) {
            if self.currently_is_one_of(STAR_EXPR_FIRST) || self.currently_is(SyntaxKind::DoubleStar)
            {
                self.parse_arg();
            } else {
                self.error_recover(
                    DiagnosticKind::ExpectedExpression,
                    "expected an argument",
                    recovery,
                );
            }
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }

        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    /// `test [comp_for] | name '=' test | '*' test | '**' test`
    fn parse_arg(&mut self) {
        self.start_node(SyntaxKind::Arg);
        match self.current() {
            SyntaxKind::Star | SyntaxKind::DoubleStar => {
                self.bump();
                self.parse_test_or_error();
            }
            SyntaxKind::Id if self.next_is(SyntaxKind::Equals) => {
                self.bump();
                self.bump();
                self.parse_test_or_error();
            }
            _ => {
                let checkpoint = self.checkpoint();
                self.parse_test();
                if self.at_comp_for() {
                    self.parse_comp_clauses();
                    self.start_node_at(checkpoint, SyntaxKind::GeneratorExpr);
                    self.finish_node();
                }
            }
        }
        self.finish_node();
    }

    /// Subscript list inside `[...]`; several subscripts form a tuple.
    fn parse_subscripts(&mut self) {
        let first = STAR_EXPR_FIRST.union(TokenSet::single(SyntaxKind::Colon));
        if !self.currently_is_one_of(first) {
            self.error(DiagnosticKind::ExpectedExpression);
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_subscript();
        if !self.currently_is(SyntaxKind::Comma) {
            return;
        }
        self.start_node_at(checkpoint, SyntaxKind::TupleExpr);
        self.parse_display_tail(Self::parse_subscript, first);
        self.finish_node();
    }

    /// `test | [test] ':' [test] [':' [test]]`
    fn parse_subscript(&mut self) {
        let checkpoint = self.checkpoint();
        if !self.currently_is(SyntaxKind::Colon) {
            self.parse_star_expr();
            if !self.currently_is(SyntaxKind::Colon) {
                return;
            }
        }
        self.start_node_at(checkpoint, SyntaxKind::SliceExpr);
        self.bump();
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_test();
        }
        if self.eat_token(SyntaxKind::Colon) && self.currently_is_one_of(EXPR_FIRST) {
            self.parse_test();
        }
        self.finish_node();
    }
}

fn dict_entry_first() -> TokenSet {
    EXPR_FIRST.union(TokenSet::single(SyntaxKind::DoubleStar))
}
