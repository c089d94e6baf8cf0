//! Expression layers, loosest binding first.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::token_sets::{
    ARITH_OPS, COMPARISON, EXPR_FIRST, SHIFT_OPS, STAR_EXPR_FIRST, TERM_OPS, UNARY_OPS,
};
use crate::parser::cst::{SyntaxKind, TokenSet};

impl Parser<'_> {
    pub(crate) fn parse_test_or_error(&mut self) {
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_test();
        } else {
            self.error(DiagnosticKind::ExpectedExpression);
        }
    }

    /// `lambda | or_test ['if' or_test 'else' test] | NAME ':=' test`
    pub(crate) fn parse_test(&mut self) {
        if !self.enter_recursion() {
            self.bail_out("expression");
            return;
        }

        if self.currently_is(SyntaxKind::Id) && self.next_is(SyntaxKind::ColonEquals) {
            self.start_node(SyntaxKind::NamedExpr);
            self.bump();
            self.bump();
            self.parse_test_or_error();
            self.finish_node();
        } else if self.currently_is(SyntaxKind::KwLambda) {
            self.parse_lambda();
        } else {
            let checkpoint = self.checkpoint();
            self.parse_or();
            if self.currently_is(SyntaxKind::KwIf) {
                self.start_node_at(checkpoint, SyntaxKind::CondExpr);
                self.bump();
                self.parse_or();
                self.expect(SyntaxKind::KwElse, "`else`");
                self.parse_test_or_error();
                self.finish_node();
            }
        }

        self.exit_recursion();
    }

    fn parse_lambda(&mut self) {
        self.start_node(SyntaxKind::LambdaExpr);
        self.bump();
        self.parse_lambda_params();
        self.expect_kind(SyntaxKind::Colon, DiagnosticKind::ExpectedColon);
        self.parse_test_or_error();
        self.finish_node();
    }

    /// `'*' expr | test`
    pub(crate) fn parse_star_expr(&mut self) {
        if self.currently_is(SyntaxKind::Star) {
            self.start_node(SyntaxKind::StarredExpr);
            self.bump();
            self.parse_bitor();
            self.finish_node();
        } else {
            self.parse_test();
        }
    }

    /// Comma-separated `star_expr`s; more than one (or a trailing comma) makes a tuple.
    pub(crate) fn parse_star_exprs(&mut self) {
        self.parse_comma_list(Self::parse_star_expr, STAR_EXPR_FIRST);
    }

    pub(crate) fn parse_star_exprs_or_error(&mut self) {
        if self.currently_is_one_of(STAR_EXPR_FIRST) {
            self.parse_star_exprs();
        } else {
            self.error(DiagnosticKind::ExpectedExpression);
        }
    }

    pub(crate) fn parse_star_exprs_or_yield(&mut self) {
        if self.currently_is(SyntaxKind::KwYield) {
            self.parse_yield();
        } else {
            self.parse_star_exprs();
        }
    }

    /// `yield [testlist] | yield from test`
    pub(crate) fn parse_yield(&mut self) {
        self.start_node(SyntaxKind::YieldExpr);
        self.bump();
        if self.eat_token(SyntaxKind::KwFrom) {
            self.parse_test_or_error();
        } else if self.currently_is_one_of(STAR_EXPR_FIRST) {
            self.parse_star_exprs();
        }
        self.finish_node();
    }

    /// Assignment targets of `for`, `del` and comprehensions. Parsed at the
    /// bitwise-or level so that `in` is left for the caller.
    pub(crate) fn parse_target_list(&mut self) {
        if !self.currently_is_one_of(STAR_EXPR_FIRST) {
            self.error(DiagnosticKind::ExpectedExpression);
            return;
        }
        self.parse_comma_list(Self::parse_target, STAR_EXPR_FIRST);
    }

    pub(crate) fn parse_target(&mut self) {
        if self.currently_is(SyntaxKind::Star) {
            self.start_node(SyntaxKind::StarredExpr);
            self.bump();
            self.parse_bitor();
            self.finish_node();
        } else {
            self.parse_bitor();
        }
    }

    fn parse_comma_list(&mut self, element: fn(&mut Self), first: TokenSet) {
        let checkpoint = self.checkpoint();
        element(self);
        if !self.currently_is(SyntaxKind::Comma) {
            return;
        }
        self.start_node_at(checkpoint, SyntaxKind::TupleExpr);
        while self.eat_token(SyntaxKind::Comma) {
            if !self.currently_is_one_of(first) {
                break;
            }
            element(self);
        }
        self.finish_node();
    }

    pub(crate) fn parse_or(&mut self) {
        self.parse_left_assoc(
            SyntaxKind::BoolExpr,
            TokenSet::single(SyntaxKind::KwOr),
            Self::parse_and,
        );
    }

    fn parse_and(&mut self) {
        self.parse_left_assoc(
            SyntaxKind::BoolExpr,
            TokenSet::single(SyntaxKind::KwAnd),
            Self::parse_not,
        );
    }

    fn parse_not(&mut self) {
        if self.currently_is(SyntaxKind::KwNot) {
            if !self.enter_recursion() {
                self.bail_out("expression");
                return;
            }
            self.start_node(SyntaxKind::UnaryExpr);
            self.bump();
            self.parse_not();
            self.finish_node();
            self.exit_recursion();
        } else {
            self.parse_comparison();
        }
    }

    fn at_comparison_op(&mut self) -> bool {
        self.currently_is_one_of(COMPARISON)
            || (self.currently_is(SyntaxKind::KwNot) && self.next_is(SyntaxKind::KwIn))
    }

    /// Chained comparison: `a < b <= c`, `x not in y`, `x is not None`.
    fn parse_comparison(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_bitor();
        if !self.at_comparison_op() {
            return;
        }
        self.start_node_at(checkpoint, SyntaxKind::CompareExpr);
        while self.at_comparison_op() {
            match self.current() {
                SyntaxKind::KwNot => {
                    self.bump();
                    self.bump();
                }
                SyntaxKind::KwIs => {
                    self.bump();
                    self.eat_token(SyntaxKind::KwNot);
                }
                _ => self.bump(),
            }
            self.parse_bitor();
        }
        self.finish_node();
    }

    pub(crate) fn parse_bitor(&mut self) {
        self.parse_left_assoc(
            SyntaxKind::BinExpr,
            TokenSet::single(SyntaxKind::Pipe),
            Self::parse_xor,
        );
    }

    fn parse_xor(&mut self) {
        self.parse_left_assoc(
            SyntaxKind::BinExpr,
            TokenSet::single(SyntaxKind::Caret),
            Self::parse_bitand,
        );
    }

    fn parse_bitand(&mut self) {
        self.parse_left_assoc(
            SyntaxKind::BinExpr,
            TokenSet::single(SyntaxKind::Amp),
            Self::parse_shift,
        );
    }

    fn parse_shift(&mut self) {
        self.parse_left_assoc(SyntaxKind::BinExpr, SHIFT_OPS, Self::parse_arith);
    }

    fn parse_arith(&mut self) {
        self.parse_left_assoc(SyntaxKind::BinExpr, ARITH_OPS, Self::parse_term);
    }

    fn parse_term(&mut self) {
        self.parse_left_assoc(SyntaxKind::BinExpr, TERM_OPS, Self::parse_factor);
    }

    fn parse_left_assoc(&mut self, kind: SyntaxKind, ops: TokenSet, operand: fn(&mut Self)) {
        let checkpoint = self.checkpoint();
        operand(self);
        while self.currently_is_one_of(ops) {
            self.start_node_at(checkpoint, kind);
            self.bump();
            operand(self);
            self.finish_node();
        }
    }

    /// Prefix `+`, `-`, `~`.
    fn parse_factor(&mut self) {
        if !self.currently_is_one_of(UNARY_OPS) {
            self.parse_power();
            return;
        }
        if !self.enter_recursion() {
            self.bail_out("expression");
            return;
        }
        self.start_node(SyntaxKind::UnaryExpr);
        self.bump();
        self.parse_factor();
        self.finish_node();
        self.exit_recursion();
    }

    /// `await? primary ['**' factor]`, right-associative.
    fn parse_power(&mut self) {
        let checkpoint = self.checkpoint();
        if self.currently_is(SyntaxKind::KwAwait) {
            self.start_node(SyntaxKind::AwaitExpr);
            self.bump();
            self.parse_primary();
            self.finish_node();
        } else {
            self.parse_primary();
        }

        if self.currently_is(SyntaxKind::DoubleStar) {
            self.start_node_at(checkpoint, SyntaxKind::BinExpr);
            self.bump();
            self.parse_factor();
            self.finish_node();
        }
    }
}
