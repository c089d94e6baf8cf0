use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::{SyntaxKind, TokenSet};

/// Where a parameter list stops.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ParamsEnd {
    /// `def f(...)`: annotations allowed, closed by `)`.
    Paren,
    /// `lambda ...:` no annotations, closed by `:`.
    Colon,
}

impl ParamsEnd {
    fn close(self) -> SyntaxKind {
        match self {
            ParamsEnd::Paren => SyntaxKind::ParenClose,
            ParamsEnd::Colon => SyntaxKind::Colon,
        }
    }
}

impl Parser<'_> {
    pub(crate) fn parse_def_params(&mut self) {
        self.start_node(SyntaxKind::ParamList);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();
        self.parse_params(ParamsEnd::Paren);
        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    pub(crate) fn parse_lambda_params(&mut self) {
        self.start_node(SyntaxKind::ParamList);
        self.parse_params(ParamsEnd::Colon);
        self.finish_node();
    }

    fn parse_params(&mut self, end: ParamsEnd) {
        let recovery = TokenSet::new(&[SyntaxKind::Comma, end.close(), SyntaxKind::Newline]);
        while !self.at_end() && !self.currently_is(end.close()) {
            match self.current() {
                SyntaxKind::Star | SyntaxKind::DoubleStar | SyntaxKind::Slash | SyntaxKind::Id => {
                    self.parse_param(end)
                }
                _ => self.error_recover(DiagnosticKind::ExpectedName, "expected a parameter", recovery),
            }
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
    }

    /// `[*|**] name [: annotation] [= default]`, or a bare `*` / `/` marker.
    fn parse_param(&mut self, end: ParamsEnd) {
        self.start_node(SyntaxKind::Param);
        match self.current() {
            SyntaxKind::Slash => {
                self.bump();
                self.finish_node();
                return;
            }
            SyntaxKind::Star => {
                self.bump();
                if !self.currently_is(SyntaxKind::Id) {
                    self.finish_node();
                    return;
                }
                self.bump();
            }
            SyntaxKind::DoubleStar => {
                self.bump();
                self.expect_kind(SyntaxKind::Id, DiagnosticKind::ExpectedName);
            }
            _ => self.bump(),
        }

        if end == ParamsEnd::Paren && self.eat_token(SyntaxKind::Colon) {
            self.parse_test_or_error();
        }
        if self.eat_token(SyntaxKind::Equals) {
            self.parse_test_or_error();
        }
        self.finish_node();
    }
}
