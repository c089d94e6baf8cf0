//! Lexer for the source language.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. This keeps the token stream manageable for malformed input.
//!
//! ## Layout
//!
//! Indentation is significant. After the raw token stream is produced, [`layout`]
//! rewrites it so the parser only ever sees logical lines:
//! - newlines inside brackets and on blank lines become `LineBreak` trivia
//! - leading whitespace of a logical line is measured and zero-width `Indent`/`Dedent`
//!   tokens are inserted in front of its first token
//! - a final `Newline` and the closing `Dedent`s are appended at end of input

use logos::Logos;
use rowan::{TextRange, TextSize};
use std::ops::Range;

use super::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }

    #[inline]
    fn empty_at(kind: SyntaxKind, offset: TextSize) -> Self {
        Self::new(kind, TextRange::empty(offset))
    }
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens, layout applied.
pub fn lex(source: &str) -> Vec<Token> {
    layout(source, lex_raw(source))
}

/// Raw Logos output with consecutive lexer errors coalesced into `Garbage`.
pub fn lex_raw(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = SyntaxKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..end),
                    ));
                }
                tokens.push(Token::new(kind, range_to_text_range(lexer.span())));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Width of leading whitespace; tabs advance to the next multiple of 8.
pub fn indent_width(whitespace: &str) -> u32 {
    let mut width = 0u32;
    for c in whitespace.chars() {
        match c {
            '\t' => width = (width / 8 + 1) * 8,
            '\x0C' => width = 0,
            _ => width += 1,
        }
    }
    width
}

/// Turns raw tokens into logical lines. See the module docs.
pub fn layout(source: &str, raw: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(raw.len() + 16);
    let mut indents: Vec<u32> = vec![0];
    let mut depth = 0u32;
    let mut line_has_code = false;
    let mut at_line_start = true;
    let mut pending_width = 0u32;

    for token in raw {
        match token.kind {
            SyntaxKind::Whitespace => {
                if at_line_start {
                    pending_width = indent_width(token_text(source, &token));
                }
                out.push(token);
            }
            SyntaxKind::Comment => out.push(token),
            SyntaxKind::LineContinuation => {
                at_line_start = false;
                out.push(token);
            }
            SyntaxKind::Newline => {
                if depth == 0 && line_has_code {
                    out.push(token);
                    line_has_code = false;
                } else {
                    out.push(Token::new(SyntaxKind::LineBreak, token.span));
                }
                if depth == 0 {
                    at_line_start = true;
                    pending_width = 0;
                }
            }
            kind => {
                if !line_has_code && depth == 0 {
                    let at = token.span.start();
                    if at_line_start {
                        adjust_indent(&mut out, &mut indents, pending_width, at);
                    }
                }
                line_has_code = true;
                at_line_start = false;
                if kind.is_open_delimiter() {
                    depth += 1;
                } else if kind.is_close_delimiter() {
                    depth = depth.saturating_sub(1);
                }
                out.push(token);
            }
        }
    }

    let end = TextSize::from(source.len() as u32);
    if line_has_code {
        out.push(Token::empty_at(SyntaxKind::Newline, end));
    }
    while indents.len() > 1 {
        indents.pop();
        out.push(Token::empty_at(SyntaxKind::Dedent, end));
    }
    out
}

fn adjust_indent(out: &mut Vec<Token>, indents: &mut Vec<u32>, width: u32, at: TextSize) {
    let current = indents.last().copied().unwrap_or(0);
    if width > current {
        indents.push(width);
        out.push(Token::empty_at(SyntaxKind::Indent, at));
        return;
    }
    while indents.last().is_some_and(|&w| w > width) {
        indents.pop();
        out.push(Token::empty_at(SyntaxKind::Dedent, at));
    }
    if indents.last().is_some_and(|&w| w != width) {
        // dedent to a column that was never opened
        out.push(Token::empty_at(SyntaxKind::Garbage, at));
        indents.push(width);
    }
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
