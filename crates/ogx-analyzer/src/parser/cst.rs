//! Syntax kinds for the source language.
//!
//! `SyntaxKind` serves dual roles: token kinds (from the lexer) and node kinds
//! (from the parser). Logos derives token recognition; node kinds and the
//! tokens synthesized by the layout pass lack token/regex attributes.
//! `PyLang` implements Rowan's `Language` trait for tree construction.

use logos::{Lexer, Logos};
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    #[token("->")]
    Arrow,

    #[token("@")]
    At,

    /// Walrus `:=`
    #[token(":=")]
    ColonEquals,

    #[token("=")]
    Equals,

    #[token("**=")]
    DoubleStarEquals,

    #[token("//=")]
    DoubleSlashEquals,

    #[token("<<=")]
    LeftShiftEquals,

    #[token(">>=")]
    RightShiftEquals,

    #[token("+=")]
    PlusEquals,

    #[token("-=")]
    MinusEquals,

    #[token("*=")]
    StarEquals,

    #[token("/=")]
    SlashEquals,

    #[token("%=")]
    PercentEquals,

    #[token("&=")]
    AmpEquals,

    #[token("|=")]
    PipeEquals,

    #[token("^=")]
    CaretEquals,

    #[token("@=")]
    AtEquals,

    #[token("**")]
    DoubleStar,

    #[token("//")]
    DoubleSlash,

    #[token("<<")]
    LeftShift,

    #[token(">>")]
    RightShift,

    #[token("<=")]
    LessEquals,

    #[token(">=")]
    GreaterEquals,

    #[token("==")]
    EqualsEquals,

    #[token("!=")]
    NotEquals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("~")]
    Tilde,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("False")]
    KwFalse,

    #[token("None")]
    KwNone,

    #[token("True")]
    KwTrue,

    #[token("and")]
    KwAnd,

    #[token("as")]
    KwAs,

    #[token("assert")]
    KwAssert,

    #[token("async")]
    KwAsync,

    #[token("await")]
    KwAwait,

    #[token("break")]
    KwBreak,

    #[token("class")]
    KwClass,

    #[token("continue")]
    KwContinue,

    #[token("def")]
    KwDef,

    #[token("del")]
    KwDel,

    #[token("elif")]
    KwElif,

    #[token("else")]
    KwElse,

    #[token("except")]
    KwExcept,

    #[token("finally")]
    KwFinally,

    #[token("for")]
    KwFor,

    #[token("from")]
    KwFrom,

    #[token("global")]
    KwGlobal,

    #[token("if")]
    KwIf,

    #[token("import")]
    KwImport,

    #[token("in")]
    KwIn,

    #[token("is")]
    KwIs,

    #[token("lambda")]
    KwLambda,

    #[token("nonlocal")]
    KwNonlocal,

    #[token("not")]
    KwNot,

    #[token("or")]
    KwOr,

    #[token("pass")]
    KwPass,

    #[token("raise")]
    KwRaise,

    #[token("return")]
    KwReturn,

    #[token("try")]
    KwTry,

    #[token("while")]
    KwWhile,

    #[token("with")]
    KwWith,

    #[token("yield")]
    KwYield,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Id,

    #[regex(r"0[xX](?:_?[0-9a-fA-F])+[lL]?")]
    #[regex(r"0[oO](?:_?[0-7])+[lL]?")]
    #[regex(r"0[bB](?:_?[01])+[lL]?")]
    #[regex(r"[0-9](?:_?[0-9])*(?:\.(?:[0-9](?:_?[0-9])*)?)?(?:[eE][+-]?[0-9](?:_?[0-9])*)?[jJlL]?")]
    #[regex(r"\.[0-9](?:_?[0-9])*(?:[eE][+-]?[0-9](?:_?[0-9])*)?[jJ]?")]
    Number,

    /// Optional prefix, then the opening quote; the callback scans to the close.
    #[regex(r#"(?:[rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?""""#, |lex| close_string(lex, "\"\"\"", true))]
    #[regex(r"(?:[rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'''", |lex| close_string(lex, "'''", true))]
    #[regex(r#"(?:[rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?""#, |lex| close_string(lex, "\"", false))]
    #[regex(r"(?:[rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'", |lex| close_string(lex, "'", false))]
    String,

    #[token("\n")]
    #[token("\r\n")]
    #[token("\r")]
    Newline,

    /// Zero-width, synthesized by the layout pass.
    Indent,
    /// Zero-width, synthesized by the layout pass.
    Dedent,

    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    /// Newline that does not end a logical line (blank line, inside brackets).
    LineBreak,

    #[regex(r"#[^\r\n]*", allow_greedy = true)]
    Comment,

    #[regex(r"\\(?:\r\n|\n|\r)")]
    LineContinuation,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    Block,
    Decorator,
    FuncDef,
    ParamList,
    Param,
    ReturnType,
    ClassDef,
    ArgList,
    Arg,

    ExprStmt,
    AssignStmt,
    AugAssignStmt,
    AnnAssignStmt,
    PassStmt,
    BreakStmt,
    ContinueStmt,
    ReturnStmt,
    RaiseStmt,
    GlobalStmt,
    NonlocalStmt,
    DelStmt,
    AssertStmt,
    ImportStmt,
    FromImportStmt,
    ImportAlias,
    DottedName,

    IfStmt,
    ElifClause,
    ElseClause,
    WhileStmt,
    ForStmt,
    TryStmt,
    ExceptClause,
    FinallyClause,
    WithStmt,
    WithItem,

    NameExpr,
    LiteralExpr,
    StringExpr,
    ParenExpr,
    TupleExpr,
    ListExpr,
    SetExpr,
    DictExpr,
    DictEntry,
    ListComp,
    SetComp,
    DictComp,
    GeneratorExpr,
    CompFor,
    CompIf,
    AttributeExpr,
    SubscriptExpr,
    SliceExpr,
    CallExpr,
    BinExpr,
    UnaryExpr,
    BoolExpr,
    CompareExpr,
    CondExpr,
    LambdaExpr,
    AwaitExpr,
    StarredExpr,
    YieldExpr,
    NamedExpr,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

/// Scans the rest of a string literal after its opening quote.
///
/// Backslash escapes the next character in every form (raw strings keep the
/// backslash but still cannot end on an escaped quote). A single-quoted
/// string may not span lines; an unterminated one fails to the end of line.
fn close_string(lex: &mut Lexer<'_, SyntaxKind>, quote: &str, multiline: bool) -> bool {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' | b'\r' if !multiline => {
                lex.bump(i);
                return false;
            }
            _ if bytes[i..].starts_with(quote.as_bytes()) => {
                lex.bump(i + quote.len());
                return true;
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    false
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineBreak | Comment | LineContinuation)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (KwFalse as u16..=KwYield as u16).contains(&(self as u16))
    }

    /// Opening delimiters tracked by the layout pass.
    #[inline]
    pub fn is_open_delimiter(self) -> bool {
        matches!(self, ParenOpen | BracketOpen | BraceOpen)
    }

    #[inline]
    pub fn is_close_delimiter(self) -> bool {
        matches!(self, ParenClose | BracketClose | BraceClose)
    }

    /// Nodes that open a new name scope.
    #[inline]
    pub fn is_scope(self) -> bool {
        matches!(
            self,
            Root | FuncDef | ClassDef | LambdaExpr | ListComp | SetComp | DictComp | GeneratorExpr
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PyLang {}

impl Language for PyLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<PyLang>;
pub type SyntaxToken = rowan::SyntaxToken<PyLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of token `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
        TokenSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                // SAFETY: bounds checked against __LAST above
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// FIRST set of an atom.
    pub const ATOM_FIRST: TokenSet = TokenSet::new(&[
        ParenOpen,
        BracketOpen,
        BraceOpen,
        Id,
        Number,
        String,
        Ellipsis,
        KwNone,
        KwTrue,
        KwFalse,
    ]);

    /// FIRST set of `test` (a full expression without star).
    pub const EXPR_FIRST: TokenSet = ATOM_FIRST.union(TokenSet::new(&[
        KwNot,
        KwLambda,
        KwAwait,
        Plus,
        Minus,
        Tilde,
    ]));

    /// FIRST set of an element of an expression list (allows `*x`).
    pub const STAR_EXPR_FIRST: TokenSet = EXPR_FIRST.union(TokenSet::single(Star));

    pub const AUG_ASSIGN: TokenSet = TokenSet::new(&[
        PlusEquals,
        MinusEquals,
        StarEquals,
        SlashEquals,
        DoubleSlashEquals,
        PercentEquals,
        AmpEquals,
        PipeEquals,
        CaretEquals,
        LeftShiftEquals,
        RightShiftEquals,
        DoubleStarEquals,
        AtEquals,
    ]);

    pub const COMPARISON: TokenSet = TokenSet::new(&[
        Less,
        Greater,
        EqualsEquals,
        NotEquals,
        LessEquals,
        GreaterEquals,
        KwIn,
        KwIs,
    ]);

    pub const SHIFT_OPS: TokenSet = TokenSet::new(&[LeftShift, RightShift]);
    pub const ARITH_OPS: TokenSet = TokenSet::new(&[Plus, Minus]);
    pub const TERM_OPS: TokenSet = TokenSet::new(&[Star, Slash, DoubleSlash, Percent, At]);
    pub const UNARY_OPS: TokenSet = TokenSet::new(&[Plus, Minus, Tilde]);

    /// Tokens that end a simple statement.
    pub const STMT_END: TokenSet = TokenSet::new(&[Newline, Semicolon, Dedent]);

    /// Tokens that can never continue an expression list.
    pub const EXPR_LIST_END: TokenSet = TokenSet::new(&[
        ParenClose,
        BracketClose,
        BraceClose,
        Newline,
        Semicolon,
        Equals,
        Colon,
    ]);

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, LineBreak, Comment, LineContinuation]);
}
