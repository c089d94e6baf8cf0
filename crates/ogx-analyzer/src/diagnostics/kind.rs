use std::fmt;

use rowan::TextRange;

/// What went wrong while parsing.
///
/// Variants are declared from most to least fundamental. At a given source
/// position only the most fundamental report survives [`Diagnostics::filtered`],
/// since an unclosed bracket explains every error that follows it.
///
/// [`Diagnostics::filtered`]: super::Diagnostics::filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    UnclosedParen,
    UnclosedBracket,
    UnclosedBrace,
    UnterminatedString,

    UnexpectedIndent,
    InconsistentDedent,
    ExpectedIndentedBlock,

    ExpectedExpression,
    ExpectedName,
    ExpectedColon,
    ExpectedNewline,

    UnexpectedToken,
}

impl DiagnosticKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::UnclosedParen => "missing closing `)`",
            Self::UnclosedBracket => "missing closing `]`",
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnterminatedString => "unterminated string literal",
            Self::UnexpectedIndent => "unexpected indent",
            Self::InconsistentDedent => "unindent does not match any outer indentation level",
            Self::ExpectedIndentedBlock => "expected an indented block",
            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedName => "expected a name",
            Self::ExpectedColon => "expected `:`",
            Self::ExpectedNewline => "expected end of line",
            Self::UnexpectedToken => "unexpected token",
        }
    }

    /// Description followed by caller-provided detail.
    pub fn with_detail(self, detail: &str) -> String {
        let separator = match self {
            Self::UnclosedParen | Self::UnclosedBracket | Self::UnclosedBrace => ';',
            _ => ':',
        };
        format!("{}{separator} {detail}", self.describe())
    }

    /// Whether a report of this kind hides a report of `other` at the same position.
    pub fn suppresses(self, other: DiagnosticKind) -> bool {
        self < other
    }
}

/// Secondary span shown next to a diagnostic, such as where a bracket was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub(crate) range: TextRange,
    pub(crate) text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) notes: Vec<Note>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.describe().to_owned(),
            notes: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = |r: TextRange| (u32::from(r.start()), u32::from(r.end()));
        let (start, end) = span(self.range);
        write!(f, "error at {start}..{end}: {}", self.message)?;
        for note in &self.notes {
            let (start, end) = span(note.range);
            write!(f, " (related: {} at {start}..{end})", note.text)?;
        }
        Ok(())
    }
}
