//! Rendering diagnostics for people.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::{Diagnostic, Diagnostics};

/// Renders diagnostics as annotated source snippets, or as one line each
/// when no source text is attached.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(self, source: &'s str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    pub fn path(self, path: &'s str) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }

    pub fn colored(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // a String sink never fails
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.source {
                Some(source) => {
                    let report = [self.group(diagnostic, source)];
                    write!(w, "{}", renderer.render(&report))?;
                }
                None => write!(w, "{diagnostic}")?,
            }
        }
        Ok(())
    }

    fn group<'a>(&self, diagnostic: &'a Diagnostic, source: &'a str) -> Group<'a>
    where
        's: 'a,
    {
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(visible(diagnostic.range, source.len()))
                .label(&diagnostic.message),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for note in diagnostic.notes() {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(visible(note.range, source.len()))
                    .label(&note.text),
            );
        }
        Level::ERROR.primary_title(&diagnostic.message).element(snippet)
    }
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

/// Byte range to underline; an empty range still gets one caret.
fn visible(range: TextRange, len: usize) -> Range<usize> {
    let range: Range<usize> = range.into();
    if range.is_empty() {
        range.start..(range.start + 1).min(len)
    } else {
        range
    }
}
