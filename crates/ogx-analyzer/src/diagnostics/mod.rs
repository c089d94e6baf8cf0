//! Parse diagnostics.
//!
//! Every parse diagnostic is an error: a source that produced any of them
//! cannot be analyzed, and [`Diagnostics::filtered`] trims the cascade before
//! the set is shown to a user.

mod kind;
mod printer;


use std::collections::BTreeMap;

use rowan::{TextRange, TextSize};

pub use kind::{Diagnostic, DiagnosticKind, Note};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

/// Pending diagnostic; nothing is recorded until [`emit`](Self::emit).
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Diagnostics,
    diagnostic: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: self,
            diagnostic: Diagnostic::new(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.items.len()
    }

    /// Earliest error in the source.
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.items.iter().min_by_key(|d| d.range.start())
    }

    /// Keeps, for every start position, only the most fundamental kinds reported there.
    pub fn filtered(&self) -> Diagnostics {
        let mut strongest: BTreeMap<TextSize, DiagnosticKind> = BTreeMap::new();
        for d in &self.items {
            strongest
                .entry(d.range.start())
                .and_modify(|k| {
                    if d.kind.suppresses(*k) {
                        *k = d.kind;
                    }
                })
                .or_insert(d.kind);
        }
        let items = self
            .items
            .iter()
            .filter(|d| strongest.get(&d.range.start()) == Some(&d.kind))
            .cloned()
            .collect();
        Diagnostics { items }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl DiagnosticBuilder<'_> {
    /// Appends detail to the kind's description.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        self.diagnostic.message = self.diagnostic.kind.with_detail(&detail.into());
        self
    }

    pub fn related_to(mut self, text: impl Into<String>, range: TextRange) -> Self {
        self.diagnostic.notes.push(Note {
            range,
            text: text.into(),
        });
        self
    }

    pub fn emit(self) {
        self.sink.items.push(self.diagnostic);
    }
}
