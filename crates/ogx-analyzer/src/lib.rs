#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Source analysis for OGX code records.
//!
//! Functions, classes and with blocks travel as source text plus a line
//! number. This crate parses that text and answers the questions the walker
//! and rehydrator ask about it:
//!
//! - which definition sits at a given line
//! - which member access chains a scope reads without binding
//! - which names a scope binds
//! - whether a with block lets `return` or `yield` escape
//! - which data members an `__init__` assigns on `self`
//!
//! The parser is resilient and lossless: it always yields a CST, and errors
//! are collected in [`Diagnostics`]. The analyses refuse trees with errors.

pub mod analysis;
pub mod diagnostics;
mod error;
mod line_index;
pub mod parser;
mod source;

#[cfg(test)]
mod line_index_tests;
#[cfg(test)]
mod source_tests;

pub use analysis::Scope;
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use error::{AnalysisError, AnalysisResult, DefinitionKind};
pub use line_index::LineIndex;
pub use source::SourceModule;
