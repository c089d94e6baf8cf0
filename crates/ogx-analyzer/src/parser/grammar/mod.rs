//! Grammar productions for the source language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Statements follow the usual layout-driven structure: a compound statement
//! owns a `Block` that is either a same-line list of simple statements or
//! `Newline Indent stmt+ Dedent`.

mod atoms;
mod compound;
mod expressions;
mod params;
mod statements;
