mod grammar;
mod recovery;

use crate::parser::{CstPrinter, parse};

/// CST of source that must parse cleanly.
fn dump_cst(source: &str) -> String {
    let (parse, diagnostics) = parse(source);
    assert!(
        !diagnostics.has_errors(),
        "unexpected errors:\n{}",
        diagnostics.printer().render()
    );
    CstPrinter::new(&parse.syntax()).dump()
}

fn dump_cst_with_trivia(source: &str) -> String {
    let (parse, _) = parse(source);
    CstPrinter::new(&parse.syntax()).with_trivia(true).dump()
}

/// Diagnostics of source that must fail, one per line.
fn dump_errors(source: &str) -> String {
    let (parse, diagnostics) = parse(source);
    assert!(diagnostics.has_errors(), "expected errors");
    assert_eq!(parse.syntax().text().to_string(), source, "tree must be lossless");
    diagnostics.printer().render()
}
