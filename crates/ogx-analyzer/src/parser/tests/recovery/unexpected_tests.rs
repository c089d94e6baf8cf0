use crate::parser::lexer::lex;
use crate::parser::tests::dump_errors;
use crate::parser::{Parser, parse_with_parser};
use indoc::indoc;

#[test]
fn stray_character() {
    insta::assert_snapshot!(dump_errors("x = $\n"), @"error at 4..5: unexpected token: `$`");
}

#[test]
fn unterminated_string() {
    insta::assert_snapshot!(dump_errors("x = 'abc\n"), @"error at 4..8: unterminated string literal");
}

#[test]
fn missing_colon() {
    let input = indoc! {r#"
    if x
        pass
    "#};

    insta::assert_snapshot!(dump_errors(input), @"error at 4..5: expected `:`");
}

#[test]
fn missing_operand() {
    insta::assert_snapshot!(dump_errors("1 +\n"), @"error at 3..4: expected an expression");
}

#[test]
fn clause_without_statement() {
    insta::assert_snapshot!(
        dump_errors("else: pass\n"),
        @"error at 0..4: unexpected token: not a valid statement"
    );
}

#[test]
fn try_without_handler() {
    let input = indoc! {r#"
    try:
        pass
    x = 1
    "#};

    insta::assert_snapshot!(
        dump_errors(input),
        @"error at 14..15: unexpected token: expected `except` or `finally`"
    );
}

#[test]
fn recursion_limit() {
    let source = "x = ((((((1))))))\n";
    let (parse, diagnostics) = parse_with_parser(Parser::new(source, lex(source)).with_recursion_limit(8));

    assert!(diagnostics.has_errors());
    assert!(diagnostics.printer().render().contains("nested too deeply"));
    assert_eq!(parse.syntax().text().to_string(), source);
}
