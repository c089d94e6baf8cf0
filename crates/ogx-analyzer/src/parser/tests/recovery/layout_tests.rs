use crate::parser::tests::dump_errors;
use indoc::indoc;

#[test]
fn unexpected_indent() {
    let input = indoc! {r#"
    x = 1
      y = 2
    "#};

    insta::assert_snapshot!(dump_errors(input), @"error at 8..8: unexpected indent");
}

#[test]
fn missing_indented_block() {
    let input = indoc! {r#"
    if x:
    pass
    "#};

    insta::assert_snapshot!(dump_errors(input), @"error at 6..10: expected an indented block");
}

#[test]
fn block_missing_at_end_of_input() {
    insta::assert_snapshot!(dump_errors("def f():\n"), @"error at 9..9: expected an indented block");
}

#[test]
fn misaligned_dedent_reported_once() {
    let input = indoc! {r#"
    if a:
        x
      y
    "#};

    insta::assert_snapshot!(
        dump_errors(input),
        @"error at 14..14: unindent does not match any outer indentation level"
    );
}
