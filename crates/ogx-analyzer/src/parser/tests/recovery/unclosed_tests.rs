use crate::parser::tests::dump_errors;

#[test]
fn unclosed_paren_at_end_of_line() {
    insta::assert_snapshot!(
        dump_errors("x = (1, 2\n"),
        @"error at 4..10: missing closing `)` (related: `(` opened here at 4..5)"
    );
}

#[test]
fn unclosed_bracket_at_end_of_input() {
    insta::assert_snapshot!(
        dump_errors("[1, 2"),
        @"error at 0..5: missing closing `]` (related: `[` opened here at 0..1)"
    );
}

#[test]
fn unclosed_call() {
    insta::assert_snapshot!(
        dump_errors("f(a\n"),
        @"error at 1..4: missing closing `)` (related: `(` opened here at 1..2)"
    );
}

#[test]
fn unclosed_brace_swallows_next_line() {
    insta::assert_snapshot!(
        dump_errors("d = {1: 2\ny = 3\n"),
        @"error at 4..11: missing closing `}` (related: `{` opened here at 4..5)"
    );
}
