use indoc::indoc;

use super::cst::SyntaxKind;
use super::lexer::{Token, indent_width, lex, lex_raw, token_text};

fn format_tokens(source: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let text = token_text(source, token);
        if text.is_empty() {
            out.push_str(&format!("{:?}\n", token.kind));
        } else {
            out.push_str(&format!("{:?} {:?}\n", token.kind, text));
        }
    }
    out
}

fn dump(source: &str) -> String {
    format_tokens(source, &lex(source))
}

fn kinds(source: &str) -> Vec<SyntaxKind> {
    lex(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn indented_block() {
    insta::assert_snapshot!(dump("if x:\n    y\n"), @r#"
    KwIf "if"
    Whitespace " "
    Id "x"
    Colon ":"
    Newline "\n"
    Whitespace "    "
    Indent
    Id "y"
    Newline "\n"
    Dedent
    "#);
}

#[test]
fn keywords_need_word_boundary() {
    assert_eq!(kinds("iffy"), vec![SyntaxKind::Id, SyntaxKind::Newline]);
    assert_eq!(kinds("not_in"), vec![SyntaxKind::Id, SyntaxKind::Newline]);
}

#[test]
fn numbers() {
    insta::assert_snapshot!(dump("0x1F 1.5e3 .5j 10L 1_000"), @r#"
    Number "0x1F"
    Whitespace " "
    Number "1.5e3"
    Whitespace " "
    Number ".5j"
    Whitespace " "
    Number "10L"
    Whitespace " "
    Number "1_000"
    Newline
    "#);
}

#[test]
fn string_forms() {
    let source = r#"'a\'b' rb"x" f'{y}' """multi
line""""#;
    insta::assert_snapshot!(dump(source), @r#"
    String "'a\\'b'"
    Whitespace " "
    String "rb\"x\""
    Whitespace " "
    String "f'{y}'"
    Whitespace " "
    String "\"\"\"multi\nline\"\"\""
    Newline
    "#);
}

#[test]
fn unterminated_string_is_garbage() {
    assert_eq!(
        kinds("'abc\n"),
        vec![SyntaxKind::Garbage, SyntaxKind::Newline]
    );
}

#[test]
fn error_characters_are_coalesced() {
    let source = "x $$ y";
    insta::assert_snapshot!(format_tokens(source, &lex_raw(source)), @r#"
    Id "x"
    Whitespace " "
    Garbage "$$"
    Whitespace " "
    Id "y"
    "#);
}

#[test]
fn newlines_inside_brackets_are_trivia() {
    insta::assert_snapshot!(dump("(\n  1)\n"), @r#"
    ParenOpen "("
    LineBreak "\n"
    Whitespace "  "
    Number "1"
    ParenClose ")"
    Newline "\n"
    "#);
}

#[test]
fn blank_lines_and_comments_do_not_end_statements() {
    let source = indoc! {r#"

    # note
    x
    "#};
    insta::assert_snapshot!(dump(source), @r##"
    LineBreak "\n"
    Comment "# note"
    LineBreak "\n"
    Id "x"
    Newline "\n"
    "##);
}

#[test]
fn dedent_closes_every_level() {
    let source = indoc! {r#"
    a
        b
            c
    d
    "#};
    assert_eq!(
        kinds(source)
            .into_iter()
            .filter(|k| !k.is_trivia())
            .collect::<Vec<_>>(),
        vec![
            SyntaxKind::Id,
            SyntaxKind::Newline,
            SyntaxKind::Indent,
            SyntaxKind::Id,
            SyntaxKind::Newline,
            SyntaxKind::Indent,
            SyntaxKind::Id,
            SyntaxKind::Newline,
            SyntaxKind::Dedent,
            SyntaxKind::Dedent,
            SyntaxKind::Id,
            SyntaxKind::Newline,
        ]
    );
}

#[test]
fn end_of_input_closes_open_blocks() {
    let kinds = kinds("if a:\n    b");
    assert_eq!(
        kinds[kinds.len() - 2..],
        [SyntaxKind::Newline, SyntaxKind::Dedent]
    );
}

#[test]
fn misaligned_dedent_marks_garbage() {
    let source = "if a:\n    b\n  c\n";
    let tokens = lex(source);
    let garbage = tokens
        .iter()
        .find(|t| t.kind == SyntaxKind::Garbage)
        .map(|t| t.span);
    assert_eq!(garbage, Some(rowan::TextRange::empty(14.into())));
}

#[test]
fn tab_stops() {
    assert_eq!(indent_width(""), 0);
    assert_eq!(indent_width("    "), 4);
    assert_eq!(indent_width("\t"), 8);
    assert_eq!(indent_width("  \t"), 8);
    assert_eq!(indent_width("\t "), 9);
}
