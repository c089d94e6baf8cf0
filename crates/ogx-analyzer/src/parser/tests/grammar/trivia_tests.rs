use crate::parser::tests::{dump_cst, dump_cst_with_trivia};
use indoc::indoc;

#[test]
fn trailing_comment_stays_on_its_line() {
    insta::assert_snapshot!(dump_cst_with_trivia("x = 1  # c\n"), @r##"
    Root
      AssignStmt
        NameExpr
          Id "x"
        Whitespace " "
        Equals "="
        Whitespace " "
        LiteralExpr
          Number "1"
      Whitespace "  "
      Comment "# c"
      Newline "\n"
    "##);
}

#[test]
fn leading_comment_and_blank_line() {
    insta::assert_snapshot!(dump_cst_with_trivia("# head\n\nx = 1\n"), @r##"
    Root
      Comment "# head"
      LineBreak "\n"
      LineBreak "\n"
      AssignStmt
        NameExpr
          Id "x"
        Whitespace " "
        Equals "="
        Whitespace " "
        LiteralExpr
          Number "1"
      Newline "\n"
    "##);
}

#[test]
fn line_continuation() {
    insta::assert_snapshot!(dump_cst_with_trivia("x = 1 + \\\n    2\n"), @r#"
    Root
      AssignStmt
        NameExpr
          Id "x"
        Whitespace " "
        Equals "="
        Whitespace " "
        BinExpr
          LiteralExpr
            Number "1"
          Whitespace " "
          Plus "+"
          Whitespace " "
          LineContinuation "\\\n"
          Whitespace "    "
          LiteralExpr
            Number "2"
      Newline "\n"
    "#);
}

#[test]
fn newlines_inside_brackets_are_not_statements() {
    let input = indoc! {r#"
    f(
        1,
    )
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      ExprStmt
        CallExpr
          NameExpr
            Id "f"
          ArgList
            ParenOpen "("
            Arg
              LiteralExpr
                Number "1"
            Comma ","
            ParenClose ")"
      Newline "\n"
    "#);
}

#[test]
fn comment_before_dedent_belongs_to_block() {
    let input = indoc! {r#"
    if a:
        pass
    # c
    x
    "#};

    insta::assert_snapshot!(dump_cst_with_trivia(input), @r##"
    Root
      IfStmt
        KwIf "if"
        Whitespace " "
        NameExpr
          Id "a"
        Colon ":"
        Block
          Newline "\n"
          Whitespace "    "
          Indent
          PassStmt
            KwPass "pass"
          Newline "\n"
          Comment "# c"
          LineBreak "\n"
          Dedent
      ExprStmt
        NameExpr
          Id "x"
      Newline "\n"
    "##);
}
