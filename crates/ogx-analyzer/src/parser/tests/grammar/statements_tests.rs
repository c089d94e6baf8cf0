use crate::parser::tests::dump_cst;
use indoc::indoc;

#[test]
fn assignment() {
    insta::assert_snapshot!(dump_cst("x = 1\n"), @r#"
    Root
      AssignStmt
        NameExpr
          Id "x"
        Equals "="
        LiteralExpr
          Number "1"
      Newline "\n"
    "#);
}

#[test]
fn tuple_unpacking_with_star() {
    insta::assert_snapshot!(dump_cst("a, *b = c\n"), @r#"
    Root
      AssignStmt
        TupleExpr
          NameExpr
            Id "a"
          Comma ","
          StarredExpr
            Star "*"
            NameExpr
              Id "b"
        Equals "="
        NameExpr
          Id "c"
      Newline "\n"
    "#);
}

#[test]
fn chained_assignment() {
    insta::assert_snapshot!(dump_cst("a = b = 0\n"), @r#"
    Root
      AssignStmt
        NameExpr
          Id "a"
        Equals "="
        NameExpr
          Id "b"
        Equals "="
        LiteralExpr
          Number "0"
      Newline "\n"
    "#);
}

#[test]
fn augmented_assignment() {
    insta::assert_snapshot!(dump_cst("n += 1\n"), @r#"
    Root
      AugAssignStmt
        NameExpr
          Id "n"
        PlusEquals "+="
        LiteralExpr
          Number "1"
      Newline "\n"
    "#);
}

#[test]
fn annotated_assignment() {
    insta::assert_snapshot!(dump_cst("x: int = 0\n"), @r#"
    Root
      AnnAssignStmt
        NameExpr
          Id "x"
        Colon ":"
        NameExpr
          Id "int"
        Equals "="
        LiteralExpr
          Number "0"
      Newline "\n"
    "#);
}

#[test]
fn semicolon_separated() {
    insta::assert_snapshot!(dump_cst("pass; break\n"), @r#"
    Root
      PassStmt
        KwPass "pass"
      Semicolon ";"
      BreakStmt
        KwBreak "break"
      Newline "\n"
    "#);
}

#[test]
fn imports() {
    let input = indoc! {r#"
    import a.b as c, d
    from ..m import (x as y, z)
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      ImportStmt
        KwImport "import"
        ImportAlias
          DottedName
            Id "a"
            Dot "."
            Id "b"
          KwAs "as"
          Id "c"
        Comma ","
        ImportAlias
          DottedName
            Id "d"
      Newline "\n"
      FromImportStmt
        KwFrom "from"
        Dot "."
        Dot "."
        DottedName
          Id "m"
        KwImport "import"
        ParenOpen "("
        ImportAlias
          Id "x"
          KwAs "as"
          Id "y"
        Comma ","
        ImportAlias
          Id "z"
        ParenClose ")"
      Newline "\n"
    "#);
}

#[test]
fn if_elif_else() {
    let input = indoc! {r#"
    if a:
        pass
    elif b:
        pass
    else:
        pass
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      IfStmt
        KwIf "if"
        NameExpr
          Id "a"
        Colon ":"
        Block
          Newline "\n"
          Indent
          PassStmt
            KwPass "pass"
          Newline "\n"
          Dedent
        ElifClause
          KwElif "elif"
          NameExpr
            Id "b"
          Colon ":"
          Block
            Newline "\n"
            Indent
            PassStmt
              KwPass "pass"
            Newline "\n"
            Dedent
        ElseClause
          KwElse "else"
          Colon ":"
          Block
            Newline "\n"
            Indent
            PassStmt
              KwPass "pass"
            Newline "\n"
            Dedent
    "#);
}

#[test]
fn for_loop_on_one_line() {
    insta::assert_snapshot!(dump_cst("for k, v in items: pass\n"), @r#"
    Root
      ForStmt
        KwFor "for"
        TupleExpr
          NameExpr
            Id "k"
          Comma ","
          NameExpr
            Id "v"
        KwIn "in"
        NameExpr
          Id "items"
        Colon ":"
        Block
          PassStmt
            KwPass "pass"
          Newline "\n"
    "#);
}

#[test]
fn try_except_finally() {
    let input = indoc! {r#"
    try:
        pass
    except E as e:
        pass
    finally:
        pass
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      TryStmt
        KwTry "try"
        Colon ":"
        Block
          Newline "\n"
          Indent
          PassStmt
            KwPass "pass"
          Newline "\n"
          Dedent
        ExceptClause
          KwExcept "except"
          NameExpr
            Id "E"
          KwAs "as"
          Id "e"
          Colon ":"
          Block
            Newline "\n"
            Indent
            PassStmt
              KwPass "pass"
            Newline "\n"
            Dedent
        FinallyClause
          KwFinally "finally"
          Colon ":"
          Block
            Newline "\n"
            Indent
            PassStmt
              KwPass "pass"
            Newline "\n"
            Dedent
    "#);
}

#[test]
fn with_multiple_items() {
    insta::assert_snapshot!(dump_cst("with a as x, b: pass\n"), @r#"
    Root
      WithStmt
        KwWith "with"
        WithItem
          NameExpr
            Id "a"
          KwAs "as"
          NameExpr
            Id "x"
        Comma ","
        WithItem
          NameExpr
            Id "b"
        Colon ":"
        Block
          PassStmt
            KwPass "pass"
          Newline "\n"
    "#);
}

#[test]
fn global_and_del() {
    insta::assert_snapshot!(dump_cst("global a, b\ndel x[0]\n"), @r#"
    Root
      GlobalStmt
        KwGlobal "global"
        Id "a"
        Comma ","
        Id "b"
      Newline "\n"
      DelStmt
        KwDel "del"
        SubscriptExpr
          NameExpr
            Id "x"
          BracketOpen "["
          LiteralExpr
            Number "0"
          BracketClose "]"
      Newline "\n"
    "#);
}

#[test]
fn last_line_without_newline() {
    insta::assert_snapshot!(dump_cst("return"), @r#"
    Root
      ReturnStmt
        KwReturn "return"
      Newline
    "#);
}
