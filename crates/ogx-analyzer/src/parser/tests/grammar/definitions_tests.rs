use crate::parser::tests::dump_cst;
use indoc::indoc;

#[test]
fn function_with_default() {
    let input = indoc! {r#"
    def f(a, b=1):
        return a
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      FuncDef
        KwDef "def"
        Id "f"
        ParamList
          ParenOpen "("
          Param
            Id "a"
          Comma ","
          Param
            Id "b"
            Equals "="
            LiteralExpr
              Number "1"
          ParenClose ")"
        Colon ":"
        Block
          Newline "\n"
          Indent
          ReturnStmt
            KwReturn "return"
            NameExpr
              Id "a"
          Newline "\n"
          Dedent
    "#);
}

#[test]
fn async_function_with_annotations() {
    let input = indoc! {r#"
    async def f(a: int, *, b=1) -> str:
        return a
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      FuncDef
        KwAsync "async"
        KwDef "def"
        Id "f"
        ParamList
          ParenOpen "("
          Param
            Id "a"
            Colon ":"
            NameExpr
              Id "int"
          Comma ","
          Param
            Star "*"
          Comma ","
          Param
            Id "b"
            Equals "="
            LiteralExpr
              Number "1"
          ParenClose ")"
        ReturnType
          Arrow "->"
          NameExpr
            Id "str"
        Colon ":"
        Block
          Newline "\n"
          Indent
          ReturnStmt
            KwReturn "return"
            NameExpr
              Id "a"
          Newline "\n"
          Dedent
    "#);
}

#[test]
fn decorated_class_with_keyword_base() {
    let input = indoc! {r#"
    @dataclass
    class A(B, metaclass=M):
        x: int = 0
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      ClassDef
        Decorator
          At "@"
          NameExpr
            Id "dataclass"
          Newline "\n"
        KwClass "class"
        Id "A"
        ArgList
          ParenOpen "("
          Arg
            NameExpr
              Id "B"
          Comma ","
          Arg
            Id "metaclass"
            Equals "="
            NameExpr
              Id "M"
          ParenClose ")"
        Colon ":"
        Block
          Newline "\n"
          Indent
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
          Dedent
    "#);
}

#[test]
fn method_closes_two_levels() {
    let input = indoc! {r#"
    class C:
        def m(self):
            pass
    x = 1
    "#};

    insta::assert_snapshot!(dump_cst(input), @r#"
    Root
      ClassDef
        KwClass "class"
        Id "C"
        Colon ":"
        Block
          Newline "\n"
          Indent
          FuncDef
            KwDef "def"
            Id "m"
            ParamList
              ParenOpen "("
              Param
                Id "self"
              ParenClose ")"
            Colon ":"
            Block
              Newline "\n"
              Indent
              PassStmt
                KwPass "pass"
              Newline "\n"
              Dedent
          Dedent
      AssignStmt
        NameExpr
          Id "x"
        Equals "="
        LiteralExpr
          Number "1"
      Newline "\n"
    "#);
}
