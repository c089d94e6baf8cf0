use crate::parser::tests::dump_cst;

#[test]
fn trailers() {
    insta::assert_snapshot!(dump_cst("a.b(c)[0]\n"), @r#"
    Root
      ExprStmt
        SubscriptExpr
          CallExpr
            AttributeExpr
              NameExpr
                Id "a"
              Dot "."
              Id "b"
            ArgList
              ParenOpen "("
              Arg
                NameExpr
                  Id "c"
              ParenClose ")"
          BracketOpen "["
          LiteralExpr
            Number "0"
          BracketClose "]"
      Newline "\n"
    "#);
}

#[test]
fn precedence() {
    insta::assert_snapshot!(dump_cst("a + b * -c ** 2\n"), @r#"
    Root
      ExprStmt
        BinExpr
          NameExpr
            Id "a"
          Plus "+"
          BinExpr
            NameExpr
              Id "b"
            Star "*"
            UnaryExpr
              Minus "-"
              BinExpr
                NameExpr
                  Id "c"
                DoubleStar "**"
                LiteralExpr
                  Number "2"
      Newline "\n"
    "#);
}

#[test]
fn comparisons_and_boolean_operators() {
    insta::assert_snapshot!(dump_cst("not a in b and c is not None\n"), @r#"
    Root
      ExprStmt
        BoolExpr
          UnaryExpr
            KwNot "not"
            CompareExpr
              NameExpr
                Id "a"
              KwIn "in"
              NameExpr
                Id "b"
          KwAnd "and"
          CompareExpr
            NameExpr
              Id "c"
            KwIs "is"
            KwNot "not"
            LiteralExpr
              KwNone "None"
      Newline "\n"
    "#);
}

#[test]
fn conditional_expression() {
    insta::assert_snapshot!(dump_cst("a if b else c\n"), @r#"
    Root
      ExprStmt
        CondExpr
          NameExpr
            Id "a"
          KwIf "if"
          NameExpr
            Id "b"
          KwElse "else"
          NameExpr
            Id "c"
      Newline "\n"
    "#);
}

#[test]
fn lambda_with_star_params() {
    insta::assert_snapshot!(dump_cst("f = lambda x, *a, **k: x\n"), @r#"
    Root
      AssignStmt
        NameExpr
          Id "f"
        Equals "="
        LambdaExpr
          KwLambda "lambda"
          ParamList
            Param
              Id "x"
            Comma ","
            Param
              Star "*"
              Id "a"
            Comma ","
            Param
              DoubleStar "**"
              Id "k"
          Colon ":"
          NameExpr
            Id "x"
      Newline "\n"
    "#);
}

#[test]
fn list_comprehension() {
    insta::assert_snapshot!(dump_cst("[x for x in xs if x]\n"), @r#"
    Root
      ExprStmt
        ListComp
          BracketOpen "["
          NameExpr
            Id "x"
          CompFor
            KwFor "for"
            NameExpr
              Id "x"
            KwIn "in"
            NameExpr
              Id "xs"
          CompIf
            KwIf "if"
            NameExpr
              Id "x"
          BracketClose "]"
      Newline "\n"
    "#);
}

#[test]
fn dict_comprehension() {
    insta::assert_snapshot!(dump_cst("{k: v for k, v in d}\n"), @r#"
    Root
      ExprStmt
        DictComp
          BraceOpen "{"
          DictEntry
            NameExpr
              Id "k"
            Colon ":"
            NameExpr
              Id "v"
          CompFor
            KwFor "for"
            TupleExpr
              NameExpr
                Id "k"
              Comma ","
              NameExpr
                Id "v"
            KwIn "in"
            NameExpr
              Id "d"
          BraceClose "}"
      Newline "\n"
    "#);
}

#[test]
fn displays() {
    insta::assert_snapshot!(dump_cst("(), (1,), [], {1}, {}\n"), @r#"
    Root
      ExprStmt
        TupleExpr
          TupleExpr
            ParenOpen "("
            ParenClose ")"
          Comma ","
          TupleExpr
            ParenOpen "("
            LiteralExpr
              Number "1"
            Comma ","
            ParenClose ")"
          Comma ","
          ListExpr
            BracketOpen "["
            BracketClose "]"
          Comma ","
          SetExpr
            BraceOpen "{"
            LiteralExpr
              Number "1"
            BraceClose "}"
          Comma ","
          DictExpr
            BraceOpen "{"
            BraceClose "}"
      Newline "\n"
    "#);
}

#[test]
fn call_arguments() {
    insta::assert_snapshot!(dump_cst("f(a, k=1, *r, **kw)\n"), @r#"
    Root
      ExprStmt
        CallExpr
          NameExpr
            Id "f"
          ArgList
            ParenOpen "("
            Arg
              NameExpr
                Id "a"
            Comma ","
            Arg
              Id "k"
              Equals "="
              LiteralExpr
                Number "1"
            Comma ","
            Arg
              Star "*"
              NameExpr
                Id "r"
            Comma ","
            Arg
              DoubleStar "**"
              NameExpr
                Id "kw"
            ParenClose ")"
      Newline "\n"
    "#);
}

#[test]
fn bare_generator_argument() {
    insta::assert_snapshot!(dump_cst("sum(x for x in xs)\n"), @r#"
    Root
      ExprStmt
        CallExpr
          NameExpr
            Id "sum"
          ArgList
            ParenOpen "("
            Arg
              GeneratorExpr
                NameExpr
                  Id "x"
                CompFor
                  KwFor "for"
                  NameExpr
                    Id "x"
                  KwIn "in"
                  NameExpr
                    Id "xs"
            ParenClose ")"
      Newline "\n"
    "#);
}

#[test]
fn slices() {
    insta::assert_snapshot!(dump_cst("a[1:, ::2]\n"), @r#"
    Root
      ExprStmt
        SubscriptExpr
          NameExpr
            Id "a"
          BracketOpen "["
          TupleExpr
            SliceExpr
              LiteralExpr
                Number "1"
              Colon ":"
            Comma ","
            SliceExpr
              Colon ":"
              Colon ":"
              LiteralExpr
                Number "2"
          BracketClose "]"
      Newline "\n"
    "#);
}

#[test]
fn walrus_and_yield() {
    insta::assert_snapshot!(dump_cst("(n := 10)\nx = yield from g\n"), @r#"
    Root
      ExprStmt
        ParenExpr
          ParenOpen "("
          NamedExpr
            Id "n"
            ColonEquals ":="
            LiteralExpr
              Number "10"
          ParenClose ")"
      Newline "\n"
      AssignStmt
        NameExpr
          Id "x"
        Equals "="
        YieldExpr
          KwYield "yield"
          KwFrom "from"
          NameExpr
            Id "g"
      Newline "\n"
    "#);
}

#[test]
fn implicit_string_concatenation() {
    insta::assert_snapshot!(dump_cst("s = 'a' f\"{b}\"\n"), @r#"
    Root
      AssignStmt
        NameExpr
          Id "s"
        Equals "="
        StringExpr
          String "'a'"
          String "f\"{b}\""
      Newline "\n"
    "#);
}

#[test]
fn not_in_between_spaced_operands() {
    insta::assert_snapshot!(dump_cst("x not in y\n"), @r#"
    Root
      ExprStmt
        CompareExpr
          NameExpr
            Id "x"
          KwNot "not"
          KwIn "in"
          NameExpr
            Id "y"
      Newline "\n"
    "#);
}

#[test]
fn keyword_argument_with_spaces() {
    insta::assert_snapshot!(dump_cst("f(a = 1)\n"), @r#"
    Root
      ExprStmt
        CallExpr
          NameExpr
            Id "f"
          ArgList
            ParenOpen "("
            Arg
              Id "a"
              Equals "="
              LiteralExpr
                Number "1"
            ParenClose ")"
      Newline "\n"
    "#);
}
