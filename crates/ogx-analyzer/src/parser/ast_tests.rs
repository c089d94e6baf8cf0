use indoc::indoc;

use crate::parser::ast::{CompClause, Expr, ParamKind, Root, Stmt};
use crate::parser::parse;

fn root(source: &str) -> Root {
    let (parse, diagnostics) = parse(source);
    assert!(!diagnostics.has_errors(), "{}", diagnostics.printer().render());
    parse.root()
}

fn first_stmt(source: &str) -> Stmt {
    root(source).statements().next().expect("one statement")
}

fn text(expr: &Expr) -> String {
    expr.as_cst().text().to_string()
}

#[test]
fn function_parts() {
    let input = indoc! {r#"
    @cache
    async def f(self, *args, k: int = 1, **kw) -> str:
        pass
    "#};

    let Stmt::FuncDef(f) = first_stmt(input) else {
        panic!("expected a function");
    };
    assert!(f.is_async());
    assert_eq!(f.name().map(|t| t.text().to_string()), Some("f".into()));
    assert_eq!(f.decorators().count(), 1);
    assert_eq!(f.return_type().map(|e| text(&e)), Some("str".into()));

    let params = f.params().expect("params");
    let kinds: Vec<_> = params.params().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        [ParamKind::Plain, ParamKind::VarArgs, ParamKind::Plain, ParamKind::KwArgs]
    );
    let k = params.params().nth(2).expect("k");
    assert_eq!(k.annotation().map(|e| text(&e)), Some("int".into()));
    assert_eq!(k.default().map(|e| text(&e)), Some("1".into()));
    assert_eq!(
        params.first_positional().and_then(|p| p.name()).map(|t| t.text().to_string()),
        Some("self".into())
    );
}

#[test]
fn keyword_only_marker_is_not_positional() {
    let Stmt::FuncDef(f) = first_stmt("def f(*, a): pass\n") else {
        panic!("expected a function");
    };
    let params = f.params().expect("params");
    assert_eq!(params.params().next().map(|p| p.kind()), Some(ParamKind::Marker));
    assert!(params.first_positional().is_none());
}

#[test]
fn class_arguments() {
    let Stmt::ClassDef(c) = first_stmt("class A(B, metaclass=M): pass\n") else {
        panic!("expected a class");
    };
    let args: Vec<_> = c.args().expect("args").args().collect();
    assert_eq!(args.len(), 2);
    assert!(args[0].keyword().is_none());
    assert_eq!(args[1].keyword().map(|t| t.text().to_string()), Some("metaclass".into()));
    assert_eq!(args[1].value().map(|e| text(&e)), Some("M".into()));
}

#[test]
fn chained_assignment_targets() {
    let Stmt::Assign(a) = first_stmt("a = b.c = f()\n") else {
        panic!("expected an assignment");
    };
    let targets: Vec<_> = a.targets().iter().map(text).collect();
    assert_eq!(targets, ["a", "b.c"]);
    assert_eq!(a.value().map(|e| text(&e)), Some("f()".into()));
}

#[test]
fn annotated_assignment_without_value() {
    let Stmt::AnnAssign(a) = first_stmt("x: List[int]\n") else {
        panic!("expected an annotated assignment");
    };
    assert_eq!(a.target().map(|e| text(&e)), Some("x".into()));
    assert_eq!(a.annotation().map(|e| text(&e)), Some("List[int]".into()));
    assert!(a.value().is_none());
}

#[test]
fn import_bound_names() {
    let input = indoc! {r#"
    import os.path, numpy as np
    from . import a as b, c
    "#};

    let names: Vec<String> = root(input)
        .statements()
        .flat_map(|stmt| match stmt {
            Stmt::Import(i) => i.aliases().collect::<Vec<_>>(),
            Stmt::FromImport(i) => i.aliases().collect(),
            _ => Vec::new(),
        })
        .filter_map(|alias| alias.bound_name())
        .map(|t| t.text().to_string())
        .collect();
    assert_eq!(names, ["os", "np", "b", "c"]);
}

#[test]
fn star_import() {
    let Stmt::FromImport(i) = first_stmt("from m import *\n") else {
        panic!("expected an import");
    };
    assert!(i.is_star());
    assert_eq!(i.aliases().count(), 0);
}

#[test]
fn for_and_with_parts() {
    let input = indoc! {r#"
    for i, x in enumerate(xs):
        with open(x) as fh, lock:
            pass
    "#};

    let Stmt::For(f) = first_stmt(input) else {
        panic!("expected a for loop");
    };
    assert_eq!(f.target().map(|e| text(&e)), Some("i, x".into()));
    assert_eq!(f.iter().map(|e| text(&e)), Some("enumerate(xs)".into()));

    let Some(Stmt::With(w)) = f.body().and_then(|b| b.statements().next()) else {
        panic!("expected a with block");
    };
    let items: Vec<_> = w.items().collect();
    assert_eq!(items[0].context().map(|e| text(&e)), Some("open(x)".into()));
    assert_eq!(items[0].target().map(|e| text(&e)), Some("fh".into()));
    assert!(items[1].target().is_none());
}

#[test]
fn except_clause_name() {
    let input = indoc! {r#"
    try:
        pass
    except (A, B) as e:
        pass
    except:
        pass
    "#};

    let Stmt::Try(t) = first_stmt(input) else {
        panic!("expected a try");
    };
    let handlers: Vec<_> = t.handlers().collect();
    assert_eq!(handlers[0].name().map(|t| t.text().to_string()), Some("e".into()));
    assert_eq!(handlers[0].exception_type().map(|e| text(&e)), Some("(A, B)".into()));
    assert!(handlers[1].name().is_none());
    assert!(handlers[1].exception_type().is_none());
}

#[test]
fn dict_comprehension_parts() {
    let Stmt::Expr(e) = first_stmt("{k: v for k, v in d.items() if v}\n") else {
        panic!("expected an expression");
    };
    let Some(Expr::Comprehension(c)) = e.expr() else {
        panic!("expected a comprehension");
    };
    let elements: Vec<_> = c.elements().iter().map(text).collect();
    assert_eq!(elements, ["k", "v"]);

    let clauses: Vec<_> = c.clauses().collect();
    let CompClause::For(first) = &clauses[0] else {
        panic!("expected a for clause");
    };
    assert_eq!(first.target().map(|e| text(&e)), Some("k, v".into()));
    assert_eq!(first.iter().map(|e| text(&e)), Some("d.items()".into()));
    assert!(matches!(clauses[1], CompClause::If(_)));
}

#[test]
fn lambda_and_walrus() {
    let Stmt::Assign(a) = first_stmt("f = lambda x=(y := 1): x\n") else {
        panic!("expected an assignment");
    };
    let Some(Expr::Lambda(l)) = a.value() else {
        panic!("expected a lambda");
    };
    assert_eq!(l.body().map(|e| text(&e)), Some("x".into()));

    let default = l.params().and_then(|p| p.params().next()).and_then(|p| p.default());
    let Some(Expr::Paren(paren)) = default else {
        panic!("expected a parenthesized default");
    };
    let Some(Expr::Named(named)) = paren.inner() else {
        panic!("expected a walrus");
    };
    assert_eq!(named.name().map(|t| t.text().to_string()), Some("y".into()));
    assert_eq!(named.value().map(|e| text(&e)), Some("1".into()));
}

#[test]
fn global_names() {
    let Stmt::Global(g) = first_stmt("global a, b\n") else {
        panic!("expected a global statement");
    };
    let names: Vec<_> = g.names().map(|t| t.text().to_string()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn simple_statements_are_other() {
    for source in ["pass\n", "del x\n", "assert x, 'm'\n", "raise E from e\n"] {
        assert!(matches!(first_stmt(source), Stmt::Other(_)), "{source}");
    }
}
