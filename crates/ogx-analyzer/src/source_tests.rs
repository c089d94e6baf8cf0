use indoc::indoc;
use rowan::TextRange;

use crate::{AnalysisError, Scope, SourceModule};

#[test]
fn valid_source() {
    let module = SourceModule::parse("x = 1\n");
    assert!(module.is_valid());
    assert!(module.diagnostics().is_empty());
    assert_eq!(module.text(), "x = 1\n");
    assert!(matches!(module.module_scope(), Ok(Scope::Module(_))));
}

#[test]
fn invalid_source_refuses_every_query() {
    let module = SourceModule::parse("x = (1\n");
    assert!(!module.is_valid());

    let err = module.module_scope().expect_err("invalid");
    let AnalysisError::Syntax(diagnostics) = &err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(err.line(), None);
    insta::assert_snapshot!(err.to_string(), @"source has 1 syntax error(s)");
    assert!(module.class_at_line(1).is_err());
    assert!(module.with_body_at_line(1).is_err());
}

#[test]
fn with_body_as_function() {
    let input = indoc! {r#"
    with lock:
        total = a + b
    "#};

    let module = SourceModule::parse(input);
    let scope = module.with_body_at_line(1).expect("with body");
    assert!(matches!(scope, Scope::WithBody(_)));
    assert_eq!(scope.line(module.lines()), 1);
    assert_eq!(
        module.bound_values_in_scope(&scope).expect("bound"),
        ["total"]
    );
}

#[test]
fn return_escaping_with_block() {
    let input = indoc! {r#"
    with a:
        return 1
    "#};

    let module = SourceModule::parse(input);
    let err = module.with_body_at_line(1).expect_err("return");
    assert_eq!(
        err,
        AnalysisError::ReturnInWithBlock {
            line: 2,
            range: TextRange::new(8.into(), 21.into()),
        }
    );
}

#[test]
fn yield_escaping_with_block() {
    let input = indoc! {r#"
    def gen():
        with a:
            x = 1
            yield x
    "#};

    let module = SourceModule::parse(input);
    let err = module.with_body_at_line(2).expect_err("yield");
    assert!(matches!(err, AnalysisError::YieldInWithBlock { line: 4, .. }));
    insta::assert_snapshot!(
        err.to_string(),
        @"`yield` expression not supported in a with block (line 4)"
    );
}

#[test]
fn nested_function_in_with_block_may_return() {
    let input = indoc! {r#"
    with a:
        def f():
            return 1
    "#};

    let module = SourceModule::parse(input);
    assert!(module.with_body_at_line(1).is_ok());
}

#[test]
fn scope_lines_use_the_keyword() {
    let input = indoc! {r#"
    @deco
    def f():
        pass
    "#};

    let module = SourceModule::parse(input);
    let scope = module.function_or_lambda_at_line(1).expect("function");
    assert_eq!(scope.line(module.lines()), 2);
}
