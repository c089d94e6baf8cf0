//! Instance data members declared by a class's `__init__`.

use indexmap::IndexSet;

use crate::error::{AnalysisError, AnalysisResult};
use crate::line_index::LineIndex;
use crate::parser::ast::{AssignStmt, ClassDef, Expr, FuncDef, Stmt};
use crate::parser::cst::SyntaxKind;

/// Names `X` assigned as `self.X = ...` in the last `__init__` of the class
/// body, in first-assignment order. A class without `__init__` has none.
///
/// Nested functions and classes in `__init__` could rebind `self`, so they
/// are rejected, as is an `__init__` without a first positional parameter.
pub fn data_members(class: &ClassDef, lines: &LineIndex) -> AnalysisResult<Vec<String>> {
    let Some(init) = last_init(class) else {
        return Ok(Vec::new());
    };

    if let Some(body) = init.body()
        && let Some(nested) = body
            .as_cst()
            .descendants()
            .find(|n| matches!(n.kind(), SyntaxKind::FuncDef | SyntaxKind::ClassDef))
    {
        let range = nested.text_range();
        return Err(AnalysisError::NestedDefinitionInInit {
            line: lines.line(range.start()),
            range,
        });
    }

    let Some(self_name) = init
        .params()
        .and_then(|p| p.first_positional())
        .and_then(|p| p.name())
    else {
        let range = init.as_cst().text_range();
        let line = init
            .def_token()
            .map(|t| lines.line(t.text_range().start()))
            .unwrap_or_else(|| lines.line(range.start()));
        return Err(AnalysisError::MissingSelfInInit { line, range });
    };

    let mut members = IndexSet::new();
    if let Some(body) = init.body() {
        for assign in body.as_cst().descendants().filter_map(AssignStmt::cast) {
            for target in assign.targets() {
                collect_self_attributes(&target, self_name.text(), &mut members);
            }
        }
    }
    Ok(members.into_iter().collect())
}

fn last_init(class: &ClassDef) -> Option<FuncDef> {
    class
        .body()?
        .statements()
        .filter_map(|stmt| match stmt {
            Stmt::FuncDef(f) => Some(f),
            _ => None,
        })
        .filter(|f| f.name().is_some_and(|n| n.text() == "__init__"))
        .last()
}

fn collect_self_attributes(target: &Expr, self_name: &str, out: &mut IndexSet<String>) {
    match target {
        Expr::Attribute(a) => {
            let is_self = matches!(
                a.object(),
                Some(Expr::Name(n)) if n.name().is_some_and(|t| t.text() == self_name)
            );
            if is_self && let Some(attr) = a.attr() {
                out.insert(attr.text().to_string());
            }
        }
        Expr::Paren(p) => {
            if let Some(inner) = p.inner() {
                collect_self_attributes(&inner, self_name, out);
            }
        }
        Expr::Starred(s) => {
            if let Some(value) = s.value() {
                collect_self_attributes(&value, self_name, out);
            }
        }
        // `self.x[i] = v` still stores into `self.x`
        Expr::Other(node) if node.kind() == SyntaxKind::SubscriptExpr => {
            if let Some(object) = node.children().find_map(Expr::cast) {
                collect_self_attributes(&object, self_name, out);
            }
        }
        Expr::Other(node)
            if matches!(node.kind(), SyntaxKind::TupleExpr | SyntaxKind::ListExpr) =>
        {
            for child in node.children().filter_map(Expr::cast) {
                collect_self_attributes(&child, self_name, out);
            }
        }
        _ => {}
    }
}
