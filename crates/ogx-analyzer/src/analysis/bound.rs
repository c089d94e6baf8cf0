//! Names bound directly in one scope.

use indexmap::IndexSet;

use super::{Scope, walk_in_scope};
use crate::error::{AnalysisError, AnalysisResult};
use crate::line_index::LineIndex;
use crate::parser::ast::{Block, CompClause, Expr, ParamList, Stmt};
use crate::parser::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Variables and def/class names bound in `scope`, in first-binding order.
///
/// Nested scopes are not entered; a nested def or class contributes only its
/// own name. `global` and `nonlocal` are rejected.
pub fn bound_values_in_scope(scope: &Scope, lines: &LineIndex) -> AnalysisResult<IndexSet<String>> {
    let mut collector = BoundCollector {
        lines,
        names: IndexSet::new(),
    };

    match scope {
        Scope::Module(root) => {
            for stmt in root.statements() {
                collector.stmt(&stmt)?;
            }
        }
        Scope::Function(f) => {
            collector.params(f.params());
            collector.block(f.body())?;
        }
        Scope::Lambda(l) => {
            collector.params(l.params());
            if let Some(body) = l.body() {
                collector.walrus(body.as_cst());
            }
        }
        Scope::Class(c) => collector.block(c.body())?,
        Scope::Comprehension(c) => {
            for clause in c.clauses() {
                if let CompClause::For(f) = clause
                    && let Some(target) = f.target()
                {
                    collector.target(&target);
                }
            }
        }
        Scope::WithBody(w) => collector.block(w.body())?,
    }

    Ok(collector.names)
}

struct BoundCollector<'a> {
    lines: &'a LineIndex,
    names: IndexSet<String>,
}

impl BoundCollector<'_> {
    fn bind(&mut self, token: Option<SyntaxToken>) {
        if let Some(token) = token {
            self.names.insert(token.text().to_string());
        }
    }

    fn params(&mut self, params: Option<ParamList>) {
        let Some(params) = params else { return };
        for param in params.params() {
            self.bind(param.name());
        }
    }

    fn block(&mut self, block: Option<Block>) -> AnalysisResult<()> {
        let Some(block) = block else { return Ok(()) };
        for stmt in block.statements() {
            self.stmt(&stmt)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> AnalysisResult<()> {
        match stmt {
            Stmt::FuncDef(f) => self.bind(f.name()),
            Stmt::ClassDef(c) => self.bind(c.name()),
            Stmt::Assign(a) => {
                for target in a.targets() {
                    self.target(&target);
                }
                self.walrus(a.as_cst());
            }
            Stmt::AugAssign(a) => {
                if let Some(target) = a.target() {
                    self.target(&target);
                }
                self.walrus(a.as_cst());
            }
            Stmt::AnnAssign(a) => {
                if let Some(target) = a.target() {
                    self.target(&target);
                }
                self.walrus(a.as_cst());
            }
            Stmt::For(f) => {
                if let Some(target) = f.target() {
                    self.target(&target);
                }
                self.walrus_opt(f.iter());
                self.block(f.body())?;
                self.block(f.else_clause().and_then(|e| e.body()))?;
            }
            Stmt::While(w) => {
                self.walrus_opt(w.condition());
                self.block(w.body())?;
                self.block(w.else_clause().and_then(|e| e.body()))?;
            }
            Stmt::If(i) => {
                self.walrus_opt(i.condition());
                self.block(i.body())?;
                for elif in i.elif_clauses() {
                    self.walrus_opt(elif.condition());
                    self.block(elif.body())?;
                }
                self.block(i.else_clause().and_then(|e| e.body()))?;
            }
            Stmt::Try(t) => {
                self.block(t.body())?;
                for handler in t.handlers() {
                    self.bind(handler.name());
                    self.block(handler.body())?;
                }
                self.block(t.else_clause().and_then(|e| e.body()))?;
                self.block(t.finally_clause().and_then(|f| f.body()))?;
            }
            Stmt::With(w) => {
                for item in w.items() {
                    self.walrus_opt(item.context());
                    if let Some(target) = item.target() {
                        self.target(&target);
                    }
                }
                self.block(w.body())?;
            }
            Stmt::Import(i) => {
                for alias in i.aliases() {
                    self.bind(alias.bound_name());
                }
            }
            Stmt::FromImport(i) => {
                for alias in i.aliases() {
                    self.bind(alias.bound_name());
                }
            }
            Stmt::Global(g) => {
                let range = g.as_cst().text_range();
                return Err(AnalysisError::GlobalStatement {
                    line: self.lines.line(range.start()),
                    range,
                });
            }
            Stmt::Nonlocal(n) => {
                let range = n.as_cst().text_range();
                return Err(AnalysisError::NonlocalStatement {
                    line: self.lines.line(range.start()),
                    range,
                });
            }
            Stmt::Block(b) => self.block(Some(b.clone()))?,
            Stmt::Expr(_) | Stmt::Return(_) | Stmt::Other(_) => self.walrus(stmt.as_cst()),
        }
        Ok(())
    }

    /// Names stored by an assignment target.
    pub(super) fn target(&mut self, target: &Expr) {
        collect_target_names(target, &mut |token| {
            self.names.insert(token.text().to_string());
        });
    }

    fn walrus_opt(&mut self, expr: Option<Expr>) {
        if let Some(expr) = expr {
            self.walrus(expr.as_cst());
        }
    }

    fn walrus(&mut self, node: &SyntaxNode) {
        let mut found = Vec::new();
        let mut visit = |n: &SyntaxNode| {
            if n.kind() == SyntaxKind::NamedExpr {
                found.push(n.clone());
            }
        };
        if node.kind() == SyntaxKind::NamedExpr {
            visit(node);
        }
        walk_in_scope(node, &mut visit);

        for named in found {
            if let Some(Expr::Named(named)) = Expr::cast(named) {
                self.bind(named.name());
            }
        }
    }
}

/// Calls `f` for every name a target expression stores to.
///
/// Only names, possibly nested in tuples, lists, parentheses and starred
/// expressions, are bound. Attribute and subscript targets bind nothing.
pub(crate) fn collect_target_names(target: &Expr, f: &mut impl FnMut(SyntaxToken)) {
    match target {
        Expr::Name(name) => {
            if let Some(token) = name.name() {
                f(token);
            }
        }
        Expr::Paren(paren) => {
            if let Some(inner) = paren.inner() {
                collect_target_names(&inner, f);
            }
        }
        Expr::Starred(starred) => {
            if let Some(value) = starred.value() {
                collect_target_names(&value, f);
            }
        }
        Expr::Other(node)
            if matches!(node.kind(), SyntaxKind::TupleExpr | SyntaxKind::ListExpr) =>
        {
            for child in node.children().filter_map(Expr::cast) {
                collect_target_names(&child, f);
            }
        }
        _ => {}
    }
}
