//! Free-variable member access chains.
//!
//! The visitor keeps two name sets: `bound`, every name bound anywhere in the
//! scopes entered so far, and `bound_so_far`, names stored earlier in the
//! current scope that the scope's own binding pass did not see. A load of a
//! name in neither set is free; an attribute chain rooted at such a name is
//! recorded whole (`np.linalg.norm`), with the position of the root name.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexSet;
use ogx_core::{ChainWithPosition, FreeVariableChain};
use rowan::TextSize;

use super::bound::bound_values_in_scope;
use super::fstring::format_fields;
use super::Scope;
use crate::error::{AnalysisError, AnalysisResult};
use crate::line_index::LineIndex;
use crate::parser::ast::{
    AttributeExpr, Block, ClassDef, CompClause, Comprehension, Expr, FuncDef, LambdaExpr,
    ParamList, Stmt, StringExpr,
};
use crate::parser::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Free chains of `scope`, sorted and without duplicates.
///
/// A function is analyzed as if it were the only statement of a module, so
/// its own name is bound. A class binds its name before its bases and body
/// are visited; the class body does not open a scope.
pub fn free_variable_chains(
    scope: &Scope,
    lines: &LineIndex,
) -> AnalysisResult<Vec<ChainWithPosition>> {
    let mut visitor = FreeVariableVisitor::new(lines);

    match scope {
        Scope::Module(root) => {
            let names = bound_values_in_scope(scope, lines)?;
            visitor.in_scope(names, |v| {
                for stmt in root.statements() {
                    v.visit_stmt(&stmt)?;
                }
                Ok(())
            })?;
        }
        Scope::Function(f) => {
            if let Some(name) = f.name() {
                visitor.bound.insert(name.text().to_string());
            }
            visitor.visit_function(f)?;
        }
        Scope::Lambda(l) => visitor.visit_lambda(l)?,
        Scope::Class(c) => visitor.visit_class(c)?,
        Scope::Comprehension(c) => visitor.visit_comprehension(c)?,
        Scope::WithBody(w) => {
            let names = bound_values_in_scope(scope, lines)?;
            visitor.in_scope(names, |v| v.visit_block(w.body()))?;
        }
    }

    tracing::trace!(count = visitor.chains.len(), "free variable chains");
    Ok(visitor.chains.into_iter().collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ctx {
    Load,
    Store,
    Del,
}

struct FreeVariableVisitor<'a> {
    lines: &'a LineIndex,
    /// Added to node offsets; non-zero while visiting a re-parsed f-string field.
    base: TextSize,
    bound: HashSet<String>,
    bound_so_far: HashSet<String>,
    chains: BTreeSet<ChainWithPosition>,
}

impl<'a> FreeVariableVisitor<'a> {
    fn new(lines: &'a LineIndex) -> Self {
        Self {
            lines,
            base: TextSize::from(0),
            bound: HashSet::new(),
            bound_so_far: HashSet::new(),
            chains: BTreeSet::new(),
        }
    }

    fn in_scope(
        &mut self,
        names: IndexSet<String>,
        f: impl FnOnce(&mut Self) -> AnalysisResult<()>,
    ) -> AnalysisResult<()> {
        let mut bound = self.bound.clone();
        bound.extend(names);
        let saved_bound = std::mem::replace(&mut self.bound, bound);
        let saved_so_far = std::mem::take(&mut self.bound_so_far);

        let result = f(self);

        self.bound = saved_bound;
        self.bound_so_far = saved_so_far;
        result
    }

    fn is_bound(&self, name: &str) -> bool {
        self.bound.contains(name) || self.bound_so_far.contains(name)
    }

    fn process_chain(&mut self, chain: FreeVariableChain, ctx: Ctx, root: &SyntaxToken) {
        if self.is_bound(chain.root()) {
            return;
        }
        match ctx {
            Ctx::Store => {
                self.bound_so_far.insert(chain.root().to_string());
            }
            Ctx::Load => {
                let position = self.lines.position(self.base + root.text_range().start());
                self.chains.insert(ChainWithPosition::new(chain, position));
            }
            Ctx::Del => {}
        }
    }

    fn process_name(&mut self, token: &SyntaxToken, ctx: Ctx) {
        self.process_chain(FreeVariableChain::single(token.text()), ctx, token);
    }

    fn visit_block(&mut self, block: Option<Block>) -> AnalysisResult<()> {
        let Some(block) = block else { return Ok(()) };
        for stmt in block.statements() {
            self.visit_stmt(&stmt)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> AnalysisResult<()> {
        match stmt {
            Stmt::FuncDef(f) => self.visit_function(f)?,
            Stmt::ClassDef(c) => self.visit_class(c)?,
            Stmt::Expr(e) => self.visit_opt(e.expr(), Ctx::Load)?,
            Stmt::Assign(a) => {
                self.visit_opt(a.value(), Ctx::Load)?;
                for target in a.targets() {
                    self.visit_expr(&target, Ctx::Store)?;
                }
            }
            Stmt::AugAssign(a) => {
                self.visit_opt(a.value(), Ctx::Load)?;
                self.visit_opt(a.target(), Ctx::Store)?;
            }
            Stmt::AnnAssign(a) => {
                self.visit_opt(a.annotation(), Ctx::Load)?;
                self.visit_opt(a.value(), Ctx::Load)?;
                self.visit_opt(a.target(), Ctx::Store)?;
            }
            Stmt::Return(r) => self.visit_opt(r.value(), Ctx::Load)?,
            Stmt::Global(g) => {
                let range = g.as_cst().text_range();
                return Err(AnalysisError::GlobalStatement {
                    line: self.lines.line(self.base + range.start()),
                    range: range + self.base,
                });
            }
            Stmt::Nonlocal(n) => {
                let range = n.as_cst().text_range();
                return Err(AnalysisError::NonlocalStatement {
                    line: self.lines.line(self.base + range.start()),
                    range: range + self.base,
                });
            }
            Stmt::Import(i) => {
                for alias in i.aliases() {
                    if let Some(name) = alias.bound_name() {
                        self.process_name(&name, Ctx::Store);
                    }
                }
            }
            Stmt::FromImport(i) => {
                for alias in i.aliases() {
                    if let Some(name) = alias.bound_name() {
                        self.process_name(&name, Ctx::Store);
                    }
                }
            }
            Stmt::If(i) => {
                self.visit_opt(i.condition(), Ctx::Load)?;
                self.visit_block(i.body())?;
                for elif in i.elif_clauses() {
                    self.visit_opt(elif.condition(), Ctx::Load)?;
                    self.visit_block(elif.body())?;
                }
                self.visit_block(i.else_clause().and_then(|e| e.body()))?;
            }
            Stmt::While(w) => {
                self.visit_opt(w.condition(), Ctx::Load)?;
                self.visit_block(w.body())?;
                self.visit_block(w.else_clause().and_then(|e| e.body()))?;
            }
            Stmt::For(f) => {
                self.visit_opt(f.iter(), Ctx::Load)?;
                self.visit_opt(f.target(), Ctx::Store)?;
                self.visit_block(f.body())?;
                self.visit_block(f.else_clause().and_then(|e| e.body()))?;
            }
            Stmt::Try(t) => {
                self.visit_block(t.body())?;
                for handler in t.handlers() {
                    self.visit_opt(handler.exception_type(), Ctx::Load)?;
                    if let Some(name) = handler.name() {
                        self.process_name(&name, Ctx::Store);
                    }
                    self.visit_block(handler.body())?;
                }
                self.visit_block(t.else_clause().and_then(|e| e.body()))?;
                self.visit_block(t.finally_clause().and_then(|f| f.body()))?;
            }
            Stmt::With(w) => {
                for item in w.items() {
                    self.visit_opt(item.context(), Ctx::Load)?;
                    self.visit_opt(item.target(), Ctx::Store)?;
                }
                self.visit_block(w.body())?;
            }
            Stmt::Block(b) => self.visit_block(Some(b.clone()))?,
            Stmt::Other(node) => {
                let ctx = if node.kind() == SyntaxKind::DelStmt {
                    Ctx::Del
                } else {
                    Ctx::Load
                };
                self.visit_children(node, ctx)?;
            }
        }
        Ok(())
    }

    fn visit_function(&mut self, f: &FuncDef) -> AnalysisResult<()> {
        for decorator in f.decorators() {
            self.visit_opt(decorator.expr(), Ctx::Load)?;
        }
        self.visit_param_exprs(f.params())?;
        self.visit_opt(f.return_type(), Ctx::Load)?;
        if let Some(name) = f.name() {
            self.process_name(&name, Ctx::Store);
        }

        let names = bound_values_in_scope(&Scope::Function(f.clone()), self.lines)?;
        self.in_scope(names, |v| v.visit_block(f.body()))
    }

    fn visit_lambda(&mut self, l: &LambdaExpr) -> AnalysisResult<()> {
        self.visit_param_exprs(l.params())?;
        let names = bound_values_in_scope(&Scope::Lambda(l.clone()), self.lines)?;
        self.in_scope(names, |v| v.visit_opt(l.body(), Ctx::Load))
    }

    fn visit_class(&mut self, c: &ClassDef) -> AnalysisResult<()> {
        for decorator in c.decorators() {
            self.visit_opt(decorator.expr(), Ctx::Load)?;
        }
        if let Some(name) = c.name() {
            self.bound.insert(name.text().to_string());
        }
        if let Some(args) = c.args() {
            for arg in args.args() {
                self.visit_opt(arg.value(), Ctx::Load)?;
            }
        }
        self.visit_block(c.body())
    }

    fn visit_comprehension(&mut self, comp: &Comprehension) -> AnalysisResult<()> {
        let clauses: Vec<CompClause> = comp.clauses().collect();

        // the outermost iterable is evaluated in the enclosing scope
        if let Some(CompClause::For(first)) = clauses.first() {
            self.visit_opt(first.iter(), Ctx::Load)?;
        }

        let names = bound_values_in_scope(&Scope::Comprehension(comp.clone()), self.lines)?;
        self.in_scope(names, |v| {
            for (i, clause) in clauses.iter().enumerate() {
                match clause {
                    CompClause::For(f) => {
                        if i > 0 {
                            v.visit_opt(f.iter(), Ctx::Load)?;
                        }
                        v.visit_opt(f.target(), Ctx::Store)?;
                    }
                    CompClause::If(c) => v.visit_opt(c.condition(), Ctx::Load)?,
                }
            }
            for element in comp.elements() {
                v.visit_expr(&element, Ctx::Load)?;
            }
            Ok(())
        })
    }

    /// Defaults and annotations; they are evaluated where the definition is.
    fn visit_param_exprs(&mut self, params: Option<ParamList>) -> AnalysisResult<()> {
        let Some(params) = params else { return Ok(()) };
        for param in params.params() {
            self.visit_opt(param.annotation(), Ctx::Load)?;
            self.visit_opt(param.default(), Ctx::Load)?;
        }
        Ok(())
    }

    fn visit_opt(&mut self, expr: Option<Expr>, ctx: Ctx) -> AnalysisResult<()> {
        match expr {
            Some(expr) => self.visit_expr(&expr, ctx),
            None => Ok(()),
        }
    }

    fn visit_expr(&mut self, expr: &Expr, ctx: Ctx) -> AnalysisResult<()> {
        match expr {
            Expr::Name(n) => {
                if let Some(name) = n.name() {
                    self.process_name(&name, ctx);
                }
            }
            Expr::Attribute(a) => match member_access_chain(a) {
                // the root of an attribute chain is always a load
                Some((chain, root)) => self.process_chain(chain, Ctx::Load, &root),
                None => self.visit_opt(a.object(), Ctx::Load)?,
            },
            Expr::Paren(p) => self.visit_opt(p.inner(), ctx)?,
            Expr::Starred(s) => self.visit_opt(s.value(), ctx)?,
            Expr::Named(n) => {
                self.visit_opt(n.value(), Ctx::Load)?;
                if let Some(name) = n.name() {
                    self.process_name(&name, Ctx::Store);
                }
            }
            Expr::Lambda(l) => self.visit_lambda(l)?,
            Expr::Comprehension(c) => self.visit_comprehension(c)?,
            Expr::String(s) => self.visit_string(s)?,
            Expr::Yield(y) => self.visit_children(y.as_cst(), Ctx::Load)?,
            Expr::Other(node) => {
                let ctx = match node.kind() {
                    SyntaxKind::TupleExpr | SyntaxKind::ListExpr => ctx,
                    _ => Ctx::Load,
                };
                self.visit_children(node, ctx)?;
            }
        }
        Ok(())
    }

    /// Visits expression children, looking through helper nodes such as
    /// argument lists and dict entries.
    fn visit_children(&mut self, node: &SyntaxNode, ctx: Ctx) -> AnalysisResult<()> {
        for child in node.children() {
            match Expr::cast(child.clone()) {
                Some(expr) => self.visit_expr(&expr, ctx)?,
                None => self.visit_children(&child, Ctx::Load)?,
            }
        }
        Ok(())
    }

    fn visit_string(&mut self, s: &StringExpr) -> AnalysisResult<()> {
        for part in s.parts() {
            for field in format_fields(part.text()) {
                // parenthesized so that multi-line fields parse as one expression
                let source = format!("({})", field.text);
                let (parse, diagnostics) = crate::parser::parse(&source);
                if diagnostics.has_errors() {
                    continue;
                }
                let Some(Stmt::Expr(stmt)) = parse.root().statements().next() else {
                    continue;
                };

                let saved = self.base;
                self.base = self.base + part.text_range().start()
                    + TextSize::from(field.offset as u32)
                    - TextSize::from(1);
                let result = self.visit_opt(stmt.expr(), Ctx::Load);
                self.base = saved;
                result?;
            }
        }
        Ok(())
    }
}

/// Chains of the positional bases of `class`, in declaration order. `None`
/// stands for a base that is not a name or member access chain (`make()`,
/// `bases[0]`, `*bases`).
pub fn base_class_chains(class: &ClassDef) -> Vec<Option<FreeVariableChain>> {
    let Some(args) = class.args() else {
        return Vec::new();
    };
    args.args()
        .filter(|arg| arg.keyword().is_none())
        .map(|arg| match arg.value() {
            Some(_) if arg.is_unpacking() => None,
            Some(expr) => expr_chain(&expr),
            None => None,
        })
        .collect()
}

fn expr_chain(expr: &Expr) -> Option<FreeVariableChain> {
    match expr {
        Expr::Name(n) => Some(FreeVariableChain::single(n.name()?.text())),
        Expr::Paren(p) => expr_chain(&p.inner()?),
        Expr::Attribute(a) => member_access_chain(a).map(|(chain, _)| chain),
        _ => None,
    }
}

/// `a.b.c` as a chain plus its root name token. Parentheses are looked
/// through; any other object (a call, a subscript) yields `None`.
fn member_access_chain(attr: &AttributeExpr) -> Option<(FreeVariableChain, SyntaxToken)> {
    let mut components = vec![attr.attr()?.text().to_string()];
    let mut current = attr.object()?;
    loop {
        current = match current {
            Expr::Attribute(a) => {
                components.push(a.attr()?.text().to_string());
                a.object()?
            }
            Expr::Paren(p) => p.inner()?,
            Expr::Name(n) => {
                let root = n.name()?;
                components.push(root.text().to_string());
                components.reverse();
                let chain = FreeVariableChain::new(components).ok()?;
                return Some((chain, root));
            }
            _ => return None,
        };
    }
}
