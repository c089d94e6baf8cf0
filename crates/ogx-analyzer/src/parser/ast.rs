//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use rowan::NodeOrToken;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Block, Block);
ast_node!(Decorator, Decorator);
ast_node!(FuncDef, FuncDef);
ast_node!(ParamList, ParamList);
ast_node!(Param, Param);
ast_node!(ClassDef, ClassDef);
ast_node!(ArgList, ArgList);
ast_node!(Arg, Arg);

ast_node!(ExprStmt, ExprStmt);
ast_node!(AssignStmt, AssignStmt);
ast_node!(AugAssignStmt, AugAssignStmt);
ast_node!(AnnAssignStmt, AnnAssignStmt);
ast_node!(ReturnStmt, ReturnStmt);
ast_node!(GlobalStmt, GlobalStmt);
ast_node!(NonlocalStmt, NonlocalStmt);
ast_node!(ImportStmt, ImportStmt);
ast_node!(FromImportStmt, FromImportStmt);
ast_node!(ImportAlias, ImportAlias);
ast_node!(IfStmt, IfStmt);
ast_node!(ElifClause, ElifClause);
ast_node!(ElseClause, ElseClause);
ast_node!(WhileStmt, WhileStmt);
ast_node!(ForStmt, ForStmt);
ast_node!(TryStmt, TryStmt);
ast_node!(ExceptClause, ExceptClause);
ast_node!(FinallyClause, FinallyClause);
ast_node!(WithStmt, WithStmt);
ast_node!(WithItem, WithItem);

ast_node!(NameExpr, NameExpr);
ast_node!(StringExpr, StringExpr);
ast_node!(ParenExpr, ParenExpr);
ast_node!(AttributeExpr, AttributeExpr);
ast_node!(LambdaExpr, LambdaExpr);
ast_node!(StarredExpr, StarredExpr);
ast_node!(NamedExpr, NamedExpr);
ast_node!(YieldExpr, YieldExpr);
ast_node!(CompFor, CompFor);
ast_node!(CompIf, CompIf);

fn child_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    child_token(node, kind).is_some()
}

fn child_exprs(node: &SyntaxNode) -> impl Iterator<Item = Expr> + '_ {
    node.children().filter_map(Expr::cast)
}

/// Expression children that come after a token of `kind`.
fn exprs_after(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = Expr> + '_ {
    let mut seen = false;
    node.children_with_tokens().filter_map(move |it| match it {
        NodeOrToken::Token(t) => {
            seen |= t.kind() == kind;
            None
        }
        NodeOrToken::Node(n) if seen => Expr::cast(n),
        NodeOrToken::Node(_) => None,
    })
}

/// Expression children that come before the first token of `kind`.
fn exprs_before(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = Expr> + '_ {
    node.children_with_tokens()
        .take_while(move |it| it.as_token().is_none_or(|t| t.kind() != kind))
        .filter_map(|it| it.into_node())
        .filter_map(Expr::cast)
}

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Name(NameExpr),
    String(StringExpr),
    Paren(ParenExpr),
    Attribute(AttributeExpr),
    Lambda(LambdaExpr),
    Starred(StarredExpr),
    Named(NamedExpr),
    Yield(YieldExpr),
    /// Comprehensions and generator expressions; they open a scope.
    Comprehension(Comprehension),
    /// Every other expression; its sub-expressions are found generically.
    Other(SyntaxNode),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::NameExpr => Expr::Name(NameExpr(node)),
            SyntaxKind::StringExpr => Expr::String(StringExpr(node)),
            SyntaxKind::ParenExpr => Expr::Paren(ParenExpr(node)),
            SyntaxKind::AttributeExpr => Expr::Attribute(AttributeExpr(node)),
            SyntaxKind::LambdaExpr => Expr::Lambda(LambdaExpr(node)),
            SyntaxKind::StarredExpr => Expr::Starred(StarredExpr(node)),
            SyntaxKind::NamedExpr => Expr::Named(NamedExpr(node)),
            SyntaxKind::YieldExpr => Expr::Yield(YieldExpr(node)),
            SyntaxKind::ListComp
            | SyntaxKind::SetComp
            | SyntaxKind::DictComp
            | SyntaxKind::GeneratorExpr => Expr::Comprehension(Comprehension(node)),
            SyntaxKind::LiteralExpr
            | SyntaxKind::TupleExpr
            | SyntaxKind::ListExpr
            | SyntaxKind::SetExpr
            | SyntaxKind::DictExpr
            | SyntaxKind::SubscriptExpr
            | SyntaxKind::SliceExpr
            | SyntaxKind::CallExpr
            | SyntaxKind::BinExpr
            | SyntaxKind::UnaryExpr
            | SyntaxKind::BoolExpr
            | SyntaxKind::CompareExpr
            | SyntaxKind::CondExpr
            | SyntaxKind::AwaitExpr => Expr::Other(node),
            _ => return None,
        };
        Some(expr)
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Name(n) => n.as_cst(),
            Expr::String(n) => n.as_cst(),
            Expr::Paren(n) => n.as_cst(),
            Expr::Attribute(n) => n.as_cst(),
            Expr::Lambda(n) => n.as_cst(),
            Expr::Starred(n) => n.as_cst(),
            Expr::Named(n) => n.as_cst(),
            Expr::Yield(n) => n.as_cst(),
            Expr::Comprehension(n) => n.as_cst(),
            Expr::Other(n) => n,
        }
    }
}

/// Any statement node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    FuncDef(FuncDef),
    ClassDef(ClassDef),
    Expr(ExprStmt),
    Assign(AssignStmt),
    AugAssign(AugAssignStmt),
    AnnAssign(AnnAssignStmt),
    Return(ReturnStmt),
    Global(GlobalStmt),
    Nonlocal(NonlocalStmt),
    Import(ImportStmt),
    FromImport(FromImportStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Try(TryStmt),
    With(WithStmt),
    /// An indented block without an owner (already reported by the parser).
    Block(Block),
    /// `pass`, `break`, `continue`, `raise`, `del`, `assert`.
    Other(SyntaxNode),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let stmt = match node.kind() {
            SyntaxKind::FuncDef => Stmt::FuncDef(FuncDef(node)),
            SyntaxKind::ClassDef => Stmt::ClassDef(ClassDef(node)),
            SyntaxKind::ExprStmt => Stmt::Expr(ExprStmt(node)),
            SyntaxKind::AssignStmt => Stmt::Assign(AssignStmt(node)),
            SyntaxKind::AugAssignStmt => Stmt::AugAssign(AugAssignStmt(node)),
            SyntaxKind::AnnAssignStmt => Stmt::AnnAssign(AnnAssignStmt(node)),
            SyntaxKind::ReturnStmt => Stmt::Return(ReturnStmt(node)),
            SyntaxKind::GlobalStmt => Stmt::Global(GlobalStmt(node)),
            SyntaxKind::NonlocalStmt => Stmt::Nonlocal(NonlocalStmt(node)),
            SyntaxKind::ImportStmt => Stmt::Import(ImportStmt(node)),
            SyntaxKind::FromImportStmt => Stmt::FromImport(FromImportStmt(node)),
            SyntaxKind::IfStmt => Stmt::If(IfStmt(node)),
            SyntaxKind::WhileStmt => Stmt::While(WhileStmt(node)),
            SyntaxKind::ForStmt => Stmt::For(ForStmt(node)),
            SyntaxKind::TryStmt => Stmt::Try(TryStmt(node)),
            SyntaxKind::WithStmt => Stmt::With(WithStmt(node)),
            SyntaxKind::Block => Stmt::Block(Block(node)),
            SyntaxKind::PassStmt
            | SyntaxKind::BreakStmt
            | SyntaxKind::ContinueStmt
            | SyntaxKind::RaiseStmt
            | SyntaxKind::DelStmt
            | SyntaxKind::AssertStmt => Stmt::Other(node),
            _ => return None,
        };
        Some(stmt)
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Stmt::FuncDef(n) => n.as_cst(),
            Stmt::ClassDef(n) => n.as_cst(),
            Stmt::Expr(n) => n.as_cst(),
            Stmt::Assign(n) => n.as_cst(),
            Stmt::AugAssign(n) => n.as_cst(),
            Stmt::AnnAssign(n) => n.as_cst(),
            Stmt::Return(n) => n.as_cst(),
            Stmt::Global(n) => n.as_cst(),
            Stmt::Nonlocal(n) => n.as_cst(),
            Stmt::Import(n) => n.as_cst(),
            Stmt::FromImport(n) => n.as_cst(),
            Stmt::If(n) => n.as_cst(),
            Stmt::While(n) => n.as_cst(),
            Stmt::For(n) => n.as_cst(),
            Stmt::Try(n) => n.as_cst(),
            Stmt::With(n) => n.as_cst(),
            Stmt::Block(n) => n.as_cst(),
            Stmt::Other(n) => n,
        }
    }
}

impl Root {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.0.children().filter_map(Stmt::cast)
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.0.children().filter_map(Stmt::cast)
    }
}

impl Decorator {
    pub fn expr(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

impl FuncDef {
    pub fn decorators(&self) -> impl Iterator<Item = Decorator> + '_ {
        self.0.children().filter_map(Decorator::cast)
    }

    /// The `def` keyword; its line is where the definition's code starts.
    pub fn def_token(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::KwDef)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Id)
    }

    pub fn is_async(&self) -> bool {
        has_token(&self.0, SyntaxKind::KwAsync)
    }

    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    pub fn return_type(&self) -> Option<Expr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ReturnType)
            .and_then(|n| child_exprs(&n).next())
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

/// Role of a parameter in a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// `x`, `x=1`, `x: int`
    Plain,
    /// `*args`
    VarArgs,
    /// `**kwargs`
    KwArgs,
    /// Bare `*` or `/`.
    Marker,
}

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.0.children().filter_map(Param::cast)
    }

    /// The first parameter, if it can be passed positionally.
    pub fn first_positional(&self) -> Option<Param> {
        self.params()
            .next()
            .filter(|p| p.kind() == ParamKind::Plain)
    }
}

impl Param {
    pub fn kind(&self) -> ParamKind {
        if has_token(&self.0, SyntaxKind::DoubleStar) {
            ParamKind::KwArgs
        } else if has_token(&self.0, SyntaxKind::Star) {
            if self.name().is_some() {
                ParamKind::VarArgs
            } else {
                ParamKind::Marker
            }
        } else if has_token(&self.0, SyntaxKind::Slash) {
            ParamKind::Marker
        } else {
            ParamKind::Plain
        }
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Id)
    }

    pub fn annotation(&self) -> Option<Expr> {
        if !has_token(&self.0, SyntaxKind::Colon) {
            return None;
        }
        exprs_after(&self.0, SyntaxKind::Colon).next()
    }

    pub fn default(&self) -> Option<Expr> {
        exprs_after(&self.0, SyntaxKind::Equals).next()
    }
}

impl ClassDef {
    pub fn decorators(&self) -> impl Iterator<Item = Decorator> + '_ {
        self.0.children().filter_map(Decorator::cast)
    }

    pub fn class_token(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::KwClass)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Id)
    }

    pub fn args(&self) -> Option<ArgList> {
        self.0.children().find_map(ArgList::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Arg> + '_ {
        self.0.children().filter_map(Arg::cast)
    }
}

impl Arg {
    /// Keyword of a `name=value` argument.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        has_token(&self.0, SyntaxKind::Equals)
            .then(|| child_token(&self.0, SyntaxKind::Id))
            .flatten()
    }

    pub fn value(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    /// `*args` or `**kwargs`.
    pub fn is_unpacking(&self) -> bool {
        has_token(&self.0, SyntaxKind::Star) || has_token(&self.0, SyntaxKind::DoubleStar)
    }
}

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

impl AssignStmt {
    /// Every `=`-separated part but the last.
    pub fn targets(&self) -> Vec<Expr> {
        let mut parts: Vec<Expr> = child_exprs(&self.0).collect();
        parts.pop();
        parts
    }

    pub fn value(&self) -> Option<Expr> {
        child_exprs(&self.0).last()
    }
}

impl AugAssignStmt {
    pub fn target(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn value(&self) -> Option<Expr> {
        child_exprs(&self.0).nth(1)
    }
}

impl AnnAssignStmt {
    pub fn target(&self) -> Option<Expr> {
        exprs_before(&self.0, SyntaxKind::Colon).next()
    }

    pub fn annotation(&self) -> Option<Expr> {
        exprs_before(&self.0, SyntaxKind::Equals).nth(1)
    }

    pub fn value(&self) -> Option<Expr> {
        exprs_after(&self.0, SyntaxKind::Equals).next()
    }
}

impl ReturnStmt {
    pub fn value(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

impl GlobalStmt {
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::Id)
    }
}

impl NonlocalStmt {
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::Id)
    }
}

impl ImportStmt {
    pub fn aliases(&self) -> impl Iterator<Item = ImportAlias> + '_ {
        self.0.children().filter_map(ImportAlias::cast)
    }
}

impl FromImportStmt {
    pub fn aliases(&self) -> impl Iterator<Item = ImportAlias> + '_ {
        self.0.children().filter_map(ImportAlias::cast)
    }

    pub fn is_star(&self) -> bool {
        has_token(&self.0, SyntaxKind::Star)
    }
}

impl ImportAlias {
    fn ids(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::Id)
    }

    pub fn alias(&self) -> Option<SyntaxToken> {
        if !has_token(&self.0, SyntaxKind::KwAs) {
            return None;
        }
        self.ids().last()
    }

    /// The name this alias introduces: the alias, else the first component
    /// of a dotted module path (`import a.b` binds `a`), else the name itself.
    pub fn bound_name(&self) -> Option<SyntaxToken> {
        if let Some(alias) = self.alias() {
            return Some(alias);
        }
        match self.0.children().find(|n| n.kind() == SyntaxKind::DottedName) {
            Some(dotted) => child_token(&dotted, SyntaxKind::Id),
            None => self.ids().next(),
        }
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }

    pub fn elif_clauses(&self) -> impl Iterator<Item = ElifClause> + '_ {
        self.0.children().filter_map(ElifClause::cast)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.0.children().find_map(ElseClause::cast)
    }
}

impl ElifClause {
    pub fn condition(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl ElseClause {
    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl FinallyClause {
    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.0.children().find_map(ElseClause::cast)
    }
}

impl ForStmt {
    pub fn target(&self) -> Option<Expr> {
        exprs_before(&self.0, SyntaxKind::KwIn).next()
    }

    pub fn iter(&self) -> Option<Expr> {
        exprs_after(&self.0, SyntaxKind::KwIn).next()
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.0.children().find_map(ElseClause::cast)
    }
}

impl TryStmt {
    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }

    pub fn handlers(&self) -> impl Iterator<Item = ExceptClause> + '_ {
        self.0.children().filter_map(ExceptClause::cast)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.0.children().find_map(ElseClause::cast)
    }

    pub fn finally_clause(&self) -> Option<FinallyClause> {
        self.0.children().find_map(FinallyClause::cast)
    }
}

impl ExceptClause {
    pub fn exception_type(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        if !has_token(&self.0, SyntaxKind::KwAs) {
            return None;
        }
        child_token(&self.0, SyntaxKind::Id)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl WithStmt {
    pub fn with_token(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::KwWith)
    }

    pub fn items(&self) -> impl Iterator<Item = WithItem> + '_ {
        self.0.children().filter_map(WithItem::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl WithItem {
    pub fn context(&self) -> Option<Expr> {
        exprs_before(&self.0, SyntaxKind::KwAs).next()
    }

    pub fn target(&self) -> Option<Expr> {
        exprs_after(&self.0, SyntaxKind::KwAs).next()
    }
}

impl NameExpr {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Id)
    }
}

impl StringExpr {
    pub fn parts(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::String)
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

impl AttributeExpr {
    pub fn object(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn attr(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Id)
    }
}

impl LambdaExpr {
    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    pub fn body(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

impl StarredExpr {
    pub fn value(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

impl NamedExpr {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Id)
    }

    pub fn value(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

impl YieldExpr {
    pub fn yield_token(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::KwYield)
    }
}

/// `[elt for ...]`, `{elt for ...}`, `{k: v for ...}` or `(elt for ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comprehension(SyntaxNode);

impl Comprehension {
    pub fn as_cst(&self) -> &SyntaxNode {
        &self.0
    }

    /// Element expressions: one, or key and value for a dict comprehension.
    pub fn elements(&self) -> Vec<Expr> {
        match self.0.children().find(|n| n.kind() == SyntaxKind::DictEntry) {
            Some(entry) => child_exprs(&entry).collect(),
            None => child_exprs(&self.0).take(1).collect(),
        }
    }

    pub fn clauses(&self) -> impl Iterator<Item = CompClause> + '_ {
        self.0.children().filter_map(|n| match n.kind() {
            SyntaxKind::CompFor => Some(CompClause::For(CompFor(n))),
            SyntaxKind::CompIf => Some(CompClause::If(CompIf(n))),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompClause {
    For(CompFor),
    If(CompIf),
}

impl CompFor {
    pub fn target(&self) -> Option<Expr> {
        exprs_before(&self.0, SyntaxKind::KwIn).next()
    }

    pub fn iter(&self) -> Option<Expr> {
        exprs_after(&self.0, SyntaxKind::KwIn).next()
    }
}

impl CompIf {
    pub fn condition(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}
