//! Lossless syntax tree for the Java subset nori formats
//!
//! Nodes are closed sum types (`Statement`, `Expression`) plus one struct per
//! construct. Every struct owns a [`Space`] `prefix` covering the bytes before
//! its first token; interior tokens get their own `Space` slots (`Padded`,
//! `Container`, `LeftPadded`), so printing a tree reproduces the source
//! byte-for-byte.
//!
//! All types are plain data: `Clone + PartialEq`, public fields, functional
//! updates via struct-update syntax. Passes never mutate a tree in place —
//! they build a new one, and the orchestrator compares old and new with `==`
//! to detect no-op passes.
//!
//! Ownership of separators follows one rule throughout: the space *before* a
//! separator or closer (`,` `;` `)` `.` `:`) lives in the `after` field of the
//! padded element preceding it, and the space *after* it lives in the next
//! element's `prefix`.

use std::sync::atomic::{AtomicU64, Ordering};

use super::space::Space;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable node identity. Survives functional updates (withers copy it), which
/// is what lets the trial printer stop at a target node and lets diffing
/// match nodes across pass boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Coarse node tag used by cursor frames and the indent-type classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    Package,
    Import,
    Class,
    EnumValueSet,
    EnumValue,
    Method,
    Variables,
    NamedVariable,
    Block,
    If,
    Else,
    For,
    ForEach,
    While,
    DoWhile,
    Switch,
    Case,
    Label,
    Return,
    Throw,
    Break,
    Continue,
    Empty,
    Annotation,
    Modifier,
    TypeName,
    Identifier,
    FieldAccess,
    Literal,
    Binary,
    Unary,
    Assignment,
    Ternary,
    Invocation,
    NewClass,
    ArrayAccess,
    Parentheses,
}

/// An element followed by the space before its trailing separator or closer.
#[derive(Debug, Clone, PartialEq)]
pub struct Padded<T> {
    pub elem: T,
    pub after: Space,
}

impl<T> Padded<T> {
    pub fn new(elem: T, after: Space) -> Self {
        Self { elem, after }
    }

    pub fn bare(elem: T) -> Self {
        Self {
            elem,
            after: Space::empty(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Padded<U> {
        Padded {
            elem: f(self.elem),
            after: self.after,
        }
    }
}

/// An element preceded by the space before its introducing token (`=`,
/// `extends`, a binary operator, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct LeftPadded<T> {
    pub before: Space,
    pub elem: T,
}

impl<T> LeftPadded<T> {
    pub fn new(before: Space, elem: T) -> Self {
        Self { before, elem }
    }
}

/// A delimited, comma-separated list: `before` is the space preceding the
/// opening delimiter, each element's `after` precedes its `,` (or the closing
/// delimiter for the last element). An empty pair of delimiters is modeled as
/// a single `Expression::Empty` element carrying the interior space.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    pub before: Space,
    pub elems: Vec<Padded<T>>,
}

impl<T> Container<T> {
    pub fn new(before: Space, elems: Vec<Padded<T>>) -> Self {
        Self { before, elems }
    }
}

/// `a.b.c` — each part's `after` precedes the following dot; the last part's
/// `after` is always empty and never printed.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    pub parts: Vec<Padded<Ident>>,
}

impl QualifiedName {
    pub fn simple(&self) -> Option<&Ident> {
        if self.parts.len() == 1 {
            self.parts.first().map(|p| &p.elem)
        } else {
            None
        }
    }

    /// Dotted text with interior spacing dropped, for diagnostics.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.elem.text.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub id: NodeId,
    pub prefix: Space,
    pub text: String,
}

impl Ident {
    pub fn new(prefix: Space, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::fresh(),
            prefix,
            text: text.into(),
        }
    }
}

/// The parenthesized controller of `if`/`while`/`switch`: `prefix` precedes
/// `(`, the tree's `after` precedes `)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlParens<T> {
    pub prefix: Space,
    pub tree: Padded<T>,
}

// ---------------------------------------------------------------------------
// Compilation unit and declarations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub id: NodeId,
    /// `after` precedes the package statement's `;`.
    pub package: Option<Padded<PackageDecl>>,
    /// Each `after` precedes the import's `;`.
    pub imports: Vec<Padded<ImportDecl>>,
    pub types: Vec<ClassDecl>,
    /// Trailing whitespace and comments at end of file.
    pub eof: Space,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDecl {
    pub id: NodeId,
    pub prefix: Space,
    pub name: QualifiedName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub id: NodeId,
    pub prefix: Space,
    /// Space before the `static` keyword, when present.
    pub static_prefix: Option<Space>,
    pub name: QualifiedName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
}

impl ModifierKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ModifierKind::Public => "public",
            ModifierKind::Protected => "protected",
            ModifierKind::Private => "private",
            ModifierKind::Abstract => "abstract",
            ModifierKind::Static => "static",
            ModifierKind::Final => "final",
            ModifierKind::Native => "native",
            ModifierKind::Synchronized => "synchronized",
            ModifierKind::Transient => "transient",
            ModifierKind::Volatile => "volatile",
            ModifierKind::Strictfp => "strictfp",
            ModifierKind::Default => "default",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "public" => ModifierKind::Public,
            "protected" => ModifierKind::Protected,
            "private" => ModifierKind::Private,
            "abstract" => ModifierKind::Abstract,
            "static" => ModifierKind::Static,
            "final" => ModifierKind::Final,
            "native" => ModifierKind::Native,
            "synchronized" => ModifierKind::Synchronized,
            "transient" => ModifierKind::Transient,
            "volatile" => ModifierKind::Volatile,
            "strictfp" => ModifierKind::Strictfp,
            "default" => ModifierKind::Default,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub id: NodeId,
    pub prefix: Space,
    pub kind: ModifierKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: NodeId,
    /// Precedes `@`.
    pub prefix: Space,
    pub name: Ident,
    pub args: Option<Container<Expression>>,
}

/// One `[]` pair on a type or variable: `prefix` precedes `[`, `inner` sits
/// between the brackets.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDim {
    pub prefix: Space,
    pub inner: Space,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub id: NodeId,
    pub prefix: Space,
    pub name: QualifiedName,
    /// `<...>` type arguments; `before` precedes `<`.
    pub type_args: Option<Container<TypeName>>,
    pub dims: Vec<ArrayDim>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
}

impl ClassKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Record => "record",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub prefix: Space,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub kind: ClassKind,
    /// Precedes the `class`/`interface`/`enum`/`record` keyword.
    pub kind_prefix: Space,
    pub name: Ident,
    /// Record primary components: `record Point(int x, int y)` —
    /// `Statement::Variable` elements, or a single `Statement::Empty`
    /// placeholder carrying the interior space of `()`.
    pub components: Option<Container<Statement>>,
    pub extends: Option<LeftPadded<TypeName>>,
    /// `before` precedes the `implements` keyword.
    pub implements: Option<Container<TypeName>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    /// Precedes `{`.
    pub prefix: Space,
    /// Each `after` precedes the statement's `;` when
    /// [`Statement::needs_semicolon`] holds; empty otherwise.
    pub statements: Vec<Padded<Statement>>,
    /// Precedes `}`.
    pub end: Space,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub id: NodeId,
    pub prefix: Space,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    /// `None` for constructors.
    pub return_type: Option<TypeName>,
    pub name: Ident,
    /// `Statement::Variable` or `Statement::Empty` elements.
    pub params: Container<Statement>,
    pub throws: Option<Container<TypeName>>,
    /// `None` for abstract/interface methods; the `;` space then lives in the
    /// enclosing `Padded::after`.
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecls {
    pub id: NodeId,
    pub prefix: Space,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub type_expr: TypeName,
    /// Each `after` precedes the `,` between declarators.
    pub vars: Vec<Padded<NamedVariable>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedVariable {
    pub id: NodeId,
    pub name: Ident,
    pub dims: Vec<ArrayDim>,
    /// `before` precedes `=`.
    pub initializer: Option<LeftPadded<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueSet {
    pub id: NodeId,
    pub prefix: Space,
    /// Each `after` precedes the `,` (or the optional terminating `;` for the
    /// last value when `terminated` is set).
    pub values: Vec<Padded<EnumValue>>,
    /// Whether the constant list ends with `;`.
    pub terminated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub id: NodeId,
    pub prefix: Space,
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub args: Option<Container<Expression>>,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    Class(Box<ClassDecl>),
    Method(Box<MethodDecl>),
    Variable(Box<VariableDecls>),
    EnumValues(Box<EnumValueSet>),
    Expr(Box<Expression>),
    If(Box<IfStmt>),
    For(Box<ForLoop>),
    ForEach(Box<ForEachLoop>),
    While(Box<WhileLoop>),
    DoWhile(Box<DoWhileLoop>),
    Switch(Box<SwitchStmt>),
    Case(Box<CaseStmt>),
    Label(Box<LabelStmt>),
    Return(Box<ReturnStmt>),
    Throw(Box<ThrowStmt>),
    Break(Box<BreakStmt>),
    Continue(Box<ContinueStmt>),
    Empty(EmptyNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub id: NodeId,
    pub prefix: Space,
    pub condition: ControlParens<Expression>,
    pub then_part: Padded<Box<Statement>>,
    pub else_part: Option<ElseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseClause {
    pub id: NodeId,
    /// Precedes the `else` keyword.
    pub prefix: Space,
    pub body: Padded<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub control: ForControl,
    pub body: Padded<Box<Statement>>,
}

/// `( init ; condition ; update )` — the last init element's `after` precedes
/// the first `;`, the condition's `after` the second `;`, and the last update
/// element's `after` precedes `)`. Absent sections are `Statement::Empty` /
/// `Expression::Empty` elements so their surrounding spaces survive.
#[derive(Debug, Clone, PartialEq)]
pub struct ForControl {
    pub prefix: Space,
    pub init: Vec<Padded<Statement>>,
    pub condition: Padded<Expression>,
    pub update: Vec<Padded<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub control: ForEachControl,
    pub body: Padded<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachControl {
    pub prefix: Space,
    /// `after` precedes `:`.
    pub variable: Padded<VariableDecls>,
    /// `after` precedes `)`.
    pub iterable: Padded<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub condition: ControlParens<Expression>,
    pub body: Padded<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub body: Padded<Box<Statement>>,
    /// Precedes the trailing `while` keyword.
    pub while_prefix: Space,
    pub condition: ControlParens<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub id: NodeId,
    pub prefix: Space,
    pub selector: ControlParens<Expression>,
    /// Block whose statements are `Statement::Case` entries.
    pub cases: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabel {
    /// `case <expr>` — `after` precedes `:`.
    Expr(Padded<Expression>),
    /// `default` — the space precedes `:`.
    Default(Space),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseStmt {
    pub id: NodeId,
    pub prefix: Space,
    pub label: CaseLabel,
    pub statements: Vec<Padded<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStmt {
    pub id: NodeId,
    pub prefix: Space,
    /// `after` precedes `:`.
    pub name: Padded<Ident>,
    /// The labeled statement; its terminator (if any) is owned by the padding
    /// that encloses the whole label.
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub prefix: Space,
    pub expr: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    pub id: NodeId,
    pub prefix: Space,
    pub expr: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub id: NodeId,
    pub prefix: Space,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    pub id: NodeId,
    pub prefix: Space,
    pub label: Option<Ident>,
}

/// A node with no tokens of its own, except that in statement position it
/// *is* the bare `;` (the printer emits the semicolon intrinsically, not via
/// the enclosing padding). Also serves as an absent for-loop section and as
/// the placeholder inside empty argument/parameter lists, where no semicolon
/// is printed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyNode {
    pub id: NodeId,
    pub prefix: Space,
}

impl EmptyNode {
    pub fn new(prefix: Space) -> Self {
        Self {
            id: NodeId::fresh(),
            prefix,
        }
    }
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Block(_) => NodeKind::Block,
            Statement::Class(_) => NodeKind::Class,
            Statement::Method(_) => NodeKind::Method,
            Statement::Variable(_) => NodeKind::Variables,
            Statement::EnumValues(_) => NodeKind::EnumValueSet,
            Statement::Expr(e) => e.kind(),
            Statement::If(_) => NodeKind::If,
            Statement::For(_) => NodeKind::For,
            Statement::ForEach(_) => NodeKind::ForEach,
            Statement::While(_) => NodeKind::While,
            Statement::DoWhile(_) => NodeKind::DoWhile,
            Statement::Switch(_) => NodeKind::Switch,
            Statement::Case(_) => NodeKind::Case,
            Statement::Label(_) => NodeKind::Label,
            Statement::Return(_) => NodeKind::Return,
            Statement::Throw(_) => NodeKind::Throw,
            Statement::Break(_) => NodeKind::Break,
            Statement::Continue(_) => NodeKind::Continue,
            Statement::Empty(_) => NodeKind::Empty,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Statement::Block(b) => b.id,
            Statement::Class(c) => c.id,
            Statement::Method(m) => m.id,
            Statement::Variable(v) => v.id,
            Statement::EnumValues(e) => e.id,
            Statement::Expr(e) => e.id(),
            Statement::If(s) => s.id,
            Statement::For(s) => s.id,
            Statement::ForEach(s) => s.id,
            Statement::While(s) => s.id,
            Statement::DoWhile(s) => s.id,
            Statement::Switch(s) => s.id,
            Statement::Case(s) => s.id,
            Statement::Label(s) => s.id,
            Statement::Return(s) => s.id,
            Statement::Throw(s) => s.id,
            Statement::Break(s) => s.id,
            Statement::Continue(s) => s.id,
            Statement::Empty(e) => e.id,
        }
    }

    pub fn prefix(&self) -> &Space {
        match self {
            Statement::Block(b) => &b.prefix,
            Statement::Class(c) => &c.prefix,
            Statement::Method(m) => &m.prefix,
            Statement::Variable(v) => &v.prefix,
            Statement::EnumValues(e) => &e.prefix,
            Statement::Expr(e) => e.prefix(),
            Statement::If(s) => &s.prefix,
            Statement::For(s) => &s.prefix,
            Statement::ForEach(s) => &s.prefix,
            Statement::While(s) => &s.prefix,
            Statement::DoWhile(s) => &s.prefix,
            Statement::Switch(s) => &s.prefix,
            Statement::Case(s) => &s.prefix,
            Statement::Label(s) => &s.prefix,
            Statement::Return(s) => &s.prefix,
            Statement::Throw(s) => &s.prefix,
            Statement::Break(s) => &s.prefix,
            Statement::Continue(s) => &s.prefix,
            Statement::Empty(e) => &e.prefix,
        }
    }

    pub fn with_prefix(self, prefix: Space) -> Self {
        match self {
            Statement::Block(b) => Statement::Block(Block { prefix, ..b }),
            Statement::Class(c) => Statement::Class(Box::new(ClassDecl { prefix, ..*c })),
            Statement::Method(m) => Statement::Method(Box::new(MethodDecl { prefix, ..*m })),
            Statement::Variable(v) => Statement::Variable(Box::new(VariableDecls { prefix, ..*v })),
            Statement::EnumValues(e) => {
                Statement::EnumValues(Box::new(EnumValueSet { prefix, ..*e }))
            }
            Statement::Expr(e) => Statement::Expr(Box::new(e.with_prefix(prefix))),
            Statement::If(s) => Statement::If(Box::new(IfStmt { prefix, ..*s })),
            Statement::For(s) => Statement::For(Box::new(ForLoop { prefix, ..*s })),
            Statement::ForEach(s) => Statement::ForEach(Box::new(ForEachLoop { prefix, ..*s })),
            Statement::While(s) => Statement::While(Box::new(WhileLoop { prefix, ..*s })),
            Statement::DoWhile(s) => Statement::DoWhile(Box::new(DoWhileLoop { prefix, ..*s })),
            Statement::Switch(s) => Statement::Switch(Box::new(SwitchStmt { prefix, ..*s })),
            Statement::Case(s) => Statement::Case(Box::new(CaseStmt { prefix, ..*s })),
            Statement::Label(s) => Statement::Label(Box::new(LabelStmt { prefix, ..*s })),
            Statement::Return(s) => Statement::Return(Box::new(ReturnStmt { prefix, ..*s })),
            Statement::Throw(s) => Statement::Throw(Box::new(ThrowStmt { prefix, ..*s })),
            Statement::Break(s) => Statement::Break(Box::new(BreakStmt { prefix, ..*s })),
            Statement::Continue(s) => Statement::Continue(Box::new(ContinueStmt { prefix, ..*s })),
            Statement::Empty(e) => Statement::Empty(EmptyNode { prefix, ..e }),
        }
    }

    /// Whether the printer emits a terminating `;` (owned by the enclosing
    /// padding) for this statement in statement position. Recurses through
    /// labels so `outer: x++;` terminates correctly. `Statement::Empty` is
    /// excluded: its semicolon is intrinsic.
    pub fn needs_semicolon(&self) -> bool {
        match self {
            Statement::Expr(_)
            | Statement::Variable(_)
            | Statement::Return(_)
            | Statement::Throw(_)
            | Statement::Break(_)
            | Statement::Continue(_)
            | Statement::DoWhile(_) => true,
            Statement::Method(m) => m.body.is_none(),
            Statement::Label(l) => l.statement.needs_semicolon(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Char,
    Str,
    Bool,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub id: NodeId,
    pub prefix: Space,
    pub kind: LiteralKind,
    /// Verbatim source text, delimiters included.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Ushr,
}

impl BinaryOp {
    pub fn token(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Ushr => ">>>",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub id: NodeId,
    pub prefix: Space,
    pub left: Expression,
    /// `before` precedes the operator; the right operand's own prefix follows
    /// it.
    pub op: LeftPadded<BinaryOp>,
    pub right: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    BitNot,
    Neg,
    Pos,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn token(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub id: NodeId,
    pub prefix: Space,
    pub op: UnaryOp,
    /// For postfix operators, the space before the operator token. Unused
    /// (always empty) for prefix operators, where `expr.prefix` carries the
    /// space after the operator instead.
    pub op_space: Space,
    pub expr: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    UshrAssign,
}

impl AssignOp {
    pub fn token(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::AndAssign => "&=",
            AssignOp::OrAssign => "|=",
            AssignOp::XorAssign => "^=",
            AssignOp::ShlAssign => "<<=",
            AssignOp::ShrAssign => ">>=",
            AssignOp::UshrAssign => ">>>=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: NodeId,
    pub prefix: Space,
    pub target: Expression,
    pub op: AssignOp,
    /// Precedes the operator token.
    pub op_prefix: Space,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ternary {
    pub id: NodeId,
    pub prefix: Space,
    pub condition: Expression,
    /// `before` precedes `?`.
    pub true_part: LeftPadded<Expression>,
    /// `before` precedes `:`.
    pub false_part: LeftPadded<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInvocation {
    pub id: NodeId,
    pub prefix: Space,
    /// Receiver; `after` precedes the `.`.
    pub select: Option<Padded<Box<Expression>>>,
    pub name: Ident,
    pub args: Container<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClass {
    pub id: NodeId,
    /// Precedes `new`.
    pub prefix: Space,
    pub type_name: TypeName,
    pub args: Container<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccess {
    pub id: NodeId,
    pub prefix: Space,
    /// `after` precedes the `.`.
    pub target: Padded<Box<Expression>>,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub id: NodeId,
    pub prefix: Space,
    pub target: Expression,
    /// Precedes `[`.
    pub dim_prefix: Space,
    /// `after` precedes `]`.
    pub index: Padded<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parentheses {
    pub id: NodeId,
    pub prefix: Space,
    /// `after` precedes `)`.
    pub tree: Padded<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Ident),
    FieldAccess(Box<FieldAccess>),
    Literal(Literal),
    Binary(Box<Binary>),
    Unary(Box<Unary>),
    Assignment(Box<Assignment>),
    Ternary(Box<Ternary>),
    Invocation(Box<MethodInvocation>),
    NewClass(Box<NewClass>),
    ArrayAccess(Box<ArrayAccess>),
    Parens(Box<Parentheses>),
    Empty(EmptyNode),
}

impl Expression {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Identifier(_) => NodeKind::Identifier,
            Expression::FieldAccess(_) => NodeKind::FieldAccess,
            Expression::Literal(_) => NodeKind::Literal,
            Expression::Binary(_) => NodeKind::Binary,
            Expression::Unary(_) => NodeKind::Unary,
            Expression::Assignment(_) => NodeKind::Assignment,
            Expression::Ternary(_) => NodeKind::Ternary,
            Expression::Invocation(_) => NodeKind::Invocation,
            Expression::NewClass(_) => NodeKind::NewClass,
            Expression::ArrayAccess(_) => NodeKind::ArrayAccess,
            Expression::Parens(_) => NodeKind::Parentheses,
            Expression::Empty(_) => NodeKind::Empty,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Expression::Identifier(i) => i.id,
            Expression::FieldAccess(f) => f.id,
            Expression::Literal(l) => l.id,
            Expression::Binary(b) => b.id,
            Expression::Unary(u) => u.id,
            Expression::Assignment(a) => a.id,
            Expression::Ternary(t) => t.id,
            Expression::Invocation(m) => m.id,
            Expression::NewClass(n) => n.id,
            Expression::ArrayAccess(a) => a.id,
            Expression::Parens(p) => p.id,
            Expression::Empty(e) => e.id,
        }
    }

    pub fn prefix(&self) -> &Space {
        match self {
            Expression::Identifier(i) => &i.prefix,
            Expression::FieldAccess(f) => &f.prefix,
            Expression::Literal(l) => &l.prefix,
            Expression::Binary(b) => &b.prefix,
            Expression::Unary(u) => &u.prefix,
            Expression::Assignment(a) => &a.prefix,
            Expression::Ternary(t) => &t.prefix,
            Expression::Invocation(m) => &m.prefix,
            Expression::NewClass(n) => &n.prefix,
            Expression::ArrayAccess(a) => &a.prefix,
            Expression::Parens(p) => &p.prefix,
            Expression::Empty(e) => &e.prefix,
        }
    }

    pub fn with_prefix(self, prefix: Space) -> Self {
        match self {
            Expression::Identifier(i) => Expression::Identifier(Ident { prefix, ..i }),
            Expression::FieldAccess(f) => {
                Expression::FieldAccess(Box::new(FieldAccess { prefix, ..*f }))
            }
            Expression::Literal(l) => Expression::Literal(Literal { prefix, ..l }),
            Expression::Binary(b) => Expression::Binary(Box::new(Binary { prefix, ..*b })),
            Expression::Unary(u) => Expression::Unary(Box::new(Unary { prefix, ..*u })),
            Expression::Assignment(a) => {
                Expression::Assignment(Box::new(Assignment { prefix, ..*a }))
            }
            Expression::Ternary(t) => Expression::Ternary(Box::new(Ternary { prefix, ..*t })),
            Expression::Invocation(m) => {
                Expression::Invocation(Box::new(MethodInvocation { prefix, ..*m }))
            }
            Expression::NewClass(n) => Expression::NewClass(Box::new(NewClass { prefix, ..*n })),
            Expression::ArrayAccess(a) => {
                Expression::ArrayAccess(Box::new(ArrayAccess { prefix, ..*a }))
            }
            Expression::Parens(p) => Expression::Parens(Box::new(Parentheses { prefix, ..*p })),
            Expression::Empty(e) => Expression::Empty(EmptyNode { prefix, ..e }),
        }
    }

    /// Detach and return this expression's prefix, leaving it empty. Used by
    /// the parser when a wider node (binary, assignment, ternary) takes over
    /// ownership of the leading space.
    pub fn take_prefix(&mut self) -> Space {
        let prefix = self.prefix().clone();
        let this = std::mem::replace(self, Expression::Empty(EmptyNode::new(Space::empty())));
        *self = this.with_prefix(Space::empty());
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_unique() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn with_prefix_preserves_identity() {
        let expr = Expression::Identifier(Ident::new(Space::empty(), "x"));
        let id = expr.id();
        let moved = expr.with_prefix(Space::of("\n    "));
        assert_eq!(moved.id(), id);
        assert_eq!(moved.prefix().whitespace, "\n    ");
    }

    #[test]
    fn take_prefix_empties_in_place() {
        let mut expr = Expression::Identifier(Ident::new(Space::of("  "), "x"));
        let taken = expr.take_prefix();
        assert_eq!(taken.whitespace, "  ");
        assert!(expr.prefix().is_empty());
    }

    #[test]
    fn label_semicolon_recurses() {
        let inner = Statement::Break(Box::new(BreakStmt {
            id: NodeId::fresh(),
            prefix: Space::empty(),
            label: None,
        }));
        let labeled = Statement::Label(Box::new(LabelStmt {
            id: NodeId::fresh(),
            prefix: Space::empty(),
            name: Padded::bare(Ident::new(Space::empty(), "outer")),
            statement: Box::new(inner),
        }));
        assert!(labeled.needs_semicolon());

        let bare_semi = Statement::Empty(EmptyNode::new(Space::empty()));
        assert!(!bare_semi.needs_semicolon());
    }
}
