//! AST node definitions.
//!
//! Every node is allocated in the parse arena. Nodes reference children via
//! `&'a` references and `&'a [T]` slices, so a tree is immutable once built
//! and is released together with its arena.

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use ucode_core::intern::InternedString;
use ucode_core::text::TextRange;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.flags.contains(NodeFlags::MISSING)
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

// ============================================================================
// Source File
// ============================================================================

#[derive(Debug)]
pub struct SourceFile<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
    pub end_of_file_token: Token,
    pub file_name: String,
    pub mode: SourceMode,
    /// The `#!...` first line, if present.
    pub hash_bang: Option<TextRange>,
}

// ============================================================================
// Tokens and Identifiers
// ============================================================================

/// A token kept in the tree, e.g. an operator or a `?.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub data: NodeData,
}

impl Token {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            data: NodeData::new(kind, pos, end),
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub data: NodeData,
    /// Interned handle of `name`.
    pub text: InternedString,
    pub name: &'a str,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    /// A run of literal template text.
    RawText(RawTextStatement<'a>),
    /// `{{ expressions }}`.
    ExpressionBlock(ExpressionBlock<'a>),
    Block(Block<'a>),
    Empty(NodeData),
    Expression(ExpressionStatement<'a>),
    Variable(VariableStatement<'a>),
    If(IfStatement<'a>),
    While(WhileStatement<'a>),
    For(ForStatement<'a>),
    ForIn(ForInStatement<'a>),
    FunctionDeclaration(FunctionDeclaration<'a>),
    Switch(SwitchStatement<'a>),
    Try(TryStatement<'a>),
    Return(ReturnStatement<'a>),
    Break(NodeData),
    Continue(NodeData),
    Import(ImportDeclaration<'a>),
    Export(ExportDeclaration<'a>),
}

#[derive(Debug)]
pub struct RawTextStatement<'a> {
    pub data: NodeData,
    pub text: &'a str,
    /// The preceding tag closed with `-%}` or `-}}`.
    pub trim_start: bool,
    /// The following tag opens with `{%-` or `{{-`.
    pub trim_end: bool,
}

#[derive(Debug)]
pub struct ExpressionBlock<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub open_flags: TokenFlags,
    pub close_flags: TokenFlags,
}

/// `{ ... }` or the statements between `:` and an `endXXX` keyword.
/// Alt-form bodies carry [`NodeFlags::ALT_SYNTAX`]; it is the only field
/// besides spans that differs from the brace form.
#[derive(Debug)]
pub struct Block<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct VariableStatement<'a> {
    pub data: NodeData,
    pub declaration_list: VariableDeclarationList<'a>,
}

/// A `let` or `const` group. The flags carry [`NodeFlags::LET`] or
/// [`NodeFlags::CONST`].
#[derive(Debug)]
pub struct VariableDeclarationList<'a> {
    pub data: NodeData,
    pub declarations: NodeList<'a, VariableDeclaration<'a>>,
}

impl VariableDeclarationList<'_> {
    #[inline]
    pub fn is_const(&self) -> bool {
        self.data.flags.contains(NodeFlags::CONST)
    }
}

#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

/// `if`. An `elif` chain is represented as nested `If` statements in the
/// else slot.
#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub then_statement: &'a Statement<'a>,
    pub else_statement: OptionalNode<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

/// Counting `for (init; condition; step)`. Every clause may be absent.
#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub initializer: Option<ForInitializer<'a>>,
    pub condition: OptionalNode<'a, Expression<'a>>,
    pub incrementor: OptionalNode<'a, Expression<'a>>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub enum ForInitializer<'a> {
    Variable(VariableDeclarationList<'a>),
    Expression(&'a Expression<'a>),
}

/// Iterating `for ([let] item in e)` or `for ([let] key, value in e)`.
/// The `let` form carries [`NodeFlags::LET`].
#[derive(Debug)]
pub struct ForInStatement<'a> {
    pub data: NodeData,
    pub binding: ForInBinding<'a>,
    pub expression: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub enum ForInBinding<'a> {
    Item(Identifier<'a>),
    KeyValue {
        key: Identifier<'a>,
        value: Identifier<'a>,
    },
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub parameters: ParameterList<'a>,
    pub body: Block<'a>,
}

/// `a, b, ...rest`.
#[derive(Debug)]
pub struct ParameterList<'a> {
    pub params: NodeList<'a, Parameter<'a>>,
    pub rest: Option<Parameter<'a>>,
}

impl ParameterList<'_> {
    pub fn len(&self) -> usize {
        self.params.len() + usize::from(self.rest.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct Parameter<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct SwitchStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub clauses: NodeList<'a, CaseOrDefaultClause<'a>>,
}

#[derive(Debug)]
pub enum CaseOrDefaultClause<'a> {
    Case(CaseClause<'a>),
    Default(DefaultClause<'a>),
}

#[derive(Debug)]
pub struct CaseClause<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct DefaultClause<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct TryStatement<'a> {
    pub data: NodeData,
    pub try_block: Block<'a>,
    pub catch_clause: CatchClause<'a>,
}

#[derive(Debug)]
pub struct CatchClause<'a> {
    pub data: NodeData,
    pub variable: Option<Identifier<'a>>,
    pub block: Block<'a>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub expression: OptionalNode<'a, Expression<'a>>,
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug)]
pub struct ImportDeclaration<'a> {
    pub data: NodeData,
    pub import_clause: ImportClause<'a>,
    pub module_specifier: StringLiteral<'a>,
}

/// `d`, `d, * as ns`, `d, { ... }`, `* as ns` or `{ ... }`.
#[derive(Debug)]
pub struct ImportClause<'a> {
    pub data: NodeData,
    pub name: Option<Identifier<'a>>,
    pub named_bindings: Option<NamedImportBindings<'a>>,
}

#[derive(Debug)]
pub enum NamedImportBindings<'a> {
    NamespaceImport(NamespaceImport<'a>),
    NamedImports(NamedImports<'a>),
}

#[derive(Debug)]
pub struct NamespaceImport<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct NamedImports<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, ImportSpecifier<'a>>,
}

#[derive(Debug)]
pub struct ImportSpecifier<'a> {
    pub data: NodeData,
    pub imported: ImportedName<'a>,
    pub alias: Option<Identifier<'a>>,
}

impl<'a> ImportSpecifier<'a> {
    /// The name bound in the importing scope.
    pub fn local_name(&self) -> Option<&Identifier<'a>> {
        match (&self.alias, &self.imported) {
            (Some(alias), _) => Some(alias),
            (None, ImportedName::Identifier(name)) => Some(name),
            (None, _) => None,
        }
    }
}

#[derive(Debug)]
pub enum ImportedName<'a> {
    /// `default as x`.
    Default(Token),
    /// `"sym" as x`.
    String(StringLiteral<'a>),
    Identifier(Identifier<'a>),
}

#[derive(Debug)]
pub struct ExportDeclaration<'a> {
    pub data: NodeData,
    pub body: ExportBody<'a>,
}

#[derive(Debug)]
pub enum ExportBody<'a> {
    Named(NamedExports<'a>),
    /// `export const ...` / `export let ...`.
    Variable(VariableDeclarationList<'a>),
    Function(&'a FunctionDeclaration<'a>),
    Default(&'a Expression<'a>),
}

#[derive(Debug)]
pub struct NamedExports<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, ExportSpecifier<'a>>,
}

#[derive(Debug)]
pub struct ExportSpecifier<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub alias: Option<ExportAlias<'a>>,
}

#[derive(Debug)]
pub enum ExportAlias<'a> {
    Identifier(Identifier<'a>),
    String(StringLiteral<'a>),
    Default(Token),
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Number(NumberLiteral),
    Double(DoubleLiteral),
    String(StringLiteral<'a>),
    True(NodeData),
    False(NodeData),
    Null(NodeData),
    This(NodeData),
    Identifier(Identifier<'a>),
    Array(ArrayLiteralExpression<'a>),
    Object(ObjectLiteralExpression<'a>),
    Template(TemplateExpression<'a>),
    Regex(RegularExpressionLiteral<'a>),
    PropertyAccess(PropertyAccessExpression<'a>),
    ElementAccess(ElementAccessExpression<'a>),
    Call(CallExpression<'a>),
    Assignment(AssignmentExpression<'a>),
    AugmentedAssignment(AssignmentExpression<'a>),
    Conditional(ConditionalExpression<'a>),
    Binary(BinaryExpression<'a>),
    Unary(UnaryExpression<'a>),
    Update(UpdateExpression<'a>),
    Delete(DeleteExpression<'a>),
    ArrowFunction(ArrowFunction<'a>),
    FunctionExpression(FunctionExpression<'a>),
    Sequence(SequenceExpression<'a>),
    Spread(SpreadElement<'a>),
}

// -- Literals --

#[derive(Debug, Clone)]
pub struct NumberLiteral {
    pub data: NodeData,
    pub value: u64,
    pub numeric_literal_flags: TokenFlags,
}

#[derive(Debug, Clone)]
pub struct DoubleLiteral {
    pub data: NodeData,
    pub value: f64,
}

/// A quoted string. `value` has escapes decoded.
#[derive(Debug, Clone)]
pub struct StringLiteral<'a> {
    pub data: NodeData,
    pub value: &'a str,
}

#[derive(Debug, Clone)]
pub struct RegularExpressionLiteral<'a> {
    pub data: NodeData,
    /// Pattern text between the slashes, undecoded.
    pub pattern: &'a str,
    pub flags: RegexFlags,
}

/// `` `head${e1}mid${e2}tail` ``: one head segment, then one span per
/// placeholder, each followed by its segment.
#[derive(Debug)]
pub struct TemplateExpression<'a> {
    pub data: NodeData,
    pub head: TemplateSegment<'a>,
    pub template_spans: NodeList<'a, TemplateSpan<'a>>,
}

impl<'a> TemplateExpression<'a> {
    pub fn segments(&self) -> impl Iterator<Item = &TemplateSegment<'a>> {
        std::iter::once(&self.head).chain(self.template_spans.iter().map(|span| &span.literal))
    }
}

#[derive(Debug)]
pub struct TemplateSpan<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub literal: TemplateSegment<'a>,
}

#[derive(Debug, Clone)]
pub struct TemplateSegment<'a> {
    pub data: NodeData,
    pub value: &'a str,
}

// -- Compound Expressions --

#[derive(Debug)]
pub struct ArrayLiteralExpression<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ObjectLiteralExpression<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectLiteralElement<'a>>,
}

#[derive(Debug)]
pub enum ObjectLiteralElement<'a> {
    PropertyAssignment(PropertyAssignment<'a>),
    ShorthandPropertyAssignment(ShorthandPropertyAssignment<'a>),
    SpreadAssignment(SpreadAssignment<'a>),
}

#[derive(Debug)]
pub struct PropertyAssignment<'a> {
    pub data: NodeData,
    pub name: PropertyName<'a>,
    pub initializer: &'a Expression<'a>,
}

#[derive(Debug)]
pub enum PropertyName<'a> {
    /// Any word, keywords included.
    Identifier(Identifier<'a>),
    StringLiteral(StringLiteral<'a>),
    Computed(ComputedPropertyName<'a>),
}

#[derive(Debug)]
pub struct ComputedPropertyName<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ShorthandPropertyAssignment<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct SpreadAssignment<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

// -- Chains --

#[derive(Debug)]
pub struct PropertyAccessExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub question_dot_token: Option<Token>,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct ElementAccessExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub question_dot_token: Option<Token>,
    pub argument_expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub question_dot_token: Option<Token>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

// -- Operators --

/// Shared by plain (`=`) and augmented (`+=`, `??=`, ...) assignment.
#[derive(Debug)]
pub struct AssignmentExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator_token: Token,
    pub right: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ConditionalExpression<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub when_true: &'a Expression<'a>,
    pub when_false: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator_token: Token,
    pub right: &'a Expression<'a>,
}

/// `!`, `~`, `-` or `+` applied to an operand.
#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct UpdateExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: &'a Expression<'a>,
    pub prefix: bool,
}

#[derive(Debug)]
pub struct DeleteExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

// -- Functions --

#[derive(Debug)]
pub struct ArrowFunction<'a> {
    pub data: NodeData,
    pub parameters: ParameterList<'a>,
    pub body: ArrowFunctionBody<'a>,
}

#[derive(Debug)]
pub enum ArrowFunctionBody<'a> {
    Block(&'a Block<'a>),
    Expression(&'a Expression<'a>),
}

#[derive(Debug)]
pub struct FunctionExpression<'a> {
    pub data: NodeData,
    pub name: Option<Identifier<'a>>,
    pub parameters: ParameterList<'a>,
    pub body: Block<'a>,
}

// -- Lists --

/// Two or more comma-separated expressions.
#[derive(Debug)]
pub struct SequenceExpression<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct SpreadElement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}
